//! Verb table and dispatch.

pub mod dir;
pub mod file;
pub mod mount;

use anyhow::{Result, anyhow};

use crate::session::Session;
use crate::shell::LineSource;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "host",
        usage: "host [[<local>@][<hop>:...]]<host>",
        help: "open the MOUNT channel, optionally source-routed",
    },
    CommandSpec {
        name: "uid",
        usage: "uid [<uid> [<secret-key>]]",
        help: "set the uid presented in credentials",
    },
    CommandSpec {
        name: "gid",
        usage: "gid [<gid>]",
        help: "set the gid presented in credentials",
    },
    CommandSpec {
        name: "cd",
        usage: "cd [<path>]",
        help: "change the remote directory",
    },
    CommandSpec {
        name: "lcd",
        usage: "lcd [<path>]",
        help: "change the local directory",
    },
    CommandSpec {
        name: "cat",
        usage: "cat <name>",
        help: "print a remote file",
    },
    CommandSpec {
        name: "ls",
        usage: "ls [-l] [<pattern> ...]",
        help: "list the remote directory",
    },
    CommandSpec {
        name: "get",
        usage: "get [-i] [<pattern> ...]",
        help: "download matching files (-i skips confirmation)",
    },
    CommandSpec {
        name: "df",
        usage: "df",
        help: "show filesystem statistics",
    },
    CommandSpec {
        name: "rm",
        usage: "rm <name>",
        help: "remove a remote file",
    },
    CommandSpec {
        name: "ln",
        usage: "ln <name> <link>",
        help: "hard-link a remote file",
    },
    CommandSpec {
        name: "mv",
        usage: "mv <from> <to>",
        help: "rename within the remote directory",
    },
    CommandSpec {
        name: "mkdir",
        usage: "mkdir <name>",
        help: "create a remote directory",
    },
    CommandSpec {
        name: "rmdir",
        usage: "rmdir <name>",
        help: "remove a remote directory",
    },
    CommandSpec {
        name: "chmod",
        usage: "chmod <octal-mode> <name>",
        help: "change a remote file's mode",
    },
    CommandSpec {
        name: "chown",
        usage: "chown <uid>[.<gid>] <name>",
        help: "change a remote file's owner",
    },
    CommandSpec {
        name: "put",
        usage: "put <local-file> [<remote-name>]",
        help: "upload a local file",
    },
    CommandSpec {
        name: "mount",
        usage: "mount [-upTU] [-P <port>] <path>",
        help: "mount an export (-u evades the mount table, -p goes via portmap)",
    },
    CommandSpec {
        name: "umount",
        usage: "umount",
        help: "unmount and drop the NFS channel",
    },
    CommandSpec {
        name: "umountall",
        usage: "umountall",
        help: "clear this client from the server's mount table",
    },
    CommandSpec {
        name: "export",
        usage: "export",
        help: "show the export list",
    },
    CommandSpec {
        name: "dump",
        usage: "dump",
        help: "show the server's mount table",
    },
    CommandSpec {
        name: "status",
        usage: "status",
        help: "show the session state",
    },
    CommandSpec {
        name: "handle",
        usage: "handle [<hex-bytes> ...]",
        help: "print the current handle, or install a raw one",
    },
    CommandSpec {
        name: "mknod",
        usage: "mknod <name> p | mknod <name> b|c <major> <minor>",
        help: "create a FIFO or device node",
    },
    CommandSpec {
        name: "help",
        usage: "help",
        help: "print this list",
    },
    CommandSpec {
        name: "quit",
        usage: "quit",
        help: "leave the shell",
    },
    CommandSpec {
        name: "bye",
        usage: "bye",
        help: "leave the shell",
    },
];

/// The usage error for a verb.
pub(crate) fn usage(verb: &str) -> anyhow::Error {
    COMMANDS.iter().find(|c| c.name == verb).map_or_else(
        || anyhow!("{verb}: unknown command"),
        |c| anyhow!("usage: {}", c.usage),
    )
}

/// Runs one tokenised command line. Errors are printed to stderr; they
/// never change session state beyond what the failed operation did.
pub async fn dispatch(session: &mut Session, lines: &mut dyn LineSource, argv: &[&str]) -> Flow {
    let Some((&verb, args)) = argv.split_first() else {
        return Flow::Continue;
    };
    match run(session, lines, verb, args).await {
        Ok(flow) => flow,
        Err(e) => {
            eprintln!("{e}");
            Flow::Continue
        }
    }
}

async fn run(
    session: &mut Session,
    lines: &mut dyn LineSource,
    verb: &str,
    args: &[&str],
) -> Result<Flow> {
    match verb {
        "host" => mount::host(session, args).await?,
        "mount" => mount::mount(session, args).await?,
        "umount" => mount::umount(session, args).await?,
        "umountall" => mount::umountall(session, args).await?,
        "export" => mount::export(session, args).await?,
        "dump" => mount::dump(session, args).await?,
        "handle" => mount::handle(session, args).await?,
        "status" => mount::status(session, args)?,
        "cd" => dir::cd(session, args).await?,
        "ls" => dir::ls(session, args).await?,
        "df" => dir::df(session, args).await?,
        "cat" => file::cat(session, args).await?,
        "get" => file::get(session, lines, args).await?,
        "put" => file::put(session, args).await?,
        "rm" => file::rm(session, args).await?,
        "ln" => file::ln(session, args).await?,
        "mv" => file::mv(session, args).await?,
        "mkdir" => file::mkdir(session, args).await?,
        "rmdir" => file::rmdir(session, args).await?,
        "chmod" => file::chmod(session, args).await?,
        "chown" => file::chown(session, args).await?,
        "mknod" => file::mknod(session, args).await?,
        "uid" => file::uid(session, args)?,
        "gid" => file::gid(session, args)?,
        "lcd" => file::lcd(args)?,
        "help" => help(),
        "quit" | "bye" => return Ok(Flow::Quit),
        _ => return Err(anyhow!("{verb}: unknown command")),
    }
    Ok(Flow::Continue)
}

fn help() {
    for spec in COMMANDS {
        println!("{:<44} {}", spec.usage, spec.help);
    }
    println!("{:<44} {}", "!<command>", "run a local shell command");
}
