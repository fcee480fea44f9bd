//! The command loop: line input, tokenising, dispatch, and SIGINT
//! handling. Interrupting a command drops its future and returns to the
//! prompt; an interrupted RPC may leave the next call on that channel
//! failing with an XID mismatch, which a retry clears.

use std::io::Write as _;
use std::process::Command;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};

use crate::commands::{self, Flow};
use crate::session::Session;

const PROMPT: &str = "nfs> ";

/// A pluggable source of input lines. The default reads stdin; command
/// confirmations (`get`) read from the same source.
#[async_trait::async_trait(?Send)]
pub trait LineSource {
    /// Returns the next line without its terminator, or `None` on EOF.
    async fn next_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;
}

pub struct StdinLines {
    interactive: bool,
    reader: BufReader<Stdin>,
}

impl StdinLines {
    #[must_use]
    pub fn new(interactive: bool) -> Self {
        Self {
            interactive,
            reader: BufReader::new(tokio::io::stdin()),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl LineSource for StdinLines {
    async fn next_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        if self.interactive {
            print!("{prompt}");
            std::io::stdout().flush()?;
        }
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }
}

/// Runs the shell until `quit`/`bye` or EOF, then runs the close path.
pub async fn run(session: &mut Session, lines: &mut dyn LineSource) -> Result<()> {
    loop {
        let line = tokio::select! {
            line = lines.next_line(PROMPT) => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                continue;
            }
        };
        let Some(line) = line else {
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(command) = line.strip_prefix('!') {
            run_local(command);
            continue;
        }

        let argv: Vec<&str> = line.split_whitespace().collect();
        let flow = tokio::select! {
            flow = commands::dispatch(session, lines, &argv) => flow,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("interrupted");
                Flow::Continue
            }
        };
        if flow == Flow::Quit {
            break;
        }
    }

    session.close_session().await;
    Ok(())
}

/// `!<cmd>` runs in the local shell; a bare `!` spawns an interactive one.
fn run_local(command: &str) {
    let command = command.trim();
    let status = if command.is_empty() {
        Command::new("sh").status()
    } else {
        Command::new("sh").arg("-c").arg(command).status()
    };
    if let Err(e) = status {
        eprintln!("sh: {e}");
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn tokenising_is_whitespace_only() {
        let line = "  get  -i   '*.txt'  ";
        let argv: Vec<&str> = line.split_whitespace().collect();
        // no quoting: the quotes travel with the token
        assert_eq!(argv, vec!["get", "-i", "'*.txt'"]);
    }
}
