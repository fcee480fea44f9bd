//! Directory-side verbs: cd, ls, df.

use anyhow::{Result, bail};
use nfspry_client::NfsClient;
use nfspry_types::nfs3::{FSSTAT3args, Nfs3Result, READLINK3args, ftype3, nfs_fh3};

use super::usage;
use crate::session::Session;
use crate::{glob, ops, render};

pub async fn cd(session: &mut Session, args: &[&str]) -> Result<()> {
    let path = match args {
        [] => "",
        &[path] => path,
        _ => return Err(usage("cd")),
    };

    let nfs = session.require_nfs()?;
    let new_cwd = ops::resolve_dir(&mut nfs.channel.client, &nfs.root, &nfs.cwd, path).await?;
    // committed only on full success; a failed walk leaves cwd untouched
    nfs.cwd = new_cwd;
    Ok(())
}

pub async fn ls(session: &mut Session, args: &[&str]) -> Result<()> {
    let (long, patterns) = match args.split_first() {
        Some((&"-l", rest)) => (true, rest),
        _ => (false, args),
    };

    let nfs = session.require_nfs()?;
    let names = ops::read_dir_names(&mut nfs.channel.client, &nfs.cwd).await?;

    for name in names.iter().filter(|n| glob::selects(patterns, n.as_str())) {
        if !long {
            println!("{name}");
            continue;
        }
        // READDIR replies carry no attributes, so -l costs one LOOKUP per
        // name
        match ops::lookup(&mut nfs.channel.client, &nfs.cwd, name).await {
            Ok(ok) => match ops::attrs_of(&ok, name) {
                Ok(attrs) => {
                    let target = if attrs.type_ == ftype3::NF3LNK {
                        symlink_target(&mut nfs.channel.client, &ok.object).await
                    } else {
                        None
                    };
                    println!("{}", render::long_entry(name, attrs, target.as_deref()));
                }
                Err(e) => eprintln!("{e}"),
            },
            Err(e) => eprintln!("{e}"),
        }
    }
    Ok(())
}

async fn symlink_target(nfs: &mut NfsClient, fh: &nfs_fh3) -> Option<String> {
    match nfs
        .readlink(&READLINK3args { symlink: fh.clone() })
        .await
    {
        Ok(Nfs3Result::Ok(ok)) => Some(String::from_utf8_lossy(ok.data.as_ref()).into_owned()),
        _ => None,
    }
}

pub async fn df(session: &mut Session, args: &[&str]) -> Result<()> {
    if !args.is_empty() {
        return Err(usage("df"));
    }

    let remote = session.require_remote()?;
    let Some(nfs) = remote.nfs.as_mut() else {
        bail!("no remote file system mounted");
    };
    let label = format!("{}:{}", remote.host, nfs.mount_path);

    let res = nfs
        .channel
        .client
        .fsstat(&FSSTAT3args {
            fsroot: nfs.cwd.clone(),
        })
        .await?;
    let stat = ops::check(res, "df")?;

    println!(
        "{:<30} {:>10} {:>10} {:>10} {:>5}",
        "Filesystem", "kbytes", "used", "avail", "cap"
    );
    println!("{}", render::df_line(&label, &stat));
    println!(
        "files: {} total, {} free, {} available",
        stat.tfiles, stat.ffiles, stat.afiles
    );
    Ok(())
}
