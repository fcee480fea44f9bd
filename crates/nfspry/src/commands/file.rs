//! File-side verbs: transfers, attribute changes, creation and removal,
//! plus the identity and local-directory verbs.

use std::fs::File;
use std::io::Write as _;

use anyhow::{Result, anyhow, bail};
use nfspry_types::nfs3::{
    LINK3args, MKDIR3args, MKNOD3args, REMOVE3args, RENAME3args, RMDIR3args, SETATTR3args,
    devicedata3, diropargs3, filename3, ftype3, mknoddata3, sattr3, sattrguard3, set_gid3,
    set_mode3, set_uid3, specdata3,
};

use super::usage;
use crate::session::Session;
use crate::shell::LineSource;
use crate::{glob, local, ops};

pub async fn cat(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[name] = args else {
        return Err(usage("cat"));
    };

    let nfs = session.require_nfs()?;
    let ok = ops::lookup(&mut nfs.channel.client, &nfs.cwd, name).await?;
    let attrs = ops::attrs_of(&ok, name)?;
    if attrs.type_ != ftype3::NF3REG {
        bail!("{name}: is not a regular file");
    }
    let size = attrs.size;

    let mut stdout = std::io::stdout();
    ops::read_file(
        &mut nfs.channel.client,
        &ok.object,
        size,
        nfs.transfer_size,
        &mut stdout,
    )
    .await?;
    stdout.flush()?;
    Ok(())
}

pub async fn get(
    session: &mut Session,
    lines: &mut dyn LineSource,
    args: &[&str],
) -> Result<()> {
    let (no_confirm, patterns) = match args.split_first() {
        Some((&"-i", rest)) => (true, rest),
        _ => (false, args),
    };
    let confirm = session.interactive && !no_confirm;

    let nfs = session.require_nfs()?;
    let names = ops::read_dir_names(&mut nfs.channel.client, &nfs.cwd).await?;

    for name in names.iter().filter(|n| glob::selects(patterns, n.as_str())) {
        let ok = match ops::lookup(&mut nfs.channel.client, &nfs.cwd, name).await {
            Ok(ok) => ok,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };
        let attrs = ops::attrs_of(&ok, name)?;
        if attrs.type_ != ftype3::NF3REG {
            continue;
        }
        let size = attrs.size;

        if confirm {
            let answer = lines.next_line(&format!("{name}? ")).await?;
            let wanted = answer.is_some_and(|a| a.starts_with('y') || a.starts_with('Y'));
            if !wanted {
                continue;
            }
        }

        let mut out = match File::create(name) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("{name}: {e}");
                continue;
            }
        };
        match ops::read_file(
            &mut nfs.channel.client,
            &ok.object,
            size,
            nfs.transfer_size,
            &mut out,
        )
        .await
        {
            Ok(received) => {
                if received == size {
                    println!("{name}: {received} bytes");
                } else {
                    eprintln!("{name}: expected {size} bytes, received {received}");
                }
            }
            // a failed transfer leaves the truncated local file behind
            Err(e) => eprintln!("{name}: {e}"),
        }
    }
    Ok(())
}

pub async fn put(session: &mut Session, args: &[&str]) -> Result<()> {
    let (local_name, remote_name) = match args {
        &[local] => (local, local::basename(local)),
        &[local, remote] => (local, remote),
        _ => return Err(usage("put")),
    };

    let mut src = File::open(local_name).map_err(|e| anyhow!("{local_name}: {e}"))?;

    let nfs = session.require_nfs()?;
    let chunk = nfs.transfer_size as usize;
    let sent = ops::write_file(
        &mut nfs.channel.client,
        &nfs.cwd,
        remote_name,
        &mut src,
        chunk,
    )
    .await?;
    println!("{remote_name}: {sent} bytes");
    Ok(())
}

pub async fn rm(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[name] = args else {
        return Err(usage("rm"));
    };
    let nfs = session.require_nfs()?;
    let res = nfs
        .channel
        .client
        .remove(&REMOVE3args {
            object: diropargs3 {
                dir: nfs.cwd.clone(),
                name: filename3::from(name),
            },
        })
        .await?;
    ops::check(res, name)?;
    Ok(())
}

pub async fn ln(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[from, to] = args else {
        return Err(usage("ln"));
    };
    let nfs = session.require_nfs()?;
    let file = ops::lookup(&mut nfs.channel.client, &nfs.cwd, from).await?.object;
    let res = nfs
        .channel
        .client
        .link(&LINK3args {
            file,
            link: diropargs3 {
                dir: nfs.cwd.clone(),
                name: filename3::from(to),
            },
        })
        .await?;
    ops::check(res, to)?;
    Ok(())
}

pub async fn mv(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[from, to] = args else {
        return Err(usage("mv"));
    };
    let nfs = session.require_nfs()?;
    let res = nfs
        .channel
        .client
        .rename(&RENAME3args {
            from: diropargs3 {
                dir: nfs.cwd.clone(),
                name: filename3::from(from),
            },
            to: diropargs3 {
                dir: nfs.cwd.clone(),
                name: filename3::from(to),
            },
        })
        .await?;
    ops::check(res, from)?;
    Ok(())
}

pub async fn mkdir(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[name] = args else {
        return Err(usage("mkdir"));
    };
    let nfs = session.require_nfs()?;
    let res = nfs
        .channel
        .client
        .mkdir(&MKDIR3args {
            where_: diropargs3 {
                dir: nfs.cwd.clone(),
                name: filename3::from(name),
            },
            attributes: sattr3 {
                mode: set_mode3::Some(0o40755),
                ..sattr3::default()
            },
        })
        .await?;
    ops::check(res, name)?;
    Ok(())
}

pub async fn rmdir(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[name] = args else {
        return Err(usage("rmdir"));
    };
    let nfs = session.require_nfs()?;
    let res = nfs
        .channel
        .client
        .rmdir(&RMDIR3args {
            object: diropargs3 {
                dir: nfs.cwd.clone(),
                name: filename3::from(name),
            },
        })
        .await?;
    ops::check(res, name)?;
    Ok(())
}

pub async fn chmod(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[mode, name] = args else {
        return Err(usage("chmod"));
    };
    let mode = u32::from_str_radix(mode, 8).map_err(|_| anyhow!("{mode}: bad mode string"))?;

    let nfs = session.require_nfs()?;
    let object = ops::lookup(&mut nfs.channel.client, &nfs.cwd, name).await?.object;
    let res = nfs
        .channel
        .client
        .setattr(&SETATTR3args {
            object,
            new_attributes: sattr3 {
                mode: set_mode3::Some(mode),
                ..sattr3::default()
            },
            // unconditional: no ctime guard
            guard: sattrguard3::None,
        })
        .await?;
    ops::check(res, name)?;
    Ok(())
}

pub async fn chown(session: &mut Session, args: &[&str]) -> Result<()> {
    let &[owner, name] = args else {
        return Err(usage("chown"));
    };
    let (uid, gid) = match owner.split_once('.') {
        Some((uid, gid)) => (parse_id(uid)?, Some(parse_id(gid)?)),
        None => (parse_id(owner)?, None),
    };

    let nfs = session.require_nfs()?;
    let object = ops::lookup(&mut nfs.channel.client, &nfs.cwd, name).await?.object;
    let res = nfs
        .channel
        .client
        .setattr(&SETATTR3args {
            object,
            new_attributes: sattr3 {
                uid: set_uid3::Some(uid),
                gid: gid.map_or(set_gid3::None, set_gid3::Some),
                ..sattr3::default()
            },
            guard: sattrguard3::None,
        })
        .await?;
    ops::check(res, name)?;
    Ok(())
}

pub async fn mknod(session: &mut Session, args: &[&str]) -> Result<()> {
    let mode_0777 = || sattr3 {
        mode: set_mode3::Some(0o777),
        ..sattr3::default()
    };

    let (name, what) = match args {
        &[name, kind] if kind == "p" => (name, mknoddata3::NF3FIFO(mode_0777())),
        &[name, kind, major, minor] if kind == "b" || kind == "c" => {
            let device = devicedata3 {
                dev_attributes: mode_0777(),
                spec: specdata3 {
                    specdata1: major.parse().map_err(|_| anyhow!("{major}: bad major"))?,
                    specdata2: minor.parse().map_err(|_| anyhow!("{minor}: bad minor"))?,
                },
            };
            if kind == "b" {
                (name, mknoddata3::NF3BLK(device))
            } else {
                (name, mknoddata3::NF3CHR(device))
            }
        }
        _ => return Err(usage("mknod")),
    };

    let nfs = session.require_nfs()?;
    let res = nfs
        .channel
        .client
        .mknod(&MKNOD3args {
            where_: diropargs3 {
                dir: nfs.cwd.clone(),
                name: filename3::from(name),
            },
            what,
        })
        .await?;
    ops::check(res, name)?;
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
pub fn uid(session: &mut Session, args: &[&str]) -> Result<()> {
    match args {
        [] => println!("{}", session.auth.uid as i32),
        &[uid] => {
            session.auth.uid = parse_id(uid)?;
            session.apply_auth()?;
        }
        &[uid, secret_key] => {
            session.auth.uid = parse_id(uid)?;
            session.auth.secret_key = Some(secret_key.to_string());
            session.apply_auth()?;
        }
        _ => return Err(usage("uid")),
    }
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
pub fn gid(session: &mut Session, args: &[&str]) -> Result<()> {
    match args {
        [] => println!("{}", session.auth.gid as i32),
        &[gid] => {
            session.auth.gid = parse_id(gid)?;
            session.apply_auth()?;
        }
        _ => return Err(usage("gid")),
    }
    Ok(())
}

pub fn lcd(args: &[&str]) -> Result<()> {
    match args {
        [] => local::change_dir(None),
        &[path] => local::change_dir(Some(path)),
        _ => Err(usage("lcd")),
    }
}

/// Ids may be given as unsigned values or as the traditional negative
/// forms (-2 for nobody).
#[allow(clippy::cast_sign_loss)]
fn parse_id(value: &str) -> Result<u32> {
    if let Ok(id) = value.parse::<u32>() {
        return Ok(id);
    }
    value
        .parse::<i32>()
        .map(|id| id as u32)
        .map_err(|_| anyhow!("{value}: bad id"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::parse_id;

    #[test]
    fn ids_parse_signed_and_unsigned() {
        assert_eq!(parse_id("0").unwrap(), 0);
        assert_eq!(parse_id("1000").unwrap(), 1000);
        assert_eq!(parse_id("-2").unwrap(), 0xffff_fffe);
        assert!(parse_id("nobody").is_err());
    }
}
