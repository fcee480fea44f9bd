//! NFS driver pipelines: path walking, directory enumeration, and the
//! read/write loops. These take the client and handles directly so they
//! can be exercised against an in-memory peer.

use std::io::{Read, Write};

use anyhow::{Result, bail};
use nfspry_client::NfsClient;
use nfspry_types::nfs3::{
    COMMIT3args, CREATE3args, LOOKUP3args, LOOKUP3resok, Nfs3Option, Nfs3Result, READ3args,
    READDIR3args, cookie3, cookieverf3, createhow3, createverf3, diropargs3, fattr3, filename3,
    ftype3, nfs_fh3, stable_how, WRITE3args,
};
use nfspry_types::xdr::Opaque;

/// Byte budget for each READDIR reply.
pub const READDIR_COUNT: u32 = 8192;

/// Maps a protocol-level failure to a command error via the status table.
pub fn check<T, E>(res: Nfs3Result<T, E>, what: &str) -> Result<T> {
    match res {
        Nfs3Result::Ok(v) => Ok(v),
        Nfs3Result::Err((status, _)) => bail!("{what}: {status}"),
    }
}

pub async fn lookup(nfs: &mut NfsClient, dir: &nfs_fh3, name: &str) -> Result<LOOKUP3resok> {
    let res = nfs
        .lookup(&LOOKUP3args {
            what: diropargs3 {
                dir: dir.clone(),
                name: filename3::from(name),
            },
        })
        .await?;
    check(res, name)
}

/// The attributes of a successful lookup; their absence after a
/// successful call is a protocol anomaly, not a default.
pub fn attrs_of<'a>(ok: &'a LOOKUP3resok, name: &str) -> Result<&'a fattr3> {
    match &ok.obj_attributes {
        Nfs3Option::Some(attrs) => Ok(attrs),
        Nfs3Option::None => bail!("{name}: server returned no attributes"),
    }
}

/// Walks `path` from the root (leading `/` or empty path) or the current
/// directory, requiring every segment to be a directory. Returns the
/// final handle; the caller commits it only on success.
pub async fn resolve_dir(
    nfs: &mut NfsClient,
    root: &nfs_fh3,
    cwd: &nfs_fh3,
    path: &str,
) -> Result<nfs_fh3> {
    let mut handle = if path.is_empty() || path.starts_with('/') {
        root.clone()
    } else {
        cwd.clone()
    };

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let ok = lookup(nfs, &handle, segment).await?;
        let attrs = attrs_of(&ok, segment)?;
        if attrs.type_ != ftype3::NF3DIR {
            bail!("{segment}: is not a directory");
        }
        handle = ok.object;
    }
    Ok(handle)
}

/// Enumerates a directory with repeated READDIR calls, resuming from the
/// cookie of the last entry of each reply (not the verifier), until the
/// server reports eof. Names come back sorted.
pub async fn read_dir_names(nfs: &mut NfsClient, dir: &nfs_fh3) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut cookie: cookie3 = 0;
    let mut cookieverf = cookieverf3::default();

    loop {
        let res = nfs
            .readdir(&READDIR3args {
                dir: dir.clone(),
                cookie,
                cookieverf,
                count: READDIR_COUNT,
            })
            .await?;
        let ok = check(res, "readdir")?;

        let eof = ok.reply.eof;
        cookieverf = ok.cookieverf;
        let entries = ok.reply.entries.into_inner();
        if let Some(last) = entries.last() {
            cookie = last.cookie;
        } else if !eof {
            bail!("readdir: empty reply without eof");
        }
        for entry in entries {
            names.push(String::from_utf8_lossy(entry.name.as_ref()).into_owned());
        }

        if eof {
            break;
        }
    }

    names.sort();
    Ok(names)
}

/// Reads a regular file into `out`: READ in `transfer_size` chunks until
/// the known size is covered or the server reports eof, advancing by the
/// actual data length of each reply. Returns the bytes transferred; the
/// caller compares against the expected size.
pub async fn read_file(
    nfs: &mut NfsClient,
    fh: &nfs_fh3,
    size: u64,
    transfer_size: u32,
    out: &mut dyn Write,
) -> Result<u64> {
    let mut offset = 0u64;
    while offset < size {
        let res = nfs
            .read(&READ3args {
                file: fh.clone(),
                offset,
                count: transfer_size,
            })
            .await?;
        let ok = check(res, "read")?;

        let data = ok.data.as_ref();
        out.write_all(data)?;
        offset += data.len() as u64;

        if ok.eof {
            break;
        }
        if data.is_empty() {
            bail!("read: server returned no data before eof");
        }
    }
    Ok(offset)
}

/// Writes a new remote file from `src`: an exclusive CREATE (a failure is
/// only a warning, so existing files can be overwritten), a LOOKUP for
/// the handle, UNSTABLE WRITEs in `chunk`-sized pieces, and one COMMIT
/// over the whole file. Returns the bytes transferred.
pub async fn write_file(
    nfs: &mut NfsClient,
    dir: &nfs_fh3,
    name: &str,
    src: &mut dyn Read,
    chunk: usize,
) -> Result<u64> {
    let res = nfs
        .create(&CREATE3args {
            where_: diropargs3 {
                dir: dir.clone(),
                name: filename3::from(name),
            },
            how: createhow3::EXCLUSIVE(createverf3(rand::random())),
        })
        .await?;
    if let Nfs3Result::Err((status, _)) = res {
        eprintln!("create {name}: {status} (continuing)");
    }

    let fh = lookup(nfs, dir, name).await?.object;

    let mut offset = 0u64;
    let mut buf = vec![0u8; chunk.max(1)];
    loop {
        let filled = src.read(&mut buf)?;
        if filled == 0 {
            break;
        }

        let mut written = 0usize;
        while written < filled {
            let res = nfs
                .write(&WRITE3args {
                    file: fh.clone(),
                    offset,
                    count: (filled - written) as u32,
                    stable: stable_how::UNSTABLE,
                    data: Opaque::borrowed(&buf[written..filled]),
                })
                .await?;
            let ok = check(res, "write")?;
            if ok.count == 0 {
                bail!("write: server accepted no data");
            }
            offset += u64::from(ok.count);
            written += ok.count as usize;
        }
    }

    // offset 0 / count 0 asks the server to flush the whole file
    let commit = nfs
        .commit(&COMMIT3args {
            file: fh,
            offset: 0,
            count: 0,
        })
        .await;
    match commit {
        Ok(Nfs3Result::Ok(_)) => {}
        Ok(Nfs3Result::Err((status, _))) => eprintln!("commit {name}: {status}"),
        Err(e) => eprintln!("commit {name}: {e}"),
    }

    Ok(offset)
}
