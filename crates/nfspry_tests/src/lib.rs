//! In-memory RPC peers for exercising the client engine and the shell
//! drivers without a network.

#![allow(
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::must_use_candidate
)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::io::Cursor;
use std::rc::Rc;

use async_trait::async_trait;
use nfspry_client::transport::Transport;
use nfspry_types::nfs3::{
    CREATE3args, CREATE3res, CREATE3resfail, CREATE3resok, COMMIT3res, COMMIT3resok,
    LOOKUP3args, LOOKUP3res, LOOKUP3resfail, LOOKUP3resok, NFS_PROGRAM, Nfs3Option, Nfs3Result,
    READ3args, READ3res, READ3resok, READDIR3args, READDIR3res, READDIR3resok, WRITE3args,
    WRITE3res, WRITE3resok, cookieverf3, dirlist3, entry3, fattr3, filename3, ftype3, nfs_fh3,
    nfsstat3, nfstime3, specdata3, stable_how, wcc_data, writeverf3,
};
use nfspry_types::rpc::{
    accept_stat_data, accepted_reply, auth_stat, msg_body, opaque_auth, rejected_reply,
    reply_body, rpc_msg,
};
use nfspry_types::xdr::{List, Opaque, Pack, Unpack};

/// What the scripted peer does with one call.
pub enum Reply {
    /// Accepted, SUCCESS, with this packed result body.
    Success(Vec<u8>),
    /// Accepted with a non-SUCCESS status.
    Error(accept_stat_data),
    /// MSG_DENIED with an authentication error.
    Denied,
    /// SUCCESS body sent under a different XID.
    WrongXid(Vec<u8>),
    /// Never answer; lets timeout paths fire.
    Silence,
}

/// A [`Transport`] backed by a handler closure: each outgoing record is
/// unpacked, handed to the closure as `(proc, argument bytes)`, and the
/// produced reply is returned on the next receive.
pub struct ScriptTransport {
    handler: Box<dyn FnMut(u32, Vec<u8>) -> Reply>,
    pending: VecDeque<(u32, Reply)>,
}

impl ScriptTransport {
    pub fn new(handler: impl FnMut(u32, Vec<u8>) -> Reply + 'static) -> Box<dyn Transport> {
        Box::new(Self {
            handler: Box::new(handler),
            pending: VecDeque::new(),
        })
    }
}

#[async_trait(?Send)]
impl Transport for ScriptTransport {
    async fn send_record(&mut self, record: &[u8]) -> std::io::Result<()> {
        let mut cursor = Cursor::new(record.to_vec());
        let (msg, _) = rpc_msg::unpack(&mut cursor)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let msg_body::CALL(call) = msg.body else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "expected a CALL record",
            ));
        };
        let pos = cursor.position() as usize;
        let args = cursor.into_inner()[pos..].to_vec();

        let reply = (self.handler)(call.proc, args);
        self.pending.push_back((msg.xid, reply));
        Ok(())
    }

    async fn recv_record(&mut self) -> std::io::Result<Vec<u8>> {
        match self.pending.pop_front() {
            Some((xid, Reply::Success(body))) => Ok(accepted_record(xid, &body)),
            Some((xid, Reply::Error(status))) => Ok(error_record(xid, status)),
            Some((xid, Reply::Denied)) => Ok(denied_record(xid)),
            Some((xid, Reply::WrongXid(body))) => Ok(accepted_record(xid.wrapping_add(1), &body)),
            Some((_, Reply::Silence)) | None => std::future::pending().await,
        }
    }
}

/// Packs any value into a standalone buffer.
pub fn pack<T: Pack>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    value.pack(&mut buf).expect("packing into a Vec cannot fail");
    buf
}

/// Unpacks a value from argument bytes.
pub fn unpack<T: Unpack>(bytes: &[u8]) -> T {
    let mut cursor = Cursor::new(bytes.to_vec());
    let (value, _) = T::unpack(&mut cursor).expect("argument bytes must parse");
    value
}

fn accepted_record(xid: u32, body: &[u8]) -> Vec<u8> {
    let msg = rpc_msg {
        xid,
        body: msg_body::REPLY(reply_body::MSG_ACCEPTED(accepted_reply {
            verf: opaque_auth::default(),
            reply_data: accept_stat_data::SUCCESS,
        })),
    };
    let mut buf = pack(&msg);
    buf.extend_from_slice(body);
    buf
}

fn error_record(xid: u32, status: accept_stat_data) -> Vec<u8> {
    let msg = rpc_msg {
        xid,
        body: msg_body::REPLY(reply_body::MSG_ACCEPTED(accepted_reply {
            verf: opaque_auth::default(),
            reply_data: status,
        })),
    };
    pack(&msg)
}

fn denied_record(xid: u32) -> Vec<u8> {
    let msg = rpc_msg {
        xid,
        body: msg_body::REPLY(reply_body::MSG_DENIED(rejected_reply::AUTH_ERROR(
            auth_stat::AUTH_TOOWEAK,
        ))),
    };
    pack(&msg)
}

/// Regular-file attributes for the in-memory peer.
#[must_use]
pub fn reg_attrs(size: u64, fileid: u64) -> fattr3 {
    fattr3 {
        type_: ftype3::NF3REG,
        mode: 0o644,
        nlink: 1,
        uid: 0,
        gid: 0,
        size,
        used: size,
        rdev: specdata3::default(),
        fsid: 1,
        fileid,
        atime: nfstime3::default(),
        mtime: nfstime3::default(),
        ctime: nfstime3::default(),
    }
}

/// A stateful single-directory file peer: enough of LOOKUP, CREATE,
/// WRITE, READ, COMMIT and READDIR to drive the transfer pipelines end to
/// end. File handles are the file names themselves; the root handle is
/// `b"root"`. READDIR pages two entries at a time so cookie resumption is
/// actually exercised.
#[derive(Clone, Default)]
pub struct MemPeer {
    pub files: Rc<RefCell<BTreeMap<String, Vec<u8>>>>,
    pub cookies_seen: Rc<RefCell<Vec<u64>>>,
}

const READDIR_PAGE: usize = 2;

impl MemPeer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root() -> nfs_fh3 {
        nfs_fh3 {
            data: Opaque::owned(b"root".to_vec()),
        }
    }

    fn file_handle(name: &str) -> nfs_fh3 {
        nfs_fh3 {
            data: Opaque::owned(name.as_bytes().to_vec()),
        }
    }

    pub fn insert(&self, name: &str, content: &[u8]) {
        self.files
            .borrow_mut()
            .insert(name.to_string(), content.to_vec());
    }

    #[must_use]
    pub fn content(&self, name: &str) -> Option<Vec<u8>> {
        self.files.borrow().get(name).cloned()
    }

    #[must_use]
    pub fn transport(&self) -> Box<dyn Transport> {
        let peer = self.clone();
        ScriptTransport::new(move |proc, args| peer.handle(proc, &args))
    }

    fn handle(&self, proc: u32, args: &[u8]) -> Reply {
        if proc == NFS_PROGRAM::NFSPROC3_LOOKUP as u32 {
            self.lookup(&unpack::<LOOKUP3args>(args))
        } else if proc == NFS_PROGRAM::NFSPROC3_READ as u32 {
            self.read(&unpack::<READ3args>(args))
        } else if proc == NFS_PROGRAM::NFSPROC3_WRITE as u32 {
            self.write(&unpack::<WRITE3args>(args))
        } else if proc == NFS_PROGRAM::NFSPROC3_CREATE as u32 {
            self.create(&unpack::<CREATE3args>(args))
        } else if proc == NFS_PROGRAM::NFSPROC3_READDIR as u32 {
            self.readdir(&unpack::<READDIR3args>(args))
        } else if proc == NFS_PROGRAM::NFSPROC3_COMMIT as u32 {
            let res: COMMIT3res = Nfs3Result::Ok(COMMIT3resok {
                file_wcc: wcc_data::default(),
                verf: writeverf3::default(),
            });
            Reply::Success(pack(&res))
        } else {
            Reply::Error(accept_stat_data::PROC_UNAVAIL)
        }
    }

    fn lookup(&self, args: &LOOKUP3args) -> Reply {
        let name = String::from_utf8_lossy(args.what.name.as_ref()).into_owned();
        let res: LOOKUP3res = match self.files.borrow().get(&name) {
            Some(content) => Nfs3Result::Ok(LOOKUP3resok {
                object: Self::file_handle(&name),
                obj_attributes: Nfs3Option::Some(reg_attrs(content.len() as u64, 1)),
                dir_attributes: Nfs3Option::None,
            }),
            None => Nfs3Result::Err((nfsstat3::NFS3ERR_NOENT, LOOKUP3resfail::default())),
        };
        Reply::Success(pack(&res))
    }

    fn read(&self, args: &READ3args) -> Reply {
        let name = String::from_utf8_lossy(args.file.data.as_ref()).into_owned();
        let files = self.files.borrow();
        let Some(content) = files.get(&name) else {
            return Reply::Success(pack::<READ3res>(&Nfs3Result::Err((
                nfsstat3::NFS3ERR_STALE,
                nfspry_types::nfs3::READ3resfail::default(),
            ))));
        };

        let start = (args.offset as usize).min(content.len());
        let end = (start + args.count as usize).min(content.len());
        let data = content[start..end].to_vec();
        let eof = end >= content.len();
        let res: READ3res = Nfs3Result::Ok(READ3resok {
            file_attributes: Nfs3Option::Some(reg_attrs(content.len() as u64, 1)),
            count: data.len() as u32,
            eof,
            data: Opaque::owned(data),
        });
        Reply::Success(pack(&res))
    }

    fn write(&self, args: &WRITE3args) -> Reply {
        let name = String::from_utf8_lossy(args.file.data.as_ref()).into_owned();
        let mut files = self.files.borrow_mut();
        let Some(content) = files.get_mut(&name) else {
            return Reply::Success(pack::<WRITE3res>(&Nfs3Result::Err((
                nfsstat3::NFS3ERR_STALE,
                nfspry_types::nfs3::WRITE3resfail::default(),
            ))));
        };

        let data = args.data.as_ref();
        let end = args.offset as usize + data.len();
        if content.len() < end {
            content.resize(end, 0);
        }
        content[args.offset as usize..end].copy_from_slice(data);

        let res: WRITE3res = Nfs3Result::Ok(WRITE3resok {
            file_wcc: wcc_data::default(),
            count: data.len() as u32,
            committed: stable_how::UNSTABLE,
            verf: writeverf3::default(),
        });
        Reply::Success(pack(&res))
    }

    fn create(&self, args: &CREATE3args) -> Reply {
        let name = String::from_utf8_lossy(args.where_.name.as_ref()).into_owned();
        let mut files = self.files.borrow_mut();
        let res: CREATE3res = if files.contains_key(&name) {
            Nfs3Result::Err((nfsstat3::NFS3ERR_EXIST, CREATE3resfail::default()))
        } else {
            files.insert(name.clone(), Vec::new());
            Nfs3Result::Ok(CREATE3resok {
                obj: Nfs3Option::Some(Self::file_handle(&name)),
                obj_attributes: Nfs3Option::Some(reg_attrs(0, 1)),
                dir_wcc: wcc_data::default(),
            })
        };
        Reply::Success(pack(&res))
    }

    fn readdir(&self, args: &READDIR3args) -> Reply {
        self.cookies_seen.borrow_mut().push(args.cookie);

        let files = self.files.borrow();
        let names: Vec<&String> = files.keys().collect();
        let start = args.cookie as usize;

        let entries: Vec<entry3<'static>> = names
            .iter()
            .enumerate()
            .skip(start)
            .take(READDIR_PAGE)
            .map(|(i, name)| entry3 {
                fileid: 100 + i as u64,
                name: filename3::from(name.as_bytes().to_vec()),
                cookie: i as u64 + 1,
            })
            .collect();
        let eof = start + entries.len() >= names.len();

        let res: READDIR3res = Nfs3Result::Ok(READDIR3resok {
            dir_attributes: Nfs3Option::None,
            cookieverf: cookieverf3::default(),
            reply: dirlist3 {
                entries: List(entries),
                eof,
            },
        });
        Reply::Success(pack(&res))
    }
}
