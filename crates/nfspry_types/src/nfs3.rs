#![allow(
    non_camel_case_types,
    clippy::large_enum_variant,
    clippy::upper_case_acronyms
)]

//! NFS v3 protocol definitions as defined in RFC 1813.
//!
//! Only the procedures the client issues are defined; shared attribute and
//! handle types come first, per-procedure argument/result types after.

use std::fmt;
use std::io::{Read, Write};

use crate::xdr::{self, List, Opaque, Pack, Result, Unpack, XdrCodec};

pub const PROGRAM: u32 = 100_003;
pub const VERSION: u32 = 3;

pub const NFS3_FHSIZE: usize = 64;
pub const NFS3_COOKIEVERFSIZE: usize = 8;
pub const NFS3_CREATEVERFSIZE: usize = 8;
pub const NFS3_WRITEVERFSIZE: usize = 8;

pub type cookie3 = u64;
pub type count3 = u32;
pub type fileid3 = u64;
pub type gid3 = u32;
pub type mode3 = u32;
pub type offset3 = u64;
pub type size3 = u64;
pub type uid3 = u32;

/// Discriminated result of an NFS procedure: `NFS3_OK` plus the success
/// body, or any other status plus the failure body.
#[derive(Debug)]
pub enum Nfs3Result<T, E> {
    Ok(T),
    Err((nfsstat3, E)),
}

impl<T, E: fmt::Debug> Nfs3Result<T, E> {
    pub fn unwrap(self) -> T {
        match self {
            Self::Ok(val) => val,
            Self::Err((status, res)) => panic!("NFS3 error: {status}, result: {res:?}"),
        }
    }
}

impl<T: Pack, E: Pack> Pack for Nfs3Result<T, E> {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::Ok(v) => v.packed_size(),
            Self::Err((_, e)) => e.packed_size(),
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::Ok(v) => nfsstat3::NFS3_OK.pack(out)? + v.pack(out)?,
            Self::Err((status, e)) => status.pack(out)? + e.pack(out)?,
        };
        Ok(written)
    }
}

impl<T: Unpack, E: Unpack> Unpack for Nfs3Result<T, E> {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (status, mut read) = nfsstat3::unpack(input)?;
        match status {
            nfsstat3::NFS3_OK => {
                let (v, n) = T::unpack(input)?;
                read += n;
                Ok((Self::Ok(v), read))
            }
            _ => {
                let (e, n) = E::unpack(input)?;
                read += n;
                Ok((Self::Err((status, e)), read))
            }
        }
    }
}

/// XDR optional: a boolean discriminant followed by the value if present.
#[derive(Debug, Clone)]
pub enum Nfs3Option<T> {
    Some(T),
    None,
}

impl<T> Default for Nfs3Option<T> {
    fn default() -> Self {
        Self::None
    }
}

impl<T> Nfs3Option<T> {
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<T: Pack> Pack for Nfs3Option<T> {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::Some(v) => v.packed_size(),
            Self::None => 0,
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::Some(v) => true.pack(out)? + v.pack(out)?,
            Self::None => false.pack(out)?,
        };
        Ok(written)
    }
}

impl<T: Unpack> Unpack for Nfs3Option<T> {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (present, mut read) = bool::unpack(input)?;
        if present {
            let (v, n) = T::unpack(input)?;
            read += n;
            Ok((Self::Some(v), read))
        } else {
            Ok((Self::None, read))
        }
    }
}

pub type pre_op_attr = Nfs3Option<wcc_attr>;
pub type post_op_attr = Nfs3Option<fattr3>;
pub type post_op_fh3 = Nfs3Option<nfs_fh3>;
pub type sattrguard3 = Nfs3Option<nfstime3>;
pub type set_gid3 = Nfs3Option<gid3>;
pub type set_mode3 = Nfs3Option<mode3>;
pub type set_size3 = Nfs3Option<size3>;
pub type set_uid3 = Nfs3Option<uid3>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum nfsstat3 {
    NFS3_OK = 0,
    NFS3ERR_PERM = 1,
    NFS3ERR_NOENT = 2,
    NFS3ERR_IO = 5,
    NFS3ERR_NXIO = 6,
    NFS3ERR_ACCES = 13,
    NFS3ERR_EXIST = 17,
    NFS3ERR_XDEV = 18,
    NFS3ERR_NODEV = 19,
    NFS3ERR_NOTDIR = 20,
    NFS3ERR_ISDIR = 21,
    NFS3ERR_INVAL = 22,
    NFS3ERR_FBIG = 27,
    NFS3ERR_NOSPC = 28,
    NFS3ERR_ROFS = 30,
    NFS3ERR_MLINK = 31,
    NFS3ERR_NAMETOOLONG = 63,
    NFS3ERR_NOTEMPTY = 66,
    NFS3ERR_DQUOT = 69,
    NFS3ERR_STALE = 70,
    NFS3ERR_REMOTE = 71,
    NFS3ERR_BADHANDLE = 10001,
    NFS3ERR_NOT_SYNC = 10002,
    NFS3ERR_BAD_COOKIE = 10003,
    NFS3ERR_NOTSUPP = 10004,
    NFS3ERR_TOOSMALL = 10005,
    NFS3ERR_SERVERFAULT = 10006,
    NFS3ERR_BADTYPE = 10007,
    NFS3ERR_JUKEBOX = 10008,
}

impl fmt::Display for nfsstat3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NFS3_OK => "NFS3_OK",
            Self::NFS3ERR_PERM => "NFS3ERR_PERM",
            Self::NFS3ERR_NOENT => "NFS3ERR_NOENT",
            Self::NFS3ERR_IO => "NFS3ERR_IO",
            Self::NFS3ERR_NXIO => "NFS3ERR_NXIO",
            Self::NFS3ERR_ACCES => "NFS3ERR_ACCES",
            Self::NFS3ERR_EXIST => "NFS3ERR_EXIST",
            Self::NFS3ERR_XDEV => "NFS3ERR_XDEV",
            Self::NFS3ERR_NODEV => "NFS3ERR_NODEV",
            Self::NFS3ERR_NOTDIR => "NFS3ERR_NOTDIR",
            Self::NFS3ERR_ISDIR => "NFS3ERR_ISDIR",
            Self::NFS3ERR_INVAL => "NFS3ERR_INVAL",
            Self::NFS3ERR_FBIG => "NFS3ERR_FBIG",
            Self::NFS3ERR_NOSPC => "NFS3ERR_NOSPC",
            Self::NFS3ERR_ROFS => "NFS3ERR_ROFS",
            Self::NFS3ERR_MLINK => "NFS3ERR_MLINK",
            Self::NFS3ERR_NAMETOOLONG => "NFS3ERR_NAMETOOLONG",
            Self::NFS3ERR_NOTEMPTY => "NFS3ERR_NOTEMPTY",
            Self::NFS3ERR_DQUOT => "NFS3ERR_DQUOT",
            Self::NFS3ERR_STALE => "NFS3ERR_STALE",
            Self::NFS3ERR_REMOTE => "NFS3ERR_REMOTE",
            Self::NFS3ERR_BADHANDLE => "NFS3ERR_BADHANDLE",
            Self::NFS3ERR_NOT_SYNC => "NFS3ERR_NOT_SYNC",
            Self::NFS3ERR_BAD_COOKIE => "NFS3ERR_BAD_COOKIE",
            Self::NFS3ERR_NOTSUPP => "NFS3ERR_NOTSUPP",
            Self::NFS3ERR_TOOSMALL => "NFS3ERR_TOOSMALL",
            Self::NFS3ERR_SERVERFAULT => "NFS3ERR_SERVERFAULT",
            Self::NFS3ERR_BADTYPE => "NFS3ERR_BADTYPE",
            Self::NFS3ERR_JUKEBOX => "NFS3ERR_JUKEBOX",
        };
        f.write_str(name)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum ftype3 {
    NF3REG = 1,
    NF3DIR = 2,
    NF3BLK = 3,
    NF3CHR = 4,
    NF3LNK = 5,
    NF3SOCK = 6,
    NF3FIFO = 7,
}

/// The NFS-side file handle shape.
#[derive(Clone, Debug, Eq, PartialEq, XdrCodec)]
pub struct nfs_fh3 {
    pub data: Opaque<'static>,
}

impl Default for nfs_fh3 {
    fn default() -> Self {
        Self {
            data: Opaque::borrowed(&[]),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, XdrCodec)]
pub struct filename3<'a>(pub Opaque<'a>);

impl From<Vec<u8>> for filename3<'static> {
    fn from(name: Vec<u8>) -> Self {
        Self(Opaque::owned(name))
    }
}

impl<'a> From<&'a [u8]> for filename3<'a> {
    fn from(name: &'a [u8]) -> Self {
        Self(Opaque::borrowed(name))
    }
}

impl<'a> From<&'a str> for filename3<'a> {
    fn from(name: &'a str) -> Self {
        Self(Opaque::borrowed(name.as_bytes()))
    }
}

impl AsRef<[u8]> for filename3<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

#[derive(Clone, Debug, Eq, PartialEq, XdrCodec)]
pub struct nfspath3<'a>(pub Opaque<'a>);

impl AsRef<[u8]> for nfspath3<'_> {
    fn as_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

#[derive(Clone, Default, Debug, Eq, PartialEq, XdrCodec)]
pub struct nfstime3 {
    pub seconds: u32,
    pub nseconds: u32,
}

#[derive(Clone, Default, Debug, Eq, PartialEq, XdrCodec)]
pub struct specdata3 {
    pub specdata1: u32,
    pub specdata2: u32,
}

#[derive(Debug, Clone, XdrCodec)]
pub struct fattr3 {
    pub type_: ftype3,
    pub mode: mode3,
    pub nlink: u32,
    pub uid: uid3,
    pub gid: gid3,
    pub size: size3,
    pub used: size3,
    pub rdev: specdata3,
    pub fsid: u64,
    pub fileid: fileid3,
    pub atime: nfstime3,
    pub mtime: nfstime3,
    pub ctime: nfstime3,
}

#[derive(Debug, Clone, XdrCodec)]
pub struct wcc_attr {
    pub size: size3,
    pub mtime: nfstime3,
    pub ctime: nfstime3,
}

#[derive(Debug, Clone, Default, XdrCodec)]
pub struct wcc_data {
    pub before: pre_op_attr,
    pub after: post_op_attr,
}

#[derive(Debug, Clone, Default, XdrCodec)]
pub struct sattr3 {
    pub mode: set_mode3,
    pub uid: set_uid3,
    pub gid: set_gid3,
    pub size: set_size3,
    pub atime: set_atime,
    pub mtime: set_mtime,
}

#[derive(Debug, Clone, Default)]
pub enum set_atime {
    #[default]
    DONT_CHANGE,
    SET_TO_SERVER_TIME,
    SET_TO_CLIENT_TIME(nfstime3),
}

#[derive(Debug, Clone, Default)]
pub enum set_mtime {
    #[default]
    DONT_CHANGE,
    SET_TO_SERVER_TIME,
    SET_TO_CLIENT_TIME(nfstime3),
}

macro_rules! settime_codec {
    ($name:ident) => {
        impl Pack for $name {
            fn packed_size(&self) -> usize {
                4 + match self {
                    Self::SET_TO_CLIENT_TIME(t) => t.packed_size(),
                    _ => 0,
                }
            }

            fn pack(&self, out: &mut impl Write) -> Result<usize> {
                let written = match self {
                    Self::DONT_CHANGE => 0u32.pack(out)?,
                    Self::SET_TO_SERVER_TIME => 1u32.pack(out)?,
                    Self::SET_TO_CLIENT_TIME(t) => 2u32.pack(out)? + t.pack(out)?,
                };
                Ok(written)
            }
        }

        impl Unpack for $name {
            fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
                let (tag, mut read) = u32::unpack(input)?;
                let value = match tag {
                    0 => Self::DONT_CHANGE,
                    1 => Self::SET_TO_SERVER_TIME,
                    2 => {
                        let (t, n) = nfstime3::unpack(input)?;
                        read += n;
                        Self::SET_TO_CLIENT_TIME(t)
                    }
                    _ => return Err(xdr::Error::InvalidEnumValue(tag)),
                };
                Ok((value, read))
            }
        }
    };
}

settime_codec!(set_atime);
settime_codec!(set_mtime);

#[derive(Debug, Clone, Eq, PartialEq, XdrCodec)]
pub struct diropargs3<'a> {
    pub dir: nfs_fh3,
    pub name: filename3<'a>,
}

macro_rules! verf_codec {
    ($name:ident, $size:expr) => {
        #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
        pub struct $name(pub [u8; $size]);

        impl Pack for $name {
            fn packed_size(&self) -> usize {
                $size
            }

            fn pack(&self, out: &mut impl Write) -> Result<usize> {
                xdr::pack_opaque_fixed(&self.0, out)
            }
        }

        impl Unpack for $name {
            fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
                let mut buf = [0u8; $size];
                let read = xdr::unpack_opaque_fixed(input, &mut buf)?;
                Ok((Self(buf), read))
            }
        }
    };
}

verf_codec!(cookieverf3, NFS3_COOKIEVERFSIZE);
verf_codec!(createverf3, NFS3_CREATEVERFSIZE);
verf_codec!(writeverf3, NFS3_WRITEVERFSIZE);

// SETATTR (procedure 2)

#[derive(Debug, XdrCodec)]
pub struct SETATTR3args {
    pub object: nfs_fh3,
    pub new_attributes: sattr3,
    pub guard: sattrguard3,
}

#[derive(Debug, XdrCodec)]
pub struct SETATTR3resok {
    pub obj_wcc: wcc_data,
}

#[derive(Debug, XdrCodec)]
pub struct SETATTR3resfail {
    pub obj_wcc: wcc_data,
}

pub type SETATTR3res = Nfs3Result<SETATTR3resok, SETATTR3resfail>;

// LOOKUP (procedure 3)

#[derive(Debug, XdrCodec)]
pub struct LOOKUP3args<'a> {
    pub what: diropargs3<'a>,
}

#[derive(Debug, XdrCodec)]
pub struct LOOKUP3resok {
    pub object: nfs_fh3,
    pub obj_attributes: post_op_attr,
    pub dir_attributes: post_op_attr,
}

#[derive(Debug, Default, XdrCodec)]
pub struct LOOKUP3resfail {
    pub dir_attributes: post_op_attr,
}

pub type LOOKUP3res = Nfs3Result<LOOKUP3resok, LOOKUP3resfail>;

// READLINK (procedure 5)

#[derive(Debug, XdrCodec)]
pub struct READLINK3args {
    pub symlink: nfs_fh3,
}

#[derive(Debug, XdrCodec)]
pub struct READLINK3resok<'a> {
    pub symlink_attributes: post_op_attr,
    pub data: nfspath3<'a>,
}

#[derive(Debug, Default, XdrCodec)]
pub struct READLINK3resfail {
    pub symlink_attributes: post_op_attr,
}

pub type READLINK3res<'a> = Nfs3Result<READLINK3resok<'a>, READLINK3resfail>;

// READ (procedure 6)

#[derive(Debug, XdrCodec)]
pub struct READ3args {
    pub file: nfs_fh3,
    pub offset: offset3,
    pub count: count3,
}

#[derive(Debug, XdrCodec)]
pub struct READ3resok<'a> {
    pub file_attributes: post_op_attr,
    pub count: count3,
    pub eof: bool,
    pub data: Opaque<'a>,
}

#[derive(Debug, Default, XdrCodec)]
pub struct READ3resfail {
    pub file_attributes: post_op_attr,
}

pub type READ3res<'a> = Nfs3Result<READ3resok<'a>, READ3resfail>;

// WRITE (procedure 7)

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum stable_how {
    UNSTABLE = 0,
    DATA_SYNC = 1,
    FILE_SYNC = 2,
}

#[derive(Debug, XdrCodec)]
pub struct WRITE3args<'a> {
    pub file: nfs_fh3,
    pub offset: offset3,
    pub count: count3,
    pub stable: stable_how,
    pub data: Opaque<'a>,
}

#[derive(Debug, XdrCodec)]
pub struct WRITE3resok {
    pub file_wcc: wcc_data,
    pub count: count3,
    pub committed: stable_how,
    pub verf: writeverf3,
}

#[derive(Debug, Default, XdrCodec)]
pub struct WRITE3resfail {
    pub file_wcc: wcc_data,
}

pub type WRITE3res = Nfs3Result<WRITE3resok, WRITE3resfail>;

// CREATE (procedure 8)

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum createmode3 {
    UNCHECKED = 0,
    GUARDED = 1,
    EXCLUSIVE = 2,
}

#[derive(Debug)]
pub enum createhow3 {
    UNCHECKED(sattr3),
    GUARDED(sattr3),
    EXCLUSIVE(createverf3),
}

impl Pack for createhow3 {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::UNCHECKED(attrs) | Self::GUARDED(attrs) => attrs.packed_size(),
            Self::EXCLUSIVE(verf) => verf.packed_size(),
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::UNCHECKED(attrs) => createmode3::UNCHECKED.pack(out)? + attrs.pack(out)?,
            Self::GUARDED(attrs) => createmode3::GUARDED.pack(out)? + attrs.pack(out)?,
            Self::EXCLUSIVE(verf) => createmode3::EXCLUSIVE.pack(out)? + verf.pack(out)?,
        };
        Ok(written)
    }
}

impl Unpack for createhow3 {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (mode, mut read) = createmode3::unpack(input)?;
        let value = match mode {
            createmode3::UNCHECKED => {
                let (attrs, n) = sattr3::unpack(input)?;
                read += n;
                Self::UNCHECKED(attrs)
            }
            createmode3::GUARDED => {
                let (attrs, n) = sattr3::unpack(input)?;
                read += n;
                Self::GUARDED(attrs)
            }
            createmode3::EXCLUSIVE => {
                let (verf, n) = createverf3::unpack(input)?;
                read += n;
                Self::EXCLUSIVE(verf)
            }
        };
        Ok((value, read))
    }
}

#[derive(Debug, XdrCodec)]
pub struct CREATE3args<'a> {
    pub where_: diropargs3<'a>,
    pub how: createhow3,
}

#[derive(Debug, XdrCodec)]
pub struct CREATE3resok {
    pub obj: post_op_fh3,
    pub obj_attributes: post_op_attr,
    pub dir_wcc: wcc_data,
}

#[derive(Debug, Default, XdrCodec)]
pub struct CREATE3resfail {
    pub dir_wcc: wcc_data,
}

pub type CREATE3res = Nfs3Result<CREATE3resok, CREATE3resfail>;

// MKDIR (procedure 9)

#[derive(Debug, XdrCodec)]
pub struct MKDIR3args<'a> {
    pub where_: diropargs3<'a>,
    pub attributes: sattr3,
}

#[derive(Debug, XdrCodec)]
pub struct MKDIR3resok {
    pub obj: post_op_fh3,
    pub obj_attributes: post_op_attr,
    pub dir_wcc: wcc_data,
}

#[derive(Debug, Default, XdrCodec)]
pub struct MKDIR3resfail {
    pub dir_wcc: wcc_data,
}

pub type MKDIR3res = Nfs3Result<MKDIR3resok, MKDIR3resfail>;

// MKNOD (procedure 11)

#[derive(Debug, XdrCodec)]
pub struct devicedata3 {
    pub dev_attributes: sattr3,
    pub spec: specdata3,
}

#[derive(Debug)]
pub enum mknoddata3 {
    NF3BLK(devicedata3),
    NF3CHR(devicedata3),
    NF3SOCK(sattr3),
    NF3FIFO(sattr3),
}

impl Pack for mknoddata3 {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::NF3BLK(dev) | Self::NF3CHR(dev) => dev.packed_size(),
            Self::NF3SOCK(attrs) | Self::NF3FIFO(attrs) => attrs.packed_size(),
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::NF3BLK(dev) => ftype3::NF3BLK.pack(out)? + dev.pack(out)?,
            Self::NF3CHR(dev) => ftype3::NF3CHR.pack(out)? + dev.pack(out)?,
            Self::NF3SOCK(attrs) => ftype3::NF3SOCK.pack(out)? + attrs.pack(out)?,
            Self::NF3FIFO(attrs) => ftype3::NF3FIFO.pack(out)? + attrs.pack(out)?,
        };
        Ok(written)
    }
}

impl Unpack for mknoddata3 {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (type_, mut read) = ftype3::unpack(input)?;
        let value = match type_ {
            ftype3::NF3BLK => {
                let (dev, n) = devicedata3::unpack(input)?;
                read += n;
                Self::NF3BLK(dev)
            }
            ftype3::NF3CHR => {
                let (dev, n) = devicedata3::unpack(input)?;
                read += n;
                Self::NF3CHR(dev)
            }
            ftype3::NF3SOCK => {
                let (attrs, n) = sattr3::unpack(input)?;
                read += n;
                Self::NF3SOCK(attrs)
            }
            ftype3::NF3FIFO => {
                let (attrs, n) = sattr3::unpack(input)?;
                read += n;
                Self::NF3FIFO(attrs)
            }
            _ => return Err(xdr::Error::InvalidEnumValue(type_ as u32)),
        };
        Ok((value, read))
    }
}

#[derive(Debug, XdrCodec)]
pub struct MKNOD3args<'a> {
    pub where_: diropargs3<'a>,
    pub what: mknoddata3,
}

#[derive(Debug, XdrCodec)]
pub struct MKNOD3resok {
    pub obj: post_op_fh3,
    pub obj_attributes: post_op_attr,
    pub dir_wcc: wcc_data,
}

#[derive(Debug, Default, XdrCodec)]
pub struct MKNOD3resfail {
    pub dir_wcc: wcc_data,
}

pub type MKNOD3res = Nfs3Result<MKNOD3resok, MKNOD3resfail>;

// REMOVE (procedure 12)

#[derive(Debug, XdrCodec)]
pub struct REMOVE3args<'a> {
    pub object: diropargs3<'a>,
}

#[derive(Debug, Default, XdrCodec)]
pub struct REMOVE3resok {
    pub dir_wcc: wcc_data,
}

#[derive(Debug, Default, XdrCodec)]
pub struct REMOVE3resfail {
    pub dir_wcc: wcc_data,
}

pub type REMOVE3res = Nfs3Result<REMOVE3resok, REMOVE3resfail>;

// RMDIR (procedure 13)

#[derive(Debug, XdrCodec)]
pub struct RMDIR3args<'a> {
    pub object: diropargs3<'a>,
}

#[derive(Debug, Default, XdrCodec)]
pub struct RMDIR3resok {
    pub dir_wcc: wcc_data,
}

#[derive(Debug, Default, XdrCodec)]
pub struct RMDIR3resfail {
    pub dir_wcc: wcc_data,
}

pub type RMDIR3res = Nfs3Result<RMDIR3resok, RMDIR3resfail>;

// RENAME (procedure 14)

#[derive(Debug, XdrCodec)]
pub struct RENAME3args<'a, 'b> {
    pub from: diropargs3<'a>,
    pub to: diropargs3<'b>,
}

#[derive(Debug, Default, XdrCodec)]
pub struct RENAME3resok {
    pub fromdir_wcc: wcc_data,
    pub todir_wcc: wcc_data,
}

#[derive(Debug, Default, XdrCodec)]
pub struct RENAME3resfail {
    pub fromdir_wcc: wcc_data,
    pub todir_wcc: wcc_data,
}

pub type RENAME3res = Nfs3Result<RENAME3resok, RENAME3resfail>;

// LINK (procedure 15)

#[derive(Debug, XdrCodec)]
pub struct LINK3args<'a> {
    pub file: nfs_fh3,
    pub link: diropargs3<'a>,
}

#[derive(Debug, Default, XdrCodec)]
pub struct LINK3resok {
    pub file_attributes: post_op_attr,
    pub linkdir_wcc: wcc_data,
}

#[derive(Debug, Default, XdrCodec)]
pub struct LINK3resfail {
    pub file_attributes: post_op_attr,
    pub linkdir_wcc: wcc_data,
}

pub type LINK3res = Nfs3Result<LINK3resok, LINK3resfail>;

// READDIR (procedure 16)

#[derive(Debug, XdrCodec)]
pub struct READDIR3args {
    pub dir: nfs_fh3,
    pub cookie: cookie3,
    pub cookieverf: cookieverf3,
    pub count: count3,
}

#[derive(Debug, Clone, Eq, PartialEq, XdrCodec)]
pub struct entry3<'a> {
    pub fileid: fileid3,
    pub name: filename3<'a>,
    pub cookie: cookie3,
}

#[derive(Debug, Default, XdrCodec)]
pub struct dirlist3<'a> {
    pub entries: List<entry3<'a>>,
    pub eof: bool,
}

#[derive(Debug, XdrCodec)]
pub struct READDIR3resok<'a> {
    pub dir_attributes: post_op_attr,
    pub cookieverf: cookieverf3,
    pub reply: dirlist3<'a>,
}

#[derive(Debug, Default, XdrCodec)]
pub struct READDIR3resfail {
    pub dir_attributes: post_op_attr,
}

pub type READDIR3res<'a> = Nfs3Result<READDIR3resok<'a>, READDIR3resfail>;

// FSSTAT (procedure 18)

#[derive(Debug, XdrCodec)]
pub struct FSSTAT3args {
    pub fsroot: nfs_fh3,
}

#[derive(Debug, XdrCodec)]
pub struct FSSTAT3resok {
    pub obj_attributes: post_op_attr,
    pub tbytes: size3,
    pub fbytes: size3,
    pub abytes: size3,
    pub tfiles: size3,
    pub ffiles: size3,
    pub afiles: size3,
    pub invarsec: u32,
}

#[derive(Debug, Default, XdrCodec)]
pub struct FSSTAT3resfail {
    pub obj_attributes: post_op_attr,
}

pub type FSSTAT3res = Nfs3Result<FSSTAT3resok, FSSTAT3resfail>;

// FSINFO (procedure 19)

#[derive(Debug, XdrCodec)]
pub struct FSINFO3args {
    pub fsroot: nfs_fh3,
}

#[derive(Debug, XdrCodec)]
pub struct FSINFO3resok {
    pub obj_attributes: post_op_attr,
    pub rtmax: u32,
    pub rtpref: u32,
    pub rtmult: u32,
    pub wtmax: u32,
    pub wtpref: u32,
    pub wtmult: u32,
    pub dtpref: u32,
    pub maxfilesize: size3,
    pub time_delta: nfstime3,
    pub properties: u32,
}

#[derive(Debug, Default, XdrCodec)]
pub struct FSINFO3resfail {
    pub obj_attributes: post_op_attr,
}

pub type FSINFO3res = Nfs3Result<FSINFO3resok, FSINFO3resfail>;

// COMMIT (procedure 21)

#[derive(Debug, XdrCodec)]
pub struct COMMIT3args {
    pub file: nfs_fh3,
    pub offset: offset3,
    pub count: count3,
}

#[derive(Debug, XdrCodec)]
pub struct COMMIT3resok {
    pub file_wcc: wcc_data,
    pub verf: writeverf3,
}

#[derive(Debug, Default, XdrCodec)]
pub struct COMMIT3resfail {
    pub file_wcc: wcc_data,
}

pub type COMMIT3res = Nfs3Result<COMMIT3resok, COMMIT3resfail>;

/// NFSv3 procedure numbers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum NFS_PROGRAM {
    NFSPROC3_NULL = 0,
    NFSPROC3_GETATTR = 1,
    NFSPROC3_SETATTR = 2,
    NFSPROC3_LOOKUP = 3,
    NFSPROC3_ACCESS = 4,
    NFSPROC3_READLINK = 5,
    NFSPROC3_READ = 6,
    NFSPROC3_WRITE = 7,
    NFSPROC3_CREATE = 8,
    NFSPROC3_MKDIR = 9,
    NFSPROC3_SYMLINK = 10,
    NFSPROC3_MKNOD = 11,
    NFSPROC3_REMOVE = 12,
    NFSPROC3_RMDIR = 13,
    NFSPROC3_RENAME = 14,
    NFSPROC3_LINK = 15,
    NFSPROC3_READDIR = 16,
    NFSPROC3_READDIRPLUS = 17,
    NFSPROC3_FSSTAT = 18,
    NFSPROC3_FSINFO = 19,
    NFSPROC3_PATHCONF = 20,
    NFSPROC3_COMMIT = 21,
}
