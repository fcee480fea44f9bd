#![allow(
    non_camel_case_types,
    clippy::large_enum_variant,
    clippy::upper_case_acronyms
)]

//! ONC RPC v2 message definitions as defined in RFC 1057.

use std::io::{Read, Write};

use crate::xdr::{Opaque, Pack, Result, Unpack, XdrCodec};

pub const RPC_VERSION_2: u32 = 2;

/// Maximum machine name length in an `AUTH_UNIX` credential.
pub const AUTH_UNIX_MACHINENAME_MAX: usize = 255;

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum msg_type {
    CALL = 0,
    REPLY = 1,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum reply_stat {
    MSG_ACCEPTED = 0,
    MSG_DENIED = 1,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum accept_stat {
    SUCCESS = 0,
    PROG_UNAVAIL = 1,
    PROG_MISMATCH = 2,
    PROC_UNAVAIL = 3,
    GARBAGE_ARGS = 4,
    SYSTEM_ERR = 5,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum reject_stat {
    RPC_MISMATCH = 0,
    AUTH_ERROR = 1,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum auth_stat {
    AUTH_OK = 0,
    AUTH_BADCRED = 1,
    AUTH_REJECTEDCRED = 2,
    AUTH_BADVERF = 3,
    AUTH_REJECTEDVERF = 4,
    AUTH_TOOWEAK = 5,
    AUTH_INVALIDRESP = 6,
    AUTH_FAILED = 7,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, XdrCodec)]
#[repr(u32)]
pub enum auth_flavor {
    AUTH_NULL = 0,
    AUTH_UNIX = 1,
    AUTH_SHORT = 2,
    AUTH_DES = 3,
}

#[derive(Debug, XdrCodec)]
pub struct opaque_auth<'a> {
    pub flavor: auth_flavor,
    pub body: Opaque<'a>,
}

impl Default for opaque_auth<'static> {
    fn default() -> Self {
        Self {
            flavor: auth_flavor::AUTH_NULL,
            body: Opaque::borrowed(&[]),
        }
    }
}

impl opaque_auth<'_> {
    /// Borrows the authenticator for use in a single call message.
    pub fn borrow(&self) -> opaque_auth<'_> {
        opaque_auth {
            flavor: self.flavor,
            body: Opaque::borrowed(self.body.as_ref()),
        }
    }
}

impl opaque_auth<'static> {
    /// Wraps a packed `AUTH_UNIX` body into an authenticator.
    pub fn auth_unix(auth: &auth_unix) -> Self {
        let mut body = Vec::with_capacity(auth.packed_size());
        auth.pack(&mut body).expect("packing into a Vec cannot fail");
        Self {
            flavor: auth_flavor::AUTH_UNIX,
            body: Opaque::owned(body),
        }
    }
}

#[derive(Clone, Debug, XdrCodec)]
pub struct auth_unix {
    pub stamp: u32,
    pub machinename: Opaque<'static>,
    pub uid: u32,
    pub gid: u32,
    pub gids: Vec<u32>,
}

#[derive(Debug, XdrCodec)]
pub struct call_body<'a> {
    pub rpcvers: u32,
    pub prog: u32,
    pub vers: u32,
    pub proc: u32,
    pub cred: opaque_auth<'a>,
    pub verf: opaque_auth<'a>,
}

#[derive(Debug, XdrCodec)]
pub struct accepted_reply<'a> {
    pub verf: opaque_auth<'a>,
    pub reply_data: accept_stat_data,
}

#[derive(Debug)]
pub enum accept_stat_data {
    SUCCESS,
    PROG_UNAVAIL,
    PROG_MISMATCH { low: u32, high: u32 },
    PROC_UNAVAIL,
    GARBAGE_ARGS,
    SYSTEM_ERR,
}

impl Pack for accept_stat_data {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::PROG_MISMATCH { .. } => 8,
            _ => 0,
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::SUCCESS => accept_stat::SUCCESS.pack(out)?,
            Self::PROG_UNAVAIL => accept_stat::PROG_UNAVAIL.pack(out)?,
            Self::PROG_MISMATCH { low, high } => {
                accept_stat::PROG_MISMATCH.pack(out)? + low.pack(out)? + high.pack(out)?
            }
            Self::PROC_UNAVAIL => accept_stat::PROC_UNAVAIL.pack(out)?,
            Self::GARBAGE_ARGS => accept_stat::GARBAGE_ARGS.pack(out)?,
            Self::SYSTEM_ERR => accept_stat::SYSTEM_ERR.pack(out)?,
        };
        Ok(written)
    }
}

impl Unpack for accept_stat_data {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (stat, read) = accept_stat::unpack(input)?;
        let (body, body_len) = match stat {
            accept_stat::SUCCESS => (Self::SUCCESS, 0),
            accept_stat::PROG_UNAVAIL => (Self::PROG_UNAVAIL, 0),
            accept_stat::PROG_MISMATCH => {
                let (low, low_len) = u32::unpack(input)?;
                let (high, high_len) = u32::unpack(input)?;
                (Self::PROG_MISMATCH { low, high }, low_len + high_len)
            }
            accept_stat::PROC_UNAVAIL => (Self::PROC_UNAVAIL, 0),
            accept_stat::GARBAGE_ARGS => (Self::GARBAGE_ARGS, 0),
            accept_stat::SYSTEM_ERR => (Self::SYSTEM_ERR, 0),
        };
        Ok((body, read + body_len))
    }
}

#[derive(Debug)]
pub enum rejected_reply {
    RPC_MISMATCH { low: u32, high: u32 },
    AUTH_ERROR(auth_stat),
}

impl Pack for rejected_reply {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::RPC_MISMATCH { .. } => 8,
            Self::AUTH_ERROR(_) => 4,
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::RPC_MISMATCH { low, high } => {
                reject_stat::RPC_MISMATCH.pack(out)? + low.pack(out)? + high.pack(out)?
            }
            Self::AUTH_ERROR(stat) => reject_stat::AUTH_ERROR.pack(out)? + stat.pack(out)?,
        };
        Ok(written)
    }
}

impl Unpack for rejected_reply {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (stat, read) = reject_stat::unpack(input)?;
        let (body, body_len) = match stat {
            reject_stat::RPC_MISMATCH => {
                let (low, low_len) = u32::unpack(input)?;
                let (high, high_len) = u32::unpack(input)?;
                (Self::RPC_MISMATCH { low, high }, low_len + high_len)
            }
            reject_stat::AUTH_ERROR => {
                let (stat, stat_len) = auth_stat::unpack(input)?;
                (Self::AUTH_ERROR(stat), stat_len)
            }
        };
        Ok((body, read + body_len))
    }
}

#[derive(Debug)]
pub enum reply_body<'a> {
    MSG_ACCEPTED(accepted_reply<'a>),
    MSG_DENIED(rejected_reply),
}

impl Pack for reply_body<'_> {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::MSG_ACCEPTED(reply) => reply.packed_size(),
            Self::MSG_DENIED(reply) => reply.packed_size(),
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::MSG_ACCEPTED(reply) => reply_stat::MSG_ACCEPTED.pack(out)? + reply.pack(out)?,
            Self::MSG_DENIED(reply) => reply_stat::MSG_DENIED.pack(out)? + reply.pack(out)?,
        };
        Ok(written)
    }
}

impl Unpack for reply_body<'_> {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (stat, read) = reply_stat::unpack(input)?;
        let (body, body_len) = match stat {
            reply_stat::MSG_ACCEPTED => {
                let (reply, n) = accepted_reply::unpack(input)?;
                (Self::MSG_ACCEPTED(reply), n)
            }
            reply_stat::MSG_DENIED => {
                let (reply, n) = rejected_reply::unpack(input)?;
                (Self::MSG_DENIED(reply), n)
            }
        };
        Ok((body, read + body_len))
    }
}

#[derive(Debug, XdrCodec)]
pub struct rpc_msg<'a, 'b> {
    pub xid: u32,
    pub body: msg_body<'a, 'b>,
}

#[derive(Debug)]
pub enum msg_body<'a, 'b> {
    CALL(call_body<'a>),
    REPLY(reply_body<'b>),
}

impl Pack for msg_body<'_, '_> {
    fn packed_size(&self) -> usize {
        4 + match self {
            Self::CALL(body) => body.packed_size(),
            Self::REPLY(body) => body.packed_size(),
        }
    }

    fn pack(&self, out: &mut impl Write) -> Result<usize> {
        let written = match self {
            Self::CALL(body) => msg_type::CALL.pack(out)? + body.pack(out)?,
            Self::REPLY(body) => msg_type::REPLY.pack(out)? + body.pack(out)?,
        };
        Ok(written)
    }
}

impl Unpack for msg_body<'_, '_> {
    fn unpack(input: &mut impl Read) -> Result<(Self, usize)> {
        let (tag, read) = msg_type::unpack(input)?;
        let (body, body_len) = match tag {
            msg_type::CALL => {
                let (body, n) = call_body::unpack(input)?;
                (Self::CALL(body), n)
            }
            msg_type::REPLY => {
                let (body, n) = reply_body::unpack(input)?;
                (Self::REPLY(body), n)
            }
        };
        Ok((body, read + body_len))
    }
}

/// TCP record-marking header (RFC 1057 §10): the high bit flags the last
/// fragment, the low 31 bits carry the fragment length.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct fragment_header(u32);

impl fragment_header {
    const LAST_FRAGMENT: u32 = 0x8000_0000;

    #[must_use]
    pub const fn new(length: u32, last: bool) -> Self {
        if last {
            Self(length | Self::LAST_FRAGMENT)
        } else {
            Self(length)
        }
    }

    #[must_use]
    pub const fn last(self) -> bool {
        self.0 & Self::LAST_FRAGMENT != 0
    }

    #[must_use]
    pub const fn fragment_length(self) -> u32 {
        self.0 & !Self::LAST_FRAGMENT
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl From<[u8; 4]> for fragment_header {
    fn from(bytes: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(bytes))
    }
}
