//! Error types

use std::error::Error as StdError;
use std::fmt;

use nfspry_types::rpc::{accept_stat_data, auth_stat, rejected_reply};

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Xdr(nfspry_types::xdr::Error),
    Rpc(RpcError),
    Portmap(PortmapError),
    Mount(nfspry_types::mount::mountstat3),
    /// The call did not complete within the session timeout.
    Timeout,
    /// The selected authentication flavor cannot be built.
    AuthUnsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => e.fmt(f),
            Self::Xdr(e) => e.fmt(f),
            Self::Rpc(e) => e.fmt(f),
            Self::Portmap(e) => e.fmt(f),
            Self::Mount(status) => status.fmt(f),
            Self::Timeout => write!(f, "RPC call timed out"),
            Self::AuthUnsupported(flavor) => {
                write!(f, "{flavor} authentication is not supported")
            }
        }
    }
}

impl StdError for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<nfspry_types::xdr::Error> for Error {
    fn from(e: nfspry_types::xdr::Error) -> Self {
        Self::Xdr(e)
    }
}

impl From<RpcError> for Error {
    fn from(e: RpcError) -> Self {
        Self::Rpc(e)
    }
}

impl From<PortmapError> for Error {
    fn from(e: PortmapError) -> Self {
        Self::Portmap(e)
    }
}

#[derive(Debug)]
pub enum RpcError {
    UnexpectedCall,
    Auth(auth_stat),
    RpcMismatch,
    WrongLength,
    UnexpectedXid,
    NotFullyParsed { pos: u64, len: u64 },
    ProgUnavail,
    ProgMismatch,
    ProcUnavail,
    GarbageArgs,
    SystemErr,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCall => write!(f, "unexpected CALL message in reply"),
            Self::Auth(stat) => write!(f, "authentication rejected ({})", *stat as u32),
            Self::RpcMismatch => write!(f, "RPC version mismatch"),
            Self::WrongLength => write!(f, "wrong length in RPC message"),
            Self::UnexpectedXid => write!(f, "unexpected XID in RPC reply"),
            Self::NotFullyParsed { pos, len } => {
                write!(f, "reply not fully parsed ({pos} of {len} bytes)")
            }
            Self::ProgUnavail => write!(f, "program unavailable"),
            Self::ProgMismatch => write!(f, "program version mismatch"),
            Self::ProcUnavail => write!(f, "procedure unavailable"),
            Self::GarbageArgs => write!(f, "garbage arguments"),
            Self::SystemErr => write!(f, "system error"),
        }
    }
}

impl StdError for RpcError {}

impl From<rejected_reply> for RpcError {
    fn from(e: rejected_reply) -> Self {
        match e {
            rejected_reply::RPC_MISMATCH { .. } => Self::RpcMismatch,
            rejected_reply::AUTH_ERROR(stat) => Self::Auth(stat),
        }
    }
}

impl From<rejected_reply> for Error {
    fn from(e: rejected_reply) -> Self {
        Self::Rpc(e.into())
    }
}

impl TryFrom<accept_stat_data> for RpcError {
    type Error = ();

    fn try_from(value: accept_stat_data) -> Result<Self, Self::Error> {
        match value {
            accept_stat_data::SUCCESS => Err(()),
            accept_stat_data::PROG_UNAVAIL => Ok(Self::ProgUnavail),
            accept_stat_data::PROG_MISMATCH { .. } => Ok(Self::ProgMismatch),
            accept_stat_data::PROC_UNAVAIL => Ok(Self::ProcUnavail),
            accept_stat_data::GARBAGE_ARGS => Ok(Self::GarbageArgs),
            accept_stat_data::SYSTEM_ERR => Ok(Self::SystemErr),
        }
    }
}

#[derive(Debug)]
pub enum PortmapError {
    ProgramUnavailable,
    InvalidPortValue(u32),
}

impl fmt::Display for PortmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgramUnavailable => write!(f, "program not registered with the portmapper"),
            Self::InvalidPortValue(value) => write!(f, "invalid port value: {value}"),
        }
    }
}

impl StdError for PortmapError {}
