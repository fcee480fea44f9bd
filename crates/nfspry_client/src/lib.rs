#![doc = include_str!("../README.md")]

pub mod auth;
pub mod error;
pub mod io;
pub(crate) mod mount;
pub mod net;
pub(crate) mod nfs;
pub(crate) mod portmap;
pub mod rpc;
pub mod transport;

pub use mount::*;
pub use nfs::*;
/// Re-export of `nfspry_types` for convenience
pub use nfspry_types;
pub use portmap::*;
