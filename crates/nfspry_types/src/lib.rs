#![doc = include_str!("../README.md")]

extern crate self as nfspry_types;

pub mod mount;
pub mod nfs3;
pub mod portmap;
pub mod rpc;
pub mod xdr;
