#![doc = include_str!("../README.md")]

pub mod commands;
pub mod glob;
pub mod local;
pub mod ops;
pub mod render;
pub mod session;
pub mod shell;
