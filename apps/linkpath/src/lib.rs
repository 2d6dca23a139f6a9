//! # linkpath
//!
//! The application side of linkpath: the HTTP API, the CLI and the
//! configuration layer, all on top of `linkpath-core`.

pub mod api;
pub mod cli;
pub mod config;
