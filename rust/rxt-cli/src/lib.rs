//! rxt-port CLI library.
//!
//! Shared pieces of the `rxt-port` binary: configuration, logging setup and
//! the command implementations.

pub mod colors;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
