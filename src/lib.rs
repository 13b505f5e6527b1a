//! Setup of a Minecraft Bedrock Dedicated Server under a container runtime
//!
//! # Modules
//!
//! - [`bedrock`]: Finds the current server build and keeps a local copy of its archive
//! - [`container`]: Builds container images from the downloaded archives
//! - [`cli`]: Subcommands of the `mcbdsc` binary
//! - [`config`]: Constants, default paths and the optional settings file
//! - [`logging`]: Tracing subscriber setup

pub mod bedrock;
pub mod cli;
pub mod config;
pub mod container;
pub mod logging;
