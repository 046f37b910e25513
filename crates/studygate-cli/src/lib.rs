//! Runs the session helper and permission gate from a terminal

#![warn(unused_crate_dependencies)]

use tokio as _; // Only used by the binary

mod bearer;
pub mod cli;
pub mod commands;
pub mod configuration;
pub mod terminal;
pub mod tracing;
