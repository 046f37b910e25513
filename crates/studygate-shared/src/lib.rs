//! Code shared between the studygate clients

#![warn(unused_crate_dependencies)]

pub mod const_config;
pub mod errors;
pub mod req_args;
pub mod token;
pub mod uac;

#[cfg(not(target_arch = "wasm32"))]
pub mod telemetry;
