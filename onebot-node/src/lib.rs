//! OneBot Node
//!
//! Exposes OneBot v11 HTTP API calls as actions for workflow automation hosts.

#![forbid(unsafe_code)]

pub mod core;
pub mod driver;
pub mod error;
pub mod onebot;
pub mod prelude;

pub use error::{Error, Result};
