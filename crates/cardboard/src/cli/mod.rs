//! # CLI Layer
//!
//! This module is **one possible UI client** for cardboard, not the
//! application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr, stdin)
//! - Uses `std::process::exit`
//! - Handles argument parsing
//! - Installs a tracing subscriber
//! - Formats output for human consumption

mod commands;
mod learn;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
