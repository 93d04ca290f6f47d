//! # Cardboard
//!
//! The UI-agnostic core of a personal knowledge app: **spaces** (optionally
//! grouped) hold **topics** laid out on a free-form canvas, and each topic owns
//! an ordered list of question/answer **flashcards** with a learning status.
//!
//! ## Architecture
//!
//! ```text
//! client (CLI, ...) ──▶ api ──▶ commands ──▶ store ──▶ backend (fs | memory)
//!                        │
//!                        └──▶ session / gesture / richtext   (pure view state)
//! ```
//!
//! - [`api`]: Facade every client talks to.
//! - [`commands`]: Business logic, generic over [`store::DataStore`].
//! - [`store`]: Typed entity storage over a raw document backend.
//! - [`model`]: Space, Topic, Flashcard and card status.
//! - [`session`]: Per-topic view state (filter, learning, editing).
//! - [`gesture`]: Drag semantics for lists and the canvas.
//! - [`richtext`]: Styled run model for card text.
//! - [`config`]: Layered configuration.
//!
//! The library never writes to stdout or stderr; it reports through return
//! values and `tracing` events.

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod gesture;
pub mod model;
pub mod richtext;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod test_utils;

pub use api::CardboardApi;
pub use error::{CardboardError, Result};
