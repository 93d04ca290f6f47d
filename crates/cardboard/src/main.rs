//! # Cardboard CLI Architecture
//!
//! The binary is thin on purpose: the CLI lives in `src/cli/`, and this file
//! only invokes `cli::run()` and turns a failure into an exit code.
//!
//! ## Workspace Structure
//!
//! - `crates/cardboardapp/`: Core library with UI-agnostic business logic
//! - `crates/cardboard/`: This CLI tool, depends on `cardboardapp`
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/cardboard/src/cli/)                      │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config, logging, dispatch, learn loop (commands.rs)      │
//! │  - Terminal rendering via console styles (render.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/cardboardapp/src/api.rs)                 │
//! │  - Fills defaults from config                               │
//! │  - Dispatches to command modules                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (crates/cardboardapp/src/commands/*)         │
//! │  - Business logic over a DataStore                          │
//! │  - No knowledge of stdout/stderr or process exits           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything from `api.rs` inward returns plain Rust values. The CLI owns
//! argument parsing, terminal output, logging setup and exit codes.
//!
//! ## Testing Approach
//!
//! - **Library**: unit tests next to each command, integration tests over the
//!   filesystem store.
//! - **CLI**: end-to-end tests in `tests/cli_e2e.rs` drive the compiled binary
//!   against a temporary data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
