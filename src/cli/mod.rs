//! # CLI Module
//!
//! Command-line interface of the `grove` binary, which serves a small demo
//! application built on the library.
//!
//! ## Commands
//!
//! ### `serve`
//!
//! ```bash
//! grove serve --addr 127.0.0.1:9999 --static-dir ./public --templates ./templates
//! ```
//!
//! - `--addr <ADDR>` - listen address (also `GROVE_ADDR`, default `127.0.0.1:9999`)
//! - `--static-dir <DIR>` - serve files under `/assets/*filepath`
//! - `--templates <DIR>` - enable `GET /index`, rendering `index.html`
//!
//! The server stops on SIGINT or SIGTERM.
//!
//! ### `routes`
//!
//! ```bash
//! grove routes
//! ```
//!
//! Prints every registered `METHOD pattern` of the demo application.

mod commands;
mod demo;


pub use commands::{run_cli, Cli, Commands};
pub use demo::{demo_engine, DemoOptions};
