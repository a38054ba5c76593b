//! # CLI Module
//!
//! Command-line access to a route table: list what is registered and check
//! how request paths resolve, without starting a server.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print every endpoint pattern with its `Allow` list:
//!
//! ```bash
//! pathtrie routes --table routes.toml
//! ```
//!
//! ### `resolve`
//!
//! Resolve request paths the way a dispatcher would:
//!
//! ```bash
//! pathtrie resolve --table routes.toml --method GET /api/user/123 /api//user/123
//! pathtrie resolve --table routes.toml --json /files/a/b.txt
//! ```
//!
//! Matching options come from the table's `[options]` section; the
//! `PATHTRIE_*` environment variables override it when `--env-options` is set.

mod commands;

pub use commands::{render_resolution, render_routes, run, run_cli, Cli, Commands};
