//! # CLI Module
//!
//! Command-line access to route tables, mostly for checking what a table
//! resolves to before wiring it into a service.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print every resolved route, in match order:
//!
//! ```bash
//! routechain routes --table routes.yaml --base /v1
//! ```
//!
//! ### `match`
//!
//! Dispatch one request through the table. Every handler is replaced by an
//! echo handler, so the output shows which route answered and with which
//! parameters:
//!
//! ```bash
//! routechain match --table routes.yaml --method GET --url /v1/api/pets/42
//! ```
//!
//! An unmatched request prints `404 Not Found` and nothing else.

mod commands;


pub use commands::{run, run_cli, Cli, Commands};
