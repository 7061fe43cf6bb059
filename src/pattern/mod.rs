//! # Pattern Module
//!
//! URL pattern matching in the style of the web platform's `URLPattern`.
//! A pattern has three components (protocol, hostname, pathname); each one is
//! compiled to an anchored regex and matched against the corresponding part of
//! an absolute URL parsed with the `url` crate.
//!
//! ## Pathname syntax
//!
//! | Syntax          | Meaning                                         |
//! |-----------------|-------------------------------------------------|
//! | `/users`        | literal text                                    |
//! | `:id`           | named group, one segment (`[^/]+`)              |
//! | `:id(\d+)`      | named group with a custom regex                 |
//! | `(\d+)`         | unnamed group, numbered `"0"`, `"1"`, ...       |
//! | `*`             | unnamed wildcard group (`.*`)                   |
//! | `:id?` `:p*` `:p+` | optional / zero-or-more / one-or-more groups |
//! | `\:`            | escaped literal                                 |
//!
//! A modified group directly after `/` takes the slash with it, so
//! `/users/:id?` matches both `/users` and `/users/7`.
//!
//! ## Example
//!
//! ```rust
//! use routechain::pattern::UrlPattern;
//!
//! let pattern = UrlPattern::parse("/pets/:id").unwrap();
//! let result = pattern.exec("http://localhost/pets/42").unwrap();
//! assert_eq!(result.pathname.groups["id"], "42");
//! assert!(pattern.exec("http://localhost/pets").is_none());
//! ```

mod core;
mod parse;

pub use self::core::{ComponentResult, MatchResult, PatternInit, UrlPattern};
