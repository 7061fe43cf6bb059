//! # Configuration Module
//!
//! Router construction options, loadable from the environment.
//!
//! ## Environment Variables
//!
//! ### `ROUTECHAIN_BASE`
//!
//! Path prefix applied to every route of a router when it is read or composed
//! (for example `/api/v1`). Unset or empty means no prefix.
//!
//! ## Usage
//!
//! ```rust
//! use routechain::config::RouterOptions;
//! use routechain::router::Router;
//!
//! let router = Router::with_options(RouterOptions::from_env()).unwrap();
//! # let _ = router;
//! ```

use std::env;

use serde::Deserialize;

/// Options accepted by [`Router::with_options`](crate::router::Router::with_options)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterOptions {
    /// Prefix prepended to every route's pathname
    pub base: Option<String>,
}

impl RouterOptions {
    /// Load options from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base = lookup("ROUTECHAIN_BASE")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Self { base }
    }

    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_from_lookup() {
        let opts = RouterOptions::from_lookup(|k| {
            (k == "ROUTECHAIN_BASE").then(|| " /api ".to_string())
        });
        assert_eq!(opts.base.as_deref(), Some("/api"));
    }

    #[test]
    fn test_blank_base_is_none() {
        let opts = RouterOptions::from_lookup(|_| Some("   ".to_string()));
        assert_eq!(opts, RouterOptions::default());
        assert_eq!(RouterOptions::from_lookup(|_| None).base, None);
    }

    #[test]
    fn test_deserialize() {
        let opts: RouterOptions = serde_json::from_str(r#"{"base": "/v1"}"#).unwrap();
        assert_eq!(opts, RouterOptions::default().with_base("/v1"));
        let empty: RouterOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.base, None);
    }
}
