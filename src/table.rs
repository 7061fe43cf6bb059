//! # Route Table Module
//!
//! Declarative route definitions loaded from YAML or JSON. Handlers are
//! referenced by name and resolved against a [`HandlerRegistry`] when the
//! table is built into a [`Router`].
//!
//! ```yaml
//! base: /api
//! routes:
//!   - methods: [GET]
//!     path: /pets/:id
//!     handler: get_pet
//!   - methods: [post, put]
//!     path: /pets
//!     hostname: admin.example.com
//!     handler: upsert_pet
//!   - handler: fallback      # no path: matches every URL
//! ```
//!
//! Routes keep document order, which is also their match order. Method tokens
//! are upper-cased on load (`post` becomes `POST`); an empty or missing list
//! means every method.

use std::path::Path;

use http::Method;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::RouterError;
use crate::handler::HandlerRegistry;
use crate::pattern::PatternInit;
use crate::route::{MethodSet, RoutePath};
use crate::router::Router;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTable {
    /// Prefix applied to every route in the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteSpec>,
}

/// One route of a [`RouteTable`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<String>,
    /// Pathname pattern; missing means `*`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Name looked up in the [`HandlerRegistry`]
    pub handler: String,
}

impl RouteSpec {
    /// Parsed, upper-cased method tokens
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidMethod`] for a token that is not a valid HTTP method.
    pub fn method_set(&self) -> Result<MethodSet, RouterError> {
        self.methods
            .iter()
            .map(|token| {
                let upper = token.trim().to_ascii_uppercase();
                Method::from_bytes(upper.as_bytes()).map_err(|_| RouterError::InvalidMethod {
                    method: token.clone(),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn route_path(&self) -> RoutePath {
        if self.path.is_none() && self.protocol.is_none() && self.hostname.is_none() {
            return RoutePath::Wildcard;
        }
        RoutePath::Pattern(PatternInit {
            protocol: self.protocol.clone(),
            hostname: self.hostname.clone(),
            pathname: self.path.clone(),
        })
    }
}

impl RouteTable {
    /// # Errors
    ///
    /// [`RouterError::Table`] when the document does not parse.
    pub fn from_yaml_str(source: &str) -> Result<Self, RouterError> {
        serde_yaml::from_str(source).map_err(|e| RouterError::Table {
            reason: e.to_string(),
        })
    }

    /// # Errors
    ///
    /// [`RouterError::Table`] when the document does not parse.
    pub fn from_json_str(source: &str) -> Result<Self, RouterError> {
        serde_json::from_str(source).map_err(|e| RouterError::Table {
            reason: e.to_string(),
        })
    }

    /// Load a table from disk; `.json` files are read as JSON, anything else as YAML
    ///
    /// # Errors
    ///
    /// [`RouterError::Table`] when the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RouterError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| RouterError::Table {
            reason: format!("{}: {}", path.display(), e),
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let table = if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_yaml_str(&source)
        }
        .map_err(|e| match e {
            RouterError::Table { reason } => RouterError::Table {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })?;

        debug!(path = %path.display(), routes = table.routes.len(), "Loaded route table");
        Ok(table)
    }

    /// Distinct handler names, in first-use order
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for route in &self.routes {
            if !names.contains(&route.handler.as_str()) {
                names.push(&route.handler);
            }
        }
        names
    }

    /// Build a router holding every route of the table, in order
    ///
    /// # Errors
    ///
    /// The first [`RouterError`] met: an invalid base, method token or
    /// pattern, or a handler name missing from `handlers`. No router is
    /// returned in that case.
    pub fn build(&self, handlers: &HandlerRegistry) -> Result<Router, RouterError> {
        let mut router = Router::with_base(self.base.clone().unwrap_or_default())?;
        for (index, spec) in self.routes.iter().enumerate() {
            let methods = spec.method_set()?;
            let handler = handlers.resolve(&spec.handler)?;
            router.route_shared(methods, spec.route_path(), handler)?;
            debug!(index, handler = %spec.handler, "Registered table route");
        }
        info!(routes = router.len(), base = ?router.base(), "Built router from route table");
        Ok(router)
    }
}
