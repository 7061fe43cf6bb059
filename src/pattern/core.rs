use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::parse::{Component, ComponentKind};
use crate::error::RouterError;

/// Source text for each pattern component; `None` means `*` (match anything)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternInit {
    pub protocol: Option<String>,
    pub hostname: Option<String>,
    pub pathname: Option<String>,
}

impl PatternInit {
    /// Pattern constrained on the pathname only
    #[must_use]
    pub fn pathname(pathname: impl Into<String>) -> Self {
        Self {
            pathname: Some(pathname.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    #[must_use]
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }
}

/// Match outcome for a single URL component
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentResult {
    /// The component text that was matched
    pub input: String,
    /// Named (`:id`) and numbered (`*`, `(regex)`) groups
    pub groups: HashMap<String, String>,
}

/// Successful [`UrlPattern::exec`] result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// The full URL that was matched
    pub input: String,
    pub protocol: ComponentResult,
    pub hostname: ComponentResult,
    pub pathname: ComponentResult,
}

/// Compiled URL pattern over protocol, hostname and pathname
///
/// Two patterns are equal when their component sources are equal, so
/// `UrlPattern::new(PatternInit::default())` equals a pattern built from the
/// pathname `*`.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    protocol: Component,
    hostname: Component,
    pathname: Component,
}

impl UrlPattern {
    /// Compile every component of `init`
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] when any component is malformed.
    pub fn new(init: PatternInit) -> Result<Self, RouterError> {
        let source = |s: Option<String>| s.unwrap_or_else(|| "*".to_string());
        Ok(Self {
            protocol: Component::compile(&source(init.protocol), ComponentKind::Protocol)?,
            hostname: Component::compile(&source(init.hostname), ComponentKind::Hostname)?,
            pathname: Component::compile(&source(init.pathname), ComponentKind::Pathname)?,
        })
    }

    /// Shorthand for a pathname-only pattern
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] when `pathname` is malformed.
    pub fn parse(pathname: &str) -> Result<Self, RouterError> {
        Self::new(PatternInit::pathname(pathname))
    }

    /// Same protocol and hostname, new pathname
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidPattern`] when `pathname` is malformed.
    pub fn with_pathname(&self, pathname: &str) -> Result<Self, RouterError> {
        Ok(Self {
            protocol: self.protocol.clone(),
            hostname: self.hostname.clone(),
            pathname: Component::compile(pathname, ComponentKind::Pathname)?,
        })
    }

    #[must_use]
    pub fn protocol(&self) -> &str {
        self.protocol.source()
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        self.hostname.source()
    }

    #[must_use]
    pub fn pathname(&self) -> &str {
        self.pathname.source()
    }

    /// Pathname group names in capture order
    #[must_use]
    pub fn param_names(&self) -> &[String] {
        self.pathname.names()
    }

    /// Match `url` (absolute) against this pattern
    ///
    /// Returns `None` when the URL cannot be parsed or any component fails.
    #[must_use]
    pub fn exec(&self, url: &str) -> Option<MatchResult> {
        let parsed = match url::Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                trace!(url, error = %e, "URL did not parse; treating as no-match");
                return None;
            }
        };

        Some(MatchResult {
            input: url.to_string(),
            protocol: self.protocol.exec(parsed.scheme())?,
            hostname: self.hostname.exec(parsed.host_str().unwrap_or(""))?,
            pathname: self.pathname.exec(parsed.path())?,
        })
    }

    #[must_use]
    pub fn test(&self, url: &str) -> bool {
        self.exec(url).is_some()
    }
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.protocol() == other.protocol()
            && self.hostname() == other.hostname()
            && self.pathname() == other.pathname()
    }
}

impl Eq for UrlPattern {}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.protocol() != "*" {
            write!(f, "{}://", self.protocol())?;
        }
        if self.hostname() != "*" {
            write!(f, "{}", self.hostname())?;
        }
        write!(f, "{}", self.pathname())
    }
}
