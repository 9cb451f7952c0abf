// src/services/cors.rs
//! CORS policy evaluation for the verification endpoint.
//!
//! The allow-list is a comma-separated string of rules:
//! - `*` allows any origin
//! - `https://*.<base>` allows any `https://` origin ending in `.<base>`
//! - anything else must equal the request origin exactly
//!
//! The wildcard rule is a plain suffix match, so sibling domains sharing the
//! suffix are accepted too.
//!
//! Denied origins still get an `Access-Control-Allow-Origin` header, set to the
//! literal `null`, so preflight and actual responses always carry the same set
//! of headers.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, VARY,
};
use axum::http::{HeaderName, HeaderValue};

const WILDCARD_PREFIX: &str = "https://*.";
const ALLOWED_METHODS: &str = "GET, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";
const DENIED_ORIGIN: &str = "null";

/// One entry of the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginRule {
    /// `*`
    Any,
    /// `https://*.<base>`, holding `<base>`
    Subdomains(String),
    /// Exact origin
    Exact(String),
}

impl OriginRule {
    fn parse(rule: &str) -> Self {
        if rule == "*" {
            OriginRule::Any
        } else if let Some(base) = rule.strip_prefix(WILDCARD_PREFIX) {
            OriginRule::Subdomains(base.to_string())
        } else {
            OriginRule::Exact(rule.to_string())
        }
    }

    fn allows(&self, origin: &str) -> bool {
        match self {
            OriginRule::Any => true,
            OriginRule::Subdomains(base) => {
                origin.starts_with("https://") && origin.ends_with(&format!(".{}", base))
            }
            OriginRule::Exact(exact) => origin == exact,
        }
    }
}

/// Evaluates request origins against a fixed allow-list.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    rules: Vec<OriginRule>,
}

impl CorsPolicy {
    /// Parses a comma-separated allow-list. Blank entries are ignored; an empty
    /// list denies every origin.
    pub fn from_allow_list(allow_list: &str) -> Self {
        let rules = allow_list
            .split(',')
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
            .map(OriginRule::parse)
            .collect();
        Self { rules }
    }

    /// Parsed rules, in configuration order.
    pub fn rules(&self) -> &[OriginRule] {
        &self.rules
    }

    /// True if any rule admits `origin`.
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.rules.iter().any(|rule| rule.allows(origin))
    }

    /// Computes the four CORS headers for a request.
    ///
    /// # Arguments
    /// * `origin` - The request's `Origin` header, if any. A missing or
    ///   non-visible-ASCII header is treated as the empty origin.
    pub fn headers(&self, origin: Option<&HeaderValue>) -> [(HeaderName, HeaderValue); 4] {
        let origin_str = origin.and_then(|v| v.to_str().ok()).unwrap_or("");

        let allow_origin = if self.is_allowed(origin_str) {
            HeaderValue::from_str(origin_str).unwrap_or_else(|_| HeaderValue::from_static(DENIED_ORIGIN))
        } else {
            HeaderValue::from_static(DENIED_ORIGIN)
        };

        [
            (ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin),
            (VARY, HeaderValue::from_static("Origin")),
            (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS)),
            (ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOWED_HEADERS)),
        ]
    }
}
