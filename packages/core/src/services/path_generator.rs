//! Path Generator
//!
//! Resolves route parameters for a node and hands them to the route
//! template's path builder. The generator only knows how to resolve
//! parameters; the route syntax belongs to the template.
//!
//! # Parameter Resolution
//!
//! For each route key, in order:
//!
//! 1. `year`, `month` and `day` come from the node date when it parses as
//!    ISO-8601
//! 2. Otherwise the candidate is the normalized field (`a__b` addresses
//!    `fields.a.b`), then the top-level node attribute, then the key itself
//! 3. A reference candidate with a single id contributes that id
//! 4. Any other candidate contributes its slug as `key` and its raw string
//!    form as `key_raw`, unless `key` was already set

use crate::models::{value_to_string, FieldValue, Node};
use crate::services::error::NodeServiceError;
use crate::utils::dates::format_date_part;
use crate::utils::{parse_iso_date, slugify};
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Resolved route parameters
pub type RouteParams = BTreeMap<String, String>;

/// Route used by content types without one
pub const DEFAULT_ROUTE: &str = "/:typeName/:slug";

/// Separator addressing nested fields in route keys
const NESTED_KEY_SEPARATOR: &str = "__";

/// Suffix of the companion parameter holding the unslugified value
const RAW_SUFFIX: &str = "_raw";

/// `:name` placeholders in route patterns
static ROUTE_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Repeated slashes in generated paths
static REPEATED_SLASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/{2,}").unwrap());

type MakePath = dyn Fn(&RouteParams) -> String + Send + Sync;

/// Ordered route keys plus a function building a path from their values.
#[derive(Clone)]
pub struct RouteTemplate {
    pattern: Option<String>,
    keys: Vec<String>,
    make_path: Arc<MakePath>,
}

impl RouteTemplate {
    /// Template with explicit keys and path builder.
    ///
    /// ```
    /// use contentgraph_core::services::RouteTemplate;
    ///
    /// let route = RouteTemplate::new(vec!["slug".to_string()], |params| {
    ///     format!("/docs/{}", params.get("slug").map(String::as_str).unwrap_or(""))
    /// });
    /// assert_eq!(route.keys(), ["slug"]);
    /// ```
    pub fn new(
        keys: Vec<String>,
        make_path: impl Fn(&RouteParams) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            pattern: None,
            keys,
            make_path: Arc::new(make_path),
        }
    }

    /// Compile a pattern such as `/blog/:year/:slug`.
    ///
    /// Missing parameters render as empty segments, which path
    /// normalization collapses.
    ///
    /// # Errors
    ///
    /// `InvalidRoute` when the pattern does not start with `/` or contains a
    /// `:` not followed by a parameter name.
    pub fn from_pattern(pattern: &str) -> Result<Self, NodeServiceError> {
        if !pattern.starts_with('/') {
            return Err(NodeServiceError::invalid_route(
                pattern,
                "route must start with '/'",
            ));
        }

        let keys: Vec<String> = ROUTE_PARAM_RE
            .captures_iter(pattern)
            .map(|caps| caps[1].to_string())
            .collect();

        if pattern.matches(':').count() != keys.len() {
            return Err(NodeServiceError::invalid_route(
                pattern,
                "every ':' must start a parameter name",
            ));
        }

        let template = pattern.to_string();
        let make_path = move |params: &RouteParams| {
            ROUTE_PARAM_RE
                .replace_all(&template, |caps: &Captures| {
                    params.get(&caps[1]).cloned().unwrap_or_default()
                })
                .into_owned()
        };

        Ok(Self {
            pattern: Some(pattern.to_string()),
            keys,
            make_path: Arc::new(make_path),
        })
    }

    /// Route keys in declaration order
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Source pattern, when built from one
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn make_path(&self, params: &RouteParams) -> String {
        (self.make_path)(params)
    }
}

impl fmt::Debug for RouteTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTemplate")
            .field("pattern", &self.pattern)
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// Normalize a path to exactly one leading slash and no repeated slashes.
///
/// ```
/// use contentgraph_core::services::path_generator::normalize_path;
///
/// assert_eq!(normalize_path("blog/post"), "/blog/post");
/// assert_eq!(normalize_path("///blog//post"), "/blog/post");
/// ```
pub fn normalize_path(path: &str) -> String {
    let joined = format!("/{}", path.trim_start_matches('/'));
    REPEATED_SLASH_RE.replace_all(&joined, "/").into_owned()
}

/// Generate the path of a node from a route template
pub fn generate_path(node: &Node, route: &RouteTemplate) -> String {
    let params = resolve_params(node, route.keys());
    normalize_path(&route.make_path(&params))
}

/// Resolve the parameter map for a node
pub fn resolve_params(node: &Node, keys: &[String]) -> RouteParams {
    let date = parse_iso_date(&node.date);
    if date.is_none() && keys.iter().any(|key| is_date_key(key)) {
        tracing::warn!(
            "Node {}/{} has unparseable date '{}'; date route keys fall back to fields",
            node.type_name,
            node.id,
            node.date
        );
    }

    let mut params = RouteParams::new();

    for key in keys {
        if let Some(formatted) = date.as_ref().and_then(|date| format_date_part(key, date)) {
            params.insert(key.clone(), formatted);
            continue;
        }

        let candidate = resolve_candidate(node, key);
        let classified = FieldValue::classify(&candidate);

        if let Some(id) = classified.as_reference().and_then(|reference| reference.id()) {
            params.insert(key.clone(), id.to_string());
        } else if !params.contains_key(key) {
            let raw = value_to_string(&candidate);
            params.insert(key.clone(), slugify(&raw));
            params.insert(format!("{key}{RAW_SUFFIX}"), raw);
        }
    }

    params
}

fn is_date_key(key: &str) -> bool {
    matches!(key, "year" | "month" | "day")
}

/// Field value, then node attribute, then the key itself
fn resolve_candidate(node: &Node, key: &str) -> Value {
    let path: Vec<&str> = key.split(NESTED_KEY_SEPARATOR).collect();

    node.field_at(&path)
        .filter(|value| !value.is_null())
        .cloned()
        .or_else(|| node.attribute(key))
        .unwrap_or_else(|| Value::String(key.to_string()))
}
