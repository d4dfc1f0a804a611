use std::fmt;

use regex::Regex;
use tracing::debug;

use crate::{
    error::{Error, Result},
    scope::ScopedAccessor,
};

/// One matched object. `namespace` is `None` for cluster-scoped objects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub namespace: Option<String>,
    pub name: String,
}

impl ResourceRef {
    pub fn namespaced(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            name: name.into(),
        }
    }

    pub fn cluster(name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            name: name.into(),
        }
    }

    /// Build a ref from object metadata, treating an empty namespace as cluster-scoped.
    pub fn from_parts(namespace: Option<String>, name: String) -> Self {
        Self {
            namespace: namespace.filter(|ns| !ns.is_empty()),
            name,
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{ns}/{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Matched objects in listing order.
pub type MatchSet = Vec<ResourceRef>;

/// Compile the user supplied pattern. A missing pattern matches every name.
///
/// Must be called before any API request is made.
pub fn compile_pattern(pattern: Option<&str>) -> Result<Regex> {
    let pattern = pattern.unwrap_or_default();
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// List everything visible through `accessor` and keep the objects whose name matches `pattern`.
///
/// Only the name is tested. Listing order is preserved and nothing is deduplicated.
/// The listing is a single unpaginated request.
pub async fn select<A: ScopedAccessor>(
    accessor: &A,
    resource: &str,
    pattern: &Regex,
) -> Result<MatchSet> {
    let listed = accessor.list().await.map_err(|source| Error::Listing {
        resource: resource.to_string(),
        source,
    })?;
    let total = listed.len();

    let matched: MatchSet = listed
        .into_iter()
        .filter(|item| pattern.is_match(&item.name))
        .collect();
    debug!(resource, total, matched = matched.len(), %pattern, "filtered listing");
    Ok(matched)
}
