//! XML namespace handling
//!
//! Qualified names and the scoped prefix-binding table the schema builder
//! consults whenever a QName-valued attribute is parsed. Bindings are
//! pushed as prefix-mapping events arrive and popped when their scope
//! closes; a later binding for the same prefix shadows the earlier one.

use serde::Serialize;
use std::fmt;

use crate::names::{is_valid_qname, split_qname};

/// Qualified name: a namespace-URI + local-name pair
///
/// Absence of a prefix means "no namespace" (the builder never applies a
/// default namespace to unprefixed references).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Failure to turn a reference attribute into a [`QName`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The string does not parse as `prefix:local` or `local`
    Malformed(String),
    /// The prefix has no active binding
    UnknownPrefix(String),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Malformed(s) => write!(f, "malformed qualified name '{}'", s),
            ResolveError::UnknownPrefix(p) => write!(f, "unknown namespace prefix '{}'", p),
        }
    }
}

/// Scoped namespace-prefix bindings
///
/// Owned exclusively by one builder instance; never shared.
#[derive(Debug, Clone, Default)]
pub struct NamespaceStack {
    // (prefix, uri) pairs in binding order; lookup scans back to front so
    // inner scopes shadow outer ones
    bindings: Vec<(String, String)>,
}

impl NamespaceStack {
    /// Create an empty binding stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a prefix binding (prefix-mapping-start event)
    pub fn push(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.bindings.push((prefix.into(), uri.into()));
    }

    /// Pop the most recent binding for a prefix (prefix-mapping-end event)
    pub fn pop(&mut self, prefix: &str) {
        if let Some(idx) = self.bindings.iter().rposition(|(p, _)| p == prefix) {
            self.bindings.remove(idx);
        }
    }

    /// Get the active namespace URI for a prefix
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    /// Resolve a reference attribute value against the active bindings
    ///
    /// `prefix:local` resolves the prefix to its bound URI; a bare `local`
    /// yields a QName with no namespace.
    pub fn resolve(&self, value: &str) -> Result<QName, ResolveError> {
        if !is_valid_qname(value) {
            return Err(ResolveError::Malformed(value.to_string()));
        }
        match split_qname(value) {
            (Some(prefix), local) => {
                let uri = self
                    .get(prefix)
                    .ok_or_else(|| ResolveError::UnknownPrefix(prefix.to_string()))?;
                Ok(QName::namespaced(uri, local))
            }
            (None, local) => Ok(QName::local(local)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_display() {
        let qname = QName::namespaced("http://example.com", "element");
        assert_eq!(qname.to_string(), "{http://example.com}element");
        assert_eq!(QName::local("element").to_string(), "element");
    }

    #[test]
    fn test_resolve_prefixed() {
        let mut ns = NamespaceStack::new();
        ns.push("xs", "http://www.w3.org/2001/XMLSchema");

        let qname = ns.resolve("xs:string").unwrap();
        assert_eq!(
            qname,
            QName::namespaced("http://www.w3.org/2001/XMLSchema", "string")
        );
    }

    #[test]
    fn test_resolve_unprefixed_has_no_namespace() {
        let mut ns = NamespaceStack::new();
        ns.push("", "http://example.com/default");

        // No prefix means no namespace, even with a default binding active
        assert_eq!(ns.resolve("myType").unwrap(), QName::local("myType"));
    }

    #[test]
    fn test_shadowing_and_pop() {
        let mut ns = NamespaceStack::new();
        ns.push("p", "http://outer");
        ns.push("p", "http://inner");
        assert_eq!(ns.get("p"), Some("http://inner"));

        ns.pop("p");
        assert_eq!(ns.get("p"), Some("http://outer"));

        ns.pop("p");
        assert_eq!(ns.get("p"), None);
    }

    #[test]
    fn test_resolve_errors() {
        let ns = NamespaceStack::new();
        assert_eq!(
            ns.resolve(":bad"),
            Err(ResolveError::Malformed(":bad".to_string()))
        );
        assert_eq!(
            ns.resolve("xs:string"),
            Err(ResolveError::UnknownPrefix("xs".to_string()))
        );
    }
}
