//! Script binding declarations.
//!
//! Bindings are a closed set of kinds, each carrying a `name` and a
//! kind-specific payload. They serialize in the shape the script upload
//! metadata expects: one flat list tagged by `type`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Binding kinds, in the order they are grouped in upload metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKind {
    PlainText,
    SecretText,
    KvNamespace,
    R2Bucket,
    Queue,
    D1,
    Service,
    AnalyticsEngine,
}

impl BindingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::SecretText => "secret_text",
            Self::KvNamespace => "kv_namespace",
            Self::R2Bucket => "r2_bucket",
            Self::Queue => "queue",
            Self::D1 => "d1",
            Self::Service => "service",
            Self::AnalyticsEngine => "analytics_engine",
        }
    }
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A binding exposed to the worker script at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Binding {
    PlainText {
        name: String,
        text: String,
    },
    SecretText {
        name: String,
        text: String,
    },
    KvNamespace {
        name: String,
        namespace_id: String,
    },
    R2Bucket {
        name: String,
        bucket_name: String,
    },
    Queue {
        name: String,
        queue_name: String,
    },
    #[serde(rename = "d1")]
    D1 {
        name: String,
        id: String,
    },
    Service {
        name: String,
        service: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        environment: Option<String>,
    },
    AnalyticsEngine {
        name: String,
        dataset: String,
    },
}

impl Binding {
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::PlainText { .. } => BindingKind::PlainText,
            Self::SecretText { .. } => BindingKind::SecretText,
            Self::KvNamespace { .. } => BindingKind::KvNamespace,
            Self::R2Bucket { .. } => BindingKind::R2Bucket,
            Self::Queue { .. } => BindingKind::Queue,
            Self::D1 { .. } => BindingKind::D1,
            Self::Service { .. } => BindingKind::Service,
            Self::AnalyticsEngine { .. } => BindingKind::AnalyticsEngine,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::PlainText { name, .. }
            | Self::SecretText { name, .. }
            | Self::KvNamespace { name, .. }
            | Self::R2Bucket { name, .. }
            | Self::Queue { name, .. }
            | Self::D1 { name, .. }
            | Self::Service { name, .. }
            | Self::AnalyticsEngine { name, .. } => name,
        }
    }

    pub fn plain_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::PlainText {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn secret_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::SecretText {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn kv_namespace(name: impl Into<String>, namespace_id: impl Into<String>) -> Self {
        Self::KvNamespace {
            name: name.into(),
            namespace_id: namespace_id.into(),
        }
    }
}

/// Sort bindings by kind, then by name. The sort is stable.
pub fn normalize_bindings(bindings: &[Binding]) -> Vec<Binding> {
    let mut sorted = bindings.to_vec();
    sorted.sort_by(|a, b| (a.kind(), a.name()).cmp(&(b.kind(), b.name())));
    sorted
}

/// Reject empty names and a name declared twice for the same kind.
///
/// Bindings are keyed by name per kind; reusing a name under another kind is
/// allowed.
pub fn validate_bindings(bindings: &[Binding]) -> Result<()> {
    let mut seen = HashSet::with_capacity(bindings.len());
    for binding in bindings {
        let name = binding.name();
        if name.is_empty() {
            return Err(CoreError::validation(format!(
                "empty name provided for {} binding",
                binding.kind()
            )));
        }
        if !seen.insert((binding.kind(), name)) {
            return Err(CoreError::validation(format!(
                "duplicate {} binding name: {name}",
                binding.kind()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_with_type_tag() {
        let value = serde_json::to_value(Binding::kv_namespace("CACHE", "abc123")).unwrap();
        assert_eq!(
            value,
            json!({"type": "kv_namespace", "name": "CACHE", "namespace_id": "abc123"})
        );

        let d1 = Binding::D1 {
            name: "DB".into(),
            id: "db-1".into(),
        };
        assert_eq!(
            serde_json::to_value(d1).unwrap(),
            json!({"type": "d1", "name": "DB", "id": "db-1"})
        );
    }

    #[test]
    fn test_deserializes_service_without_environment() {
        let binding: Binding =
            serde_json::from_value(json!({"type": "service", "name": "AUTH", "service": "auth"}))
                .unwrap();
        assert_eq!(binding.kind(), BindingKind::Service);
        assert_eq!(
            serde_json::to_value(&binding).unwrap(),
            json!({"type": "service", "name": "AUTH", "service": "auth"})
        );
    }

    #[test]
    fn test_normalize_orders_by_kind_then_name() {
        let bindings = vec![
            Binding::AnalyticsEngine {
                name: "EVENTS".into(),
                dataset: "events".into(),
            },
            Binding::plain_text("ZONE", "z"),
            Binding::secret_text("API_KEY", "secret"),
            Binding::plain_text("ENV", "dev"),
        ];
        let names: Vec<_> = normalize_bindings(&bindings)
            .iter()
            .map(|b| b.name().to_string())
            .collect();
        assert_eq!(names, ["ENV", "ZONE", "API_KEY", "EVENTS"]);
    }

    #[test]
    fn test_kind_order() {
        assert!(BindingKind::PlainText < BindingKind::SecretText);
        assert!(BindingKind::Queue < BindingKind::D1);
        assert!(BindingKind::Service < BindingKind::AnalyticsEngine);
    }

    #[test]
    fn test_validate_accepts_same_name_across_kinds() {
        let bindings = vec![
            Binding::plain_text("ENV", "dev"),
            Binding::kv_namespace("ENV", "ns"),
        ];
        assert!(validate_bindings(&bindings).is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicates_within_kind() {
        let bindings = vec![
            Binding::plain_text("ENV", "dev"),
            Binding::kv_namespace("CACHE", "ns"),
            Binding::plain_text("ENV", "prod"),
        ];
        let err = validate_bindings(&bindings).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("duplicate plain_text binding name: ENV"));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let err = validate_bindings(&[Binding::plain_text("", "x")]).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_accepts_distinct_names() {
        let bindings = vec![
            Binding::plain_text("ENV", "dev"),
            Binding::kv_namespace("CACHE", "ns"),
        ];
        assert!(validate_bindings(&bindings).is_ok());
    }
}
