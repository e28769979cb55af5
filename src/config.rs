// ── Declarative configuration surface ─────────────────────────────────────────
//
// The host describes the widget it wants with a plain `EditorConfig` value.
// Every field has a serde default so a host can deserialize a partial
// document (`{"kind":"json","url":"…"}`) and get the documented baseline
// behavior for everything it left out.
//
// Configuration is read once, when `EditorWidget::mount` runs.  `code` is the
// only property that stays live afterwards (via `EditorWidget::set_text`);
// changing any other field on a mounted widget has no effect.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Variant selection ─────────────────────────────────────────────────────────

/// Which of the two widget variants to construct.
///
/// The language and schema capabilities are mutually exclusive: the `Source`
/// variant resolves a syntax extension, the `Json` variant resolves a
/// validation schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    /// A source-code editor with an optional language grammar.
    #[default]
    Source,
    /// A JSON editor validated against a schema (inline or fetched).
    Json,
}

// ── EditorConfig ──────────────────────────────────────────────────────────────

/// Immutable-at-mount-time description of one editor widget.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Variant selector (see [`EditorKind`]).
    pub kind: EditorKind,
    /// Language alias for the `Source` variant; empty means plain text.
    pub language: String,
    /// When `true`, an unresolvable `language` fails the mount instead of
    /// silently degrading to plain text.
    pub require_language: bool,
    /// Theme name; empty or unknown names keep the default appearance.
    pub theme: String,
    /// Reject key-originated edits.  Host-driven `set_text` still applies.
    pub read_only: bool,
    /// When `false` (the default) Mod+Enter is swallowed so the host can use
    /// it for an external action such as "submit"; `true` opts back into the
    /// engine's native behavior.
    pub mod_enter: bool,
    /// Initial document text.
    pub code: String,
    /// Inline schema for the `Json` variant.  Ignored when `url` is set.
    pub schema: Option<Value>,
    /// Remote schema URL for the `Json` variant; empty means "use `schema`".
    #[serde(rename = "url")]
    pub schema_url: String,
}

impl EditorConfig {
    /// A `Source`-variant configuration for the given language alias.
    pub fn source(language: impl Into<String>) -> Self {
        Self {
            kind: EditorKind::Source,
            language: language.into(),
            ..Self::default()
        }
    }

    /// A `Json`-variant configuration.  With neither an inline schema nor a
    /// URL, the editor validates against the empty object schema.
    pub fn json() -> Self {
        Self {
            kind: EditorKind::Json,
            ..Self::default()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_is_plain_source_editor() {
        let c = EditorConfig::default();
        assert_eq!(c.kind, EditorKind::Source);
        assert!(c.language.is_empty());
        assert!(!c.require_language);
        assert!(c.theme.is_empty());
        assert!(!c.read_only);
        assert!(!c.mod_enter);
        assert!(c.code.is_empty());
        assert_eq!(c.schema, None);
        assert!(c.schema_url.is_empty());
    }

    #[test]
    fn roundtrip() {
        let c = EditorConfig {
            kind: EditorKind::Json,
            theme: "dracula".to_owned(),
            read_only: true,
            code: "{}".to_owned(),
            schema: Some(json!({"type": "object"})),
            schema_url: "https://x/schema.json".to_owned(),
            ..EditorConfig::default()
        };
        let s = serde_json::to_string(&c).expect("serialize");
        let c2: EditorConfig = serde_json::from_str(&s).expect("deserialize");
        assert_eq!(c, c2);
    }

    /// Hosts hand the widget partial documents; every missing field must
    /// take its default.
    #[test]
    fn partial_document_parses_with_defaults() {
        let c: EditorConfig =
            serde_json::from_str(r#"{"kind":"json","url":"https://x/s.json"}"#).expect("parse");
        assert_eq!(c.kind, EditorKind::Json);
        assert_eq!(c.schema_url, "https://x/s.json");
        assert_eq!(c.schema, None);
        assert!(!c.read_only);
    }

    /// The remote-schema field is exposed to hosts as `url`.
    #[test]
    fn schema_url_serializes_as_url() {
        let c = EditorConfig {
            schema_url: "https://x/s.json".to_owned(),
            ..EditorConfig::default()
        };
        let v = serde_json::to_value(&c).expect("serialize");
        assert_eq!(v["url"], "https://x/s.json");
        assert!(v.get("schema_url").is_none());
    }

    #[test]
    fn source_helper_sets_language() {
        let c = EditorConfig::source("rust");
        assert_eq!(c.kind, EditorKind::Source);
        assert_eq!(c.language, "rust");
    }

    #[test]
    fn json_helper_selects_json_variant() {
        assert_eq!(EditorConfig::json().kind, EditorKind::Json);
    }
}
