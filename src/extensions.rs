// ── Capability extensions & assembler ─────────────────────────────────────────
//
// An `Extension` is one named, composable unit of engine behavior.  The
// assembler turns a configuration plus the resolved optional capabilities
// into a `CapabilityBundle` — the ordered sequence the engine folds at
// construction.  Ordering matters: within the engine's precedence rules a
// later extension overrides an earlier one, except that a `Highest`
// precedence keymap beats every `Default` one regardless of position.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    config::{EditorConfig, EditorKind},
    engine::{Command, Key, KeyBinding},
    languages::SyntaxExtension,
    theme::ThemeExtension,
};

// ── Building blocks ───────────────────────────────────────────────────────────

/// Callback invoked with the new document text after a content change.
pub type ChangeSink = Arc<dyn Fn(&str) + Send + Sync>;

/// Keymap precedence class.  `Highest` keymaps are consulted before every
/// `Default` one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    Default,
    Highest,
}

/// One unit of engine behavior.
pub enum Extension {
    /// Base editing behavior.  Always first.
    Base,
    /// Schema-driven editing for the `Json` variant; carries the resolved
    /// validation schema (possibly the empty object).
    SchemaGuide(Value),
    /// Language grammar for the `Source` variant.
    Syntax(SyntaxExtension),
    /// Reject key-originated edits.
    ReadOnly,
    /// A set of key bindings at the given precedence.
    Keymap {
        precedence: Precedence,
        bindings: Vec<KeyBinding>,
    },
    /// Colour theme.
    Theme(ThemeExtension),
    /// Change-notification hook; fired only for content changes.
    ChangeHook(ChangeSink),
    /// Soft line-wrapping.
    LineWrap,
}

impl Extension {
    /// Stable name of the extension variant, used for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::SchemaGuide(_) => "schema-guide",
            Self::Syntax(_) => "syntax",
            Self::ReadOnly => "read-only",
            Self::Keymap { .. } => "keymap",
            Self::Theme(_) => "theme",
            Self::ChangeHook(_) => "change-hook",
            Self::LineWrap => "line-wrap",
        }
    }
}

impl std::fmt::Debug for Extension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ── CapabilityBundle ──────────────────────────────────────────────────────────

/// The ordered, immutable set of extensions composed into one engine
/// configuration.  Built once per mount; absent optional capabilities are
/// simply omitted, never represented by placeholders.
#[derive(Debug, Default)]
pub struct CapabilityBundle(Vec<Extension>);

impl CapabilityBundle {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Extension> {
        self.0.iter()
    }
}

impl IntoIterator for CapabilityBundle {
    type Item = Extension;
    type IntoIter = std::vec::IntoIter<Extension>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// ── Assembler ─────────────────────────────────────────────────────────────────

/// Compose the capability bundle for one engine construction.
///
/// Ordering policy (later wins within the engine's precedence rules):
/// 1. base editing behavior — always;
/// 2. schema-driven editing (`Json` variant) — always, even when empty;
/// 3. language syntax (`Source` variant) — if resolved;
/// 4. read-only guard — iff configured;
/// 5. Mod+Enter suppression at highest precedence — iff `mod_enter` is off;
/// 6. theme — if resolved;
/// 7. change-notification hook — always;
/// 8. Tab / Shift+Tab overrides — always;
/// 9. soft line-wrapping — always.
pub fn assemble(
    config: &EditorConfig,
    language: Option<SyntaxExtension>,
    theme: Option<ThemeExtension>,
    schema: Option<Value>,
    change_sink: ChangeSink,
) -> CapabilityBundle {
    let mut exts = vec![Extension::Base];

    match config.kind {
        EditorKind::Json => {
            exts.push(Extension::SchemaGuide(
                schema.unwrap_or_else(|| Value::Object(serde_json::Map::new())),
            ));
        }
        EditorKind::Source => {
            if let Some(syntax) = language {
                exts.push(Extension::Syntax(syntax));
            }
        }
    }

    if config.read_only {
        exts.push(Extension::ReadOnly);
    }

    if !config.mod_enter {
        exts.push(Extension::Keymap {
            precedence: Precedence::Highest,
            bindings: vec![KeyBinding {
                key: Key::Enter,
                shift: false,
                modifier: true,
                command: Command::Swallow,
            }],
        });
    }

    if let Some(theme) = theme {
        exts.push(Extension::Theme(theme));
    }

    exts.push(Extension::ChangeHook(change_sink));

    exts.push(Extension::Keymap {
        precedence: Precedence::Default,
        bindings: vec![
            KeyBinding {
                key: Key::Tab,
                shift: false,
                modifier: false,
                command: Command::InsertIndent,
            },
            KeyBinding {
                key: Key::Tab,
                shift: true,
                modifier: false,
                command: Command::IndentLess,
            },
        ],
    });

    exts.push(Extension::LineWrap);

    CapabilityBundle(exts)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sink() -> ChangeSink {
        Arc::new(|_| {})
    }

    fn names(bundle: &CapabilityBundle) -> Vec<&'static str> {
        bundle.iter().map(Extension::name).collect()
    }

    #[test]
    fn source_variant_with_everything_resolved() {
        let config = EditorConfig {
            read_only: true,
            ..EditorConfig::source("rust")
        };
        let lang = SyntaxExtension { name: "Rust", keywords: "fn" };
        let theme = ThemeExtension {
            name: "dark",
            dark: true,
            palette: crate::theme::Palette {
                bg: 0x1E1E1E,
                fg: 0xD4D4D4,
                line_num_bg: 0x252526,
                line_num_fg: 0x858585,
                comment: 0x6A9955,
                keyword: 0x569CD6,
                string: 0xCE9178,
                number: 0xB5CEA8,
            },
        };
        let bundle = assemble(&config, Some(lang), Some(theme), None, sink());
        assert_eq!(
            names(&bundle),
            [
                "base",
                "syntax",
                "read-only",
                "keymap", // Mod+Enter suppression
                "theme",
                "change-hook",
                "keymap", // Tab / Shift+Tab
                "line-wrap",
            ]
        );
    }

    #[test]
    fn json_variant_always_carries_a_schema() {
        let bundle = assemble(&EditorConfig::json(), None, None, None, sink());
        let schema = bundle
            .iter()
            .find_map(|e| match e {
                Extension::SchemaGuide(v) => Some(v.clone()),
                _ => None,
            })
            .expect("schema guide present");
        assert_eq!(schema, json!({}));
    }

    #[test]
    fn json_variant_never_carries_syntax() {
        let lang = SyntaxExtension { name: "JSON", keywords: "" };
        let bundle = assemble(&EditorConfig::json(), Some(lang), None, None, sink());
        assert!(!bundle.iter().any(|e| matches!(e, Extension::Syntax(_))));
    }

    /// All optional capabilities absent: the bundle is still well-formed and
    /// carries every always-present extension.
    #[test]
    fn all_absent_bundle_is_well_formed() {
        let config = EditorConfig {
            mod_enter: true,
            ..EditorConfig::default()
        };
        let bundle = assemble(&config, None, None, None, sink());
        assert_eq!(
            names(&bundle),
            ["base", "change-hook", "keymap", "line-wrap"]
        );
        assert!(!bundle.is_empty());
    }

    #[test]
    fn mod_enter_opt_in_drops_the_suppression_keymap() {
        let suppressed = assemble(&EditorConfig::default(), None, None, None, sink());
        let native = assemble(
            &EditorConfig { mod_enter: true, ..EditorConfig::default() },
            None,
            None,
            None,
            sink(),
        );
        assert_eq!(suppressed.len(), native.len() + 1);
        let highest = |b: &CapabilityBundle| {
            b.iter()
                .filter(|e| {
                    matches!(e, Extension::Keymap { precedence: Precedence::Highest, .. })
                })
                .count()
        };
        assert_eq!(highest(&suppressed), 1);
        assert_eq!(highest(&native), 0);
    }

    #[test]
    fn read_only_guard_only_when_configured() {
        let rw = assemble(&EditorConfig::default(), None, None, None, sink());
        assert!(!rw.iter().any(|e| matches!(e, Extension::ReadOnly)));
        let ro = assemble(
            &EditorConfig { read_only: true, ..EditorConfig::default() },
            None,
            None,
            None,
            sink(),
        );
        assert!(ro.iter().any(|e| matches!(e, Extension::ReadOnly)));
    }
}
