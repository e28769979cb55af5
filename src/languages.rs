// ── Language catalog ──────────────────────────────────────────────────────────
//
// Maps language aliases to lazily-loaded syntax extensions.  The catalog is
// an explicit, immutable value built once at the composition root and passed
// into the widget; there is no ambient global registry and no dynamic module
// resolution — every entry is an enumerated name bound to a zero-argument
// async loader.
//
// Alias membership is a case-sensitive exact lookup.  An unknown alias
// resolves to absent; only `resolve_required` turns a miss into an error.

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use crate::error::{EditorError, Result};

// ── SyntaxExtension ───────────────────────────────────────────────────────────

/// A loaded language grammar bundle: the payload a successful resolution
/// hands to the extension assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxExtension {
    /// Canonical language name, e.g. `"Rust"`.
    pub name: &'static str,
    /// Space-separated keyword list used for highlighting.  Empty for
    /// languages whose grammar carries no keyword set.
    pub keywords: &'static str,
}

impl SyntaxExtension {
    /// `true` if `word` is a keyword of this language.
    pub fn has_keyword(&self, word: &str) -> bool {
        self.keywords.split_ascii_whitespace().any(|k| k == word)
    }
}

// ── Loader registry ───────────────────────────────────────────────────────────

/// Zero-argument async loader producing a syntax extension.
pub type SyntaxLoader =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = SyntaxExtension> + Send>> + Send + Sync>;

/// One enumerated catalog entry: a canonical name, its alias set, and the
/// payload the builtin loader resolves to.
struct LanguageDescriptor {
    aliases: &'static [&'static str],
    payload: SyntaxExtension,
}

/// The language catalog: alias → loader.
#[derive(Clone)]
pub struct LanguageCatalog {
    entries: HashMap<String, SyntaxLoader>,
}

impl LanguageCatalog {
    /// An empty catalog.  Useful for hosts that supply their own entries.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The builtin catalog, built from the enumerated descriptor table.
    pub fn builtin() -> Self {
        let mut cat = Self::empty();
        for desc in DESCRIPTORS {
            let payload = desc.payload;
            let loader: SyntaxLoader = Arc::new(move || Box::pin(async move { payload }));
            for alias in desc.aliases {
                cat.entries.insert((*alias).to_owned(), Arc::clone(&loader));
            }
        }
        cat
    }

    /// Register `loader` under every alias in `aliases`, replacing any
    /// existing binding.  Consumes and returns the catalog so entries can be
    /// chained at the composition root.
    pub fn with_language(mut self, aliases: &[&str], loader: SyntaxLoader) -> Self {
        for alias in aliases {
            self.entries.insert((*alias).to_owned(), Arc::clone(&loader));
        }
        self
    }

    /// Resolve an alias to a loaded syntax extension.
    ///
    /// An empty alias is a valid "no language" request and resolves to
    /// `None` without attempting a load; so does an unknown alias.
    pub async fn resolve(&self, alias: &str) -> Option<SyntaxExtension> {
        if alias.is_empty() {
            return None;
        }
        let Some(loader) = self.entries.get(alias) else {
            tracing::debug!(alias, "language not in catalog; editor stays plain text");
            return None;
        };
        let ext = loader().await;
        tracing::debug!(alias, language = ext.name, "language resolved");
        Some(ext)
    }

    /// Resolve an alias the host asserts must exist.
    ///
    /// A miss is a configuration error and fails the mount.
    pub async fn resolve_required(&self, alias: &str) -> Result<SyntaxExtension> {
        self.resolve(alias).await.ok_or_else(|| EditorError::UnknownLanguage {
            name: alias.to_owned(),
        })
    }
}

// ── Descriptor table ──────────────────────────────────────────────────────────

const DESCRIPTORS: &[LanguageDescriptor] = &[
    LanguageDescriptor {
        aliases: &["json"],
        payload: SyntaxExtension {
            name: "JSON",
            keywords: "true false null",
        },
    },
    LanguageDescriptor {
        aliases: &["javascript", "js"],
        payload: SyntaxExtension {
            name: "JavaScript",
            keywords: JS_KEYWORDS,
        },
    },
    LanguageDescriptor {
        aliases: &["typescript", "ts"],
        payload: SyntaxExtension {
            name: "TypeScript",
            keywords: TS_KEYWORDS,
        },
    },
    LanguageDescriptor {
        aliases: &["rust", "rs"],
        payload: SyntaxExtension {
            name: "Rust",
            keywords: RUST_KEYWORDS,
        },
    },
    LanguageDescriptor {
        aliases: &["python", "py"],
        payload: SyntaxExtension {
            name: "Python",
            keywords: PY_KEYWORDS,
        },
    },
    LanguageDescriptor {
        aliases: &["c"],
        payload: SyntaxExtension {
            name: "C",
            keywords: C_KEYWORDS,
        },
    },
    LanguageDescriptor {
        aliases: &["cpp", "c++"],
        payload: SyntaxExtension {
            name: "C++",
            keywords: C_KEYWORDS,
        },
    },
    LanguageDescriptor {
        aliases: &["sql"],
        payload: SyntaxExtension {
            name: "SQL",
            keywords: SQL_KEYWORDS,
        },
    },
    LanguageDescriptor {
        aliases: &["html"],
        payload: SyntaxExtension {
            name: "HTML",
            keywords: "",
        },
    },
    LanguageDescriptor {
        aliases: &["css"],
        payload: SyntaxExtension {
            name: "CSS",
            keywords: "",
        },
    },
    LanguageDescriptor {
        aliases: &["markdown", "md"],
        payload: SyntaxExtension {
            name: "Markdown",
            keywords: "",
        },
    },
    LanguageDescriptor {
        aliases: &["yaml", "yml"],
        payload: SyntaxExtension {
            name: "YAML",
            keywords: "true false null yes no on off",
        },
    },
];

// ── Keyword tables ────────────────────────────────────────────────────────────

const C_KEYWORDS: &str = "auto break case char const continue default do double else enum \
extern float for goto if inline int long register restrict return short signed sizeof \
static struct switch typedef union unsigned void volatile while";

const JS_KEYWORDS: &str = "break case catch class const continue debugger default delete do \
else export extends false finally for function if import in instanceof let new null of \
return static super switch this throw true try typeof undefined var void while with yield \
async await";

const TS_KEYWORDS: &str = "abstract any as async await boolean break case catch class const \
constructor continue declare default delete do else enum export extends false finally for \
from function get if implements import in infer instanceof interface is keyof let module \
namespace never new null number object of override private protected public readonly \
return set static string super switch symbol this throw true try type typeof undefined \
unique unknown var void while with yield";

const PY_KEYWORDS: &str = "False None True and as assert async await break class continue \
def del elif else except finally for from global if import in is lambda nonlocal not or \
pass raise return try while with yield";

const RUST_KEYWORDS: &str = "as async await break const continue crate dyn else enum extern \
false fn for if impl in let loop match mod move mut pub ref return self Self static struct \
super trait true type union unsafe use where while";

const SQL_KEYWORDS: &str = "ADD ALL ALTER AND AS ASC BETWEEN BY CASE CHECK COLUMN CONSTRAINT \
CREATE CROSS DATABASE DEFAULT DELETE DESC DISTINCT DROP ELSE END EXCEPT EXISTS FOREIGN \
FROM FULL GROUP HAVING IN INDEX INNER INSERT INTERSECT INTO IS JOIN KEY LEFT LIKE LIMIT \
NOT NULL ON OR ORDER OUTER PRIMARY REFERENCES RIGHT ROLLBACK SELECT SET TABLE TOP TRUNCATE \
UNION UNIQUE UPDATE VALUES VIEW WHERE WITH";

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_by_canonical_name() {
        let cat = LanguageCatalog::builtin();
        let ext = cat.resolve("rust").await.expect("rust resolves");
        assert_eq!(ext.name, "Rust");
    }

    #[tokio::test]
    async fn resolve_by_alias() {
        let cat = LanguageCatalog::builtin();
        assert_eq!(cat.resolve("rs").await.expect("rs resolves").name, "Rust");
        assert_eq!(cat.resolve("js").await.expect("js resolves").name, "JavaScript");
        assert_eq!(cat.resolve("yml").await.expect("yml resolves").name, "YAML");
    }

    #[tokio::test]
    async fn empty_alias_is_a_no_language_request() {
        let cat = LanguageCatalog::builtin();
        assert_eq!(cat.resolve("").await, None);
    }

    #[tokio::test]
    async fn unknown_alias_resolves_to_absent() {
        let cat = LanguageCatalog::builtin();
        assert_eq!(cat.resolve("no-such-lang-xyz").await, None);
    }

    /// Alias membership is case-sensitive exact matching.
    #[tokio::test]
    async fn alias_lookup_is_case_sensitive() {
        let cat = LanguageCatalog::builtin();
        assert_eq!(cat.resolve("Rust").await, None);
        assert_eq!(cat.resolve("JS").await, None);
    }

    #[tokio::test]
    async fn required_miss_is_a_configuration_error() {
        let cat = LanguageCatalog::builtin();
        let err = cat.resolve_required("no-such-lang-xyz").await.unwrap_err();
        assert!(matches!(err, EditorError::UnknownLanguage { name } if name == "no-such-lang-xyz"));
    }

    #[tokio::test]
    async fn required_hit_loads_normally() {
        let cat = LanguageCatalog::builtin();
        let ext = cat.resolve_required("python").await.expect("python resolves");
        assert_eq!(ext.name, "Python");
    }

    /// Repeated resolution re-runs the loader and yields the same payload.
    #[tokio::test]
    async fn resolution_is_functionally_idempotent() {
        let cat = LanguageCatalog::builtin();
        let a = cat.resolve("sql").await.expect("sql resolves");
        let b = cat.resolve("sql").await.expect("sql resolves");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn with_language_overrides_a_builtin_alias() {
        let loader: SyntaxLoader = Arc::new(|| {
            Box::pin(async {
                SyntaxExtension {
                    name: "Rust 2024",
                    keywords: "gen",
                }
            })
        });
        let cat = LanguageCatalog::builtin().with_language(&["rust"], loader);
        assert_eq!(cat.resolve("rust").await.expect("resolves").name, "Rust 2024");
        // The other alias of the builtin entry is untouched.
        assert_eq!(cat.resolve("rs").await.expect("resolves").name, "Rust");
    }

    #[test]
    fn keyword_membership() {
        let rust = SyntaxExtension {
            name: "Rust",
            keywords: RUST_KEYWORDS,
        };
        assert!(rust.has_keyword("fn"));
        assert!(rust.has_keyword("match"));
        assert!(!rust.has_keyword("def"));
        assert!(!rust.has_keyword(""));
    }

    #[test]
    fn languages_without_keywords_match_nothing() {
        let html = SyntaxExtension {
            name: "HTML",
            keywords: "",
        };
        assert!(!html.has_keyword("div"));
    }
}
