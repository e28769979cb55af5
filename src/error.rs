// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in inlay return `error::Result<T>`.  Errors can
// only occur while a widget is being constructed (capability resolution and
// the remote-schema fetch); steady-state synchronization never surfaces an
// error to the host.

/// Every error that inlay can produce.
#[derive(Debug)]
pub enum EditorError {
    /// A language the host asserted as mandatory is not in the catalog.
    UnknownLanguage {
        /// The alias the host asked for.
        name: String,
    },

    /// The remote schema could not be fetched (transport-level failure or a
    /// non-success HTTP status).
    SchemaFetch {
        /// The URL that was requested.
        url: String,
        /// Human-readable description from the HTTP layer.
        message: String,
    },

    /// The remote schema response body was not valid JSON.
    SchemaParse {
        /// The URL whose response failed to parse.
        url: String,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLanguage { name } => {
                write!(f, "required language {name:?} is not in the catalog")
            }
            Self::SchemaFetch { url, message } => {
                write!(f, "failed to fetch schema from {url}: {message}")
            }
            Self::SchemaParse { url, source } => {
                write!(f, "schema fetched from {url} is not valid JSON: {source}")
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SchemaParse { source, .. } => Some(source),
            Self::UnknownLanguage { .. } | Self::SchemaFetch { .. } => None,
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EditorError>;

// ── Tests ─────────────────────────────────────────────────────────────────────
