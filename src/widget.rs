// ── Widget lifecycle & public API ─────────────────────────────────────────────
//
// `EditorWidget` orchestrates the resolvers, the assembler, the engine and
// the sync bridge across its lifecycle:
//
//     Uninitialized → Resolving → Ready → Disposed
//
// The handle is cheaply cloneable; all state lives behind one lock.  The
// lock is never held across an await, and change callbacks are invoked only
// after it is released, so a callback may re-enter `set_text` (the bridge's
// suppression check terminates the cycle).  Everything after `dispose` —
// including capability loads that finish late — is a silent no-op.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
    config::{EditorConfig, EditorKind},
    engine::{KeyEvent, KeyOutcome, TextEngine},
    error::Result,
    extensions::{assemble, ChangeSink},
    languages::{LanguageCatalog, SyntaxExtension},
    schema::{resolve_schema, HttpFetcher, SchemaFetcher},
    sync::SyncBridge,
    theme::{ThemeCatalog, ThemeExtension},
};

// ── Change notification ───────────────────────────────────────────────────────

/// Event delivered to `on_change` subscribers: raised exactly once per
/// internal edit that changed buffer content, never for `set_text` pushes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The new document text.
    pub code: String,
}

type ChangeCallback = Box<dyn FnMut(&ChangeEvent) + Send>;

// ── Lifecycle state ───────────────────────────────────────────────────────────

/// Externally observable lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Resolving,
    Ready,
    Disposed,
}

enum State {
    Uninitialized,
    Resolving,
    Ready(SyncBridge),
    Disposed,
}

struct Inner {
    state: State,
    config: EditorConfig,
    /// Document text before the engine exists: seeded from `config.code`,
    /// overwritten by `set_text` calls that arrive during construction, and
    /// used as the initial buffer content.  After dispose it holds the last
    /// observed text so `text()` stays meaningful.
    pending_text: String,
}

// ── EditorWidget ──────────────────────────────────────────────────────────────

/// An embeddable, reactive code-editing widget.
///
/// Construct with [`EditorWidget::new`], optionally inject catalogs and a
/// fetcher at the composition root, then call [`mount`](Self::mount) once.
/// Steady-state synchronization happens through [`set_text`](Self::set_text),
/// [`on_change`](Self::on_change) and [`key`](Self::key).
#[derive(Clone)]
pub struct EditorWidget {
    inner: Arc<Mutex<Inner>>,
    subscribers: Arc<Mutex<Vec<ChangeCallback>>>,
    languages: Arc<LanguageCatalog>,
    themes: Arc<ThemeCatalog>,
    fetcher: Arc<dyn SchemaFetcher>,
}

impl EditorWidget {
    /// Create an unmounted widget with the builtin catalogs and the HTTP
    /// schema fetcher.
    pub fn new(config: EditorConfig) -> Self {
        let pending_text = config.code.clone();
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: State::Uninitialized,
                config,
                pending_text,
            })),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            languages: Arc::new(LanguageCatalog::builtin()),
            themes: Arc::new(ThemeCatalog::builtin()),
            fetcher: Arc::new(HttpFetcher::new()),
        }
    }

    /// Replace both capability catalogs.
    pub fn with_catalogs(mut self, languages: LanguageCatalog, themes: ThemeCatalog) -> Self {
        self.languages = Arc::new(languages);
        self.themes = Arc::new(themes);
        self
    }

    /// Replace the schema fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn SchemaFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    // ── Mount ─────────────────────────────────────────────────────────────────

    /// First-render hook: resolve capabilities, assemble the bundle, and
    /// instantiate the engine.
    ///
    /// Runs the construction sequence at most once; calling again (or after
    /// dispose) is a no-op.  A required-language or schema failure rejects
    /// the mount, creates no engine, and leaves the widget disposed.
    pub async fn mount(&self) -> Result<()> {
        let config = {
            let mut g = self.inner.lock();
            if !matches!(g.state, State::Uninitialized) {
                return Ok(());
            }
            g.state = State::Resolving;
            tracing::debug!(kind = ?g.config.kind, "resolving capabilities");
            g.config.clone()
        };

        let theme_fut = self.themes.resolve(&config.theme);
        let resolved: Result<(Option<SyntaxExtension>, Option<serde_json::Value>, Option<ThemeExtension>)> =
            match config.kind {
                EditorKind::Source => {
                    let language_fut = async {
                        if config.require_language {
                            self.languages.resolve_required(&config.language).await.map(Some)
                        } else {
                            Ok(self.languages.resolve(&config.language).await)
                        }
                    };
                    let (language, theme) = tokio::join!(language_fut, theme_fut);
                    language.map(|l| (l, None, theme))
                }
                EditorKind::Json => {
                    let schema_fut = resolve_schema(
                        config.schema.clone(),
                        &config.schema_url,
                        self.fetcher.as_ref(),
                    );
                    let (schema, theme) = tokio::join!(schema_fut, theme_fut);
                    schema.map(|s| (None, Some(s), theme))
                }
            };

        let (language, schema, theme) = match resolved {
            Ok(parts) => parts,
            Err(e) => {
                let mut g = self.inner.lock();
                if matches!(g.state, State::Disposed) {
                    tracing::debug!("resolution failed after dispose; discarding");
                    return Ok(());
                }
                tracing::debug!(error = %e, "capability resolution failed");
                g.state = State::Disposed;
                return Err(e);
            }
        };

        let mut g = self.inner.lock();
        if matches!(g.state, State::Disposed) {
            tracing::debug!("resolution completed after dispose; discarding");
            return Ok(());
        }
        let bundle = assemble(&g.config, language, theme, schema, self.change_sink());
        let engine = TextEngine::new(&g.pending_text, bundle);
        g.state = State::Ready(SyncBridge::new(engine));
        tracing::debug!("editor ready");
        Ok(())
    }

    /// The sink installed into the bundle's change hook: fans one content
    /// change out to every subscriber.
    fn change_sink(&self) -> ChangeSink {
        let subscribers = Arc::clone(&self.subscribers);
        Arc::new(move |code: &str| {
            let event = ChangeEvent { code: code.to_owned() };
            for callback in subscribers.lock().iter_mut() {
                callback(&event);
            }
        })
    }

    // ── Steady-state sync ─────────────────────────────────────────────────────

    /// Assign the document text from the host side.
    ///
    /// Before the engine exists the value is captured as the initial buffer
    /// content; after dispose it is ignored.
    pub fn set_text(&self, value: &str) {
        let mut g = self.inner.lock();
        let inner = &mut *g;
        match &mut inner.state {
            State::Ready(bridge) => {
                bridge.set_text(value);
            }
            State::Uninitialized | State::Resolving => {
                inner.pending_text = value.to_owned();
            }
            State::Disposed => {}
        }
    }

    /// The externally observable document text.
    pub fn text(&self) -> String {
        let g = self.inner.lock();
        match &g.state {
            State::Ready(bridge) => bridge.text().to_owned(),
            _ => g.pending_text.clone(),
        }
    }

    /// Subscribe to change events.
    pub fn on_change(&self, callback: impl FnMut(&ChangeEvent) + Send + 'static) {
        self.subscribers.lock().push(Box::new(callback));
    }

    /// Forward one key event from the host.
    ///
    /// Returns `Passthrough` (host default behavior applies) until the
    /// widget is Ready and after it is disposed.
    pub fn key(&self, ev: KeyEvent) -> KeyOutcome {
        let (outcome, emission) = {
            let mut g = self.inner.lock();
            match &mut g.state {
                State::Ready(bridge) => bridge.key(ev),
                _ => (KeyOutcome::Passthrough, None),
            }
        };
        // Callbacks run outside the state lock; see the module header.
        if let Some(emission) = emission {
            for sink in &emission.sinks {
                sink(&emission.code);
            }
        }
        outcome
    }

    // ── Disposal ──────────────────────────────────────────────────────────────

    /// Tear the engine down.  Idempotent; everything afterwards is a no-op.
    pub fn dispose(&self) {
        let mut g = self.inner.lock();
        let inner = &mut *g;
        if matches!(inner.state, State::Disposed) {
            return;
        }
        if let State::Ready(bridge) = &inner.state {
            inner.pending_text = bridge.text().to_owned();
        }
        // The engine is dropped here, deterministically.
        inner.state = State::Disposed;
        tracing::debug!("widget disposed");
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    /// The widget's lifecycle phase.
    pub fn phase(&self) -> Phase {
        match self.inner.lock().state {
            State::Uninitialized => Phase::Uninitialized,
            State::Resolving => Phase::Resolving,
            State::Ready(_) => Phase::Ready,
            State::Disposed => Phase::Disposed,
        }
    }

    /// The syntax extension the mount resolved, if any.
    pub fn resolved_language(&self) -> Option<SyntaxExtension> {
        match &self.inner.lock().state {
            State::Ready(bridge) => bridge.engine().syntax().copied(),
            _ => None,
        }
    }

    /// The theme the mount resolved, if any.
    pub fn resolved_theme(&self) -> Option<ThemeExtension> {
        match &self.inner.lock().state {
            State::Ready(bridge) => bridge.engine().theme().copied(),
            _ => None,
        }
    }

    /// The validation schema of a mounted `Json`-variant widget.
    pub fn resolved_schema(&self) -> Option<serde_json::Value> {
        match &self.inner.lock().state {
            State::Ready(bridge) => bridge.engine().schema().cloned(),
            _ => None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        match &self.inner.lock().state {
            State::Ready(bridge) => bridge.engine().is_read_only(),
            _ => false,
        }
    }

    pub fn is_line_wrap(&self) -> bool {
        match &self.inner.lock().state {
            State::Ready(bridge) => bridge.engine().is_line_wrap(),
            _ => false,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
