//! An embeddable, reactive code-editing widget.
//!
//! `inlay` wraps an extensible text-editing engine and exposes a small
//! declarative surface — current text, language mode, theme, read-only flag,
//! key-binding policy — to a host application, keeping the engine's internal
//! buffer and the host's external text value mutually consistent without
//! feedback loops or redundant notifications.
//!
//! The widget comes in two variants, selected by [`EditorKind`]: a source
//! editor with an optional language grammar, and a JSON editor validated
//! against a schema resolved from an inline value or a remote URL.
//!
//! # Example
//!
//! ```no_run
//! use inlay::{EditorConfig, EditorWidget, KeyEvent};
//!
//! # async fn run() -> inlay::Result<()> {
//! let config = EditorConfig {
//!     theme: "dracula".to_owned(),
//!     code: "fn main() {}".to_owned(),
//!     ..EditorConfig::source("rust")
//! };
//! let editor = EditorWidget::new(config);
//! editor.on_change(|ev| println!("text is now {:?}", ev.code));
//! editor.mount().await?;
//!
//! editor.key(KeyEvent::enter()); // user edits raise change events
//! editor.set_text("fn main() {}\n"); // host pushes never do
//! # Ok(())
//! # }
//! ```

// ── Safety policy ─────────────────────────────────────────────────────────────
// This crate contains no FFI and hosts no native controls; unsafe code is
// forbidden everywhere.
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod languages;
pub mod schema;
mod sync;
pub mod theme;
pub mod widget;

pub use config::{EditorConfig, EditorKind};
pub use engine::{Key, KeyEvent, KeyOutcome, TextEngine, INDENT_UNIT};
pub use error::{EditorError, Result};
pub use extensions::{assemble, CapabilityBundle, Extension};
pub use languages::{LanguageCatalog, SyntaxExtension};
pub use schema::{HttpFetcher, SchemaFetcher};
pub use theme::{Palette, ThemeCatalog, ThemeExtension};
pub use widget::{ChangeEvent, EditorWidget, Phase};
