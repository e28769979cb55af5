// ── Theme catalog ─────────────────────────────────────────────────────────────
//
// Maps theme names to lazily-loaded style extensions.  Same registry shape as
// the language catalog: an explicit, immutable value built once from an
// enumerated table, passed in at the composition root.  Unknown names degrade
// gracefully to the default appearance — theme resolution never fails.
//
// Colour conventions: all palette entries are 0xRRGGBB.

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

// ── Palette ───────────────────────────────────────────────────────────────────

/// Token colours of one theme, in 0xRRGGBB form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: u32,
    pub fg: u32,
    pub line_num_bg: u32,
    pub line_num_fg: u32,
    pub comment: u32,
    pub keyword: u32,
    pub string: u32,
    pub number: u32,
}

/// Notepad++-style light palette.
const LIGHT: Palette = Palette {
    bg: 0xFFFFFF,
    fg: 0x000000,
    line_num_bg: 0xE4E4E4,
    line_num_fg: 0x808080,
    comment: 0x008000,
    keyword: 0x0000FF,
    string: 0x800000,
    number: 0xFF8000,
};

/// VS Code Dark+-inspired dark palette.
const DARK: Palette = Palette {
    bg: 0x1E1E1E,
    fg: 0xD4D4D4,
    line_num_bg: 0x252526,
    line_num_fg: 0x858585,
    comment: 0x6A9955,
    keyword: 0x569CD6,
    string: 0xCE9178,
    number: 0xB5CEA8,
};

const DRACULA: Palette = Palette {
    bg: 0x282A36,
    fg: 0xF8F8F2,
    line_num_bg: 0x282A36,
    line_num_fg: 0x6272A4,
    comment: 0x6272A4,
    keyword: 0xFF79C6,
    string: 0xF1FA8C,
    number: 0xBD93F9,
};

const SOLARIZED_LIGHT: Palette = Palette {
    bg: 0xFDF6E3,
    fg: 0x657B83,
    line_num_bg: 0xEEE8D5,
    line_num_fg: 0x93A1A1,
    comment: 0x93A1A1,
    keyword: 0x859900,
    string: 0x2AA198,
    number: 0xD33682,
};

// ── ThemeExtension ────────────────────────────────────────────────────────────

/// A loaded style extension: the payload a successful resolution hands to
/// the extension assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeExtension {
    /// Catalog name, e.g. `"dracula"`.
    pub name: &'static str,
    /// `true` for dark-background themes.
    pub dark: bool,
    pub palette: Palette,
}

// ── Loader registry ───────────────────────────────────────────────────────────

/// Zero-argument async loader producing a theme extension.
pub type ThemeLoader =
    Arc<dyn Fn() -> Pin<Box<dyn Future<Output = ThemeExtension> + Send>> + Send + Sync>;

/// The theme catalog: name → loader.
#[derive(Clone)]
pub struct ThemeCatalog {
    entries: HashMap<String, ThemeLoader>,
}

impl ThemeCatalog {
    /// An empty catalog.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The builtin catalog.
    pub fn builtin() -> Self {
        Self::empty()
            .with_builtin("light", ThemeExtension { name: "light", dark: false, palette: LIGHT })
            .with_builtin("dark", ThemeExtension { name: "dark", dark: true, palette: DARK })
            .with_builtin(
                "dracula",
                ThemeExtension { name: "dracula", dark: true, palette: DRACULA },
            )
            .with_builtin(
                "solarized-light",
                ThemeExtension { name: "solarized-light", dark: false, palette: SOLARIZED_LIGHT },
            )
    }

    fn with_builtin(self, name: &str, payload: ThemeExtension) -> Self {
        self.with_theme(name, Arc::new(move || Box::pin(async move { payload })))
    }

    /// Register `loader` under `name`, replacing any existing binding.
    pub fn with_theme(mut self, name: &str, loader: ThemeLoader) -> Self {
        self.entries.insert(name.to_owned(), loader);
        self
    }

    /// Resolve a theme name to a loaded style extension.
    ///
    /// An empty name is a valid "no theme" request and resolves to `None`
    /// without attempting a load.  An unknown name also resolves to `None` —
    /// the editor keeps its default appearance.
    pub async fn resolve(&self, name: &str) -> Option<ThemeExtension> {
        if name.is_empty() {
            return None;
        }
        let Some(loader) = self.entries.get(name) else {
            tracing::debug!(name, "theme not in catalog; keeping default appearance");
            return None;
        };
        let ext = loader().await;
        tracing::debug!(name, "theme resolved");
        Some(ext)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
