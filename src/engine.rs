// ── Text engine ───────────────────────────────────────────────────────────────
//
// The editing engine behind the widget: a buffer, a caret, a transaction
// dispatch, and the extension fold that turns a `CapabilityBundle` into a
// concrete configuration.  The widget interacts with the engine only through
// the methods here; parsing, undo history and rich selection are out of
// scope.
//
// Precedence contract: extensions are folded in bundle order and a later
// extension overrides an earlier one, except that `Highest` precedence
// keymaps are consulted before every `Default` one.

use serde_json::Value;

use crate::{
    extensions::{CapabilityBundle, ChangeSink, Extension, Precedence},
    languages::SyntaxExtension,
    theme::ThemeExtension,
};

// ── Indentation ───────────────────────────────────────────────────────────────

/// One indentation level, as inserted by Tab and removed by Shift+Tab.
pub const INDENT_UNIT: &str = "  ";

// ── Key events ────────────────────────────────────────────────────────────────

/// A physical key, after the host's keyboard layer has decoded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
}

/// One key event forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
    /// The platform modifier (Ctrl / Cmd).
    pub modifier: bool,
}

impl KeyEvent {
    /// A plain printable character.
    pub fn char(c: char) -> Self {
        Self { key: Key::Char(c), shift: false, modifier: false }
    }

    pub fn enter() -> Self {
        Self { key: Key::Enter, shift: false, modifier: false }
    }

    /// Mod+Enter (Ctrl+Enter / Cmd+Enter).
    pub fn mod_enter() -> Self {
        Self { key: Key::Enter, shift: false, modifier: true }
    }

    pub fn tab() -> Self {
        Self { key: Key::Tab, shift: false, modifier: false }
    }

    pub fn shift_tab() -> Self {
        Self { key: Key::Tab, shift: true, modifier: false }
    }

    pub fn backspace() -> Self {
        Self { key: Key::Backspace, shift: false, modifier: false }
    }
}

/// What the engine did with a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The engine consumed the event; the host must not apply its default
    /// behavior (focus traversal, submit, …).
    Consumed,
    /// The engine declined the event; the host's default behavior applies.
    Passthrough,
}

// ── Key bindings ──────────────────────────────────────────────────────────────

/// Editing command a key binding can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Insert one [`INDENT_UNIT`] at the caret.
    InsertIndent,
    /// Remove one indentation level from the caret's line.
    IndentLess,
    /// Consume the event without editing.
    Swallow,
}

/// One key binding inside a keymap extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub key: Key,
    pub shift: bool,
    pub modifier: bool,
    pub command: Command,
}

impl KeyBinding {
    fn matches(&self, ev: KeyEvent) -> bool {
        self.key == ev.key && self.shift == ev.shift && self.modifier == ev.modifier
    }
}

// ── Transactions ──────────────────────────────────────────────────────────────

/// An atomic buffer and/or caret mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Replace the entire buffer span with the given text.
    ReplaceAll(String),
    /// Insert text at the caret.
    InsertAtCaret(String),
    /// Delete the character before the caret.
    DeleteBack,
    /// Move the caret; a state-only update, never a content change.
    MoveCaret(usize),
}

/// The result of applying one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Update {
    /// `true` when buffer content actually changed, as opposed to a
    /// caret-only update or a no-op replace.
    pub doc_changed: bool,
}

const NO_CHANGE: Update = Update { doc_changed: false };

// ── TextEngine ────────────────────────────────────────────────────────────────

/// The engine instance: exclusively owned by one widget for its Ready
/// lifetime and dropped deterministically on dispose.
pub struct TextEngine {
    content: String,
    caret: usize,
    read_only: bool,
    line_wrap: bool,
    syntax: Option<SyntaxExtension>,
    theme: Option<ThemeExtension>,
    schema: Option<Value>,
    /// Keymaps in bundle order; precedence class kept per map.
    keymaps: Vec<(Precedence, Vec<KeyBinding>)>,
    change_hooks: Vec<ChangeSink>,
}

impl TextEngine {
    /// Instantiate the engine with an initial document and fold the bundle
    /// into its configuration.
    pub fn new(doc: &str, bundle: CapabilityBundle) -> Self {
        let mut engine = Self {
            content: doc.to_owned(),
            caret: doc.len(),
            read_only: false,
            line_wrap: false,
            syntax: None,
            theme: None,
            schema: None,
            keymaps: Vec::new(),
            change_hooks: Vec::new(),
        };
        for ext in bundle {
            engine.fold(ext);
        }
        engine
    }

    fn fold(&mut self, ext: Extension) {
        match ext {
            // Base behavior is the engine's construction defaults.
            Extension::Base => {}
            Extension::SchemaGuide(schema) => self.schema = Some(schema),
            Extension::Syntax(syntax) => self.syntax = Some(syntax),
            Extension::ReadOnly => self.read_only = true,
            Extension::Keymap { precedence, bindings } => {
                self.keymaps.push((precedence, bindings));
            }
            Extension::Theme(theme) => self.theme = Some(theme),
            Extension::ChangeHook(sink) => self.change_hooks.push(sink),
            Extension::LineWrap => self.line_wrap = true,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    /// The full buffer content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Byte offset of the caret.
    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_line_wrap(&self) -> bool {
        self.line_wrap
    }

    pub fn syntax(&self) -> Option<&SyntaxExtension> {
        self.syntax.as_ref()
    }

    pub fn theme(&self) -> Option<&ThemeExtension> {
        self.theme.as_ref()
    }

    /// The validation schema of the schema-aware variant.
    pub fn schema(&self) -> Option<&Value> {
        self.schema.as_ref()
    }

    /// The change-notification sinks installed by the bundle.
    pub(crate) fn change_hooks(&self) -> &[ChangeSink] {
        &self.change_hooks
    }

    // ── Transaction dispatch ──────────────────────────────────────────────────

    /// Apply one transaction and report whether buffer content changed.
    ///
    /// Dispatch is the programmatic path and is not gated by the read-only
    /// guard; the guard applies to key-originated edits only (the host owns
    /// the document).
    pub fn dispatch(&mut self, tx: Transaction) -> Update {
        match tx {
            Transaction::ReplaceAll(new) => {
                if self.content == new {
                    return NO_CHANGE;
                }
                self.content = new;
                // A full-span replace maps the caret to the end of the new
                // content.
                self.caret = self.content.len();
                Update { doc_changed: true }
            }
            Transaction::InsertAtCaret(text) => {
                if text.is_empty() {
                    return NO_CHANGE;
                }
                self.content.insert_str(self.caret, &text);
                self.caret += text.len();
                Update { doc_changed: true }
            }
            Transaction::DeleteBack => {
                let Some(prev) = prev_boundary(&self.content, self.caret) else {
                    return NO_CHANGE;
                };
                self.content.replace_range(prev..self.caret, "");
                self.caret = prev;
                Update { doc_changed: true }
            }
            Transaction::MoveCaret(pos) => {
                self.caret = clamp_to_boundary(&self.content, pos);
                NO_CHANGE
            }
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Route one key event through the installed keymaps, falling back to
    /// native editing behavior.
    pub fn handle_key(&mut self, ev: KeyEvent) -> (KeyOutcome, Update) {
        if let Some(command) = self.lookup(ev) {
            return self.run(command);
        }

        // Native behavior for unbound keys.
        match ev.key {
            Key::Char(c) if !ev.modifier => {
                if self.read_only {
                    return (KeyOutcome::Consumed, NO_CHANGE);
                }
                let update = self.dispatch(Transaction::InsertAtCaret(c.to_string()));
                (KeyOutcome::Consumed, update)
            }
            Key::Enter if !ev.modifier => {
                if self.read_only {
                    return (KeyOutcome::Consumed, NO_CHANGE);
                }
                let update = self.dispatch(Transaction::InsertAtCaret("\n".to_owned()));
                (KeyOutcome::Consumed, update)
            }
            Key::Backspace if !ev.modifier => {
                if self.read_only {
                    return (KeyOutcome::Consumed, NO_CHANGE);
                }
                let update = self.dispatch(Transaction::DeleteBack);
                (KeyOutcome::Consumed, update)
            }
            // Unbound Tab is focus traversal; unbound Mod-chords (including
            // Mod+Enter once suppression is opted out) belong to the host.
            Key::Tab | Key::Enter | Key::Char(_) | Key::Backspace => {
                (KeyOutcome::Passthrough, NO_CHANGE)
            }
        }
    }

    /// Find the binding for `ev`: `Highest` precedence keymaps first, and
    /// within a precedence class the later-registered keymap wins.
    fn lookup(&self, ev: KeyEvent) -> Option<Command> {
        for wanted in [Precedence::Highest, Precedence::Default] {
            for (precedence, bindings) in self.keymaps.iter().rev() {
                if *precedence != wanted {
                    continue;
                }
                if let Some(b) = bindings.iter().find(|b| b.matches(ev)) {
                    return Some(b.command);
                }
            }
        }
        None
    }

    fn run(&mut self, command: Command) -> (KeyOutcome, Update) {
        match command {
            Command::Swallow => (KeyOutcome::Consumed, NO_CHANGE),
            Command::InsertIndent => {
                if self.read_only {
                    // The command declines; the host's default (focus
                    // traversal) applies.
                    return (KeyOutcome::Passthrough, NO_CHANGE);
                }
                let update = self.dispatch(Transaction::InsertAtCaret(INDENT_UNIT.to_owned()));
                (KeyOutcome::Consumed, update)
            }
            Command::IndentLess => {
                if self.read_only {
                    return (KeyOutcome::Passthrough, NO_CHANGE);
                }
                let update = self.dedent();
                (KeyOutcome::Consumed, update)
            }
        }
    }

    /// Remove one indentation level — a full [`INDENT_UNIT`], a lone tab, or
    /// a single space — from the start of the caret's line.
    fn dedent(&mut self) -> Update {
        let line_start = self.content[..self.caret]
            .rfind('\n')
            .map_or(0, |i| i + 1);
        let rest = &self.content[line_start..];
        let removed = if rest.starts_with(INDENT_UNIT) {
            INDENT_UNIT.len()
        } else if rest.starts_with('\t') || rest.starts_with(' ') {
            1
        } else {
            return NO_CHANGE;
        };
        self.content
            .replace_range(line_start..line_start + removed, "");
        if self.caret >= line_start + removed {
            self.caret -= removed;
        } else {
            self.caret = line_start;
        }
        Update { doc_changed: true }
    }
}

// ── Boundary helpers ──────────────────────────────────────────────────────────

/// Clamp `pos` into `s`, snapping down to a char boundary.
fn clamp_to_boundary(s: &str, pos: usize) -> usize {
    let mut pos = pos.min(s.len());
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// The char boundary immediately before `pos`, or `None` at the start.
fn prev_boundary(s: &str, pos: usize) -> Option<usize> {
    if pos == 0 {
        return None;
    }
    let mut prev = pos - 1;
    while !s.is_char_boundary(prev) {
        prev -= 1;
    }
    Some(prev)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
