//! Localized template string resolution.
//!
//! The game stores display strings as templates containing `{page,text}`
//! fields that address entries in the per-language `t/*.xml` documents.
//! Looked-up entries may themselves contain further fields, so substitution
//! repeats until a full pass changes nothing. Afterwards parenthetical
//! translator comments are removed and backslash escapes are dropped.
//!
//! A text entry that (transitively) references itself never reaches the
//! fixed point; shipped game data does not contain such cycles and no guard
//! is in place for them.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};

use crate::error::{Error, Result};
use crate::vfs::GameFs;
use crate::xml::XmlDocument;

/// `{page,text}` with optional whitespace around the numbers.
fn field_regex() -> &'static Regex {
    static FIELD: OnceLock<Regex> = OnceLock::new();
    FIELD.get_or_init(|| Regex::new(r"\{\s*(\d+)\s*,\s*(\d+)\s*\}").expect("field pattern"))
}

/// page id -> text id -> raw text
type PageTable = HashMap<u64, HashMap<u64, String>>;

/// Result of resolving one template string.
///
/// Fields with no matching entry stay in the output verbatim and are listed
/// in `unresolved`, so a batch run keeps going while callers and tests can
/// still see exactly what failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedText {
    /// The resolved string.
    pub text: String,
    /// Literal field texts that had no matching entry.
    pub unresolved: Vec<String>,
}

impl ResolvedText {
    /// Whether every field was substituted.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// The text without leading/trailing whitespace.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Resolves `{page,text}` template strings against loaded language documents.
#[derive(Default)]
pub struct LanguageResolver {
    languages: IndexMap<String, PageTable>,
    default_language: Option<String>,
}

impl LanguageResolver {
    /// Create a resolver with no languages loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a language from a parsed `t/*.xml` document.
    ///
    /// The first language loaded becomes the default unless
    /// [`Self::set_default_language`] was called before.
    pub fn load_language(&mut self, name: &str, doc: &XmlDocument) {
        let mut pages: PageTable = HashMap::new();

        for page in doc.root.children_named("page") {
            let Some(page_id) = page.attr("id").and_then(|id| id.parse::<u64>().ok()) else {
                tracing::warn!(language = name, "skipping page without a numeric id");
                continue;
            };

            let entries = pages.entry(page_id).or_default();
            for text in page.children_named("t") {
                if let Some(text_id) = text.attr("id").and_then(|id| id.parse::<u64>().ok()) {
                    entries.insert(text_id, text.text.clone());
                }
            }
        }

        self.languages.insert(name.to_string(), pages);

        if self.default_language.is_none() {
            self.default_language = Some(name.to_string());
        }
    }

    /// Open a language document through a file system and load it.
    ///
    /// # Errors
    /// Returns an error if the document cannot be opened or parsed.
    pub fn load_language_from<F: GameFs + ?Sized>(
        &mut self,
        name: &str,
        fs: &mut F,
        path: &str,
    ) -> Result<()> {
        let doc = XmlDocument::load(fs, path)?;
        self.load_language(name, &doc);
        Ok(())
    }

    /// Set the default language used when `resolve` is called without one.
    pub fn set_default_language(&mut self, name: &str) {
        self.default_language = Some(name.to_string());
    }

    /// The current default language, if any.
    #[must_use]
    pub fn default_language(&self) -> Option<&str> {
        self.default_language.as_deref()
    }

    /// Names of the loaded languages, in load order.
    #[must_use]
    pub fn loaded_languages(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    /// Resolve a template string.
    ///
    /// `language` of `None` selects the configured default.
    ///
    /// # Errors
    /// Returns [`Error::LanguageNotLoaded`] if the requested (or default)
    /// language is not loaded. There is no fallback language.
    pub fn resolve(&self, template: &str, language: Option<&str>) -> Result<ResolvedText> {
        if template.is_empty() {
            return Ok(ResolvedText {
                text: String::new(),
                unresolved: Vec::new(),
            });
        }

        let name = language
            .or(self.default_language.as_deref())
            .ok_or_else(|| Error::LanguageNotLoaded("(default)".to_string()))?;
        let pages = self
            .languages
            .get(name)
            .ok_or_else(|| Error::LanguageNotLoaded(name.to_string()))?;

        let mut text = template.to_string();
        let mut unresolved;

        // substitute until a full pass changes nothing; substituted entries
        // may contain fields of their own
        loop {
            let mut pass_unresolved = Vec::new();

            let replaced: String = field_regex()
                .replace_all(&text, |caps: &Captures| {
                    let page_id = caps[1].parse::<u64>().ok();
                    let text_id = caps[2].parse::<u64>().ok();

                    if let (Some(page_id), Some(text_id)) = (page_id, text_id) {
                        if let Some(entry) = pages.get(&page_id).and_then(|p| p.get(&text_id)) {
                            return entry.clone();
                        }
                    }

                    let field = caps[0].to_string();
                    tracing::error!(field = %field, language = name, "cannot resolve template field");
                    pass_unresolved.push(field);
                    caps[0].to_string()
                })
                .into_owned();

            let changed = replaced != text;
            text = replaced;
            unresolved = pass_unresolved;

            if !changed {
                break;
            }
        }

        // a single comment-stripping pass, applied after substitution
        let text = unescape(&strip_comments(&text));

        Ok(ResolvedText { text, unresolved })
    }
}

/// Remove `(...)` spans whose parentheses are not backslash-escaped.
/// Escaped characters (including the backslashes themselves) pass through
/// untouched; the unescape pass runs afterwards.
fn strip_comments(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\\' {
            out.push(c);
            if i + 1 < chars.len() {
                out.push(chars[i + 1]);
            }
            i += 2;
            continue;
        }

        if c == '(' {
            let mut j = i + 1;
            let mut close = None;
            while j < chars.len() {
                match chars[j] {
                    '\\' => j += 2,
                    ')' => {
                        close = Some(j);
                        break;
                    }
                    _ => j += 1,
                }
            }
            // an unterminated comment is kept as literal text
            if let Some(end) = close {
                i = end + 1;
                continue;
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

/// Drop the backslash from every `\x` pair. A trailing lone backslash stays.
fn unescape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }

    out
}
