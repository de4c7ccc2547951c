//! Language configuration.
//!
//! A [`Language`] is a small, data-driven descriptor that hosts attach to an editor state as an
//! extension. Integrations read the name to derive protocol-level identifiers (for example an
//! LSP `languageId`).

/// A named language configured on an editor state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language {
    name: String,
}

impl Language {
    /// Create a language descriptor with the given name (e.g. `"json"`).
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The declared language name. May be empty for anonymous languages.
    pub fn name(&self) -> &str {
        &self.name
    }
}
