//! Ordered registry of module initializers
//!
//! Entries are collected during a merge and rendered into the registration
//! file in one write. The anchor literal stays in place, so merging the same
//! modules again registers them a second time.

/// Module name to initializer source, in registration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleRegistry {
    entries: Vec<(String, String)>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Names are not deduplicated.
    pub fn register(&mut self, name: impl Into<String>, snippet: impl Into<String>) {
        self.entries.push((name.into(), snippet.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Registered names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// The text block inserted after the anchor: one `name:snippet,` per line
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(name, snippet)| format!("\n{}:{},", name, snippet))
            .collect()
    }

    /// Insert the rendered block after the first `anchor` in `text`.
    /// Returns `None` when the anchor is missing.
    pub fn inject(&self, text: &str, anchor: &str) -> Option<String> {
        if self.is_empty() {
            return text.contains(anchor).then(|| text.to_string());
        }
        insert_after_anchor(text, anchor, &self.render())
    }
}

/// Splice `block` in right after the first occurrence of `anchor`
pub fn insert_after_anchor(text: &str, anchor: &str, block: &str) -> Option<String> {
    let at = text.find(anchor)? + anchor.len();
    let mut out = String::with_capacity(text.len() + block.len());
    out.push_str(&text[..at]);
    out.push_str(block);
    out.push_str(&text[at..]);
    Some(out)
}
