//! Page templates with literal `{{key}}` substitution.

use crate::error::Result;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A page backed by a template file on disk
#[derive(Debug, Clone)]
pub struct Page {
    template: PathBuf,
}

impl Page {
    pub fn new<P: AsRef<Path>>(template: P) -> Self {
        Self {
            template: template.as_ref().to_path_buf(),
        }
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Render the template, replacing each `{{key}}` with the escaped value.
    ///
    /// The file is read on every call. Keys are applied in iteration order,
    /// each as one plain substring replacement over the text produced so far.
    pub fn render<I, K, V>(&self, data: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let mut content = fs::read_to_string(&self.template)?;
        let mut keys = 0usize;

        for (key, value) in data {
            let placeholder = format!("{{{{{}}}}}", key.as_ref());
            content = content.replace(&placeholder, &escape_html(&value.to_string()));
            keys += 1;
        }

        debug!(template = %self.template.display(), keys, "rendered page");
        Ok(content)
    }
}

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
