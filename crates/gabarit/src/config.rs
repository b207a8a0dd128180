//! Compile options

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

/// The default placeholder grammar: `{{`, the shortest run of any characters, `}}`.
pub const DEFAULT_PLACEHOLDER: &str = r"(?s)\{\{(.*?)\}\}";

/// The default prefix marking directive tags (`gb-if`, `gb-for`, ...).
pub const DEFAULT_DIRECTIVE_PREFIX: &str = "gb-";

/// Options controlling how a template is compiled.
#[derive(Debug, Clone)]
pub struct Options {
    directive_prefix: String,
    placeholder: Regex,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            directive_prefix: DEFAULT_DIRECTIVE_PREFIX.to_string(),
            placeholder: default_placeholder(),
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different directive prefix, e.g. `"t-"` for `<t-if>`.
    pub fn directive_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.directive_prefix = prefix.into();
        self
    }

    /// Use a different placeholder grammar.
    ///
    /// The pattern's first capture group is the path expression.
    pub fn placeholder(mut self, pattern: &str) -> Result<Self> {
        self.placeholder = compile_placeholder(pattern)?;
        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.directive_prefix
    }

    pub fn placeholder_regex(&self) -> &Regex {
        &self.placeholder
    }

    /// The directive name of `tag` if it carries the directive prefix.
    pub(crate) fn directive<'t>(&self, tag: &'t str) -> Option<&'t str> {
        if self.directive_prefix.is_empty() {
            return None;
        }
        tag.strip_prefix(self.directive_prefix.as_str())
    }
}

pub(crate) fn compile_placeholder(pattern: &str) -> Result<Regex> {
    let regex = Regex::new(pattern).map_err(|e| Error::InvalidPattern {
        reason: e.to_string(),
    })?;
    if regex.captures_len() < 2 {
        return Err(Error::InvalidPattern {
            reason: format!("`{pattern}` has no capture group"),
        });
    }
    Ok(regex)
}

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_PLACEHOLDER).unwrap());

pub(crate) fn default_placeholder() -> Regex {
    PLACEHOLDER_RE.clone()
}
