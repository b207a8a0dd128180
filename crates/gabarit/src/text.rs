//! Placeholder text
//!
//! A [`CompiledText`] splits `"Hello {{user.name}}!"` into the static
//! skeleton `"Hello !"` and the expression `user.name` anchored at byte 6.
//! Rendering splices the string form of each expression back in.

use crate::config::default_placeholder;
use crate::error::Result;
use crate::eval::Context;
use regex::Regex;
use std::fmt;

/// A literal string with its placeholders extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledText {
    skeleton: String,
    /// `(offset into skeleton, path expression)`, offsets non-decreasing
    expressions: Vec<(usize, String)>,
}

impl CompiledText {
    /// Compile with the default `{{ ... }}` grammar.
    pub fn compile(raw: &str) -> Self {
        Self::compile_with(raw, &default_placeholder())
    }

    /// Compile with a custom placeholder pattern whose first capture group is
    /// the expression.
    pub fn compile_with(raw: &str, pattern: &Regex) -> Self {
        let mut skeleton = String::with_capacity(raw.len());
        let mut expressions = Vec::new();
        let mut last = 0;

        for caps in pattern.captures_iter(raw) {
            let (Some(whole), Some(expr)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            skeleton.push_str(&raw[last..whole.start()]);
            expressions.push((skeleton.len(), expr.as_str().to_string()));
            last = whole.end();
        }
        skeleton.push_str(&raw[last..]);

        Self {
            skeleton,
            expressions,
        }
    }

    pub fn has_dynamic(&self) -> bool {
        !self.expressions.is_empty()
    }

    pub fn skeleton(&self) -> &str {
        &self.skeleton
    }

    pub fn expressions(&self) -> &[(usize, String)] {
        &self.expressions
    }

    /// Interleave the skeleton with the string form of each expression.
    pub fn render(&self, ctx: &Context) -> Result<String> {
        if !self.has_dynamic() {
            return Ok(self.skeleton.clone());
        }
        let mut out = String::with_capacity(self.skeleton.len() + 8 * self.expressions.len());
        let mut last = 0;
        for (offset, expr) in &self.expressions {
            out.push_str(&self.skeleton[last..*offset]);
            out.push_str(&ctx.as_string(expr)?);
            last = *offset;
        }
        out.push_str(&self.skeleton[last..]);
        Ok(out)
    }
}

impl fmt::Display for CompiledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut last = 0;
        for (offset, expr) in &self.expressions {
            write!(f, "{}{{{{{}}}}}", &self.skeleton[last..*offset], expr)?;
            last = *offset;
        }
        f.write_str(&self.skeleton[last..])
    }
}
