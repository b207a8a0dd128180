//! Error types for compiling and rendering templates
//!
//! Every error carries the structured pieces that produced it (the path, the
//! directive tag, the offending attribute) rather than just a message, so a
//! host can render it through `miette` with codes and help text.

use miette::Diagnostic;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All template errors
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum Error {
    /// A path segment did not resolve to anything.
    #[error("Path `{path}` is not defined")]
    #[diagnostic(
        code(gabarit::undefined_path),
        help("Available names: {}", available.join(", "))
    )]
    UndefinedPath {
        /// The full path as written in the template
        path: String,
        /// Names bound at the top level when the lookup failed
        available: Vec<String>,
    },

    /// A value had the wrong shape for the requested coercion.
    #[error("Expected {expected} at `{path}`, found {found}")]
    #[diagnostic(code(gabarit::type_mismatch))]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// An else-style directive with nothing to attach to.
    #[error("`{tag}` must directly follow {expected}")]
    #[diagnostic(
        code(gabarit::misplaced_directive),
        help("Only whitespace and comments may separate a directive from its companion")
    )]
    MisplacedDirective { tag: String, expected: &'static str },

    #[error("`{tag}` requires the `{attribute}` attribute")]
    #[diagnostic(code(gabarit::missing_attribute))]
    MissingAttribute { tag: String, attribute: &'static str },

    #[error("Attribute `{attribute}` on `{tag}` has invalid value `{value}`")]
    #[diagnostic(code(gabarit::invalid_attribute), help("Expected a finite number"))]
    InvalidAttribute {
        tag: String,
        attribute: &'static str,
        value: String,
    },

    #[error("Unknown directive `{tag}`")]
    #[diagnostic(
        code(gabarit::unknown_directive),
        help(
            "Known directives: if, else-if, else, for, for-else, with, switch, case, case-default, comment"
        )
    )]
    UnknownDirective { tag: String },

    /// A `switch` child that is not a case, or a case outside a `switch`.
    #[error("`{tag}` cannot appear {position}")]
    #[diagnostic(
        code(gabarit::unexpected_content),
        help("A `switch` holds `case` and `case-default` children, plus whitespace and comments")
    )]
    UnexpectedContent {
        /// The offending element's tag, or `#text`
        tag: String,
        position: &'static str,
    },

    /// The compiled child list and a cloned skeleton disagree.
    ///
    /// This signals a bug in the compiler or a host tree whose deep clone is
    /// not faithful; it never depends on the data being rendered.
    #[error("Compiled children of `{tag}` do not line up with its skeleton: {detail}")]
    #[diagnostic(code(gabarit::alignment))]
    Alignment { tag: String, detail: String },

    #[error("Invalid placeholder pattern: {reason}")]
    #[diagnostic(
        code(gabarit::invalid_pattern),
        help("The pattern must be a valid regex with one capture group for the expression")
    )]
    InvalidPattern { reason: String },
}

impl Error {
    pub(crate) fn alignment(tag: Option<&str>, detail: impl Into<String>) -> Self {
        Error::Alignment {
            tag: tag.unwrap_or("#fragment").to_string(),
            detail: detail.into(),
        }
    }
}
