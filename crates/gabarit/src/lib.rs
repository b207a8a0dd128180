//! gabarit - compile markup once, render it against data many times
//!
//! A template is an ordinary markup tree. Text and attribute values may hold
//! `{{path}}` placeholders, and a handful of directive elements control what
//! gets rendered:
//!
//! ```text
//! {{user.name}}                                   - Path interpolation
//! <gb-if test="n" gt="5">...</gb-if>              - Conditionals (eq, gt, ge, lt, le, is-null, not)
//! <gb-else-if test="..">...</gb-else-if>          - Further branches
//! <gb-else>...</gb-else>                          - Fallback branch
//! <gb-for in="items" as="item">...</gb-for>       - Loops (key, index, index-start, index-step, to-top)
//! <gb-for-else>...</gb-for-else>                  - Rendered when a loop has nothing to iterate
//! <gb-with name="some.path">...</gb-with>         - Local bindings
//! <gb-switch value="kind">                       - First matching case wins
//!   <gb-case value="a">...</gb-case>
//!   <gb-case-default>...</gb-case-default>
//! </gb-switch>
//! <gb-comment>...</gb-comment>                    - Dropped at compile time
//! ```
//!
//! Compilation separates static regions from dynamic ones. Rendering clones
//! the static skeleton and patches only the dynamic positions.
//!
//! # Example
//!
//! ```
//! use gabarit::{Context, Template, Value};
//! use gabarit::facet_value::{VArray, VObject};
//!
//! let template = Template::parse(
//!     r#"<ul class="list"><gb-for in="items" as="item"><li>{{item}}</li></gb-for></ul>"#,
//! )?;
//!
//! let items: VArray = ["a", "b"].into_iter().collect();
//! let root: VObject = [("items", Value::from(items))].into_iter().collect();
//!
//! let html = template.render_to_html(&Context::new(root))?;
//! assert_eq!(html, r#"<ul class="list"><li>a</li><li>b</li></ul>"#);
//! # Ok::<(), gabarit::Error>(())
//! ```
//!
//! Hosts with their own tree type implement [`DomNode`] and use
//! [`Template::compile`] and [`Template::render`] directly.

pub mod compile;
pub mod config;
pub mod dom;
mod error;
mod eval;
pub mod markup;
mod render;
mod text;

pub use compile::{Compiled, Template};
pub use config::Options;
pub use dom::{DomNode, Node};
pub use error::{Error, Result};
pub use eval::{Context, Entries, Value, ValueExt, Values};
pub use render::Nodes;
pub use text::CompiledText;

// Re-export facet_value for building data
pub use facet_value;
