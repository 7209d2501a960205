//! # Comment Parsing
//!
//! Turns one raw documentation comment into a typed [`Comment`] tree:
//!
//! 1. [`normalize`] strips comment decoration and streams lines into a
//!    [`BlockTreeBuilder`].
//! 2. [`builder`] produces the generic markup tree with `pulldown-cmark`.
//! 3. `classify` converts it into [`CommentNode`]s and assigns every top-level
//!    paragraph a [`SectionKind`].
//!
//! Parsing never fails. Problems are returned as [`Diagnostic`]s and the
//! offending node is left out of the result.

pub mod builder;
mod classify;
pub mod error;
pub mod node;
pub mod normalize;
pub mod section;

pub use builder::{BlockTreeBuilder, CmarkTreeBuilder, MarkupTree};
pub use error::ParseError;
pub use node::{Comment, CommentNode, Link, LinkDestination, NodeId};
pub use section::SectionKind;

use crate::config::CommentConfig;
use crate::diagnostics::Diagnostic;
use crate::source::RawComment;

use classify::Classifier;

/// Parse a raw comment belonging to `entity` (used to tag diagnostics).
pub fn parse_comment(
    raw: &RawComment,
    entity: &str,
    config: &CommentConfig,
) -> (Comment, Vec<Diagnostic>) {
    parse_with(CmarkTreeBuilder::new(), raw, entity, config)
}

/// Parse with a caller-supplied tree builder.
pub fn parse_with<B: BlockTreeBuilder>(
    mut builder: B,
    raw: &RawComment,
    entity: &str,
    config: &CommentConfig,
) -> (Comment, Vec<Diagnostic>) {
    let lines = normalize::feed_comment(&mut builder, raw.as_str(), config);
    let tree = builder.finish();
    Classifier::new(tree, &lines, entity, config).run()
}
