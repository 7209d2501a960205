//! Documentation comment parsing, entity assembly and cross-reference linking.
//!
//! The pipeline for one run:
//!
//! - [`comment::parse_comment`] turns raw comment text into a typed tree of
//!   classified sections,
//! - [`entity::assemble`] merges those trees with the source hierarchy,
//! - [`linker::Linker`] registers every document and resolves links.
//!
//! [`run::run`] drives all three over a set of documents.

pub mod comment;
pub mod config;
pub mod diagnostics;
pub mod entity;
pub mod linker;
pub mod run;
pub mod snapshot;
pub mod source;

pub use comment::{Comment, CommentNode, Link, LinkDestination, ParseError, SectionKind, parse_comment};
pub use config::CommentConfig;
pub use diagnostics::{Diagnostic, Severity};
pub use entity::{DocEntity, DocTree, DocumentId, EntityId, ResolvedLink, assemble};
pub use linker::{LinkError, Linker, Registration, RegistryCollision};
pub use run::{DocumentInput, LinkReport, RunOutput, assemble_all, link_all, run};
pub use source::{EntityKind, RawComment, SourceEntity, SourcePosition};
