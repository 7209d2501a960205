//! Whole-run pipeline: assemble every document, register all of them, then
//! resolve links.
//!
//! Registration finishes for every document before the first link is
//! resolved, so cross-document links never depend on processing order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::CommentConfig;
use crate::diagnostics::Diagnostic;
use crate::entity::{DocTree, DocumentId, assemble};
use crate::linker::{Linker, RegistryCollision};
use crate::source::SourceEntity;

/// One output document: its id and source root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentInput {
    pub id: String,
    pub root: SourceEntity,
}

impl DocumentInput {
    pub fn new(id: impl Into<String>, root: SourceEntity) -> Self {
        Self {
            id: id.into(),
            root,
        }
    }
}

/// Outcome of linking a set of documents.
#[derive(Debug, Default)]
pub struct LinkReport {
    pub diagnostics: Vec<Diagnostic>,
    pub collisions: Vec<RegistryCollision>,
}

/// Result of a complete run.
#[derive(Debug)]
pub struct RunOutput {
    pub documents: Vec<DocTree>,
    pub linker: Linker,
    pub diagnostics: Vec<Diagnostic>,
    pub collisions: Vec<RegistryCollision>,
}

/// Assemble documents in parallel, keeping input order.
pub fn assemble_all(
    inputs: &[DocumentInput],
    config: &CommentConfig,
) -> Vec<(DocTree, Vec<Diagnostic>)> {
    inputs
        .par_iter()
        .map(|input| assemble(DocumentId::new(input.id.as_str()), &input.root, config))
        .collect()
}

/// Register every document, then resolve the ones that registered cleanly.
pub fn link_all(trees: &mut [DocTree]) -> (Linker, LinkReport) {
    let mut linker = Linker::new();
    let collisions = linker.register_all(trees);
    let mut diagnostics: Vec<Diagnostic> = collisions.iter().map(collision_diagnostic).collect();
    diagnostics.extend(linker.resolve_all(trees));

    (
        linker,
        LinkReport {
            diagnostics,
            collisions,
        },
    )
}

/// Assemble and link a set of documents.
pub fn run(inputs: &[DocumentInput], config: &CommentConfig) -> RunOutput {
    log::debug!("processing {} documents", inputs.len());

    let (mut documents, nested): (Vec<DocTree>, Vec<Vec<Diagnostic>>) =
        assemble_all(inputs, config).into_iter().unzip();
    let mut diagnostics: Vec<Diagnostic> = nested.into_iter().flatten().collect();

    let (linker, report) = link_all(&mut documents);
    diagnostics.extend(report.diagnostics);

    RunOutput {
        documents,
        linker,
        diagnostics,
        collisions: report.collisions,
    }
}

fn collision_diagnostic(collision: &RegistryCollision) -> Diagnostic {
    Diagnostic::error(
        collision.entity.as_str(),
        collision.position,
        collision.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::source::EntityKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collision_only_skips_its_document() {
        let clash = SourceEntity::file("clash.hpp")
            .with_child(
                SourceEntity::new(EntityKind::Function, "f", "f()").with_comment("/// [g()]()"),
            )
            .with_child(
                SourceEntity::new(EntityKind::Function, "g", "g()")
                    .with_comment("/// Doc.\n/// \\unique_name f()"),
            );
        let fine = SourceEntity::file("fine.hpp").with_child(
            SourceEntity::new(EntityKind::Function, "h", "h()").with_comment("/// [h()]()"),
        );

        let output = run(
            &[
                DocumentInput::new("clash", clash),
                DocumentInput::new("fine", fine),
            ],
            &CommentConfig::default(),
        );

        assert_eq!(output.collisions.len(), 1);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].severity, Severity::Error);
        assert!(output.linker.is_registered(&DocumentId::new("fine")));
        assert!(!output.linker.is_registered(&DocumentId::new("clash")));
    }
}
