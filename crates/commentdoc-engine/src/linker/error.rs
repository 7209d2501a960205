use crate::entity::DocumentId;
use crate::source::SourcePosition;

/// Why an automatic link stayed unresolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    #[error("Unknown link target '{name}'")]
    Unknown { name: String },
    #[error("Ambiguous link target '{name}', candidates: {candidates:?}")]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },
    #[error("No entity '{name}' in scope '{scope}'")]
    RelativeNotFound { name: String, scope: String },
    #[error("Ambiguous relative link '{name}' in scope '{scope}'")]
    RelativeAmbiguous { name: String, scope: String },
}

/// Two entities of one document registered under the same unique id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Duplicate unique id '{unique_id}' in document '{document}'")]
pub struct RegistryCollision {
    pub document: DocumentId,
    pub unique_id: String,
    /// Qualified name of the second entity claiming the id
    pub entity: String,
    pub position: SourcePosition,
}
