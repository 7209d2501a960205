//! # Source Entities
//!
//! The entity hierarchy handed over by the language front end: qualified names,
//! signatures, positions, nesting and the raw comment text attached to each
//! declaration. Nothing in this module interprets comments.

use serde::{Deserialize, Serialize};

/// A 1-based line/column position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Raw documentation comment text, including its comment decoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawComment(String);

impl RawComment {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawComment {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for RawComment {
    fn from(text: String) -> Self {
        Self(text)
    }
}

/// Kind of a declaration reported by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    File,
    Namespace,
    Class,
    Struct,
    Union,
    Enum,
    Enumerator,
    Function,
    MemberFunction,
    Constructor,
    Destructor,
    Variable,
    MemberVariable,
    Typedef,
    Macro,
}

impl EntityKind {
    /// Get the display name for the entity kind
    pub fn display_name(&self) -> &'static str {
        match self {
            EntityKind::File => "Header file",
            EntityKind::Namespace => "Namespace",
            EntityKind::Class => "Class",
            EntityKind::Struct => "Struct",
            EntityKind::Union => "Union",
            EntityKind::Enum => "Enumeration",
            EntityKind::Enumerator => "Enumeration constant",
            EntityKind::Function => "Function",
            EntityKind::MemberFunction => "Function",
            EntityKind::Constructor => "Constructor",
            EntityKind::Destructor => "Destructor",
            EntityKind::Variable => "Variable",
            EntityKind::MemberVariable => "Variable",
            EntityKind::Typedef => "Type alias",
            EntityKind::Macro => "Macro",
        }
    }

    /// Whether entities of this kind can own named members.
    ///
    /// Relative links written in the comment of a non-scope entity are looked up
    /// from its parent instead.
    pub fn is_scope(&self) -> bool {
        matches!(
            self,
            EntityKind::File
                | EntityKind::Namespace
                | EntityKind::Class
                | EntityKind::Struct
                | EntityKind::Union
                | EntityKind::Enum
        )
    }
}

/// One declaration as discovered by the front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntity {
    pub kind: EntityKind,
    /// Unqualified name, e.g. `f2`
    pub name: String,
    /// Globally unique signature string, e.g. `ns::bar::f2()const`
    pub qualified_name: String,
    /// Declaration as written, for display
    pub signature: String,
    #[serde(default)]
    pub position: SourcePosition,
    #[serde(default)]
    pub comment: Option<RawComment>,
    #[serde(default)]
    pub children: Vec<SourceEntity>,
}

impl SourceEntity {
    /// Create a new source entity; the signature defaults to the qualified name.
    pub fn new(kind: EntityKind, name: impl Into<String>, qualified_name: impl Into<String>) -> Self {
        let qualified_name = qualified_name.into();
        Self {
            kind,
            name: name.into(),
            signature: qualified_name.clone(),
            qualified_name,
            position: SourcePosition::default(),
            comment: None,
            children: Vec::new(),
        }
    }

    /// Create the root entity of a document for the given file name.
    pub fn file(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(EntityKind::File, name.clone(), name)
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<RawComment>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.position = SourcePosition::new(line, column);
        self
    }

    pub fn with_child(mut self, child: SourceEntity) -> Self {
        self.children.push(child);
        self
    }

    /// Add a child entity
    pub fn add_child(&mut self, child: SourceEntity) {
        self.children.push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_defaults_to_qualified_name() {
        let entity = SourceEntity::new(EntityKind::Function, "f2", "ns::bar::f2()const");
        assert_eq!(entity.signature, "ns::bar::f2()const");
        assert!(entity.comment.is_none());
    }

    #[test]
    fn test_file_is_a_scope() {
        let file = SourceEntity::file("a.hpp");
        assert_eq!(file.qualified_name, "a.hpp");
        assert!(file.kind.is_scope());
        assert!(!EntityKind::MemberFunction.is_scope());
    }
}
