//! # Documentation Entities
//!
//! The assembled, per-document entity tree. Entities are stored in an arena and
//! referenced by [`EntityId`]; parent links are plain indices.
//!
//! An entity collapses one or more source declarations (more than one for a
//! group). Every declaration becomes a [`Member`] that keeps its own signature
//! and comment.

mod assemble;

pub use assemble::assemble;

use std::fmt;

use serde::Serialize;

use crate::comment::{Comment, NodeId, SectionKind};
use crate::source::{EntityKind, SourcePosition};

/// Identifier of an output document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Destination of a resolved internal link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResolvedLink {
    pub document: DocumentId,
    pub anchor: String,
}

impl ResolvedLink {
    pub fn new(document: DocumentId, anchor: impl Into<String>) -> Self {
        Self {
            document,
            anchor: anchor.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityId(usize);

impl EntityId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One source declaration collapsed into an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    /// 1-based declaration order inside the entity
    pub number: usize,
    pub qualified_name: String,
    /// The declaration's own id; differs from the entity's for later group members
    pub unique_id: String,
    pub signature: String,
    pub position: SourcePosition,
    pub comment: Option<Comment>,
}

/// A named sub-element documented inside a comment (`param`, `tparam`, `base`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineEntity {
    pub kind: SectionKind,
    pub name: String,
    pub unique_id: String,
    /// Index into the owning entity's members
    pub member: usize,
    /// The section paragraph documenting it
    pub section: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntity {
    pub kind: EntityKind,
    pub name: String,
    pub qualified_name: String,
    pub unique_id: String,
    pub heading: String,
    pub group: Option<String>,
    pub module: Option<String>,
    pub excluded: bool,
    pub members: Vec<Member>,
    pub inlines: Vec<InlineEntity>,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
}

impl DocEntity {
    /// Files always carry an anchor; everything else only with a comment.
    pub fn is_documented(&self) -> bool {
        match self.kind {
            EntityKind::File => true,
            _ => !self.excluded && self.members.iter().any(|member| member.comment.is_some()),
        }
    }

    pub fn is_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.members.iter().filter_map(|member| member.comment.as_ref())
    }
}

/// The entity tree of one output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocTree {
    document: DocumentId,
    entities: Vec<DocEntity>,
    root: EntityId,
}

impl DocTree {
    pub(crate) fn new(document: DocumentId) -> Self {
        Self {
            document,
            entities: Vec::new(),
            root: EntityId(0),
        }
    }

    pub(crate) fn push(&mut self, entity: DocEntity) -> EntityId {
        let id = EntityId(self.entities.len());
        if let Some(parent) = entity.parent {
            self.entities[parent.0].children.push(id);
        }
        self.entities.push(entity);
        id
    }

    pub fn document(&self) -> &DocumentId {
        &self.document
    }

    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: EntityId) -> &DocEntity {
        &self.entities[id.0]
    }

    pub fn get_mut(&mut self, id: EntityId) -> &mut DocEntity {
        &mut self.entities[id.0]
    }

    /// All entity ids in pre-order.
    pub fn preorder(&self) -> Vec<EntityId> {
        let mut out = Vec::with_capacity(self.entities.len());
        if self.entities.is_empty() {
            return out;
        }
        let mut stack = vec![self.root];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.get(current).children.iter().rev().copied());
        }
        out
    }

    /// First entity in pre-order with the given unique id.
    pub fn find(&self, unique_id: &str) -> Option<EntityId> {
        self.preorder()
            .into_iter()
            .find(|id| self.get(*id).unique_id == unique_id)
    }

    /// Anchor an entity is addressed under: its own id when documented, else
    /// that of the nearest documented ancestor.
    pub fn anchor_of(&self, id: EntityId) -> Option<&str> {
        let mut current = Some(id);
        while let Some(entity_id) = current {
            let entity = self.get(entity_id);
            if entity.is_documented() {
                return Some(&entity.unique_id);
            }
            current = entity.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entity(kind: EntityKind, name: &str, parent: Option<EntityId>, documented: bool) -> DocEntity {
        DocEntity {
            kind,
            name: name.into(),
            qualified_name: name.into(),
            unique_id: name.into(),
            heading: String::new(),
            group: None,
            module: None,
            excluded: false,
            members: vec![Member {
                number: 1,
                qualified_name: name.into(),
                unique_id: name.into(),
                signature: name.into(),
                position: SourcePosition::default(),
                comment: documented.then(Comment::new),
            }],
            inlines: Vec::new(),
            parent,
            children: Vec::new(),
        }
    }

    #[test]
    fn test_anchor_falls_back_to_documented_ancestor() {
        let mut tree = DocTree::new(DocumentId::new("doc"));
        let file = tree.push(entity(EntityKind::File, "a.hpp", None, false));
        let ns = tree.push(entity(EntityKind::Namespace, "ns", Some(file), true));
        let func = tree.push(entity(EntityKind::Function, "ns::f()", Some(ns), false));

        assert_eq!(tree.anchor_of(func), Some("ns"));
        assert_eq!(tree.anchor_of(file), Some("a.hpp"));
        assert_eq!(tree.preorder(), vec![file, ns, func]);
        assert_eq!(tree.find("ns::f()"), Some(func));
    }

    #[test]
    fn test_excluded_entity_is_not_documented() {
        let mut excluded = entity(EntityKind::Class, "c", None, true);
        excluded.excluded = true;
        assert!(!excluded.is_documented());
    }
}
