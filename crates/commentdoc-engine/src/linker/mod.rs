//! # Anchor Registry and Linker
//!
//! Linking runs in two phases over every document of a run:
//!
//! 1. **Registration** files each entity's unique id under its document, and
//!    every scope suffix of it in the short-name index. Documents are
//!    collected in parallel into [`Registration`]s and merged one at a time.
//! 2. **Resolution** rewrites every link with an empty destination. The
//!    [`Linker`] is only read here, so documents resolve in parallel.
//!
//! ## Rules
//!
//! Rules are tried in order and the first one that applies decides the
//! outcome, including a failure:
//!
//! - `*name` / `?name` look among the children of the referring scope / its
//!   parent. Exactly one child may match.
//! - The raw text is a registered unique id.
//! - The raw text minus a member suffix (`f(int).a`) or its argument list is a
//!   registered unique id.
//! - The short-name index has exactly one candidate for the raw text.

mod error;
pub mod names;

pub use error::{LinkError, RegistryCollision};

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use rayon::prelude::*;

use crate::comment::{CommentNode, LinkDestination, NodeId};
use crate::diagnostics::Diagnostic;
use crate::entity::{DocTree, DocumentId, EntityId, ResolvedLink};

use names::Relation;

/// Everything one document contributes to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    document: DocumentId,
    /// unique id → anchor
    long: Vec<(String, String)>,
    /// alias → unique id
    short: Vec<(String, String)>,
}

impl Registration {
    /// Collect a document's ids, failing on the first duplicate unique id.
    pub fn collect(tree: &DocTree) -> Result<Self, RegistryCollision> {
        let mut long = Vec::new();
        let mut short = Vec::new();
        let mut seen = HashSet::new();
        let entities: Vec<EntityId> = tree
            .preorder()
            .into_iter()
            .filter(|id| !tree.get(*id).excluded)
            .collect();

        for &id in &entities {
            let entity = tree.get(id);
            if !seen.insert(entity.unique_id.as_str()) {
                return Err(RegistryCollision {
                    document: tree.document().clone(),
                    unique_id: entity.unique_id.clone(),
                    entity: entity.qualified_name.clone(),
                    position: entity
                        .members
                        .first()
                        .map(|member| member.position)
                        .unwrap_or_default(),
                });
            }
            if let Some(anchor) = tree.anchor_of(id) {
                long.push((entity.unique_id.clone(), anchor.to_string()));
            }
        }

        // aliases never shadow a unique id
        for &id in &entities {
            let entity = tree.get(id);
            let Some(anchor) = tree.anchor_of(id) else {
                continue;
            };

            for member in &entity.members {
                for name in [&member.unique_id, &member.qualified_name] {
                    if seen.insert(name.as_str()) {
                        long.push((name.clone(), anchor.to_string()));
                    }
                    for alias in names::short_aliases(name) {
                        short.push((alias, entity.unique_id.clone()));
                    }
                }
            }
            for inline in &entity.inlines {
                if seen.insert(inline.unique_id.as_str()) {
                    long.push((inline.unique_id.clone(), inline.unique_id.clone()));
                }
            }
            for alias in names::short_aliases(&entity.unique_id) {
                short.push((alias, entity.unique_id.clone()));
            }
        }

        Ok(Self {
            document: tree.document().clone(),
            long,
            short,
        })
    }

    pub fn document(&self) -> &DocumentId {
        &self.document
    }
}

/// The run-wide anchor registry.
#[derive(Debug, Clone, Default)]
pub struct Linker {
    long: HashMap<String, BTreeMap<DocumentId, String>>,
    short: HashMap<String, BTreeSet<String>>,
    documents: BTreeSet<DocumentId>,
}

impl Linker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one document.
    pub fn register(&mut self, tree: &DocTree) -> Result<(), RegistryCollision> {
        let registration = Registration::collect(tree)?;
        self.merge(registration);
        Ok(())
    }

    /// Register every document; collided documents are left out entirely.
    pub fn register_all(&mut self, trees: &[DocTree]) -> Vec<RegistryCollision> {
        let registrations: Vec<_> = trees.par_iter().map(Registration::collect).collect();

        let mut collisions = Vec::new();
        for registration in registrations {
            match registration {
                Ok(registration) => self.merge(registration),
                Err(collision) => {
                    log::error!("{collision}");
                    collisions.push(collision);
                }
            }
        }
        collisions
    }

    /// Fold a registration into the registry. Merging the same one twice is a no-op.
    pub fn merge(&mut self, registration: Registration) {
        log::debug!(
            "registering {} ids of document '{}'",
            registration.long.len(),
            registration.document
        );
        for (id, anchor) in registration.long {
            self.long
                .entry(id)
                .or_default()
                .insert(registration.document.clone(), anchor);
        }
        for (alias, id) in registration.short {
            self.short.entry(alias).or_default().insert(id);
        }
        self.documents.insert(registration.document);
    }

    pub fn is_registered(&self, document: &DocumentId) -> bool {
        self.documents.contains(document)
    }

    /// Resolve every automatic link of a document, returning one diagnostic
    /// per link left unresolved.
    pub fn resolve(&self, tree: &mut DocTree) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut bindings: Vec<(EntityId, usize, NodeId, LinkDestination)> = Vec::new();

        for id in tree.preorder() {
            let entity = tree.get(id);
            for (index, member) in entity.members.iter().enumerate() {
                let Some(comment) = &member.comment else {
                    continue;
                };
                for node in comment.links() {
                    let CommentNode::Link(link) = comment.node(node) else {
                        continue;
                    };
                    if !link.is_automatic() {
                        continue;
                    }

                    let destination = match self.lookup(tree, id, &link.raw_name) {
                        Ok(resolved) => LinkDestination::Resolved(resolved),
                        Err(error) => {
                            let diagnostic = Diagnostic::warning(
                                &member.qualified_name,
                                comment.position(node),
                                error.to_string(),
                            );
                            diagnostic.log();
                            diagnostics.push(diagnostic);
                            LinkDestination::Unresolved
                        }
                    };
                    bindings.push((id, index, node, destination));
                }
            }
        }

        for (id, index, node, destination) in bindings {
            if let Some(comment) = tree.get_mut(id).members[index].comment.as_mut()
                && let CommentNode::Link(link) = comment.node_mut(node)
            {
                link.destination = destination;
            }
        }
        diagnostics
    }

    /// Resolve all registered documents in parallel.
    pub fn resolve_all(&self, trees: &mut [DocTree]) -> Vec<Diagnostic> {
        trees
            .par_iter_mut()
            .filter(|tree| self.is_registered(tree.document()))
            .flat_map_iter(|tree| self.resolve(tree))
            .collect()
    }

    /// Resolve one link text written in the comment of `referrer`.
    pub fn lookup(
        &self,
        tree: &DocTree,
        referrer: EntityId,
        raw: &str,
    ) -> Result<ResolvedLink, LinkError> {
        if let Some((relation, name)) = names::relative(raw) {
            return resolve_relative(tree, referrer, relation, name);
        }

        let document = tree.document();
        if let Some(found) = self.lookup_long(raw, raw, document) {
            return found;
        }

        let member = names::split_member(raw).map(|(owner, _)| owner);
        let fallbacks = member
            .into_iter()
            .chain([names::strip_signature(raw)])
            .chain(member.map(names::strip_signature));
        for candidate in fallbacks {
            if candidate == raw || candidate.is_empty() {
                continue;
            }
            if let Some(found) = self.lookup_long(candidate, raw, document) {
                return found;
            }
        }

        self.lookup_short(member.unwrap_or(raw), raw, document)
    }

    /// Exact unique id lookup; `None` when the id is not registered at all.
    /// Failures are reported under `raw`, the link text as written.
    fn lookup_long(
        &self,
        id: &str,
        raw: &str,
        document: &DocumentId,
    ) -> Option<Result<ResolvedLink, LinkError>> {
        let entries = self.long.get(id)?;
        if let Some(anchor) = entries.get(document) {
            return Some(Ok(ResolvedLink::new(document.clone(), anchor.clone())));
        }
        let mut iter = entries.iter();
        Some(match (iter.next(), iter.next()) {
            (Some((document, anchor)), None) => {
                Ok(ResolvedLink::new(document.clone(), anchor.clone()))
            }
            _ => Err(LinkError::Ambiguous {
                name: raw.to_string(),
                candidates: entries
                    .keys()
                    .map(|document| format!("{document}:{id}"))
                    .collect(),
            }),
        })
    }

    fn lookup_short(
        &self,
        name: &str,
        raw: &str,
        document: &DocumentId,
    ) -> Result<ResolvedLink, LinkError> {
        let key = names::short_key(name);
        let candidates = self.short.get(&key).filter(|ids| !ids.is_empty());

        match candidates {
            None => Err(LinkError::Unknown {
                name: raw.to_string(),
            }),
            Some(ids) if ids.len() > 1 => Err(LinkError::Ambiguous {
                name: raw.to_string(),
                candidates: ids.iter().cloned().collect(),
            }),
            Some(ids) => ids
                .iter()
                .next()
                .and_then(|id| self.lookup_long(id, raw, document))
                .unwrap_or_else(|| {
                    Err(LinkError::Unknown {
                        name: raw.to_string(),
                    })
                }),
        }
    }
}

/// `*name` and `?name`: one level of children, never deeper or wider.
fn resolve_relative(
    tree: &DocTree,
    referrer: EntityId,
    relation: Relation,
    name: &str,
) -> Result<ResolvedLink, LinkError> {
    let entity = tree.get(referrer);
    let own_scope = if entity.kind.is_scope() {
        Some(referrer)
    } else {
        entity.parent
    };
    let scope = match relation {
        Relation::Child => own_scope,
        Relation::Sibling => own_scope.and_then(|scope| tree.get(scope).parent),
    };
    let scope_name = scope
        .map(|scope| tree.get(scope).unique_id.clone())
        .unwrap_or_default();
    let not_found = || LinkError::RelativeNotFound {
        name: name.to_string(),
        scope: scope_name.clone(),
    };

    let Some(scope) = scope else {
        return Err(not_found());
    };
    let key = names::short_key(name);
    let matches: Vec<EntityId> = tree
        .get(scope)
        .children
        .iter()
        .copied()
        .filter(|child| {
            let child = tree.get(*child);
            !child.excluded
                && (child.name == name || names::last_component(&child.unique_id) == key)
        })
        .collect();

    match matches.as_slice() {
        [] => Err(not_found()),
        [found] => tree
            .anchor_of(*found)
            .map(|anchor| ResolvedLink::new(tree.document().clone(), anchor))
            .ok_or_else(not_found),
        _ => Err(LinkError::RelativeAmbiguous {
            name: name.to_string(),
            scope: scope_name.clone(),
        }),
    }
}
