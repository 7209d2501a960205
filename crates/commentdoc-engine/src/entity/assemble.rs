use std::collections::HashMap;

use crate::comment::{Comment, CommentNode, NodeId, ParseError, SectionKind, parse_comment};
use crate::config::CommentConfig;
use crate::diagnostics::Diagnostic;
use crate::source::{EntityKind, SourceEntity};

use super::{DocEntity, DocTree, DocumentId, EntityId, InlineEntity, Member};

/// Build the entity tree of one document from its source root.
///
/// Every entity's raw comment is parsed here; parse diagnostics are returned
/// together with the assembly ones.
pub fn assemble(
    document: DocumentId,
    root: &SourceEntity,
    config: &CommentConfig,
) -> (DocTree, Vec<Diagnostic>) {
    log::debug!("assembling document '{document}'");

    let mut assembler = Assembler {
        config,
        tree: DocTree::new(document),
        diagnostics: Vec::new(),
    };
    let parsed = assembler.parse(root, None);
    let id = assembler.create(None, vec![parsed]);
    assembler.assemble_children(id, root.children.iter().collect());

    (assembler.tree, assembler.diagnostics)
}

/// Command arguments read from metadata sections.
#[derive(Debug, Default)]
struct Metadata {
    group: Option<String>,
    group_title: Option<String>,
    unique_name: Option<String>,
    module: Option<String>,
    exclude: bool,
}

struct Parsed<'src> {
    source: &'src SourceEntity,
    comment: Option<Comment>,
    metadata: Metadata,
    /// Unique id after applying `unique_name`
    unique_id: String,
}

struct Assembler<'a> {
    config: &'a CommentConfig,
    tree: DocTree,
    diagnostics: Vec<Diagnostic>,
}

impl Assembler<'_> {
    /// Parse, group and create one sibling list, then descend.
    fn assemble_children(&mut self, parent: EntityId, sources: Vec<&SourceEntity>) {
        let parsed: Vec<Parsed<'_>> = sources
            .into_iter()
            .map(|source| self.parse(source, Some(parent)))
            .collect();

        let mut groups: Vec<Vec<Parsed<'_>>> = Vec::new();
        let mut by_tag: HashMap<String, usize> = HashMap::new();
        for entry in parsed {
            if let Some(tag) = entry.metadata.group.clone() {
                if let Some(&index) = by_tag.get(&tag) {
                    groups[index].push(entry);
                    continue;
                }
                by_tag.insert(tag, groups.len());
            }
            groups.push(vec![entry]);
        }

        for members in groups {
            let sources: Vec<&SourceEntity> = members.iter().map(|member| member.source).collect();
            let children: Vec<&SourceEntity> = sources
                .into_iter()
                .flat_map(|source| source.children.iter())
                .collect();
            let id = self.create(Some(parent), members);
            self.assemble_children(id, children);
        }
    }

    fn parse<'src>(&mut self, source: &'src SourceEntity, parent: Option<EntityId>) -> Parsed<'src> {
        let (comment, metadata) = match &source.comment {
            Some(raw) => {
                let (mut comment, diagnostics) =
                    parse_comment(raw, &source.qualified_name, self.config);
                self.diagnostics.extend(diagnostics);
                let metadata = self.extract_metadata(&mut comment, &source.qualified_name);
                (Some(comment), metadata)
            }
            None => (None, Metadata::default()),
        };

        let unique_id = match &metadata.unique_name {
            Some(name) => self.relative_unique_name(name, parent),
            None => source.qualified_name.clone(),
        };
        let comment = if metadata.exclude { None } else { comment };

        Parsed {
            source,
            comment,
            metadata,
            unique_id,
        }
    }

    /// `*name` is relative to the enclosing scope, unless that scope is a file.
    fn relative_unique_name(&self, name: &str, parent: Option<EntityId>) -> String {
        let Some(relative) = name.strip_prefix('*') else {
            return name.to_string();
        };
        match parent.map(|id| self.tree.get(id)) {
            Some(scope) if scope.kind != EntityKind::File => {
                format!("{}::{relative}", scope.qualified_name)
            }
            _ => relative.to_string(),
        }
    }

    /// Read and remove the metadata sections of a comment.
    fn extract_metadata(&mut self, comment: &mut Comment, entity: &str) -> Metadata {
        let mut metadata = Metadata::default();
        let sections: Vec<NodeId> = comment.sections().to_vec();

        for id in sections {
            let Some(kind) = comment.section_kind(id).filter(|kind| kind.is_metadata()) else {
                continue;
            };
            let argument = comment.first_line(id);

            match kind {
                SectionKind::Exclude => metadata.exclude = true,
                SectionKind::Group => {
                    let mut parts = argument.splitn(2, char::is_whitespace);
                    match parts.next().filter(|tag| !tag.is_empty()) {
                        Some(tag) => {
                            metadata.group = Some(tag.to_string());
                            metadata.group_title = parts
                                .next()
                                .map(|title| title.trim().to_string())
                                .filter(|title| !title.is_empty());
                        }
                        None => self.missing_argument(entity, comment, id, kind),
                    }
                }
                SectionKind::UniqueName if !argument.is_empty() => {
                    metadata.unique_name = Some(argument)
                }
                SectionKind::Module if !argument.is_empty() => metadata.module = Some(argument),
                _ => self.missing_argument(entity, comment, id, kind),
            }
            comment.detach(id);
        }

        metadata
    }

    fn missing_argument(&mut self, entity: &str, comment: &Comment, id: NodeId, kind: SectionKind) {
        let error = ParseError::MissingArgument {
            command: self
                .config
                .command_word(kind)
                .unwrap_or(kind.default_title())
                .to_string(),
            position: comment.position(id),
        };
        let diagnostic = Diagnostic::warning(entity, error.position(), error.to_string());
        diagnostic.log();
        self.diagnostics.push(diagnostic);
    }

    /// Create the entity for a group of declarations (a single one when ungrouped).
    fn create(&mut self, parent: Option<EntityId>, members: Vec<Parsed<'_>>) -> EntityId {
        let Some(first) = members.first() else {
            return self.tree.root();
        };
        let source = first.source;
        let unique_id = first.unique_id.clone();
        let group = first.metadata.group.clone();

        let heading = members
            .iter()
            .find_map(|member| member.metadata.group_title.clone())
            .unwrap_or_else(|| format!("{} {}", source.kind.display_name(), source.name));
        let module = members
            .iter()
            .find_map(|member| member.metadata.module.clone());
        let excluded = members.iter().all(|member| member.metadata.exclude);

        let mut inlines = Vec::new();
        let members: Vec<Member> = members
            .into_iter()
            .enumerate()
            .map(|(index, parsed)| {
                let mut comment = parsed.comment;
                if let Some(comment) = &mut comment {
                    inlines.extend(self.inline_entities(
                        comment,
                        &unique_id,
                        index,
                        &parsed.source.qualified_name,
                    ));
                }
                Member {
                    number: index + 1,
                    qualified_name: parsed.source.qualified_name.clone(),
                    unique_id: parsed.unique_id,
                    signature: parsed.source.signature.clone(),
                    position: parsed.source.position,
                    comment,
                }
            })
            .collect();

        if members.len() > 1 {
            log::debug!("grouped {} declarations under '{unique_id}'", members.len());
        }

        self.tree.push(DocEntity {
            kind: source.kind,
            name: source.name.clone(),
            qualified_name: source.qualified_name.clone(),
            unique_id,
            heading,
            group,
            module,
            excluded,
            members,
            inlines,
            parent,
            children: Vec::new(),
        })
    }

    /// Split the leading name off every param/tparam/base section.
    fn inline_entities(
        &mut self,
        comment: &mut Comment,
        owner: &str,
        member: usize,
        entity: &str,
    ) -> Vec<InlineEntity> {
        let sections: Vec<NodeId> = comment.sections().to_vec();
        let mut inlines = Vec::new();

        for section in sections {
            let Some(kind) = comment
                .section_kind(section)
                .filter(|kind| kind.is_inline_entity())
            else {
                continue;
            };
            let Some(name) = take_leading_word(comment, section) else {
                self.missing_argument(entity, comment, section, kind);
                continue;
            };
            let unique_id = match kind {
                SectionKind::BaseClass => format!("{owner}::{name}"),
                _ => format!("{owner}.{name}"),
            };
            inlines.push(InlineEntity {
                kind,
                name,
                unique_id,
                member,
                section,
            });
        }

        inlines
    }
}

/// Remove the first word of a paragraph's leading text and return it.
fn take_leading_word(comment: &mut Comment, paragraph: NodeId) -> Option<String> {
    let first = *comment.children(paragraph).first()?;
    let CommentNode::Text(text) = comment.node_mut(first) else {
        return None;
    };
    let trimmed = text.trim_start();
    let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
    if end == 0 {
        return None;
    }
    let word = trimmed[..end].to_string();
    *text = trimmed[end..].trim_start().to_string();
    Some(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn function(name: &str, qualified: &str) -> SourceEntity {
        SourceEntity::new(EntityKind::Function, name, qualified)
    }

    #[test]
    fn test_mirrors_source_hierarchy() {
        let root = SourceEntity::file("a.hpp")
            .with_child(function("foo", "foo()").with_comment("/// A function."))
            .with_child(
                SourceEntity::new(EntityKind::Namespace, "ns", "ns")
                    .with_child(function("f", "ns::f()")),
            );

        let (tree, diagnostics) = assemble(DocumentId::new("doc"), &root, &CommentConfig::default());

        assert_eq!(diagnostics, vec![]);
        let ids: Vec<_> = tree
            .preorder()
            .into_iter()
            .map(|id| tree.get(id).unique_id.clone())
            .collect();
        assert_eq!(ids, vec!["a.hpp", "foo()", "ns", "ns::f()"]);

        let file = tree.get(tree.root());
        assert_eq!(file.heading, "Header file a.hpp");
        assert!(file.is_documented());
        let foo = tree.get(file.children[0]);
        assert_eq!(foo.heading, "Function foo");
        assert!(foo.is_documented());
    }

    #[test]
    fn test_group_collapses_siblings() {
        let root = SourceEntity::file("g.hpp")
            .with_child(
                function("a", "a()").with_comment("/// Documentation.\n/// \\group a The a"),
            )
            .with_child(function("b", "b()"))
            .with_child(function("a", "a(int)").with_comment("/// \\group a"));

        let (tree, _) = assemble(DocumentId::new("doc"), &root, &CommentConfig::default());
        let file = tree.get(tree.root());

        assert_eq!(file.children.len(), 2);
        let group = tree.get(file.children[0]);
        assert_eq!(group.unique_id, "a()");
        assert_eq!(group.heading, "The a");
        assert_eq!(group.group.as_deref(), Some("a"));
        let members: Vec<_> = group
            .members
            .iter()
            .map(|m| (m.number, m.signature.as_str()))
            .collect();
        assert_eq!(members, vec![(1, "a()"), (2, "a(int)")]);

        // metadata sections are not visible content
        let second = group.members[1].comment.as_ref().map(Comment::is_empty);
        assert_eq!(second, Some(true));
    }

    #[test]
    fn test_group_members_keep_their_own_ids() {
        let root = SourceEntity::file("g.hpp")
            .with_child(function("a", "a()").with_comment("/// Doc.\n/// \\group a"))
            .with_child(
                function("a", "a(int)").with_comment("/// \\group a\n/// \\unique_name a_int"),
            );

        let (tree, diagnostics) = assemble(DocumentId::new("g"), &root, &CommentConfig::default());

        assert_eq!(diagnostics, vec![]);
        let group = tree.get(tree.get(tree.root()).children[0]);
        assert_eq!(group.unique_id, "a()");
        let ids: Vec<_> = group.members.iter().map(|m| m.unique_id.as_str()).collect();
        assert_eq!(ids, vec!["a()", "a_int"]);
    }

    #[test]
    fn test_relative_unique_name() {
        let root = SourceEntity::file("t.hpp").with_child(
            SourceEntity::new(EntityKind::Struct, "foo", "foo<T>")
                .with_comment("/// A struct.")
                .with_child(
                    SourceEntity::new(EntityKind::MemberFunction, "baz", "foo<T>::baz()")
                        .with_comment("/// Doc.\n/// \\unique_name *bar()"),
                ),
        );

        let (tree, _) = assemble(DocumentId::new("t"), &root, &CommentConfig::default());
        assert!(tree.find("foo<T>::bar()").is_some());
        assert!(tree.find("foo<T>::baz()").is_none());
    }

    #[test]
    fn test_exclude_keeps_children() {
        let root = SourceEntity::file("x.hpp").with_child(
            SourceEntity::new(EntityKind::Class, "hidden", "hidden")
                .with_comment("/// \\exclude")
                .with_child(
                    SourceEntity::new(EntityKind::MemberFunction, "f", "hidden::f()")
                        .with_comment("/// Visible."),
                ),
        );

        let (tree, _) = assemble(DocumentId::new("x"), &root, &CommentConfig::default());
        let hidden = tree.find("hidden").map(|id| tree.get(id));
        assert_eq!(hidden.map(|e| (e.excluded, e.is_documented())), Some((true, false)));
        let f = tree.find("hidden::f()").map(|id| tree.get(id));
        assert_eq!(f.map(DocEntity::is_documented), Some(true));
    }

    #[test]
    fn test_module_and_inline_entities() {
        let root = SourceEntity::file("m.hpp").with_child(
            function("func", "func(int,int)").with_comment(
                "/// Function.\n/// \\module core\n/// \\param a The a.\n/// \\param b The b.",
            ),
        );

        let (tree, diagnostics) = assemble(DocumentId::new("m"), &root, &CommentConfig::default());
        assert_eq!(diagnostics, vec![]);

        let func = tree.get(tree.get(tree.root()).children[0]);
        assert_eq!(func.module.as_deref(), Some("core"));
        let inline_ids: Vec<_> = func.inlines.iter().map(|i| i.unique_id.as_str()).collect();
        assert_eq!(inline_ids, vec!["func(int,int).a", "func(int,int).b"]);

        let comment = func.members[0].comment.as_ref().map(|c| c.text(func.inlines[0].section));
        assert_eq!(comment.as_deref(), Some("The a."));
    }

    #[test]
    fn test_base_class_anchor_uses_scope_separator() {
        let root = SourceEntity::file("b.hpp").with_child(
            SourceEntity::new(EntityKind::Struct, "foo", "foo<A,B,C>")
                .with_comment("/// Class.\n/// \\tparam A A\n/// \\base C C"),
        );

        let (tree, _) = assemble(DocumentId::new("b"), &root, &CommentConfig::default());
        let foo = tree.get(tree.get(tree.root()).children[0]);
        let inline_ids: Vec<_> = foo.inlines.iter().map(|i| i.unique_id.as_str()).collect();
        assert_eq!(inline_ids, vec!["foo<A,B,C>.A", "foo<A,B,C>::C"]);
    }

    #[test]
    fn test_group_without_tag_is_reported() {
        let root = SourceEntity::file("e.hpp")
            .with_child(function("f", "f()").with_comment("/// Brief.\n/// \\group"));

        let (_, diagnostics) = assemble(DocumentId::new("e"), &root, &CommentConfig::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "Command 'group' requires an argument");
    }
}
