//! Plain-text outline of a [`DocTree`], stable enough for snapshot tests and
//! quick debugging.
//!
//! ```text
//! a.hpp "Header file a.hpp"
//!   foo() "Function foo"
//!     - brief: See [bar]().
//!       -> [bar] doc#bar()
//! ```

use std::fmt::Write;

use crate::comment::{Comment, CommentNode, LinkDestination, SectionKind};
use crate::entity::{DocEntity, DocTree, EntityId};

pub fn outline(tree: &DocTree) -> String {
    let mut out = String::new();
    if !tree.is_empty() {
        write_entity(&mut out, tree, tree.root(), 0);
    }
    out
}

fn write_entity(out: &mut String, tree: &DocTree, id: EntityId, depth: usize) {
    let entity = tree.get(id);
    let indent = "  ".repeat(depth);

    let _ = write!(out, "{indent}{} \"{}\"", entity.unique_id, entity.heading);
    if let Some(module) = &entity.module {
        let _ = write!(out, " module={module}");
    }
    if entity.excluded {
        out.push_str(" (excluded)");
    } else if !entity.is_documented() {
        out.push_str(" (undocumented)");
    }
    out.push('\n');

    if entity.members.len() > 1 {
        for member in &entity.members {
            let _ = writeln!(out, "{indent}  ({}) {}", member.number, member.signature);
        }
    }
    for (index, member) in entity.members.iter().enumerate() {
        if let Some(comment) = &member.comment {
            write_comment(out, entity, index, comment, &format!("{indent}  "));
        }
    }

    for child in &entity.children {
        write_entity(out, tree, *child, depth + 1);
    }
}

fn write_comment(out: &mut String, entity: &DocEntity, member: usize, comment: &Comment, indent: &str) {
    for &section in comment.sections() {
        let label = match comment.node(section) {
            CommentNode::Paragraph {
                kind: SectionKind::Brief,
                ..
            } => "brief".to_string(),
            CommentNode::Paragraph {
                kind: SectionKind::Details,
                ..
            } => "details".to_string(),
            CommentNode::Paragraph { title, .. } => title.clone(),
            other => block_label(other).to_string(),
        };
        let inline = entity
            .inlines
            .iter()
            .find(|inline| inline.member == member && inline.section == section)
            .map(|inline| format!(" [{}]", inline.unique_id))
            .unwrap_or_default();
        let text = comment.text(section).replace('\n', " ");
        let _ = writeln!(out, "{indent}- {label}{inline}: {}", text.trim_end());

        for link in comment.descendants(section) {
            let CommentNode::Link(link) = comment.node(link) else {
                continue;
            };
            let target = match &link.destination {
                LinkDestination::Explicit(url) => url.clone(),
                LinkDestination::Unresolved => "unresolved".to_string(),
                LinkDestination::Resolved(resolved) => {
                    format!("{}#{}", resolved.document, resolved.anchor)
                }
            };
            let _ = writeln!(out, "{indent}  -> [{}] {target}", link.raw_name);
        }
    }
}

fn block_label(node: &CommentNode) -> &'static str {
    match node {
        CommentNode::List { ordered: true, .. } => "ordered list",
        CommentNode::List { .. } => "list",
        CommentNode::BlockQuote => "quote",
        CommentNode::Heading { .. } => "heading",
        CommentNode::CodeBlock { .. } => "code",
        CommentNode::ThematicBreak => "rule",
        _ => "block",
    }
}
