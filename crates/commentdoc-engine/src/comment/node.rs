use serde::Serialize;

use crate::entity::ResolvedLink;
use crate::source::SourcePosition;

use super::SectionKind;

/// Index of a node inside its [`Comment`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

/// Typed documentation node.
///
/// Container variants own their children through the arena's child lists;
/// `Emphasis`, `Strong` and `Link` contain the inline nodes making up their
/// visible text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CommentNode {
    Document,
    Paragraph { kind: SectionKind, title: String },
    List { ordered: bool, start: Option<u64> },
    ListItem,
    BlockQuote,
    Heading { level: u8 },
    CodeBlock { language: Option<String>, code: String },
    ThematicBreak,
    Text(String),
    Emphasis,
    Strong,
    CodeSpan(String),
    SoftBreak,
    HardBreak,
    Link(Link),
}

impl CommentNode {
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            CommentNode::Document
                | CommentNode::Paragraph { .. }
                | CommentNode::List { .. }
                | CommentNode::ListItem
                | CommentNode::BlockQuote
                | CommentNode::Heading { .. }
                | CommentNode::Emphasis
                | CommentNode::Strong
                | CommentNode::Link(_)
        )
    }
}

/// A `[name](destination)` link written in a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Plain text between the brackets, as written
    pub raw_name: String,
    pub destination: LinkDestination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LinkDestination {
    /// Non-empty destination, passed through untouched
    Explicit(String),
    /// Empty destination waiting for (or failing) automatic resolution
    Unresolved,
    /// Bound internal link
    Resolved(ResolvedLink),
}

impl Link {
    /// Links with an empty destination are resolved by the linker.
    pub fn is_automatic(&self) -> bool {
        !matches!(self.destination, LinkDestination::Explicit(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Slot {
    node: CommentNode,
    position: SourcePosition,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena holding one parsed comment, rooted at a [`CommentNode::Document`].
///
/// Pruned nodes stay in the arena but are no longer reachable from the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    slots: Vec<Slot>,
}

impl Default for Comment {
    fn default() -> Self {
        Self::new()
    }
}

impl Comment {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                node: CommentNode::Document,
                position: SourcePosition::new(1, 1),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &CommentNode {
        &self.slots[id.0].node
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CommentNode {
        &mut self.slots[id.0].node
    }

    pub fn position(&self, id: NodeId) -> SourcePosition {
        self.slots[id.0].position
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.slots[id.0].children
    }

    /// Top-level blocks, in order.
    pub fn sections(&self) -> &[NodeId] {
        self.children(self.root())
    }

    /// Top-level paragraphs of the given kind.
    pub fn sections_of(&self, kind: SectionKind) -> impl Iterator<Item = NodeId> + '_ {
        self.sections()
            .iter()
            .copied()
            .filter(move |id| self.section_kind(*id) == Some(kind))
    }

    /// Kind of a paragraph node, `None` for any other node.
    pub fn section_kind(&self, id: NodeId) -> Option<SectionKind> {
        match self.node(id) {
            CommentNode::Paragraph { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sections().is_empty()
    }

    pub(crate) fn alloc(&mut self, node: CommentNode, position: SourcePosition) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Slot {
            node,
            position,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub(crate) fn append(&mut self, parent: NodeId, child: NodeId) {
        self.slots[child.0].parent = Some(parent);
        self.slots[parent.0].children.push(child);
    }

    /// Unlink a node (and with it its subtree) from its parent.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.slots[id.0].parent.take() {
            self.slots[parent.0].children.retain(|child| *child != id);
        }
    }

    /// Reachable nodes below `id` in pre-order, `id` included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    /// All reachable link nodes in document order.
    pub fn links(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|id| matches!(self.node(*id), CommentNode::Link(_)))
            .collect()
    }

    /// Plain text of a subtree; breaks become newlines.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id) {
            CommentNode::Text(text) | CommentNode::CodeSpan(text) => out.push_str(text),
            CommentNode::CodeBlock { code, .. } => out.push_str(code),
            CommentNode::SoftBreak | CommentNode::HardBreak => out.push('\n'),
            _ => {
                for child in self.children(id) {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// First line of a paragraph's text, trimmed; used for command arguments.
    pub fn first_line(&self, id: NodeId) -> String {
        self.text(id)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(comment: &mut Comment, kind: SectionKind, text: &str) -> NodeId {
        let root = comment.root();
        let para = comment.alloc(
            CommentNode::Paragraph {
                kind,
                title: String::new(),
            },
            SourcePosition::new(1, 1),
        );
        let leaf = comment.alloc(CommentNode::Text(text.into()), SourcePosition::new(1, 1));
        comment.append(para, leaf);
        comment.append(root, para);
        para
    }

    #[test]
    fn test_detach_prunes_subtree() {
        let mut comment = Comment::new();
        let brief = paragraph(&mut comment, SectionKind::Brief, "brief");
        let details = paragraph(&mut comment, SectionKind::Details, "details");

        comment.detach(brief);

        assert_eq!(comment.sections(), &[details]);
        assert_eq!(comment.parent(brief), None);
        assert_eq!(comment.descendants(comment.root()).len(), 3);
    }

    #[test]
    fn test_sections_of_kind() {
        let mut comment = Comment::new();
        paragraph(&mut comment, SectionKind::Brief, "brief");
        let effects = paragraph(&mut comment, SectionKind::Effects, "effects");

        let found: Vec<_> = comment.sections_of(SectionKind::Effects).collect();
        assert_eq!(found, vec![effects]);
        assert_eq!(comment.text(effects), "effects");
    }

    #[test]
    fn test_first_line_stops_at_break() {
        let mut comment = Comment::new();
        let para = paragraph(&mut comment, SectionKind::Group, "a  The a ");
        let br = comment.alloc(CommentNode::SoftBreak, SourcePosition::new(1, 9));
        comment.append(para, br);
        let more = comment.alloc(CommentNode::Text("ignored".into()), SourcePosition::new(2, 1));
        comment.append(para, more);

        assert_eq!(comment.first_line(para), "a  The a");
    }
}
