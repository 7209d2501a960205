//! # Markup Tree Building
//!
//! The generic block/inline tree comes from `pulldown-cmark`. This module wraps
//! it behind [`BlockTreeBuilder`], converts its event stream into an
//! arena-indexed [`MarkupTree`] and provides the enter/exit walk the classifier
//! runs over it.
//!
//! ## Event Flow
//!
//! `pulldown-cmark` emits `Start(tag)` / `End(tag)` pairs for containers and
//! single events for leaves (`Text`, `Code`, `SoftBreak`, ...). The builder keeps
//! a stack of open containers; every start pushes, every end pops. Adjacent
//! text events are merged into one `Text` leaf so that a paragraph opening with
//! `\effects` is seen as a single text node even when the parser splits it at
//! the backslash. Inline HTML (`<T>` in `foo<T>`) is kept as text.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

use crate::source::SourcePosition;

/// Streaming consumer of normalized comment text.
///
/// Lines are fed one at a time, newline included; `finish` produces the tree.
pub trait BlockTreeBuilder {
    fn feed(&mut self, text: &str);

    fn finish(self) -> MarkupTree
    where
        Self: Sized;
}

/// [`BlockTreeBuilder`] backed by `pulldown-cmark`.
///
/// The parser is not incremental, so fed text is buffered and parsed on
/// `finish`; paragraph continuation across fed lines is the parser's own.
#[derive(Debug, Default)]
pub struct CmarkTreeBuilder {
    buffer: String,
}

impl CmarkTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockTreeBuilder for CmarkTreeBuilder {
    fn feed(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn finish(self) -> MarkupTree {
        MarkupTree::parse(&self.buffer)
    }
}

/// Node kinds of the generic markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupKind {
    Document,
    Paragraph,
    Heading(u8),
    BlockQuote,
    CodeBlock { language: Option<String>, code: String },
    HtmlBlock(String),
    List { start: Option<u64> },
    Item,
    ThematicBreak,
    Text(String),
    Code(String),
    Emphasis,
    Strong,
    Link { destination: String },
    Image { destination: String },
    SoftBreak,
    HardBreak,
    /// Any construct outside the supported subset, by name
    Unsupported(String),
}

impl MarkupKind {
    /// Containers receive both an enter and an exit event during the walk.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            MarkupKind::Document
                | MarkupKind::Paragraph
                | MarkupKind::Heading(_)
                | MarkupKind::BlockQuote
                | MarkupKind::List { .. }
                | MarkupKind::Item
                | MarkupKind::Emphasis
                | MarkupKind::Strong
                | MarkupKind::Link { .. }
                | MarkupKind::Image { .. }
                | MarkupKind::Unsupported(_)
        )
    }

    fn from_tag(tag: Tag<'_>) -> Self {
        match tag {
            Tag::Paragraph => MarkupKind::Paragraph,
            Tag::Heading { level, .. } => MarkupKind::Heading(level as u8),
            Tag::BlockQuote(_) => MarkupKind::BlockQuote,
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(ToString::to_string),
                    CodeBlockKind::Indented => None,
                };
                MarkupKind::CodeBlock {
                    language,
                    code: String::new(),
                }
            }
            Tag::HtmlBlock => MarkupKind::HtmlBlock(String::new()),
            Tag::List(start) => MarkupKind::List { start },
            Tag::Item => MarkupKind::Item,
            Tag::Emphasis => MarkupKind::Emphasis,
            Tag::Strong => MarkupKind::Strong,
            Tag::Link { dest_url, .. } => MarkupKind::Link {
                destination: dest_url.to_string(),
            },
            Tag::Image { dest_url, .. } => MarkupKind::Image {
                destination: dest_url.to_string(),
            },
            other => MarkupKind::Unsupported(format!("{other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkupId(usize);

#[derive(Debug, Clone)]
struct MarkupNode {
    kind: MarkupKind,
    position: SourcePosition,
    parent: Option<MarkupId>,
    children: Vec<MarkupId>,
}

/// Walk events; leaves only ever produce `Enter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEvent {
    Enter(MarkupId),
    Exit(MarkupId),
}

impl WalkEvent {
    pub fn node(self) -> MarkupId {
        match self {
            WalkEvent::Enter(id) | WalkEvent::Exit(id) => id,
        }
    }
}

/// Arena-indexed generic markup tree.
#[derive(Debug, Clone)]
pub struct MarkupTree {
    nodes: Vec<MarkupNode>,
}

impl Default for MarkupTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![MarkupNode {
                kind: MarkupKind::Document,
                position: SourcePosition::new(1, 1),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse complete markdown text into a tree.
    pub fn parse(text: &str) -> Self {
        let lines = LineIndex::new(text);
        let mut tree = Self::new();
        let root = tree.root();
        let mut open = vec![root];

        for (event, range) in Parser::new_ext(text, Options::empty()).into_offset_iter() {
            let position = lines.position(&range);
            let parent = open.last().copied().unwrap_or(root);

            match event {
                Event::Start(tag) => {
                    let id = tree.push(parent, MarkupKind::from_tag(tag), position);
                    open.push(id);
                }
                Event::End(_) => {
                    if open.len() > 1 {
                        open.pop();
                    }
                }
                Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                    tree.push_text(parent, &text, position);
                }
                Event::Code(code) => {
                    tree.push(parent, MarkupKind::Code(code.to_string()), position);
                }
                Event::SoftBreak => {
                    tree.push(parent, MarkupKind::SoftBreak, position);
                }
                Event::HardBreak => {
                    tree.push(parent, MarkupKind::HardBreak, position);
                }
                Event::Rule => {
                    tree.push(parent, MarkupKind::ThematicBreak, position);
                }
                // Math, footnotes and task lists are not enabled
                _ => {}
            }
        }

        tree
    }

    pub fn root(&self) -> MarkupId {
        MarkupId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root()).is_empty()
    }

    pub fn kind(&self, id: MarkupId) -> &MarkupKind {
        &self.nodes[id.0].kind
    }

    pub fn position(&self, id: MarkupId) -> SourcePosition {
        self.nodes[id.0].position
    }

    pub fn parent(&self, id: MarkupId) -> Option<MarkupId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: MarkupId) -> &[MarkupId] {
        &self.nodes[id.0].children
    }

    pub fn index(id: MarkupId) -> usize {
        id.0
    }

    pub fn previous_sibling(&self, id: MarkupId) -> Option<MarkupId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|sibling| *sibling == id)?;
        index.checked_sub(1).map(|previous| siblings[previous])
    }

    pub fn next_sibling(&self, id: MarkupId) -> Option<MarkupId> {
        let siblings = self.children(self.parent(id)?);
        let index = siblings.iter().position(|sibling| *sibling == id)?;
        siblings.get(index + 1).copied()
    }

    /// Detach a node and its subtree from the tree.
    pub fn unlink(&mut self, id: MarkupId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    /// The event following `event` in document order, `None` once the root is left.
    pub fn advance(&self, event: WalkEvent) -> Option<WalkEvent> {
        if let WalkEvent::Enter(id) = event
            && self.kind(id).is_container()
        {
            return Some(match self.children(id).first() {
                Some(child) => WalkEvent::Enter(*child),
                None => WalkEvent::Exit(id),
            });
        }

        let id = event.node();
        if id == self.root() {
            return None;
        }
        match self.next_sibling(id) {
            Some(sibling) => Some(WalkEvent::Enter(sibling)),
            None => self.parent(id).map(WalkEvent::Exit),
        }
    }

    /// Plain text of a subtree, breaks rendered as spaces.
    pub fn text(&self, id: MarkupId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.kind(current) {
                MarkupKind::Text(text) | MarkupKind::Code(text) => out.push_str(text),
                MarkupKind::SoftBreak | MarkupKind::HardBreak => out.push(' '),
                _ => stack.extend(self.children(current).iter().rev().copied()),
            }
        }
        out
    }

    fn push(&mut self, parent: MarkupId, kind: MarkupKind, position: SourcePosition) -> MarkupId {
        let id = MarkupId(self.nodes.len());
        self.nodes.push(MarkupNode {
            kind,
            position,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push_text(&mut self, parent: MarkupId, text: &str, position: SourcePosition) {
        match &mut self.nodes[parent.0].kind {
            MarkupKind::CodeBlock { code, .. } => {
                code.push_str(text);
                return;
            }
            MarkupKind::HtmlBlock(html) => {
                html.push_str(text);
                return;
            }
            _ => {}
        }

        if let Some(last) = self.nodes[parent.0].children.last().copied()
            && let MarkupKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(text);
            return;
        }
        self.push(parent, MarkupKind::Text(text.to_string()), position);
    }
}

/// Maps byte offsets to 1-based line/column positions.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, byte)| *byte == b'\n')
                .map(|(offset, _)| offset + 1),
        );
        Self { starts }
    }

    fn position(&self, range: &Range<usize>) -> SourcePosition {
        let line = match self.starts.binary_search(&range.start) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        };
        SourcePosition::new(line + 1, range.start - self.starts[line] + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(tree: &MarkupTree, id: MarkupId) -> Vec<MarkupKind> {
        tree.children(id)
            .iter()
            .map(|child| tree.kind(*child).clone())
            .collect()
    }

    #[test]
    fn test_consecutive_lines_join_into_one_paragraph() {
        let mut builder = CmarkTreeBuilder::new();
        builder.feed("A function.\n");
        builder.feed("More text.");
        let tree = builder.finish();

        let root = tree.root();
        assert_eq!(tree.children(root).len(), 1);
        let para = tree.children(root)[0];
        assert_eq!(
            kinds(&tree, para),
            vec![
                MarkupKind::Text("A function.".into()),
                MarkupKind::SoftBreak,
                MarkupKind::Text("More text.".into()),
            ]
        );
    }

    #[test]
    fn test_backslash_command_stays_one_text_leaf() {
        let tree = MarkupTree::parse("\\effects Effects.");
        let para = tree.children(tree.root())[0];
        assert_eq!(
            kinds(&tree, para),
            vec![MarkupKind::Text("\\effects Effects.".into())]
        );
    }

    #[test]
    fn test_inline_html_is_kept_as_link_text() {
        let tree = MarkupTree::parse("[foo<T>::member]()");
        let para = tree.children(tree.root())[0];
        let link = tree.children(para)[0];

        assert_eq!(
            tree.kind(link),
            &MarkupKind::Link {
                destination: String::new()
            }
        );
        assert_eq!(tree.text(link), "foo<T>::member");
    }

    #[test]
    fn test_positions_are_one_based() {
        let tree = MarkupTree::parse("first\n\n  second");
        let blocks = tree.children(tree.root());
        assert_eq!(tree.position(blocks[0]), SourcePosition::new(1, 1));
        assert_eq!(tree.position(blocks[1]), SourcePosition::new(3, 3));
    }

    #[test]
    fn test_walk_visits_leaves_once_and_containers_twice() {
        let tree = MarkupTree::parse("a *b*\n\n- c");
        let mut events = Vec::new();
        let mut current = Some(WalkEvent::Enter(tree.root()));
        while let Some(event) = current {
            events.push(event);
            current = tree.advance(event);
        }

        let enters = events
            .iter()
            .filter(|e| matches!(e, WalkEvent::Enter(_)))
            .count();
        let exits = events.len() - enters;
        // document, paragraph, emphasis, list, item; tight items have no paragraph
        assert_eq!(exits, 5);
        assert_eq!(enters, tree.len());
        assert_eq!(events.last(), Some(&WalkEvent::Exit(tree.root())));
    }
}
