//! # Section Classification
//!
//! Converts the generic markup tree into a typed [`Comment`] and assigns every
//! top-level paragraph its [`SectionKind`].
//!
//! The walk is an explicit enter/exit cursor over the markup arena. Typed nodes
//! are appended to the innermost open container as they are entered, except for
//! direct children of the document, which are buffered and attached once the
//! walk is done. Top-level paragraphs are classified when they are exited.
//!
//! Paragraphs nested in lists, quotes or other containers are never
//! classified: they belong to the section that holds them, so a leading
//! command character there is plain text and produces no diagnostic.
//!
//! A node that fails conversion or classification is unlinked from the markup
//! tree and the cursor is reset to the exit of its previous sibling, or to the
//! enter of its parent when it has none. The next advance then lands on the
//! node that followed the removed one.

use crate::config::CommentConfig;
use crate::diagnostics::Diagnostic;
use crate::source::SourcePosition;

use super::builder::{MarkupId, MarkupKind, MarkupTree, WalkEvent};
use super::error::ParseError;
use super::node::{Comment, CommentNode, Link, LinkDestination, NodeId};
use super::normalize::LineMap;
use super::section::SectionKind;

pub(crate) struct Classifier<'a> {
    config: &'a CommentConfig,
    entity: &'a str,
    lines: &'a LineMap,
    tree: MarkupTree,
    comment: Comment,
    open: Vec<(MarkupId, NodeId)>,
    top_level: Vec<(MarkupId, NodeId)>,
    brief_pending: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Classifier<'a> {
    pub(crate) fn new(
        tree: MarkupTree,
        lines: &'a LineMap,
        entity: &'a str,
        config: &'a CommentConfig,
    ) -> Self {
        let comment = Comment::new();
        let open = vec![(tree.root(), comment.root())];
        Self {
            config,
            entity,
            lines,
            tree,
            comment,
            open,
            top_level: Vec::new(),
            brief_pending: true,
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> (Comment, Vec<Diagnostic>) {
        let root = self.tree.root();
        let mut current = Some(WalkEvent::Enter(root));

        while let Some(event) = current {
            let outcome = match event {
                WalkEvent::Enter(id) | WalkEvent::Exit(id) if id == root => Ok(()),
                WalkEvent::Enter(id) => self.enter(id),
                WalkEvent::Exit(id) => self.exit(id),
            };
            current = match outcome {
                Ok(()) => self.tree.advance(event),
                Err(error) => self.recover(event.node(), error),
            };
        }

        let document = self.comment.root();
        for (_, typed) in std::mem::take(&mut self.top_level) {
            self.comment.append(document, typed);
        }
        (self.comment, self.diagnostics)
    }

    fn enter(&mut self, id: MarkupId) -> Result<(), ParseError> {
        let node = self.convert(id)?;
        let is_container = self.tree.kind(id).is_container();
        let typed = self.comment.alloc(node, self.source_position(id));

        if self.tree.parent(id) == Some(self.tree.root()) {
            self.top_level.push((id, typed));
        } else if let Some(&(_, parent)) = self.open.last() {
            self.comment.append(parent, typed);
        }

        if is_container {
            self.open.push((id, typed));
        }
        Ok(())
    }

    fn exit(&mut self, id: MarkupId) -> Result<(), ParseError> {
        let Some((_, typed)) = self.open.pop() else {
            return Ok(());
        };
        if self.tree.parent(id) == Some(self.tree.root())
            && self.comment.section_kind(typed).is_some()
        {
            self.classify(typed)?;
        }
        Ok(())
    }

    fn convert(&self, id: MarkupId) -> Result<CommentNode, ParseError> {
        let unsupported = |construct: &str| ParseError::UnsupportedMarkup {
            construct: construct.to_string(),
            position: self.source_position(id),
        };

        Ok(match self.tree.kind(id) {
            MarkupKind::Document => CommentNode::Document,
            MarkupKind::Paragraph => CommentNode::Paragraph {
                kind: SectionKind::Details,
                title: String::new(),
            },
            MarkupKind::Heading(level) => CommentNode::Heading { level: *level },
            MarkupKind::BlockQuote => CommentNode::BlockQuote,
            MarkupKind::CodeBlock { language, code } => CommentNode::CodeBlock {
                language: language.clone(),
                code: code.clone(),
            },
            MarkupKind::List { start } => CommentNode::List {
                ordered: start.is_some(),
                start: *start,
            },
            MarkupKind::Item => CommentNode::ListItem,
            MarkupKind::ThematicBreak => CommentNode::ThematicBreak,
            MarkupKind::Text(text) => CommentNode::Text(text.clone()),
            MarkupKind::Code(code) => CommentNode::CodeSpan(code.clone()),
            MarkupKind::Emphasis => CommentNode::Emphasis,
            MarkupKind::Strong => CommentNode::Strong,
            MarkupKind::SoftBreak => CommentNode::SoftBreak,
            MarkupKind::HardBreak => CommentNode::HardBreak,
            MarkupKind::Link { destination } => CommentNode::Link(Link {
                raw_name: self.tree.text(id).trim().to_string(),
                destination: if destination.is_empty() {
                    LinkDestination::Unresolved
                } else {
                    LinkDestination::Explicit(destination.clone())
                },
            }),
            MarkupKind::HtmlBlock(_) => return Err(unsupported("HTML block")),
            MarkupKind::Image { .. } => return Err(unsupported("image")),
            MarkupKind::Unsupported(name) => return Err(unsupported(name)),
        })
    }

    /// Assign a top-level paragraph its kind and title, stripping the command.
    fn classify(&mut self, paragraph: NodeId) -> Result<(), ParseError> {
        let command = self.leading_command(paragraph);

        let (kind, title) = match command {
            None => {
                let kind = if self.brief_pending {
                    SectionKind::Brief
                } else {
                    SectionKind::Details
                };
                self.brief_pending = false;
                (kind, self.config.section_title(kind))
            }
            Some((text_node, word)) => {
                let kind = self.config.section_for_command(&word);
                if kind == SectionKind::Invalid {
                    return Err(ParseError::UnknownCommand {
                        command: word,
                        position: self.comment.position(paragraph),
                    });
                }
                self.strip_command(text_node, &word);
                let title = if kind == SectionKind::OutputSection {
                    word
                } else {
                    self.config.section_title(kind)
                };
                (kind, title)
            }
        };

        *self.comment.node_mut(paragraph) = CommentNode::Paragraph { kind, title };
        Ok(())
    }

    /// The first child's Text leaf and command word when the paragraph opens with a command.
    fn leading_command(&self, paragraph: NodeId) -> Option<(NodeId, String)> {
        let first = *self.comment.children(paragraph).first()?;
        let CommentNode::Text(text) = self.comment.node(first) else {
            return None;
        };
        let rest = text.strip_prefix(self.config.command_character)?;
        let word = rest
            .chars()
            .take_while(|c| !c.is_whitespace())
            .collect::<String>();
        Some((first, word))
    }

    fn strip_command(&mut self, text_node: NodeId, word: &str) {
        let prefix = self.config.command_character.len_utf8() + word.len();
        if let CommentNode::Text(text) = self.comment.node_mut(text_node) {
            *text = text[prefix..].trim_start().to_string();
        }
    }

    /// Prune the failing node and compute where the walk picks up again.
    fn recover(&mut self, id: MarkupId, error: ParseError) -> Option<WalkEvent> {
        let diagnostic = Diagnostic::warning(self.entity, error.position(), error.to_string());
        diagnostic.log();
        self.diagnostics.push(diagnostic);

        // Conversion fails before anything is allocated; only classified
        // paragraphs have a typed node to drop.
        if let Some(index) = self.top_level.iter().position(|(markup, _)| *markup == id) {
            let (_, typed) = self.top_level.remove(index);
            self.comment.detach(typed);
        }

        let resume = match self.tree.previous_sibling(id) {
            Some(previous) => Some(WalkEvent::Exit(previous)),
            None => self.tree.parent(id).map(WalkEvent::Enter),
        };
        self.tree.unlink(id);
        resume.and_then(|event| self.tree.advance(event))
    }

    fn source_position(&self, id: MarkupId) -> SourcePosition {
        self.lines.to_source(self.tree.position(id))
    }
}
