use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::comment::SectionKind;

/// Settings shared read-only by every comment parse in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentConfig {
    /// Character introducing a command, `\` by default
    pub command_character: char,
    /// Treat every comment line as its own paragraph
    pub implicit_paragraph: bool,
    /// Renamed section titles
    pub section_titles: BTreeMap<SectionKind, String>,
    /// Renamed command words; the default word of a renamed kind is no longer recognized
    pub commands: BTreeMap<SectionKind, String>,
    /// Additional command words producing titled output sections
    pub output_sections: Vec<String>,
}

impl Default for CommentConfig {
    fn default() -> Self {
        Self {
            command_character: '\\',
            implicit_paragraph: false,
            section_titles: BTreeMap::new(),
            commands: BTreeMap::new(),
            output_sections: Vec::new(),
        }
    }
}

impl CommentConfig {
    pub fn with_implicit_paragraph(mut self, implicit_paragraph: bool) -> Self {
        self.implicit_paragraph = implicit_paragraph;
        self
    }

    pub fn with_command_character(mut self, command_character: char) -> Self {
        self.command_character = command_character;
        self
    }

    pub fn with_section_title(mut self, kind: SectionKind, title: impl Into<String>) -> Self {
        self.section_titles.insert(kind, title.into());
        self
    }

    pub fn with_command(mut self, kind: SectionKind, word: impl Into<String>) -> Self {
        self.commands.insert(kind, word.into());
        self
    }

    pub fn with_output_section(mut self, name: impl Into<String>) -> Self {
        self.output_sections.push(name.into());
        self
    }

    /// Display title for a section kind, honouring renames.
    pub fn section_title(&self, kind: SectionKind) -> String {
        self.section_titles
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| kind.default_title().to_string())
    }

    /// Command word currently selecting `kind`.
    pub fn command_word(&self, kind: SectionKind) -> Option<&str> {
        self.commands
            .get(&kind)
            .map(String::as_str)
            .or_else(|| kind.default_command())
    }

    /// Look up a command word, returning [`SectionKind::Invalid`] for unknown words.
    pub fn section_for_command(&self, word: &str) -> SectionKind {
        if word.is_empty() {
            return SectionKind::Invalid;
        }

        SectionKind::ALL
            .into_iter()
            .find(|kind| self.command_word(*kind) == Some(word))
            .or_else(|| {
                self.output_sections
                    .iter()
                    .any(|name| name == word)
                    .then_some(SectionKind::OutputSection)
            })
            .unwrap_or(SectionKind::Invalid)
    }
}
