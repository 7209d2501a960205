use crate::config::CommentConfig;
use crate::source::SourcePosition;

use super::builder::BlockTreeBuilder;
use super::section::SectionKind;

const DECORATION: char = '/';

/// Strip a physical line's comment decoration: leading blanks, then any run of
/// `/` and the blanks following it.
pub fn strip_decoration(line: &str) -> &str {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let line = line.trim_start_matches([' ', '\t']);
    if line.starts_with(DECORATION) {
        line.trim_start_matches(DECORATION).trim_start_matches([' ', '\t'])
    } else {
        line
    }
}

/// Origin of every line fed to the builder: raw comment line and the number
/// of decoration bytes stripped from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineMap {
    origins: Vec<(usize, usize)>,
}

impl LineMap {
    /// Translate a position in the fed text back into the raw comment.
    pub fn to_source(&self, position: SourcePosition) -> SourcePosition {
        match position
            .line
            .checked_sub(1)
            .and_then(|index| self.origins.get(index))
        {
            Some(&(line, offset)) => SourcePosition::new(line, position.column + offset),
            None => position,
        }
    }
}

/// Feed a raw comment into `builder` line by line.
///
/// Every line but the last keeps its newline. A line opening with a known
/// command word starts its own paragraph, so a blank line is fed ahead of it
/// unless it is the first line or sits inside a fenced code block. Any other
/// text after the command character continues the current paragraph.
pub fn feed_comment<B: BlockTreeBuilder>(
    builder: &mut B,
    raw: &str,
    config: &CommentConfig,
) -> LineMap {
    let mut map = LineMap::default();
    let mut lines = raw.split('\n').enumerate().peekable();
    let mut in_fence = false;

    while let Some((index, line)) = lines.next() {
        let raw_line = index + 1;
        let content = strip_decoration(line);
        let offset = line.strip_suffix('\r').unwrap_or(line).len() - content.len();
        let has_newline = lines.peek().is_some();

        if index > 0 && !in_fence && !config.implicit_paragraph && starts_command(content, config)
        {
            builder.feed("\n");
            map.origins.push((raw_line, 0));
        }
        if is_fence(content) {
            in_fence = !in_fence;
        }

        map.origins.push((raw_line, offset));
        if has_newline {
            builder.feed(&format!("{content}\n"));
            if config.implicit_paragraph {
                builder.feed("\n");
                map.origins.push((raw_line, 0));
            }
        } else {
            builder.feed(content);
        }
    }

    map
}

fn starts_command(content: &str, config: &CommentConfig) -> bool {
    let Some(rest) = content.strip_prefix(config.command_character) else {
        return false;
    };
    let word = rest.split_whitespace().next().unwrap_or_default();
    word.starts_with(|c: char| c.is_ascii_alphabetic())
        && config.section_for_command(word) != SectionKind::Invalid
}

fn is_fence(content: &str) -> bool {
    content.starts_with("```") || content.starts_with("~~~")
}
