use serde::{Deserialize, Serialize};

/// The role of a top-level comment paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Brief,
    Details,
    Parameter,
    TemplateParameter,
    BaseClass,
    Return,
    Effects,
    Notes,
    Requires,
    See,
    Module,
    Group,
    Exclude,
    UniqueName,
    OutputSection,
    Invalid,
}

impl SectionKind {
    pub const ALL: [SectionKind; 16] = [
        SectionKind::Brief,
        SectionKind::Details,
        SectionKind::Parameter,
        SectionKind::TemplateParameter,
        SectionKind::BaseClass,
        SectionKind::Return,
        SectionKind::Effects,
        SectionKind::Notes,
        SectionKind::Requires,
        SectionKind::See,
        SectionKind::Module,
        SectionKind::Group,
        SectionKind::Exclude,
        SectionKind::UniqueName,
        SectionKind::OutputSection,
        SectionKind::Invalid,
    ];

    /// Title shown for the section unless the configuration renames it.
    pub fn default_title(self) -> &'static str {
        match self {
            SectionKind::Brief | SectionKind::Details | SectionKind::Invalid => "",
            SectionKind::Parameter => "Parameters",
            SectionKind::TemplateParameter => "Template parameters",
            SectionKind::BaseClass => "Base classes",
            SectionKind::Return => "Return values",
            SectionKind::Effects => "Effects",
            SectionKind::Notes => "Notes",
            SectionKind::Requires => "Requires",
            SectionKind::See => "See also",
            SectionKind::Module => "Module",
            SectionKind::Group => "Group",
            SectionKind::Exclude => "Exclude",
            SectionKind::UniqueName => "Unique name",
            SectionKind::OutputSection => "Output section",
        }
    }

    /// Command word selecting this kind, `None` for implicit kinds.
    pub fn default_command(self) -> Option<&'static str> {
        match self {
            SectionKind::Parameter => Some("param"),
            SectionKind::TemplateParameter => Some("tparam"),
            SectionKind::BaseClass => Some("base"),
            SectionKind::Return => Some("return"),
            SectionKind::Effects => Some("effects"),
            SectionKind::Notes => Some("notes"),
            SectionKind::Requires => Some("requires"),
            SectionKind::See => Some("see"),
            SectionKind::Module => Some("module"),
            SectionKind::Group => Some("group"),
            SectionKind::Exclude => Some("exclude"),
            SectionKind::UniqueName => Some("unique_name"),
            SectionKind::Brief
            | SectionKind::Details
            | SectionKind::OutputSection
            | SectionKind::Invalid => None,
        }
    }

    /// Commands that configure the entity instead of producing visible text.
    pub fn is_metadata(self) -> bool {
        matches!(
            self,
            SectionKind::Module | SectionKind::Group | SectionKind::Exclude | SectionKind::UniqueName
        )
    }

    /// Sections that document a named sub-element with its own anchor.
    pub fn is_inline_entity(self) -> bool {
        matches!(
            self,
            SectionKind::Parameter | SectionKind::TemplateParameter | SectionKind::BaseClass
        )
    }
}
