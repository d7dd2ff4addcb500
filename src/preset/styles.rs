//! Semantic roles and the resolved style table.

use super::{FontSpec, ParagraphSpec, StylePreset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A semantic role a piece of output content plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Body text
    Normal,
    /// Heading, level 1
    Heading1,
    /// Heading, level 2
    Heading2,
    /// Heading, level 3
    Heading3,
    /// Heading, level 4
    Heading4,
    /// Heading, level 5
    Heading5,
    /// Heading, level 6
    Heading6,
    /// Table body cells
    TableText,
    /// Table header cells
    TableHeaderText,
    /// Caption above a table
    TableCaption,
    /// Caption below a figure
    FigureCaption,
    /// Code block lines
    ListingText,
    /// Title above the table of contents
    TocTitle,
}

impl Role {
    /// All roles, in resolution order.
    pub const ALL: [Role; 13] = [
        Role::Normal,
        Role::Heading1,
        Role::Heading2,
        Role::Heading3,
        Role::Heading4,
        Role::Heading5,
        Role::Heading6,
        Role::TableText,
        Role::TableHeaderText,
        Role::TableCaption,
        Role::FigureCaption,
        Role::ListingText,
        Role::TocTitle,
    ];

    /// Role name as written in preset files.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Normal => "normal",
            Role::Heading1 => "heading1",
            Role::Heading2 => "heading2",
            Role::Heading3 => "heading3",
            Role::Heading4 => "heading4",
            Role::Heading5 => "heading5",
            Role::Heading6 => "heading6",
            Role::TableText => "tableText",
            Role::TableHeaderText => "tableHeaderText",
            Role::TableCaption => "tableCaption",
            Role::FigureCaption => "figureCaption",
            Role::ListingText => "listingText",
            Role::TocTitle => "tocTitle",
        }
    }

    /// Look up a role by its preset-file name.
    pub fn from_name(name: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == name)
    }

    /// Heading role for a level; levels above 6 map to `Heading6`.
    pub fn heading(level: u8) -> Role {
        match level {
            0 | 1 => Role::Heading1,
            2 => Role::Heading2,
            3 => Role::Heading3,
            4 => Role::Heading4,
            5 => Role::Heading5,
            _ => Role::Heading6,
        }
    }

    /// Heading level of this role, if it is a heading.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            Role::Heading1 => Some(1),
            Role::Heading2 => Some(2),
            Role::Heading3 => Some(3),
            Role::Heading4 => Some(4),
            Role::Heading5 => Some(5),
            Role::Heading6 => Some(6),
            _ => None,
        }
    }

    /// Declared roles consulted, in order, when this role is missing.
    /// `Normal` in the chain means the resolved body style.
    fn fallbacks(self) -> &'static [Role] {
        match self {
            Role::Normal | Role::TocTitle => &[],
            Role::Heading1
            | Role::Heading2
            | Role::Heading3
            | Role::Heading4
            | Role::Heading5
            | Role::Heading6 => &[Role::Heading3, Role::Heading2, Role::Heading1, Role::Normal],
            Role::TableHeaderText => &[Role::TableText, Role::Normal],
            Role::TableText | Role::TableCaption | Role::FigureCaption | Role::ListingText => {
                &[Role::Normal]
            }
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete font and paragraph settings for one role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleStyle {
    /// Font settings
    pub font: FontSpec,
    /// Paragraph settings
    pub paragraph: ParagraphSpec,
}

impl RoleStyle {
    /// Build a role style from base font and paragraph settings.
    pub fn new(font: FontSpec, paragraph: ParagraphSpec) -> Self {
        Self { font, paragraph }
    }
}

/// Style table with an entry for every [`Role`].
#[derive(Debug, Clone)]
pub struct ResolvedStyles {
    normal: RoleStyle,
    styles: BTreeMap<Role, RoleStyle>,
}

impl ResolvedStyles {
    /// Fill in every role missing from the preset.
    ///
    /// Headings fall back to heading3, heading2, heading1, then body text.
    /// Table header text falls back to table text. Captions and listings
    /// fall back to body text. The table-of-contents title copies the
    /// resolved heading1 style with page-break-before turned off.
    pub fn synthesize(preset: &StylePreset) -> Self {
        let normal = preset
            .styles
            .get(&Role::Normal)
            .cloned()
            .unwrap_or_else(|| RoleStyle::new(preset.font.clone(), preset.paragraph.clone()));

        let mut styles = BTreeMap::new();
        for role in Role::ALL {
            let style = match preset.styles.get(&role) {
                Some(declared) => declared.clone(),
                None if role == Role::TocTitle => {
                    let mut title = styles
                        .get(&Role::Heading1)
                        .cloned()
                        .unwrap_or_else(|| normal.clone());
                    title.paragraph.page_break_before = false;
                    title
                }
                None => role
                    .fallbacks()
                    .iter()
                    .find_map(|fallback| match fallback {
                        Role::Normal => Some(&normal),
                        other => preset.styles.get(other),
                    })
                    .cloned()
                    .unwrap_or_else(|| normal.clone()),
            };
            styles.insert(role, style);
        }

        Self { normal, styles }
    }

    /// Style for a role.
    pub fn get(&self, role: Role) -> &RoleStyle {
        self.styles.get(&role).unwrap_or(&self.normal)
    }

    /// Iterate over every role and its style.
    pub fn iter(&self) -> impl Iterator<Item = (Role, &RoleStyle)> {
        self.styles.iter().map(|(role, style)| (*role, style))
    }
}
