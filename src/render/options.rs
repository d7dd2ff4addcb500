//! Export options.

use serde::{Deserialize, Serialize};

/// Fixed display width of embedded images, in pixels.
pub const IMAGE_WIDTH_PX: u32 = 500;

/// Fixed display height of embedded images, in pixels.
pub const IMAGE_HEIGHT_PX: u32 = 300;

/// Options controlling one assembly run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Drop page-break markers instead of emitting them
    pub ignore_page_breaks: bool,

    /// Add a page-number header or footer to the main section
    pub enable_pagination: bool,

    /// Put a table of contents on its own page before the content
    pub include_toc: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            ignore_page_breaks: false,
            enable_pagination: true,
            include_toc: false,
        }
    }
}

impl ExportOptions {
    /// Create export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable page-break handling.
    pub fn with_ignore_page_breaks(mut self, ignore: bool) -> Self {
        self.ignore_page_breaks = ignore;
        self
    }

    /// Enable or disable page numbers.
    pub fn with_pagination(mut self, enable: bool) -> Self {
        self.enable_pagination = enable;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, include: bool) -> Self {
        self.include_toc = include;
        self
    }
}
