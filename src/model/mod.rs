//! Document model types for parsed markup.
//!
//! This module defines the intermediate representation that bridges the
//! markup parser and the document assembler. A [`DocumentModel`] is produced
//! once per parse, never mutated afterwards, and consumed by one assembly.

mod document;
mod inline;
mod resource;

pub use document::{Block, Cell, DocumentModel, ListItem, TableRow};
pub use inline::{inlines_to_text, Inline, Marks, TextRun};
pub use resource::ImageResource;
