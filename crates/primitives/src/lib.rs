//! Core text types shared by the annotation engine: document snapshots,
//! character ranges and line/column positions.

/// Document snapshots and identifiers.
pub mod document;
/// Line/column positions and offset conversion.
pub mod position;
/// Character offset ranges.
pub mod range;

pub use document::{Document, DocumentId};
pub use position::{Position, PositionRange, char_to_position, range_to_positions};
pub use range::{CharIdx, CharLen, OffsetRange};
pub use ropey::{Rope, RopeSlice};
