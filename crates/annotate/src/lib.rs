//! Annotation mapping for todo documents.
//!
//! Turns the raw line protocol of the analysis service into editor-facing
//! annotations:
//! - [`decoration`]: `start,end,category` lines into per-category style ranges.
//! - [`folding`]: `startLine-endLine` lines into fold regions.
//! - [`links`]: configured ticket patterns into document links.
//!
//! The category taxonomy and its style table live in [`category`] and
//! [`style`]. Unknown categories are rejected when a line is parsed, so
//! everything past that boundary works on the closed [`CategoryId`] enum.

pub mod category;
pub mod decoration;
pub mod folding;
pub mod links;
pub mod style;

pub use category::{CategoryId, DueBucket, DueDays};
pub use decoration::{Decoration, DecorationSet, LineError, StyleRange, map_decorations, parse_format_line};
pub use folding::{FoldKind, FoldRange, map_folds, parse_fold_line};
pub use links::{DocumentLink, LinkDefinition, extract_links};
pub use style::{Border, Icon, Rgb, StyleDescriptor, style_for};
