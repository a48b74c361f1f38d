//! Formatting lines to per-category style ranges.
//!
//! The service answers `/format` with one `start,end,category` line per
//! styled range, offsets counted in characters of the text that was sent.
//! Mapping is tolerant: a line that does not parse is skipped and the rest of
//! the batch is still applied.

use std::collections::BTreeMap;

use almanac_primitives::{OffsetRange, PositionRange, Rope, range_to_positions};
use thiserror::Error;
use tracing::trace;

use crate::category::CategoryId;
use crate::style::style_for;

/// A categorized character range as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleRange {
	pub start: usize,
	pub end: usize,
	pub category: CategoryId,
}

impl StyleRange {
	/// Returns the covered character range.
	pub fn offsets(&self) -> OffsetRange {
		OffsetRange::new(self.start, self.end)
	}
}

/// Reasons a formatting line is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
	/// Wrong token count or a non-integer offset.
	#[error("malformed line: {0:?}")]
	MalformedLine(String),
	/// Category key outside the taxonomy.
	#[error("unknown category: {0:?}")]
	UnknownCategory(String),
}

/// Parses one `start,end,category` line.
pub fn parse_format_line(line: &str) -> Result<StyleRange, LineError> {
	let malformed = || LineError::MalformedLine(line.to_owned());

	let mut parts = line.split(',');
	let (Some(start), Some(end), Some(key), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
		return Err(malformed());
	};
	let start = start.trim().parse().map_err(|_| malformed())?;
	let end = end.trim().parse().map_err(|_| malformed())?;
	let category = CategoryId::from_wire(key.trim()).ok_or_else(|| LineError::UnknownCategory(key.to_owned()))?;

	Ok(StyleRange { start, end, category })
}

/// A style range positioned against a document snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoration {
	pub range: OffsetRange,
	pub span: PositionRange,
	pub hover: Option<&'static str>,
}

/// Complete replacement decorations for one document, keyed by category.
///
/// Every category of the taxonomy is present, most of them usually empty.
/// Hosts must apply the empty lists as well: that is what clears ranges a
/// previous cycle applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationSet {
	by_category: BTreeMap<CategoryId, Vec<Decoration>>,
}

impl Default for DecorationSet {
	fn default() -> Self {
		Self::empty()
	}
}

impl DecorationSet {
	/// Returns a set with an empty list for every category.
	pub fn empty() -> Self {
		Self {
			by_category: CategoryId::all().map(|c| (c, Vec::new())).collect(),
		}
	}

	/// Returns the decorations of one category.
	pub fn get(&self, category: CategoryId) -> &[Decoration] {
		self.by_category.get(&category).map_or(&[], Vec::as_slice)
	}

	/// Iterates all categories with their (possibly empty) decorations.
	pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &[Decoration])> {
		self.by_category.iter().map(|(c, list)| (*c, list.as_slice()))
	}

	/// Returns the number of decorations across all categories.
	pub fn total(&self) -> usize {
		self.by_category.values().map(Vec::len).sum()
	}

	fn push(&mut self, category: CategoryId, decoration: Decoration) {
		self.by_category.entry(category).or_default().push(decoration);
	}
}

/// Maps formatting lines to decorations positioned against `text`.
///
/// `text` must be the snapshot that was sent to the service. Ranges that do
/// not fit that snapshot are dropped along with unparsable lines.
pub fn map_decorations<'a>(lines: impl IntoIterator<Item = &'a str>, text: &Rope) -> DecorationSet {
	let mut set = DecorationSet::empty();
	let mut skipped = 0usize;

	for line in lines {
		if line.trim().is_empty() {
			continue;
		}
		let styled = match parse_format_line(line) {
			Ok(styled) => styled,
			Err(err) => {
				trace!(error = %err, "decoration.skip_line");
				skipped += 1;
				continue;
			}
		};
		let Some(span) = range_to_positions(text, styled.offsets()) else {
			trace!(start = styled.start, end = styled.end, len = text.len_chars(), "decoration.out_of_bounds");
			skipped += 1;
			continue;
		};
		set.push(
			styled.category,
			Decoration {
				range: styled.offsets(),
				span,
				hover: style_for(styled.category).hover,
			},
		);
	}

	trace!(applied = set.total(), skipped, "decoration.mapped");
	set
}
