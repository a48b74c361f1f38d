/// A position in the text, measured in characters (not bytes).
///
/// Offsets reported by the analysis service are interpreted in this space.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
pub type CharLen = usize;

/// Half-open character range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OffsetRange {
	/// First character covered by the range.
	pub start: CharIdx,
	/// One past the last character covered by the range.
	pub end: CharIdx,
}

impl OffsetRange {
	/// Creates a new range. No ordering check is performed.
	pub const fn new(start: CharIdx, end: CharIdx) -> Self {
		Self { start, end }
	}

	/// Returns the number of characters covered, or zero for inverted ranges.
	pub fn len(&self) -> CharLen {
		self.end.saturating_sub(self.start)
	}

	/// Returns true if the range covers no characters.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns true if the range is ordered and lies within a text of `len` characters.
	pub fn fits_within(&self, len: CharLen) -> bool {
		self.start <= self.end && self.end <= len
	}
}
