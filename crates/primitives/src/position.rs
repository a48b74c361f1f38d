use ropey::Rope;

use crate::range::{CharIdx, OffsetRange};

/// Zero-based line/column position, columns counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
	/// Zero-based line index.
	pub line: u32,
	/// Zero-based character offset in the line.
	pub character: u32,
}

impl Position {
	/// Creates a new position.
	pub const fn new(line: u32, character: u32) -> Self {
		Self { line, character }
	}
}

/// Range with start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionRange {
	/// Start position (inclusive).
	pub start: Position,
	/// End position (exclusive).
	pub end: Position,
}

impl PositionRange {
	/// Creates a new range.
	pub const fn new(start: Position, end: Position) -> Self {
		Self { start, end }
	}
}

/// Converts a character offset into a line/column position.
///
/// Returns `None` when the offset lies past the end of the text. The offset
/// equal to the text length is valid and maps to the end of the last line.
pub fn char_to_position(text: &Rope, idx: CharIdx) -> Option<Position> {
	if idx > text.len_chars() {
		return None;
	}
	let line = text.char_to_line(idx);
	let character = idx - text.line_to_char(line);
	Some(Position {
		line: u32::try_from(line).ok()?,
		character: u32::try_from(character).ok()?,
	})
}

/// Converts an offset range into a position range.
///
/// Returns `None` for inverted ranges and ranges reaching past the text.
pub fn range_to_positions(text: &Rope, range: OffsetRange) -> Option<PositionRange> {
	if !range.fits_within(text.len_chars()) {
		return None;
	}
	Some(PositionRange {
		start: char_to_position(text, range.start)?,
		end: char_to_position(text, range.end)?,
	})
}
