//! Folding lines to fold regions.

/// Kind of a fold region. The service only produces regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FoldKind {
	#[default]
	Region,
}

/// A foldable line range as reported by the service.
///
/// Bounds are passed through unvalidated: a non-numeric token becomes `None`
/// and `start_line <= end_line` is not checked. Hosts decide how to treat
/// such ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FoldRange {
	pub start_line: Option<u32>,
	pub end_line: Option<u32>,
	pub kind: FoldKind,
}

impl FoldRange {
	/// Creates a region from numeric bounds.
	pub const fn region(start_line: u32, end_line: u32) -> Self {
		Self {
			start_line: Some(start_line),
			end_line: Some(end_line),
			kind: FoldKind::Region,
		}
	}

	/// Returns both bounds if they are numeric and ordered.
	pub fn lines(&self) -> Option<(u32, u32)> {
		match (self.start_line, self.end_line) {
			(Some(start), Some(end)) if start <= end => Some((start, end)),
			_ => None,
		}
	}
}

/// Parses one `startLine-endLine` line. Blank lines yield `None`.
pub fn parse_fold_line(line: &str) -> Option<FoldRange> {
	if line.trim().is_empty() {
		return None;
	}
	let mut parts = line.split('-');
	let bound = |token: Option<&str>| token.and_then(|t| t.trim().parse().ok());
	Some(FoldRange {
		start_line: bound(parts.next()),
		end_line: bound(parts.next()),
		kind: FoldKind::Region,
	})
}

/// Maps all folding lines of one response. The result replaces every
/// previously applied region.
pub fn map_folds<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<FoldRange> {
	lines.into_iter().filter_map(parse_fold_line).collect()
}
