//! Ticket link extraction.
//!
//! A [`LinkDefinition`] pairs a pattern with a URL template; every match in
//! the document becomes a link whose target is the template with `$1`
//! replaced by the matched text.

use almanac_primitives::{OffsetRange, PositionRange, Rope, range_to_positions};
use regex::Regex;

/// Placeholder replaced by the matched text.
pub const PLACEHOLDER: &str = "$1";

/// Pattern and URL template of one link kind.
#[derive(Debug, Clone)]
pub struct LinkDefinition {
	pattern: Regex,
	url_template: String,
}

impl LinkDefinition {
	/// Compiles a definition.
	pub fn new(pattern: &str, url_template: impl Into<String>) -> Result<Self, regex::Error> {
		Ok(Self {
			pattern: Regex::new(pattern)?,
			url_template: url_template.into(),
		})
	}

	/// Returns the link target for a matched text.
	pub fn target_for(&self, matched: &str) -> String {
		self.url_template.replacen(PLACEHOLDER, matched, 1)
	}
}

/// A link found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
	pub range: OffsetRange,
	pub span: PositionRange,
	pub target: String,
}

/// Finds all links of all definitions in `text`.
pub fn extract_links(text: &Rope, definitions: &[LinkDefinition]) -> Vec<DocumentLink> {
	if definitions.is_empty() {
		return Vec::new();
	}

	let haystack = text.to_string();
	let mut links = Vec::new();
	for def in definitions {
		for m in def.pattern.find_iter(&haystack) {
			let range = OffsetRange::new(text.byte_to_char(m.start()), text.byte_to_char(m.end()));
			let Some(span) = range_to_positions(text, range) else {
				continue;
			};
			links.push(DocumentLink {
				range,
				span,
				target: def.target_for(m.as_str()),
			});
		}
	}
	links
}
