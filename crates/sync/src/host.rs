//! The editor side of the engine.

use std::fmt;

use almanac_annotate::{CategoryId, Decoration, DecorationSet, DocumentLink, FoldRange};
use almanac_primitives::DocumentId;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
	Info,
	Error,
}

/// A dismissable message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
	pub level: NoticeLevel,
	pub message: String,
}

impl Notice {
	pub fn info(message: impl Into<String>) -> Self {
		Self {
			level: NoticeLevel::Info,
			message: message.into(),
		}
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self {
			level: NoticeLevel::Error,
			message: message.into(),
		}
	}
}

impl fmt::Display for Notice {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.message)
	}
}

/// Receives everything the engine produces.
///
/// All calls replace previous state wholesale: an empty slice means "none
/// left", never "unchanged".
pub trait AnnotationHost: Send + 'static {
	/// Replaces the ranges styled as `category` in `doc`.
	fn set_styles(&mut self, doc: DocumentId, category: CategoryId, decorations: &[Decoration]);

	/// Replaces the fold regions of `doc`.
	fn set_folds(&mut self, doc: DocumentId, folds: &[FoldRange]);

	/// Replaces the links of `doc`.
	fn set_links(&mut self, doc: DocumentId, links: &[DocumentLink]);

	/// Opens `doc` with `line` (zero based) in view.
	fn reveal_line(&mut self, doc: DocumentId, line: u32);

	fn notify(&mut self, notice: Notice);

	/// Applies every category of `set`, empty ones included.
	fn set_decorations(&mut self, doc: DocumentId, set: &DecorationSet) {
		for (category, decorations) in set.iter() {
			self.set_styles(doc, category, decorations);
		}
	}

	/// Removes everything the engine applied to `doc`.
	fn clear(&mut self, doc: DocumentId) {
		self.set_decorations(doc, &DecorationSet::empty());
		self.set_folds(doc, &[]);
		self.set_links(doc, &[]);
	}
}
