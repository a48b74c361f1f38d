//! Document snapshots as handed over by the host editor.
//!
//! The engine never mutates a document. Hosts produce a fresh [`Document`]
//! for every edit; cloning the underlying rope is cheap, so snapshots can be
//! kept alongside in-flight requests.

use std::fmt;
use std::path::{Path, PathBuf};

use ropey::Rope;

/// Host-assigned document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u64);

impl fmt::Display for DocumentId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "doc#{}", self.0)
	}
}

/// Immutable snapshot of a host document at a given version.
#[derive(Debug, Clone)]
pub struct Document {
	id: DocumentId,
	path: PathBuf,
	text: Rope,
	version: u64,
}

impl Document {
	/// Creates the initial snapshot (version 0) of a document.
	pub fn new(id: DocumentId, path: impl Into<PathBuf>, text: &str) -> Self {
		Self {
			id,
			path: path.into(),
			text: Rope::from_str(text),
			version: 0,
		}
	}

	/// Returns the snapshot that follows an edit replacing the whole content.
	///
	/// The version is incremented by exactly one.
	pub fn edited(&self, text: &str) -> Self {
		Self {
			id: self.id,
			path: self.path.clone(),
			text: Rope::from_str(text),
			version: self.version + 1,
		}
	}

	/// Returns the document identifier.
	pub fn id(&self) -> DocumentId {
		self.id
	}

	/// Returns the file path backing the document.
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Returns the document content.
	pub fn text(&self) -> &Rope {
		&self.text
	}

	/// Returns the monotonic edit version.
	pub fn version(&self) -> u64 {
		self.version
	}

	/// Returns the content length in characters.
	pub fn len_chars(&self) -> usize {
		self.text.len_chars()
	}

	/// Returns true if the file name ends with `suffix`.
	///
	/// Matching is on the full path string, so `todo.txt` matches both
	/// `/home/me/todo.txt` and `/home/me/work-todo.txt`.
	pub fn name_ends_with(&self, suffix: &str) -> bool {
		!suffix.is_empty() && self.path.to_string_lossy().ends_with(suffix)
	}
}
