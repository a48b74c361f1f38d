//! Line-oriented host that prints everything the engine applies.

use std::fmt;
use std::io::Write;

use almanac_annotate::{CategoryId, Decoration, DocumentLink, FoldRange};
use almanac_primitives::{DocumentId, PositionRange};
use almanac_sync::{AnnotationHost, Notice, NoticeLevel};
use tracing::warn;

/// Prints annotations to a writer, one per line.
///
/// Empty replacement lists are not printed.
#[derive(Debug)]
pub struct ConsoleHost<W> {
	out: W,
}

impl<W: Write> ConsoleHost<W> {
	pub fn new(out: W) -> Self {
		Self { out }
	}

	pub fn into_inner(self) -> W {
		self.out
	}

	fn emit(&mut self, line: fmt::Arguments<'_>) {
		if let Err(error) = writeln!(self.out, "{line}") {
			warn!(%error, "console.write_failed");
		}
	}
}

struct Span(PositionRange);

impl fmt::Display for Span {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let PositionRange { start, end } = self.0;
		write!(f, "{}:{}-{}:{}", start.line + 1, start.character + 1, end.line + 1, end.character + 1)
	}
}

impl<W: Write + Send + 'static> AnnotationHost for ConsoleHost<W> {
	fn set_styles(&mut self, doc: DocumentId, category: CategoryId, decorations: &[Decoration]) {
		for d in decorations {
			match d.hover {
				Some(hover) => self.emit(format_args!("{doc} style {category} {} ({hover})", Span(d.span))),
				None => self.emit(format_args!("{doc} style {category} {}", Span(d.span))),
			}
		}
	}

	fn set_folds(&mut self, doc: DocumentId, folds: &[FoldRange]) {
		for fold in folds {
			let bound = |b: Option<u32>| b.map_or_else(|| "?".to_owned(), |n| n.to_string());
			self.emit(format_args!("{doc} fold {}-{}", bound(fold.start_line), bound(fold.end_line)));
		}
	}

	fn set_links(&mut self, doc: DocumentId, links: &[DocumentLink]) {
		for link in links {
			self.emit(format_args!("{doc} link {} {}", Span(link.span), link.target));
		}
	}

	fn reveal_line(&mut self, doc: DocumentId, line: u32) {
		self.emit(format_args!("{doc} reveal {}", line + 1));
	}

	fn notify(&mut self, notice: Notice) {
		let level = match notice.level {
			NoticeLevel::Info => "info",
			NoticeLevel::Error => "error",
		};
		self.emit(format_args!("[{level}] {notice}"));
	}
}
