//! Preview panel lifecycle.
//!
//! At most one panel exists at a time. [`PanelSlot`] creates it on first use
//! and reveals the existing one afterwards. Everything a panel registers is
//! released exactly once when it is disposed.

use almanac_client::PreviewPayload;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::calendar::CalendarControl;
use crate::message::{InboundMessage, OutboundMessage};
use crate::render::PreviewRenderer;
use crate::view::{Node, html_escape};

/// Editor column a panel is shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewColumn {
	#[default]
	Active,
	Beside,
	Numbered(u8),
}

/// A cleanup action run at most once.
#[derive(Default)]
pub struct Disposable(Option<Box<dyn FnOnce() + Send>>);

impl Disposable {
	pub fn new(f: impl FnOnce() + Send + 'static) -> Self {
		Self(Some(Box::new(f)))
	}

	/// Runs the cleanup action. Later calls do nothing.
	pub fn dispose(&mut self) {
		if let Some(f) = self.0.take() {
			f();
		}
	}

	pub fn is_disposed(&self) -> bool {
		self.0.is_none()
	}
}

impl std::fmt::Debug for Disposable {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Disposable").field(&self.is_disposed()).finish()
	}
}

impl Drop for Disposable {
	fn drop(&mut self) {
		self.dispose();
	}
}

/// The preview panel: a renderer plus its lifetime resources.
#[derive(Debug)]
pub struct PreviewPanel {
	renderer: PreviewRenderer,
	last: Option<PreviewPayload>,
	disposables: Vec<Disposable>,
	visible: bool,
	column: ViewColumn,
}

impl PreviewPanel {
	/// Creates a visible panel. The receiver yields the panel's outbound messages.
	pub fn new(
		column: ViewColumn,
		date_format: &str,
		calendar: Box<dyn CalendarControl>,
	) -> (Self, mpsc::UnboundedReceiver<OutboundMessage>) {
		let (tx, rx) = mpsc::unbounded_channel();
		let panel = Self {
			renderer: PreviewRenderer::new(calendar, tx).with_date_format(date_format),
			last: None,
			disposables: Vec::new(),
			visible: true,
			column,
		};
		(panel, rx)
	}

	/// Delivers a message to the surface.
	///
	/// A hidden surface does not render. Updates are remembered either way and
	/// the latest one is rendered when the panel becomes visible again.
	pub fn post_message(&mut self, message: InboundMessage) {
		let InboundMessage::Update { preview } = message;
		if self.visible {
			self.renderer.update(&preview);
		}
		self.last = Some(preview);
	}

	/// Ties `disposable` to the panel's lifetime.
	pub fn register(&mut self, disposable: Disposable) {
		self.disposables.push(disposable);
	}

	/// Records a visibility change. Becoming visible re-renders the last payload.
	pub fn set_visible(&mut self, visible: bool) {
		let shown = visible && !self.visible;
		self.visible = visible;
		if shown && let Some(last) = &self.last {
			debug!("preview.restore");
			self.renderer.update(last);
		}
	}

	/// Brings the panel to the front in `column`.
	pub fn reveal(&mut self, column: ViewColumn) {
		self.column = column;
		self.set_visible(true);
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}

	pub fn column(&self) -> ViewColumn {
		self.column
	}

	pub fn renderer(&self) -> &PreviewRenderer {
		&self.renderer
	}

	pub fn renderer_mut(&mut self) -> &mut PreviewRenderer {
		&mut self.renderer
	}

	/// Last payload posted to the panel.
	pub fn last_payload(&self) -> Option<&PreviewPayload> {
		self.last.as_ref()
	}

	/// Full page for the current fragments, restricted to scripts and styles
	/// carrying `nonce`.
	pub fn page_html(&self, nonce: &str) -> String {
		let section = |nodes: &[Node]| {
			let mut out = String::new();
			nodes.iter().for_each(|n| n.write_html(&mut out));
			out
		};
		let fragments = self.renderer.fragments();
		let due_today = section(&fragments.due_today);
		let due_week = section(&fragments.due_week);
		let overview = section(&fragments.overview);
		let calendar = section(&self.renderer.calendar_nodes());
		let nonce = html_escape(nonce);

		format!(
			r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta http-equiv="Content-Security-Policy" content="default-src 'none'; style-src 'nonce-{nonce}'; script-src 'nonce-{nonce}';">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Todo Preview</title>
<style nonce="{nonce}">{PAGE_STYLE}</style>
</head>
<body>
<h2>Due today</h2>
<div id="due-today">{due_today}</div>
<h2>Due this week</h2>
<div id="due-week">{due_week}</div>
<h2>Overview</h2>
<div id="overview">{overview}</div>
<h2>Calendar</h2>
<div id="calendar">{calendar}</div>
</body>
</html>
"#
		)
	}

	/// Releases every registered resource, most recent first.
	pub fn dispose(&mut self) {
		while let Some(mut d) = self.disposables.pop() {
			d.dispose();
		}
		self.visible = false;
	}
}

impl Drop for PreviewPanel {
	fn drop(&mut self) {
		self.dispose();
	}
}

const PAGE_STYLE: &str = ".moment-cell{cursor:pointer;padding:2px 4px;margin:2px 0;border-radius:3px}\
.due-today{border-left:3px solid #ff0000}\
.due-week{border-left:3px solid #fea4a4}\
.kanban-table{width:100%;table-layout:fixed}\
.kanban-table td{vertical-align:top}\
.calendar-event{padding:2px 4px}";

/// Fresh nonce for [`PreviewPanel::page_html`].
pub fn new_nonce() -> String {
	Uuid::new_v4().simple().to_string()
}

/// Holder of the single preview panel.
#[derive(Debug, Default)]
pub struct PanelSlot {
	current: Option<PreviewPanel>,
}

impl PanelSlot {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the panel, creating it with `create` if none exists.
	///
	/// An existing panel is revealed in `column` instead. The flag is true if
	/// a panel was created.
	pub fn create_or_show(&mut self, column: ViewColumn, create: impl FnOnce() -> PreviewPanel) -> (&mut PreviewPanel, bool) {
		let created = self.current.is_none();
		if let Some(panel) = self.current.as_mut() {
			panel.reveal(column);
		} else {
			debug!(?column, "preview.panel_created");
		}
		let panel = self.current.get_or_insert_with(create);
		(panel, created)
	}

	pub fn current(&self) -> Option<&PreviewPanel> {
		self.current.as_ref()
	}

	pub fn current_mut(&mut self) -> Option<&mut PreviewPanel> {
		self.current.as_mut()
	}

	/// Disposes the panel, if any. Returns true if one was open.
	pub fn dispose(&mut self) -> bool {
		match self.current.take() {
			Some(mut panel) => {
				panel.dispose();
				debug!("preview.panel_disposed");
				true
			}
			None => false,
		}
	}
}
