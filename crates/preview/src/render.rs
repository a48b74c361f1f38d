//! Payload to fragments.
//!
//! Rendering is a pure function of the latest payload: each update throws
//! away every fragment and click target and rebuilds them from scratch.

use std::collections::HashMap;
use std::fmt::Write as _;

use almanac_client::{Category, Instance, Moment, PreviewPayload, WorkState};
use chrono::Local;
use chrono::format::{Item, StrftimeItems};
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::calendar::{CalendarControl, EventFeed};
use crate::message::{InboundMessage, OutboundMessage};
use crate::view::{Element, ElementId, Node};

/// Locale date representation used for week entries.
pub const DEFAULT_DATE_FORMAT: &str = "%x";

/// Returns true if `format` contains only valid chrono specifiers.
pub fn is_valid_date_format(format: &str) -> bool {
	StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Rendered fragments of one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
	/// Entries of the `#due-today` list.
	pub due_today: Vec<Node>,
	/// Entries of the `#due-week` list.
	pub due_week: Vec<Node>,
	/// Lanes of the `#overview` board.
	pub overview: Vec<Node>,
}

/// Kanban columns in display order.
const COLUMNS: [(WorkState, &str); 3] = [(WorkState::New, "New"), (WorkState::Waiting, "Waiting"), (WorkState::InProgress, "In Progress")];

/// Renders preview payloads and turns clicks into outbound messages.
pub struct PreviewRenderer {
	fragments: Fragments,
	targets: HashMap<ElementId, u32>,
	next_id: u32,
	feed: EventFeed,
	calendar: Box<dyn CalendarControl>,
	outbound: mpsc::UnboundedSender<OutboundMessage>,
	date_format: String,
}

impl std::fmt::Debug for PreviewRenderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PreviewRenderer")
			.field("fragments", &self.fragments)
			.field("targets", &self.targets.len())
			.field("date_format", &self.date_format)
			.finish()
	}
}

impl PreviewRenderer {
	/// Creates a renderer posting outbound messages to `outbound`.
	///
	/// The calendar control receives the renderer's event feed immediately.
	pub fn new(mut calendar: Box<dyn CalendarControl>, outbound: mpsc::UnboundedSender<OutboundMessage>) -> Self {
		let feed = EventFeed::default();
		calendar.set_event_source(feed.clone());
		Self {
			fragments: Fragments::default(),
			targets: HashMap::new(),
			next_id: 0,
			feed,
			calendar,
			outbound,
			date_format: DEFAULT_DATE_FORMAT.to_owned(),
		}
	}

	/// Sets the chrono format used for week entry dates.
	pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
		self.date_format = format.into();
		self
	}

	/// Handles a message from the engine.
	pub fn handle(&mut self, message: InboundMessage) {
		match message {
			InboundMessage::Update { preview } => self.update(&preview),
		}
	}

	/// Rebuilds all fragments from `payload` and refreshes the calendar.
	pub fn update(&mut self, payload: &PreviewPayload) {
		self.targets.clear();
		self.next_id = 0;

		let due_today = self.instance_list(&payload.today, "due-today", false);
		let due_week = self.instance_list(&payload.week, "due-week", true);
		let overview = payload.overview.categories.iter().map(|c| self.lane(c)).collect();
		self.fragments = Fragments {
			due_today,
			due_week,
			overview,
		};

		self.feed.replace(payload.calendar.clone());
		self.calendar.refetch_events();

		debug!(
			today = payload.today.len(),
			week = payload.week.len(),
			lanes = payload.overview.categories.len(),
			events = payload.calendar.len(),
			"preview.rendered"
		);
	}

	/// Returns the current fragments.
	pub fn fragments(&self) -> &Fragments {
		&self.fragments
	}

	/// Renders the calendar control's current events.
	pub fn calendar_nodes(&self) -> Vec<Node> {
		self.calendar.render()
	}

	/// Returns the source line behind a clickable element.
	pub fn target_line(&self, id: ElementId) -> Option<u32> {
		self.targets.get(&id).copied()
	}

	/// Handles a click on an element.
	///
	/// Emits one `jumpToLine` message and returns true if the element is a
	/// click target of the current render; otherwise does nothing.
	pub fn click(&self, id: ElementId) -> bool {
		let Some(line) = self.target_line(id) else {
			trace!(id = id.0, "preview.click_ignored");
			return false;
		};
		self.post(OutboundMessage::JumpToLine { line })
	}

	/// Reports an error to the engine.
	pub fn alert(&self, text: impl Into<String>) -> bool {
		self.post(OutboundMessage::Alert { text: text.into() })
	}

	fn post(&self, message: OutboundMessage) -> bool {
		self.outbound.send(message).is_ok()
	}

	fn instance_list(&mut self, instances: &[Instance], class: &'static str, show_end_date: bool) -> Vec<Node> {
		instances
			.iter()
			.map(|inst| {
				let mut text = inst.name.clone();
				if show_end_date {
					let end = inst.end.with_timezone(&Local);
					let mut date = String::new();
					if write!(date, "{}", end.format(&self.date_format)).is_err() {
						trace!(format = %self.date_format, "preview.bad_date_format");
						date = end.to_rfc3339();
					}
					text.push_str(&format!(" ({date})"));
				}
				self.moment_cell(text, inst.origin_doc_coords.line_number).class(class).into()
			})
			.collect()
	}

	fn lane(&mut self, category: &Category) -> Node {
		let mut lane = Element::new("div").class("kanban-lane");
		if !category.is_uncategorized() {
			lane = lane.child(Element::new("h3").child(category.name.as_str()));
		}

		let header = Element::new("tr").children(COLUMNS.iter().map(|(_, title)| Element::new("th").child(*title).into()));

		let mut cells: [Element; 3] = std::array::from_fn(|_| Element::new("td"));
		for moment in &category.moments {
			let Some(column) = column_of(moment) else {
				trace!(moment = %moment.name, "preview.unknown_work_state");
				continue;
			};
			let cell = self.moment_cell(moment.name.clone(), moment.doc_coords.line_number);
			cells[column].children.push(cell.into());
		}
		let body = Element::new("tr").children(cells.into_iter().map(Node::from));

		let table = Element::new("table").class("kanban-table").child(header).child(body);
		lane.child(table).into()
	}

	fn moment_cell(&mut self, text: String, line: u32) -> Element {
		let id = ElementId(self.next_id);
		self.next_id += 1;
		self.targets.insert(id, line);
		Element::new("div").class("moment-cell").title(text.clone()).id(id).child(text)
	}
}

fn column_of(moment: &Moment) -> Option<usize> {
	COLUMNS.iter().position(|(state, _)| *state == moment.work_state)
}

#[cfg(test)]
mod tests;
