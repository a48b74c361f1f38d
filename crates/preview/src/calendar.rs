//! Pull-based calendar event source.
//!
//! The calendar control owns its own refresh cycle: it is handed an
//! [`EventFeed`] once and pulls events from it whenever it (re)fetches.
//! Replacing the feed's events therefore has no visible effect until the
//! control is asked to refetch.

use std::sync::Arc;

use almanac_client::CalendarEvent;
use parking_lot::RwLock;

use crate::view::{Element, Node};

/// Shared, replaceable event list the calendar control pulls from.
#[derive(Debug, Clone, Default)]
pub struct EventFeed {
	events: Arc<RwLock<Vec<CalendarEvent>>>,
}

impl EventFeed {
	/// Returns the current events. The visible range is not used to filter:
	/// the payload only ever covers the current week.
	pub fn events(&self) -> Vec<CalendarEvent> {
		self.events.read().clone()
	}

	/// Replaces all events.
	pub(crate) fn replace(&self, events: Vec<CalendarEvent>) {
		*self.events.write() = events;
	}
}

/// Calendar widget driven by an [`EventFeed`].
pub trait CalendarControl: Send {
	/// Installs the event source. Called once before any refetch.
	fn set_event_source(&mut self, feed: EventFeed);

	/// Pulls events from the installed source again.
	fn refetch_events(&mut self);

	/// Renders the currently fetched events.
	fn render(&self) -> Vec<Node>;
}

/// Basic week calendar listing fetched event titles.
#[derive(Debug, Default)]
pub struct WeekCalendar {
	feed: Option<EventFeed>,
	fetched: Vec<CalendarEvent>,
	fetch_count: usize,
}

impl WeekCalendar {
	pub fn new() -> Self {
		Self::default()
	}

	/// Events as of the last fetch.
	pub fn fetched(&self) -> &[CalendarEvent] {
		&self.fetched
	}

	/// Number of fetches performed.
	pub fn fetch_count(&self) -> usize {
		self.fetch_count
	}
}

impl CalendarControl for WeekCalendar {
	fn set_event_source(&mut self, feed: EventFeed) {
		self.feed = Some(feed);
	}

	fn refetch_events(&mut self) {
		if let Some(feed) = &self.feed {
			self.fetched = feed.events();
			self.fetch_count += 1;
		}
	}

	fn render(&self) -> Vec<Node> {
		self.fetched
			.iter()
			.map(|event| {
				let title = event.get("title").and_then(|t| t.as_str()).unwrap_or_default();
				Element::new("div").class("calendar-event").title(title).child(title).into()
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn test_replacing_events_needs_refetch() {
		let feed = EventFeed::default();
		let mut cal = WeekCalendar::new();
		cal.set_event_source(feed.clone());

		feed.replace(vec![json!({"title": "dentist", "start": "2024-03-04", "end": "2024-03-05"})]);
		assert!(cal.fetched().is_empty());
		assert_eq!(cal.fetch_count(), 0);

		cal.refetch_events();
		assert_eq!(cal.fetch_count(), 1);
		assert_eq!(cal.fetched().len(), 1);
		assert_eq!(cal.render()[0].text_content(), "dentist");
	}
}
