//! Wire types of the `/preview` endpoint.
//!
//! The service is lenient about empty collections (they may arrive as
//! `null`), so every collection field defaults to empty.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Category name the service uses for moments outside any category.
pub const NO_CATEGORY: &str = "_none";

/// Complete preview snapshot. Each payload fully replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewPayload {
	/// Instances due today.
	#[serde(default, deserialize_with = "null_as_default")]
	pub today: Vec<Instance>,
	/// Instances due this week.
	#[serde(default, deserialize_with = "null_as_default")]
	pub week: Vec<Instance>,
	/// Open top-level moments grouped by category.
	#[serde(default, deserialize_with = "null_as_default")]
	pub overview: Overview,
	/// Calendar entries, passed through to the calendar view untouched.
	#[serde(default, deserialize_with = "null_as_default")]
	pub calendar: Vec<CalendarEvent>,
}

/// One occurrence of a moment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
	pub name: String,
	pub end: DateTime<FixedOffset>,
	pub origin_doc_coords: DocCoords,
}

/// Location of a moment in the source document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocCoords {
	/// Zero-based line of the moment.
	#[serde(alias = "LineNumber")]
	pub line_number: u32,
}

/// Kanban overview of open moments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
	#[serde(default, deserialize_with = "null_as_default")]
	pub categories: Vec<Category>,
}

/// Moments of one category, rendered as one kanban lane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
	/// Category name, or [`NO_CATEGORY`].
	pub name: String,
	#[serde(default, deserialize_with = "null_as_default")]
	pub moments: Vec<Moment>,
}

impl Category {
	/// Returns true for the lane collecting uncategorized moments.
	pub fn is_uncategorized(&self) -> bool {
		self.name == NO_CATEGORY
	}
}

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moment {
	pub name: String,
	pub work_state: WorkState,
	pub doc_coords: DocCoords,
}

/// Work state, selecting the kanban column of a moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WorkState {
	New,
	Waiting,
	InProgress,
	/// Any state this client does not know about. Placed in no column.
	#[serde(other)]
	Unknown,
}

/// Opaque calendar entry consumed by the calendar view.
pub type CalendarEvent = serde_json::Value;

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
