//! Closed category taxonomy of the formatting protocol.

use std::fmt;

/// Category of a style range.
///
/// Every variant has exactly one style descriptor (see [`crate::style_for`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CategoryId {
	/// Category heading line (`cat`).
	CategoryLabel,
	/// Open item (`mom`).
	Item,
	/// Open high-priority item (`mom.priority`).
	ItemPriority,
	/// Done item (`mom.done`).
	ItemDone,
	/// Date token (`date`).
	Date,
	/// Time-of-day token (`time`).
	Time,
	/// Item identifier (`id`).
	Identifier,
	/// Comment below a done item (`com.done`).
	CommentDone,
	/// Open item due within [`DueDays::MAX`] days (`mom.until{n}` and `mom.until{n}.priority`).
	Due {
		/// Days until the item is due.
		days: DueDays,
		/// Whether the item is flagged high-priority.
		priority: bool,
	},
}

const ITEM: &str = "mom";
const UNTIL: &str = ".until";
const PRIORITY: &str = ".priority";

impl CategoryId {
	const FIXED: [CategoryId; 8] = [
		Self::CategoryLabel,
		Self::Item,
		Self::ItemPriority,
		Self::ItemDone,
		Self::Date,
		Self::Time,
		Self::Identifier,
		Self::CommentDone,
	];

	/// Iterates every category, including all due-proximity variants.
	pub fn all() -> impl Iterator<Item = CategoryId> {
		let due = (0..=DueDays::MAX).flat_map(|d| {
			let days = DueDays(d);
			[Self::Due { days, priority: false }, Self::Due { days, priority: true }]
		});
		Self::FIXED.into_iter().chain(due)
	}

	/// Parses a category key as sent by the analysis service.
	///
	/// Returns `None` for keys outside the taxonomy, including due
	/// distances beyond [`DueDays::MAX`].
	pub fn from_wire(key: &str) -> Option<Self> {
		let fixed = match key {
			"cat" => Some(Self::CategoryLabel),
			"mom" => Some(Self::Item),
			"mom.priority" => Some(Self::ItemPriority),
			"mom.done" => Some(Self::ItemDone),
			"date" => Some(Self::Date),
			"time" => Some(Self::Time),
			"id" => Some(Self::Identifier),
			"com.done" => Some(Self::CommentDone),
			_ => None,
		};
		if fixed.is_some() {
			return fixed;
		}

		let rest = key.strip_prefix(ITEM)?;
		// Current servers append the priority marker, older ones put it first.
		let (rest, priority) = match rest.strip_prefix(PRIORITY) {
			Some(rest) => (rest, true),
			None => match rest.strip_suffix(PRIORITY) {
				Some(rest) => (rest, true),
				None => (rest, false),
			},
		};
		let digits = rest.strip_prefix(UNTIL)?;
		if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		let days = DueDays::new(digits.parse().ok()?)?;
		Some(Self::Due { days, priority })
	}

	/// Returns the key the analysis service uses for this category.
	pub fn wire_key(self) -> String {
		match self {
			Self::CategoryLabel => "cat".into(),
			Self::Item => "mom".into(),
			Self::ItemPriority => "mom.priority".into(),
			Self::ItemDone => "mom.done".into(),
			Self::Date => "date".into(),
			Self::Time => "time".into(),
			Self::Identifier => "id".into(),
			Self::CommentDone => "com.done".into(),
			Self::Due { days, priority: false } => format!("{ITEM}{UNTIL}{}", days.get()),
			Self::Due { days, priority: true } => format!("{ITEM}{UNTIL}{}{PRIORITY}", days.get()),
		}
	}
}

impl fmt::Display for CategoryId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CategoryLabel => f.write_str("category-label"),
			Self::Item => f.write_str("item"),
			Self::ItemPriority => f.write_str("item.priority"),
			Self::ItemDone => f.write_str("item.done"),
			Self::Date => f.write_str("date"),
			Self::Time => f.write_str("time"),
			Self::Identifier => f.write_str("identifier"),
			Self::CommentDone => f.write_str("comment.done"),
			Self::Due { days, priority: false } => write!(f, "due.until{}", days.get()),
			Self::Due { days, priority: true } => write!(f, "due.until{}.priority", days.get()),
		}
	}
}

/// Days until an item is due, within `0..=11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DueDays(u8);

impl DueDays {
	/// Largest distance with a visual treatment.
	pub const MAX: u8 = 11;

	/// Returns `None` for distances beyond [`Self::MAX`].
	pub fn new(days: u32) -> Option<Self> {
		u8::try_from(days).ok().filter(|d| *d <= Self::MAX).map(Self)
	}

	/// Returns the distance in days.
	pub const fn get(self) -> u8 {
		self.0
	}

	/// Returns the urgency bucket for this distance.
	pub const fn bucket(self) -> DueBucket {
		match self.0 {
			0..=1 => DueBucket(0),
			2 => DueBucket(1),
			3..=4 => DueBucket(2),
			5..=7 => DueBucket(3),
			_ => DueBucket(4),
		}
	}
}

/// One of five urgency tiers; tier 0 is the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DueBucket(u8);

impl DueBucket {
	/// Number of tiers.
	pub const COUNT: usize = 5;

	/// Returns the tier for a distance in days, `None` beyond [`DueDays::MAX`].
	pub fn from_days(days: u32) -> Option<Self> {
		DueDays::new(days).map(DueDays::bucket)
	}

	/// Returns the tier index in `0..COUNT`.
	pub const fn index(self) -> usize {
		self.0 as usize
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_bucket_thresholds() {
		let expected = [(0, 0), (1, 0), (2, 1), (3, 2), (4, 2), (5, 3), (6, 3), (7, 3), (8, 4), (9, 4), (10, 4), (11, 4)];
		for (days, bucket) in expected {
			assert_eq!(DueBucket::from_days(days).map(DueBucket::index), Some(bucket), "days = {days}");
		}
		assert_eq!(DueBucket::from_days(12), None);
		assert_eq!(DueBucket::from_days(400), None);
	}

	#[test]
	fn test_taxonomy_size() {
		assert_eq!(CategoryId::all().count(), 8 + 2 * 12);
	}

	#[test]
	fn test_wire_keys_round_trip() {
		for category in CategoryId::all() {
			assert_eq!(CategoryId::from_wire(&category.wire_key()), Some(category));
		}
	}

	#[test]
	fn test_due_keys() {
		let days = DueDays::new(3).unwrap();
		assert_eq!(CategoryId::from_wire("mom.until3"), Some(CategoryId::Due { days, priority: false }));
		assert_eq!(CategoryId::from_wire("mom.until3.priority"), Some(CategoryId::Due { days, priority: true }));
		assert_eq!(CategoryId::from_wire("mom.priority.until3"), Some(CategoryId::Due { days, priority: true }));
	}

	#[test]
	fn test_unknown_keys() {
		for key in ["", "mom.until12", "mom.until", "mom.until-1", "mom.until+3", "mom.untilx", "mom.whatever", "heading"] {
			assert_eq!(CategoryId::from_wire(key), None, "key = {key:?}");
		}
	}

	#[test]
	fn test_display_uses_taxonomy_names() {
		assert_eq!(CategoryId::CategoryLabel.to_string(), "category-label");
		let days = DueDays::new(0).unwrap();
		assert_eq!(CategoryId::Due { days, priority: true }.to_string(), "due.until0.priority");
	}
}
