//! Fixed style table of the category taxonomy.

use std::fmt;

use crate::category::{CategoryId, DueBucket};

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
	}
}

/// Solid border around a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Border {
	pub width_px: u8,
	pub color: Rgb,
}

/// Icon rendered after a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Icon {
	Calendar,
	Clock,
}

impl Icon {
	/// File name of the bundled icon image.
	pub const fn file_name(self) -> &'static str {
		match self {
			Self::Calendar => "cal.png",
			Self::Clock => "time.png",
		}
	}
}

/// Visual treatment of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleDescriptor {
	/// Foreground color; `None` keeps the host's color.
	pub color: Option<Rgb>,
	pub bold: bool,
	pub border: Option<Border>,
	pub after_icon: Option<Icon>,
	/// Hover text shown for every range of the category.
	pub hover: Option<&'static str>,
}

const ORANGE: Rgb = Rgb(0xff, 0xa5, 0x00);
const DONE_GREEN: Rgb = Rgb(0x1e, 0x42, 0x0f);
const IDENTIFIER_BLUE: Rgb = Rgb(0x3f, 0x67, 0x9a);
const PRIORITY_BORDER: Border = Border {
	width_px: 1,
	color: Rgb(0xff, 0x00, 0x00),
};

/// Urgency colors, most urgent first.
const DUE_COLORS: [Rgb; DueBucket::COUNT] = [
	Rgb(0xff, 0x00, 0x00),
	Rgb(0xff, 0x40, 0x40),
	Rgb(0xff, 0x7d, 0x7d),
	Rgb(0xfe, 0xa4, 0xa4),
	Rgb(0xfe, 0xc7, 0xc7),
];

/// Returns the style descriptor of a category.
pub const fn style_for(category: CategoryId) -> StyleDescriptor {
	const PLAIN: StyleDescriptor = StyleDescriptor {
		color: None,
		bold: false,
		border: None,
		after_icon: None,
		hover: None,
	};

	match category {
		CategoryId::CategoryLabel => StyleDescriptor {
			color: Some(ORANGE),
			bold: true,
			..PLAIN
		},
		CategoryId::Item => StyleDescriptor { bold: true, ..PLAIN },
		CategoryId::ItemPriority => StyleDescriptor {
			bold: true,
			border: Some(PRIORITY_BORDER),
			..PLAIN
		},
		CategoryId::ItemDone => StyleDescriptor {
			color: Some(DONE_GREEN),
			bold: true,
			..PLAIN
		},
		CategoryId::Date => StyleDescriptor {
			after_icon: Some(Icon::Calendar),
			hover: Some("Date"),
			..PLAIN
		},
		CategoryId::Time => StyleDescriptor {
			after_icon: Some(Icon::Clock),
			hover: Some("Time"),
			..PLAIN
		},
		CategoryId::Identifier => StyleDescriptor {
			color: Some(IDENTIFIER_BLUE),
			hover: Some("ID"),
			..PLAIN
		},
		CategoryId::CommentDone => StyleDescriptor {
			color: Some(DONE_GREEN),
			..PLAIN
		},
		CategoryId::Due { days, priority } => StyleDescriptor {
			color: Some(DUE_COLORS[days.bucket().index()]),
			bold: true,
			border: if priority { Some(PRIORITY_BORDER) } else { None },
			..PLAIN
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::category::DueDays;

	fn due(days: u32, priority: bool) -> CategoryId {
		CategoryId::Due {
			days: DueDays::new(days).unwrap(),
			priority,
		}
	}

	#[test]
	fn test_due_colors_pale_with_distance() {
		assert_eq!(style_for(due(0, false)).color, Some(Rgb(0xff, 0x00, 0x00)));
		assert_eq!(style_for(due(1, false)).color, style_for(due(0, false)).color);
		assert_eq!(style_for(due(2, false)).color.map(|c| c.to_string()).as_deref(), Some("#ff4040"));
		assert_eq!(style_for(due(11, false)).color.map(|c| c.to_string()).as_deref(), Some("#fec7c7"));
	}

	#[test]
	fn test_priority_variant_only_adds_border() {
		for days in 0..=u32::from(DueDays::MAX) {
			let plain = style_for(due(days, false));
			let priority = style_for(due(days, true));
			assert_eq!(plain.border, None);
			assert_eq!(priority.border, Some(PRIORITY_BORDER));
			assert_eq!(StyleDescriptor { border: None, ..priority }, plain);
		}
	}

	#[test]
	fn test_hover_messages() {
		assert_eq!(style_for(CategoryId::Date).hover, Some("Date"));
		assert_eq!(style_for(CategoryId::Time).hover, Some("Time"));
		assert_eq!(style_for(CategoryId::Identifier).hover, Some("ID"));
		assert_eq!(style_for(CategoryId::Item).hover, None);
	}
}
