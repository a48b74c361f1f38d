//! Preview surface for todo documents.
//!
//! The surface shows three fragments built from a [`PreviewPayload`]: the
//! items due today and this week, a kanban overview with one lane per
//! category, and a week calendar. It talks to the engine through structured
//! messages only ([`InboundMessage`], [`OutboundMessage`]) and never performs
//! navigation itself.
//!
//! [`PanelSlot`] owns the single panel instance; asking for a panel while one
//! exists reveals the existing one.
//!
//! [`PreviewPayload`]: almanac_client::PreviewPayload

pub mod calendar;
pub mod message;
pub mod panel;
pub mod render;
pub mod view;

pub use calendar::{CalendarControl, EventFeed, WeekCalendar};
pub use message::{InboundMessage, OutboundMessage};
pub use panel::{Disposable, PanelSlot, PreviewPanel, ViewColumn, new_nonce};
pub use render::{DEFAULT_DATE_FORMAT, Fragments, PreviewRenderer, is_valid_date_format};
pub use view::{Element, ElementId, Node};
