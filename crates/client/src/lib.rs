//! Client for the external todo analysis service.
//!
//! The service classifies raw document text. This crate only speaks its wire
//! contract: every call posts the full, base64-encoded document text to one
//! endpoint and returns the raw response lines (`/format`, `/folding`) or the
//! decoded [`PreviewPayload`] (`/preview`). `/clean` and `/trash` carry no body
//! in either direction.
//!
//! [`AnalysisService`] is the seam the synchronization engine is written
//! against; [`AnalysisClient`] is its HTTP implementation.

mod client;
mod error;
mod service;
pub mod wire;

pub use client::AnalysisClient;
pub use error::{Endpoint, ServiceError};
pub use service::AnalysisService;
pub use wire::{CalendarEvent, Category, DocCoords, Instance, Moment, NO_CATEGORY, Overview, PreviewPayload, WorkState};

/// A convenient type alias for `Result` with `E` = [`ServiceError`].
pub type Result<T, E = ServiceError> = std::result::Result<T, E>;
