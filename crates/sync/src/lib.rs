//! Annotation synchronization engine.
//!
//! [`ChangeCoordinator`] watches the active todo document, debounces edits,
//! asks the analysis service for formatting, folding and (while a preview is
//! open) preview data, and pushes the mapped results into an
//! [`AnnotationHost`]. All state lives in one task; hosts talk to it through
//! a cloneable [`CoordinatorHandle`].

pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod host;

pub use config::{Config, ConfigError};
pub use coordinator::{ChangeCoordinator, CoordinatorHandle, CyclePhase, CycleStatus};
pub use debounce::Debouncer;
pub use error::{Result, SyncError};
pub use host::{AnnotationHost, Notice, NoticeLevel};
