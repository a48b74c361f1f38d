use std::fmt;

use thiserror::Error;

/// Analysis service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
	/// `POST /format`: categorized offset ranges.
	Format,
	/// `POST /folding`: foldable line ranges.
	Folding,
	/// `POST /preview`: structured preview payload.
	Preview,
	/// `POST /clean`: move done items to the end of the todo file.
	Clean,
	/// `POST /trash`: move done items to the trash file.
	Trash,
}

impl Endpoint {
	/// Path segment appended to the service base URL.
	pub const fn path(self) -> &'static str {
		match self {
			Self::Format => "format",
			Self::Folding => "folding",
			Self::Preview => "preview",
			Self::Clean => "clean",
			Self::Trash => "trash",
		}
	}
}

impl fmt::Display for Endpoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "/{}", self.path())
	}
}

/// Failure of a single analysis service call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
	/// The service answered with a status other than 200.
	#[error("{endpoint}: HTTP {status}")]
	Status {
		/// Endpoint that was called.
		endpoint: Endpoint,
		/// Status code of the response.
		status: u16,
	},
	/// The request never produced a response.
	#[error("{endpoint}: transport error: {source}")]
	Transport {
		/// Endpoint that was called.
		endpoint: Endpoint,
		/// Underlying HTTP client error.
		#[source]
		source: reqwest::Error,
	},
	/// A body was expected but the response was empty.
	#[error("{endpoint}: no response body")]
	EmptyBody {
		/// Endpoint that was called.
		endpoint: Endpoint,
	},
	/// The response body could not be decoded.
	#[error("{endpoint}: undecodable response: {source}")]
	Decode {
		/// Endpoint that was called.
		endpoint: Endpoint,
		/// Underlying decode error.
		#[source]
		source: serde_json::Error,
	},
}

impl ServiceError {
	/// Returns the endpoint the failed call targeted.
	pub fn endpoint(&self) -> Endpoint {
		match self {
			Self::Status { endpoint, .. }
			| Self::Transport { endpoint, .. }
			| Self::EmptyBody { endpoint }
			| Self::Decode { endpoint, .. } => *endpoint,
		}
	}

	/// Returns the HTTP status if the service answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
			Self::EmptyBody { .. } | Self::Decode { .. } => Some(200),
		}
	}
}
