use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};
use url::Url;

use crate::wire::PreviewPayload;
use crate::{Endpoint, Result, ServiceError};

/// HTTP client for the analysis service.
///
/// Holds no state besides the base URL: nothing is cached and every call
/// sends the complete document text.
#[derive(Clone)]
pub struct AnalysisClient {
	http: reqwest::Client,
	base: Url,
}

impl fmt::Debug for AnalysisClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnalysisClient").field("base", &self.base.as_str()).finish()
	}
}

impl AnalysisClient {
	/// Creates a client for the service rooted at `base`.
	pub fn new(base: Url) -> Self {
		Self::with_http_client(base, reqwest::Client::new())
	}

	/// Creates a client reusing an existing HTTP connection pool.
	pub fn with_http_client(base: Url, http: reqwest::Client) -> Self {
		Self { http, base }
	}

	/// Returns the service base URL.
	pub fn base_url(&self) -> &Url {
		&self.base
	}

	/// Posts `text` to `/format` and returns the `start,end,category` lines.
	pub async fn format(&self, text: &str) -> Result<Vec<String>> {
		let body = self.post(Endpoint::Format, Some(text)).await?;
		lines(Endpoint::Format, &body)
	}

	/// Posts `text` to `/folding` and returns the `startLine-endLine` lines.
	pub async fn fold(&self, text: &str) -> Result<Vec<String>> {
		let body = self.post(Endpoint::Folding, Some(text)).await?;
		lines(Endpoint::Folding, &body)
	}

	/// Posts `text` to `/preview` and decodes the payload.
	pub async fn preview(&self, text: &str) -> Result<PreviewPayload> {
		let body = self.post(Endpoint::Preview, Some(text)).await?;
		if body.is_empty() {
			return Err(ServiceError::EmptyBody {
				endpoint: Endpoint::Preview,
			});
		}
		serde_json::from_str(&body).map_err(|source| ServiceError::Decode {
			endpoint: Endpoint::Preview,
			source,
		})
	}

	/// Asks the service to move done items to the end of the todo file.
	pub async fn clean(&self) -> Result<()> {
		self.post(Endpoint::Clean, None).await.map(drop)
	}

	/// Asks the service to move done items to the trash file.
	pub async fn trash(&self) -> Result<()> {
		self.post(Endpoint::Trash, None).await.map(drop)
	}

	fn endpoint_url(&self, endpoint: Endpoint) -> String {
		format!("{}/{}", self.base.as_str().trim_end_matches('/'), endpoint.path())
	}

	async fn post(&self, endpoint: Endpoint, text: Option<&str>) -> Result<String> {
		let mut request = self.http.post(self.endpoint_url(endpoint));
		if let Some(text) = text {
			request = request.header(CONTENT_TYPE, "text/plain").body(STANDARD.encode(text));
		}

		debug!(%endpoint, bytes = text.map_or(0, str::len), "analysis.request");
		let response = request.send().await.map_err(|source| {
			warn!(%endpoint, error = %source, "analysis.transport_failed");
			ServiceError::Transport { endpoint, source }
		})?;

		let status = response.status();
		if status != StatusCode::OK {
			warn!(%endpoint, status = status.as_u16(), "analysis.bad_status");
			return Err(ServiceError::Status {
				endpoint,
				status: status.as_u16(),
			});
		}

		response.text().await.map_err(|source| ServiceError::Transport { endpoint, source })
	}
}

/// Splits a line-oriented body on `\n` and `\r\n`.
fn lines(endpoint: Endpoint, body: &str) -> Result<Vec<String>> {
	if body.is_empty() {
		return Err(ServiceError::EmptyBody { endpoint });
	}
	Ok(body.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line).to_owned()).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_lines_split_on_crlf_and_lf() {
		let parsed = lines(Endpoint::Format, "0,3,cat\r\n4,9,mom\n").unwrap();
		assert_eq!(parsed, vec!["0,3,cat", "4,9,mom", ""]);
	}

	#[test]
	fn test_empty_body_is_an_error() {
		let err = lines(Endpoint::Folding, "").unwrap_err();
		assert!(matches!(err, ServiceError::EmptyBody { endpoint: Endpoint::Folding }));
		assert_eq!(err.status(), Some(200));
	}

	#[test]
	fn test_endpoint_url_ignores_trailing_slash() {
		let plain = AnalysisClient::new(Url::parse("http://localhost:8082").unwrap());
		let slashed = AnalysisClient::new(Url::parse("http://localhost:8082/api/").unwrap());

		assert_eq!(plain.endpoint_url(Endpoint::Format), "http://localhost:8082/format");
		assert_eq!(slashed.endpoint_url(Endpoint::Trash), "http://localhost:8082/api/trash");
	}
}
