use async_trait::async_trait;

use crate::wire::PreviewPayload;
use crate::{AnalysisClient, Result};

/// Analysis operations the synchronization engine depends on.
///
/// Implemented by [`AnalysisClient`]; tests and alternative transports
/// provide their own.
#[async_trait]
pub trait AnalysisService: Send + Sync + 'static {
	/// Returns raw `start,end,category` lines for `text`.
	async fn format(&self, text: &str) -> Result<Vec<String>>;

	/// Returns raw `startLine-endLine` lines for `text`.
	async fn fold(&self, text: &str) -> Result<Vec<String>>;

	/// Returns the preview payload for `text`.
	async fn preview(&self, text: &str) -> Result<PreviewPayload>;

	/// Moves done items to the end of the todo file.
	async fn clean(&self) -> Result<()>;

	/// Moves done items to the trash file.
	async fn trash(&self) -> Result<()>;
}

#[async_trait]
impl AnalysisService for AnalysisClient {
	async fn format(&self, text: &str) -> Result<Vec<String>> {
		AnalysisClient::format(self, text).await
	}

	async fn fold(&self, text: &str) -> Result<Vec<String>> {
		AnalysisClient::fold(self, text).await
	}

	async fn preview(&self, text: &str) -> Result<PreviewPayload> {
		AnalysisClient::preview(self, text).await
	}

	async fn clean(&self) -> Result<()> {
		AnalysisClient::clean(self).await
	}

	async fn trash(&self) -> Result<()> {
		AnalysisClient::trash(self).await
	}
}
