//! Engine settings loaded from TOML.
//!
//! Keys use the host's camelCase setting names:
//!
//! ```toml
//! restUrl = "http://localhost:8082"
//! todoFileName = "todo.txt"
//! ticketPattern = "JIRA-\\d+"
//! ticketUrl = "https://tracker.example/browse/$1"
//! debounceMs = 250
//! dateFormat = "%x"
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use almanac_annotate::LinkDefinition;
use almanac_preview::{DEFAULT_DATE_FORMAT, is_valid_date_format};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default analysis service address.
pub const DEFAULT_REST_URL: &str = "http://localhost:8082";

/// Default todo file name suffix.
pub const DEFAULT_TODO_FILE_NAME: &str = "todo.txt";

/// Default quiet period before an analysis cycle starts.
pub const DEFAULT_DEBOUNCE_MS: u64 = 250;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Error parsing TOML syntax or a value of the wrong type.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// The service address is not a valid URL.
	#[error("invalid service URL {url:?}: {error}")]
	Url {
		url: String,
		error: url::ParseError,
	},

	/// The ticket pattern is not a valid regular expression.
	#[error("invalid ticket pattern {pattern:?}: {error}")]
	Regex {
		pattern: String,
		error: regex::Error,
	},

	/// The preview date format has an unknown specifier.
	#[error("invalid date format {0:?}")]
	DateFormat(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
	/// Base URL of the analysis service.
	pub rest_url: String,
	/// Only documents whose file name ends with this are watched.
	pub todo_file_name: String,
	/// Regex matching ticket references.
	pub ticket_pattern: Option<String>,
	/// Link target for ticket references; `$1` is replaced by the match.
	pub ticket_url: Option<String>,
	/// Quiet period after the last edit, in milliseconds.
	pub debounce_ms: u64,
	/// chrono format for dates in the preview.
	pub date_format: String,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			rest_url: DEFAULT_REST_URL.to_owned(),
			todo_file_name: DEFAULT_TODO_FILE_NAME.to_owned(),
			ticket_pattern: None,
			ticket_url: None,
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			date_format: DEFAULT_DATE_FORMAT.to_owned(),
		}
	}
}

impl Config {
	/// Reads and validates a configuration file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&content)
	}

	/// Parses and validates configuration from TOML text.
	pub fn from_toml_str(content: &str) -> Result<Self> {
		let config: Self = toml::from_str(content)?;
		config.validate()?;
		Ok(config)
	}

	/// Checks every value that is only interpreted later.
	pub fn validate(&self) -> Result<()> {
		self.rest_url()?;
		self.link_definitions()?;
		if !is_valid_date_format(&self.date_format) {
			return Err(ConfigError::DateFormat(self.date_format.clone()));
		}
		Ok(())
	}

	/// Parsed service base URL.
	pub fn rest_url(&self) -> Result<Url> {
		Url::parse(&self.rest_url).map_err(|error| ConfigError::Url {
			url: self.rest_url.clone(),
			error,
		})
	}

	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}

	/// Compiles the configured ticket link.
	///
	/// Empty unless both the pattern and the URL are set.
	pub fn link_definitions(&self) -> Result<Vec<LinkDefinition>> {
		let (Some(pattern), Some(url)) = (self.ticket_pattern.as_deref(), self.ticket_url.as_deref()) else {
			return Ok(Vec::new());
		};
		if pattern.is_empty() || url.is_empty() {
			return Ok(Vec::new());
		}
		let definition = LinkDefinition::new(pattern, url).map_err(|error| ConfigError::Regex {
			pattern: pattern.to_owned(),
			error,
		})?;
		Ok(vec![definition])
	}
}

#[cfg(test)]
mod tests {
	use std::io::Write as _;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn test_defaults_when_empty() {
		let config = Config::from_toml_str("").unwrap();
		assert_eq!(config, Config::default());
		assert_eq!(config.rest_url().unwrap().as_str(), "http://localhost:8082/");
		assert_eq!(config.debounce(), Duration::from_millis(250));
		assert!(config.link_definitions().unwrap().is_empty());
	}

	#[test]
	fn test_camel_case_keys() {
		let config = Config::from_toml_str(
			r#"
restUrl = "http://analysis:9000"
todoFileName = "tasks.txt"
ticketPattern = "JIRA-\\d+"
ticketUrl = "https://tracker.example/browse/$1"
debounceMs = 100
dateFormat = "%d.%m."
"#,
		)
		.unwrap();

		assert_eq!(config.todo_file_name, "tasks.txt");
		assert_eq!(config.debounce_ms, 100);
		assert_eq!(config.date_format, "%d.%m.");
		let links = config.link_definitions().unwrap();
		assert_eq!(links.len(), 1);
		assert_eq!(links[0].target_for("JIRA-7"), "https://tracker.example/browse/JIRA-7");
	}

	#[test]
	fn test_link_needs_pattern_and_url() {
		let config = Config {
			ticket_pattern: Some("T-\\d+".into()),
			..Config::default()
		};
		assert!(config.link_definitions().unwrap().is_empty());
	}

	#[test]
	fn test_invalid_values_rejected() {
		assert!(matches!(Config::from_toml_str("restUrl = \"not a url\""), Err(ConfigError::Url { .. })));
		assert!(matches!(
			Config::from_toml_str("ticketPattern = \"(\"\nticketUrl = \"x/$1\""),
			Err(ConfigError::Regex { .. })
		));
		assert!(matches!(Config::from_toml_str("debounceMs = \"soon\""), Err(ConfigError::Toml(_))));
		assert!(matches!(
			Config::from_toml_str("dateFormat = \"%Q\""),
			Err(ConfigError::DateFormat(f)) if f == "%Q"
		));
	}

	#[test]
	fn test_load_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "todoFileName = \"inbox.txt\"").unwrap();

		let config = Config::load(file.path()).unwrap();
		assert_eq!(config.todo_file_name, "inbox.txt");

		let missing = file.path().with_extension("missing");
		assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));
	}
}
