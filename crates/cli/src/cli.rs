use std::path::PathBuf;

use almanac_sync::{Config, ConfigError};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "almanac")]
#[command(about = "Annotations and previews for plain-text todo files")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (TOML)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Analysis service URL, overrides `restUrl`
	#[arg(long, value_name = "URL", global = true)]
	pub url: Option<String>,

	/// File name suffix of watched todo files, overrides `todoFileName`
	#[arg(long, value_name = "NAME", global = true)]
	pub todo_file_name: Option<String>,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Print the styled ranges of a todo file
	Format {
		/// Todo file to analyze.
		file: PathBuf,
	},
	/// Print the fold regions of a todo file
	Fold {
		/// Todo file to analyze.
		file: PathBuf,
	},
	/// Print the preview payload of a todo file
	Preview {
		/// Todo file to analyze.
		file: PathBuf,
		/// Render the preview page as HTML instead of JSON
		#[arg(long)]
		html: bool,
	},
	/// Print the ticket links of a todo file
	Links {
		/// Todo file to scan.
		file: PathBuf,
	},
	/// Move done todos to the end of the todo file
	Clean,
	/// Move done todos to the trash file
	Trash,
	/// Watch a todo file and print annotations whenever it changes
	Watch {
		/// Todo file to watch.
		file: PathBuf,
		/// Poll interval in milliseconds
		#[arg(long, value_name = "MS", default_value_t = 500)]
		interval: u64,
	},
}

impl Cli {
	/// Loads the configuration file, if any, and applies flag overrides.
	pub fn load_config(&self) -> Result<Config, ConfigError> {
		let mut config = match &self.config {
			Some(path) => Config::load(path)?,
			None => Config::default(),
		};
		if let Some(url) = &self.url {
			config.rest_url = url.clone();
		}
		if let Some(name) = &self.todo_file_name {
			config.todo_file_name = name.clone();
		}
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests;
