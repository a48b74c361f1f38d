//! `almanac`: runs the annotation engine outside an editor.
//!
//! One-shot subcommands analyze a file once and print the result; `watch`
//! polls a file and drives the full debounced engine, printing every
//! annotation it applies.

mod cli;
mod console;
mod logging;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use almanac_annotate::{extract_links, map_decorations, map_folds};
use almanac_client::AnalysisClient;
use almanac_preview::{InboundMessage, PreviewPanel, ViewColumn, WeekCalendar, new_nonce};
use almanac_primitives::{Document, DocumentId};
use almanac_sync::{AnnotationHost, ChangeCoordinator, Config};
use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use console::ConsoleHost;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

const FILE_DOC: DocumentId = DocumentId(1);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	logging::setup_tracing(cli.verbose);

	let config = cli.load_config().context("invalid configuration")?;
	let client = Arc::new(AnalysisClient::new(config.rest_url()?));
	info!(url = %client.base_url(), "almanac.start");

	match cli.command {
		Command::Format { file } => {
			let doc = read_document(&file)?;
			let lines = client.format(&doc.text().to_string()).await?;
			let set = map_decorations(lines.iter().map(String::as_str), doc.text());
			ConsoleHost::new(std::io::stdout()).set_decorations(doc.id(), &set);
		}
		Command::Fold { file } => {
			let doc = read_document(&file)?;
			let lines = client.fold(&doc.text().to_string()).await?;
			ConsoleHost::new(std::io::stdout()).set_folds(doc.id(), &map_folds(lines.iter().map(String::as_str)));
		}
		Command::Preview { file, html } => {
			let doc = read_document(&file)?;
			let payload = client.preview(&doc.text().to_string()).await?;
			if html {
				let (mut panel, _outbound) =
					PreviewPanel::new(ViewColumn::Active, &config.date_format, Box::new(WeekCalendar::new()));
				panel.post_message(InboundMessage::Update { preview: payload });
				print!("{}", panel.page_html(&new_nonce()));
			} else {
				println!("{}", serde_json::to_string_pretty(&payload)?);
			}
		}
		Command::Links { file } => {
			let doc = read_document(&file)?;
			let links = extract_links(doc.text(), &config.link_definitions()?);
			ConsoleHost::new(std::io::stdout()).set_links(doc.id(), &links);
		}
		Command::Clean => {
			client.clean().await.context("Failed to clean done todos")?;
			println!("Cleaned done todos!");
		}
		Command::Trash => {
			client.trash().await.context("Failed to trash done todos")?;
			println!("Trashed done todos!");
		}
		Command::Watch { file, interval } => watch(client, &config, &file, Duration::from_millis(interval.max(1))).await?,
	}
	Ok(())
}

fn read_document(path: &Path) -> anyhow::Result<Document> {
	let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
	Ok(Document::new(FILE_DOC, path, &text))
}

/// Feeds every change of `path` to a coordinator until interrupted.
async fn watch(client: Arc<AnalysisClient>, config: &Config, path: &Path, interval: Duration) -> anyhow::Result<()> {
	let mut doc = read_document(path)?;
	if !doc.name_ends_with(&config.todo_file_name) {
		bail!("{} is not a todo file (expected a name ending in {:?})", path.display(), config.todo_file_name);
	}

	let (handle, task) = ChangeCoordinator::spawn(client, ConsoleHost::new(std::io::stdout()), config)?;
	handle.document_activated(Some(doc.clone()))?;
	let mut last_text = doc.text().to_string();

	let mut ticker = tokio::time::interval(interval);
	ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
	info!(path = %path.display(), interval_ms = interval.as_millis() as u64, "almanac.watch");

	loop {
		tokio::select! {
			_ = ticker.tick() => {
				let text = match std::fs::read_to_string(path) {
					Ok(text) => text,
					Err(error) => {
						warn!(path = %path.display(), %error, "almanac.read_failed");
						continue;
					}
				};
				if text != last_text {
					doc = doc.edited(&text);
					handle.document_changed(doc.clone())?;
					last_text = text;
				}
			}
			result = tokio::signal::ctrl_c() => {
				result.context("waiting for interrupt")?;
				break;
			}
		}
	}

	handle.shutdown().await?;
	task.await?;
	Ok(())
}
