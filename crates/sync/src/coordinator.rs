//! Analysis cycles for the active todo document.
//!
//! One task owns all engine state. Host events arrive through the
//! [`CoordinatorHandle`]; analysis calls run as spawned tasks that report
//! back through a completion channel, so state is only ever touched by the
//! loop in [`ChangeCoordinator::run`].
//!
//! # Ordering
//!
//! Every request carries a sequence number and the document snapshot it was
//! computed from. Per concern, a response is applied only if its sequence
//! number is newer than the last applied one; an older response arriving
//! late is dropped. Results are positioned against their own snapshot.
//!
//! # Failures
//!
//! A failed request leaves what is currently applied untouched and produces
//! at most one error notice per cycle. Fold failures are only logged, and an
//! empty `/folding` body means the document has no foldable regions. Nothing
//! is retried; the next edit starts a new cycle.

use std::collections::HashMap;
use std::ops::ControlFlow;
use std::sync::Arc;

use almanac_annotate::{LinkDefinition, extract_links, map_decorations, map_folds};
use almanac_client::{AnalysisService, PreviewPayload, ServiceError};
use almanac_preview::{
	Disposable, ElementId, Fragments, InboundMessage, OutboundMessage, PanelSlot, PreviewPanel, ViewColumn, WeekCalendar,
};
use almanac_primitives::{Document, DocumentId, Rope};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::config::{Config, ConfigError};
use crate::debounce::Debouncer;
use crate::error::{Result, SyncError};
use crate::host::{AnnotationHost, Notice};

/// Where the watched document is in its analysis cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
	/// Nothing scheduled and nothing in flight.
	Idle,
	/// Edits are waiting for the debounce window to close.
	PendingAnalysis,
	/// Requests are in flight and no new cycle is scheduled.
	Requesting,
}

/// Snapshot of the coordinator state for the watched document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleStatus {
	pub doc: DocumentId,
	pub version: u64,
	pub phase: CyclePhase,
	pub in_flight: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Concern {
	Format,
	Fold,
	Preview,
}

impl Concern {
	fn label(self) -> &'static str {
		match self {
			Self::Format => "format",
			Self::Fold => "fold",
			Self::Preview => "preview",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
	Clean,
	Trash,
}

impl Action {
	fn verb(self) -> &'static str {
		match self {
			Self::Clean => "clean",
			Self::Trash => "trash",
		}
	}

	fn success(self) -> &'static str {
		match self {
			Self::Clean => "Cleaned done todos!",
			Self::Trash => "Trashed done todos!",
		}
	}
}

enum Command {
	Activated(Option<Document>),
	Changed(Document),
	Closed(DocumentId),
	OpenPreview(ViewColumn),
	ClosePreview,
	PreviewVisible(bool),
	PreviewClick(ElementId),
	PreviewAlert(String),
	OnPreviewClosed(Disposable),
	Run(Action),
	Status(oneshot::Sender<Option<CycleStatus>>),
	PreviewFragments(oneshot::Sender<Option<Fragments>>),
	Shutdown(oneshot::Sender<()>),
}

enum Outcome {
	Format(almanac_client::Result<Vec<String>>),
	Fold(almanac_client::Result<Vec<String>>),
	Preview(almanac_client::Result<PreviewPayload>),
}

impl Outcome {
	fn concern(&self) -> Concern {
		match self {
			Self::Format(_) => Concern::Format,
			Self::Fold(_) => Concern::Fold,
			Self::Preview(_) => Concern::Preview,
		}
	}
}

/// A finished analysis request.
struct Analyzed {
	doc: DocumentId,
	version: u64,
	seq: u64,
	snapshot: Rope,
	outcome: Outcome,
}

enum Completion {
	Analysis(Analyzed),
	Action(Action, almanac_client::Result<()>),
}

/// Cloneable sender side of a running [`ChangeCoordinator`].
#[derive(Debug, Clone)]
pub struct CoordinatorHandle {
	tx: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
	fn send(&self, command: Command) -> Result<()> {
		self.tx.send(command).map_err(|_| SyncError::Closed)
	}

	async fn query<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
		let (reply, rx) = oneshot::channel();
		self.send(command(reply))?;
		rx.await.map_err(|_| SyncError::Closed)
	}

	/// The host's active document changed. `None` or a non-todo document
	/// stops watching.
	pub fn document_activated(&self, doc: Option<Document>) -> Result<()> {
		self.send(Command::Activated(doc))
	}

	/// A new snapshot of an edited document.
	pub fn document_changed(&self, doc: Document) -> Result<()> {
		self.send(Command::Changed(doc))
	}

	pub fn document_closed(&self, doc: DocumentId) -> Result<()> {
		self.send(Command::Closed(doc))
	}

	/// Opens the preview panel, or reveals it in `column` if it is open.
	pub fn open_preview(&self, column: ViewColumn) -> Result<()> {
		self.send(Command::OpenPreview(column))
	}

	pub fn close_preview(&self) -> Result<()> {
		self.send(Command::ClosePreview)
	}

	pub fn set_preview_visible(&self, visible: bool) -> Result<()> {
		self.send(Command::PreviewVisible(visible))
	}

	/// Forwards a click on a preview element.
	pub fn click_preview(&self, element: ElementId) -> Result<()> {
		self.send(Command::PreviewClick(element))
	}

	/// Forwards an error reported by the preview surface.
	pub fn alert_preview(&self, text: impl Into<String>) -> Result<()> {
		self.send(Command::PreviewAlert(text.into()))
	}

	/// Runs `teardown` once the current preview panel is closed.
	///
	/// Runs it immediately if no panel is open.
	pub fn on_preview_closed(&self, teardown: Disposable) -> Result<()> {
		self.send(Command::OnPreviewClosed(teardown))
	}

	/// Asks the service to move done items to the end of the todo file.
	pub fn clean(&self) -> Result<()> {
		self.send(Command::Run(Action::Clean))
	}

	/// Asks the service to move done items to the trash file.
	pub fn trash(&self) -> Result<()> {
		self.send(Command::Run(Action::Trash))
	}

	/// State of the watched document, if any.
	pub async fn status(&self) -> Result<Option<CycleStatus>> {
		self.query(Command::Status).await
	}

	/// Fragments currently shown by the preview panel, if one is open.
	pub async fn preview_fragments(&self) -> Result<Option<Fragments>> {
		self.query(Command::PreviewFragments).await
	}

	/// Stops the coordinator after releasing the preview panel.
	pub async fn shutdown(&self) -> Result<()> {
		self.query(Command::Shutdown).await
	}
}

/// Debounces edits of the active todo document and applies analysis results.
pub struct ChangeCoordinator<S, H> {
	service: Arc<S>,
	host: H,
	todo_file_name: String,
	date_format: String,
	links: Vec<LinkDefinition>,
	debouncer: Debouncer,
	inbox: mpsc::UnboundedReceiver<Command>,
	completions: mpsc::UnboundedReceiver<Completion>,
	completion_tx: mpsc::UnboundedSender<Completion>,
	active: Option<Document>,
	/// Target of preview navigation; survives deactivation.
	last_todo: Option<DocumentId>,
	seq: u64,
	applied: HashMap<Concern, u64>,
	notified_seq: u64,
	in_flight: usize,
	panel: PanelSlot,
	outbound: Option<mpsc::UnboundedReceiver<OutboundMessage>>,
}

impl<S, H> std::fmt::Debug for ChangeCoordinator<S, H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChangeCoordinator")
			.field("active", &self.active.as_ref().map(Document::id))
			.field("seq", &self.seq)
			.field("in_flight", &self.in_flight)
			.field("preview_open", &self.panel.current().is_some())
			.finish()
	}
}

impl<S: AnalysisService, H: AnnotationHost> ChangeCoordinator<S, H> {
	/// Creates a coordinator and its handle. Nothing runs until [`run`](Self::run).
	pub fn new(service: Arc<S>, host: H, config: &Config) -> Result<(Self, CoordinatorHandle), ConfigError> {
		config.validate()?;
		let links = config.link_definitions()?;
		let (tx, inbox) = mpsc::unbounded_channel();
		let (completion_tx, completions) = mpsc::unbounded_channel();
		let coordinator = Self {
			service,
			host,
			todo_file_name: config.todo_file_name.clone(),
			date_format: config.date_format.clone(),
			links,
			debouncer: Debouncer::new(config.debounce()),
			inbox,
			completions,
			completion_tx,
			active: None,
			last_todo: None,
			seq: 0,
			applied: HashMap::new(),
			notified_seq: 0,
			in_flight: 0,
			panel: PanelSlot::new(),
			outbound: None,
		};
		Ok((coordinator, CoordinatorHandle { tx }))
	}

	/// Creates a coordinator and runs it on the current tokio runtime.
	///
	/// The join handle yields the host back once the coordinator stops.
	pub fn spawn(service: Arc<S>, host: H, config: &Config) -> Result<(CoordinatorHandle, JoinHandle<H>), ConfigError> {
		let (coordinator, handle) = Self::new(service, host, config)?;
		Ok((handle, tokio::spawn(coordinator.run())))
	}

	/// Processes events until shut down or every handle is dropped.
	pub async fn run(mut self) -> H {
		debug!(todo_file_name = %self.todo_file_name, delay_ms = self.debouncer.delay().as_millis() as u64, "sync.start");
		let mut shutdown_ack = None;

		loop {
			tokio::select! {
				command = self.inbox.recv() => {
					let Some(command) = command else { break };
					if let ControlFlow::Break(ack) = self.on_command(command) {
						shutdown_ack = Some(ack);
						break;
					}
				}
				Some(completion) = self.completions.recv() => self.on_completion(completion),
				() = self.debouncer.elapsed() => self.on_debounce_elapsed(),
				Some(message) = recv_outbound(&mut self.outbound) => self.on_outbound(message),
			}
		}

		self.close_preview();
		debug!(seq = self.seq, in_flight = self.in_flight, "sync.stop");
		if let Some(ack) = shutdown_ack {
			let _ = ack.send(());
		}
		self.host
	}

	fn on_command(&mut self, command: Command) -> ControlFlow<oneshot::Sender<()>> {
		match command {
			Command::Activated(doc) => self.activate(doc),
			Command::Changed(doc) => self.changed(doc),
			Command::Closed(doc) => self.closed(doc),
			Command::OpenPreview(column) => self.open_preview(column),
			Command::ClosePreview => self.close_preview(),
			Command::PreviewVisible(visible) => {
				if let Some(panel) = self.panel.current_mut() {
					panel.set_visible(visible);
				}
			}
			Command::PreviewClick(element) => {
				if let Some(panel) = self.panel.current() {
					panel.renderer().click(element);
				}
			}
			Command::PreviewAlert(text) => match self.panel.current() {
				Some(panel) => {
					panel.renderer().alert(text);
				}
				None => trace!("preview.alert_without_panel"),
			},
			Command::OnPreviewClosed(mut teardown) => match self.panel.current_mut() {
				Some(panel) => panel.register(teardown),
				None => teardown.dispose(),
			},
			Command::Run(action) => self.run_action(action),
			Command::Status(reply) => {
				let _ = reply.send(self.status());
			}
			Command::PreviewFragments(reply) => {
				let _ = reply.send(self.panel.current().map(|p| p.renderer().fragments().clone()));
			}
			Command::Shutdown(ack) => return ControlFlow::Break(ack),
		}
		ControlFlow::Continue(())
	}

	fn is_todo(&self, doc: &Document) -> bool {
		doc.name_ends_with(&self.todo_file_name)
	}

	fn phase(&self) -> CyclePhase {
		if self.debouncer.is_pending() {
			CyclePhase::PendingAnalysis
		} else if self.in_flight > 0 {
			CyclePhase::Requesting
		} else {
			CyclePhase::Idle
		}
	}

	fn status(&self) -> Option<CycleStatus> {
		let doc = self.active.as_ref()?;
		Some(CycleStatus {
			doc: doc.id(),
			version: doc.version(),
			phase: self.phase(),
			in_flight: self.in_flight,
		})
	}

	fn activate(&mut self, doc: Option<Document>) {
		let next = doc.filter(|d| self.is_todo(d));
		let next_id = next.as_ref().map(Document::id);

		if let Some(prev) = self.active.take()
			&& Some(prev.id()) != next_id
		{
			debug!(doc = %prev.id(), version = prev.version(), "sync.deactivate");
			self.debouncer.cancel();
			self.retire_requests();
			self.host.clear(prev.id());
		}

		let Some(doc) = next else {
			return;
		};
		debug!(doc = %doc.id(), version = doc.version(), path = %doc.path().display(), "sync.activate");
		self.last_todo = Some(doc.id());
		self.active = Some(doc);
		self.debouncer.schedule();
	}

	fn changed(&mut self, doc: Document) {
		let Some(active) = &self.active else {
			trace!(doc = %doc.id(), "sync.change_ignored");
			return;
		};
		if active.id() != doc.id() {
			trace!(doc = %doc.id(), "sync.change_ignored");
			return;
		}
		if doc.version() < active.version() {
			trace!(doc = %doc.id(), version = doc.version(), current = active.version(), "sync.change_out_of_order");
			return;
		}

		let phase = self.phase();
		debug!(doc = %doc.id(), version = doc.version(), ?phase, "sync.change");
		self.active = Some(doc);
		self.debouncer.schedule();
	}

	fn closed(&mut self, doc: DocumentId) {
		if self.active.as_ref().is_some_and(|d| d.id() == doc) {
			debug!(doc = %doc, "sync.close");
			self.active = None;
			self.debouncer.cancel();
			self.retire_requests();
		}
	}

	/// Makes every request issued so far stale.
	fn retire_requests(&mut self) {
		for concern in [Concern::Format, Concern::Fold, Concern::Preview] {
			self.applied.insert(concern, self.seq);
		}
	}

	fn on_debounce_elapsed(&mut self) {
		if self.panel.current().is_some() {
			self.start_cycle(&[Concern::Format, Concern::Fold, Concern::Preview]);
		} else {
			self.start_cycle(&[Concern::Format, Concern::Fold]);
		}
	}

	fn start_cycle(&mut self, concerns: &[Concern]) {
		let Some(doc) = &self.active else {
			return;
		};
		let (id, version, snapshot) = (doc.id(), doc.version(), doc.text().clone());
		self.seq += 1;
		let seq = self.seq;
		let text: Arc<str> = snapshot.to_string().into();

		if concerns.contains(&Concern::Format) {
			let links = extract_links(&snapshot, &self.links);
			self.host.set_links(id, &links);
		}

		for &concern in concerns {
			let service = Arc::clone(&self.service);
			let tx = self.completion_tx.clone();
			let text = Arc::clone(&text);
			let snapshot = snapshot.clone();
			self.in_flight += 1;
			tokio::spawn(async move {
				let outcome = match concern {
					Concern::Format => Outcome::Format(service.format(&text).await),
					Concern::Fold => Outcome::Fold(service.fold(&text).await),
					Concern::Preview => Outcome::Preview(service.preview(&text).await),
				};
				let _ = tx.send(Completion::Analysis(Analyzed {
					doc: id,
					version,
					seq,
					snapshot,
					outcome,
				}));
			});
		}

		debug!(doc = %id, version, seq, concerns = concerns.len(), "sync.cycle_start");
	}

	fn on_completion(&mut self, completion: Completion) {
		match completion {
			Completion::Analysis(done) => self.on_analyzed(done),
			Completion::Action(action, result) => self.on_action_done(action, result),
		}
	}

	fn on_analyzed(&mut self, done: Analyzed) {
		self.in_flight = self.in_flight.saturating_sub(1);
		let concern = done.outcome.concern();
		let last = self.applied.get(&concern).copied().unwrap_or(0);
		let active = self.active.as_ref().map(Document::id);

		if active != Some(done.doc) || done.seq <= last {
			debug!(
				doc = %done.doc,
				version = done.version,
				seq = done.seq,
				last,
				concern = concern.label(),
				"sync.discard_stale"
			);
			return;
		}

		match done.outcome {
			Outcome::Format(Ok(lines)) => {
				let set = map_decorations(lines.iter().map(String::as_str), &done.snapshot);
				debug!(doc = %done.doc, version = done.version, seq = done.seq, ranges = set.total(), "sync.apply_format");
				self.host.set_decorations(done.doc, &set);
			}
			Outcome::Fold(Ok(lines)) => {
				let folds = map_folds(lines.iter().map(String::as_str));
				debug!(doc = %done.doc, version = done.version, seq = done.seq, folds = folds.len(), "sync.apply_fold");
				self.host.set_folds(done.doc, &folds);
			}
			Outcome::Fold(Err(ServiceError::EmptyBody { .. })) => {
				debug!(doc = %done.doc, version = done.version, seq = done.seq, folds = 0, "sync.apply_fold");
				self.host.set_folds(done.doc, &[]);
			}
			Outcome::Preview(Ok(payload)) => match self.panel.current_mut() {
				Some(panel) => {
					debug!(doc = %done.doc, version = done.version, seq = done.seq, "sync.apply_preview");
					panel.post_message(InboundMessage::Update { preview: payload });
				}
				None => trace!(seq = done.seq, "sync.preview_closed"),
			},
			Outcome::Format(Err(err)) | Outcome::Fold(Err(err)) | Outcome::Preview(Err(err)) => {
				self.report_failure(concern, done.seq, &err);
				return;
			}
		}
		self.applied.insert(concern, done.seq);
	}

	fn report_failure(&mut self, concern: Concern, seq: u64, err: &ServiceError) {
		warn!(
			seq,
			endpoint = %err.endpoint(),
			status = ?err.status(),
			error = %err,
			"sync.request_failed"
		);
		if concern != Concern::Fold && seq > self.notified_seq {
			self.notified_seq = seq;
			self.host.notify(Notice::error(format!("Failed to {} todos: {err}", concern.label())));
		}
	}

	fn run_action(&mut self, action: Action) {
		let service = Arc::clone(&self.service);
		let tx = self.completion_tx.clone();
		debug!(action = action.verb(), "sync.action");
		tokio::spawn(async move {
			let result = match action {
				Action::Clean => service.clean().await,
				Action::Trash => service.trash().await,
			};
			let _ = tx.send(Completion::Action(action, result));
		});
	}

	fn on_action_done(&mut self, action: Action, result: almanac_client::Result<()>) {
		match result {
			Ok(()) => self.host.notify(Notice::info(action.success())),
			Err(err) => {
				warn!(action = action.verb(), status = ?err.status(), error = %err, "sync.action_failed");
				self.host.notify(Notice::error(format!("Failed to {} done todos: {err}", action.verb())));
			}
		}
	}

	fn open_preview(&mut self, column: ViewColumn) {
		let date_format = self.date_format.clone();
		let mut outbound = None;
		let (_, created) = self.panel.create_or_show(column, || {
			let (panel, rx) = PreviewPanel::new(column, &date_format, Box::new(WeekCalendar::new()));
			outbound = Some(rx);
			panel
		});
		if created {
			self.outbound = outbound;
			self.start_cycle(&[Concern::Preview]);
		}
	}

	fn close_preview(&mut self) {
		if self.panel.dispose() {
			self.outbound = None;
		}
	}

	fn on_outbound(&mut self, message: OutboundMessage) {
		match message {
			OutboundMessage::JumpToLine { line } => match self.last_todo {
				Some(doc) => {
					debug!(doc = %doc, line, "preview.jump");
					self.host.reveal_line(doc, line);
				}
				None => warn!(line, "preview.jump_without_document"),
			},
			OutboundMessage::Alert { text } => self.host.notify(Notice::error(text)),
		}
	}
}

async fn recv_outbound(rx: &mut Option<mpsc::UnboundedReceiver<OutboundMessage>>) -> Option<OutboundMessage> {
	match rx {
		Some(rx) => rx.recv().await,
		None => std::future::pending().await,
	}
}
