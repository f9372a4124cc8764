//! `replay` command.
//!
//! Drives a coordinator with a scripted host: one window backed by one
//! session, transfers announced and advanced step by step. Every event and
//! shell side effect is reported as a JSON line, followed by the outcome of
//! each programmatic request.
//!
//! ```json
//! {
//!   "passive": true,
//!   "steps": [
//!     { "action": "request", "url": "https://example.com/a.zip", "options": { "open_folder_when_done": true } },
//!     { "action": "start", "id": 1, "url": "https://example.com/a.zip", "filename": "a.zip", "total": 100 },
//!     { "action": "progress", "id": 1, "received": 100 },
//!     { "action": "finish", "id": 1, "state": "completed" }
//!   ]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use shelldl_coordinator::adapters::memory::{
    MemorySession, MemoryTransfer, MemoryWindow, RecordingShell, ShellCall,
};
use shelldl_coordinator::adapters::{
    CollectingEmitter, FanoutEmitter, FsPathProbe, MimeGuessLookup, TracingEventEmitter,
};
use shelldl_coordinator::{
    Coordinator, CoordinatorDeps, PendingDownload, ProgressBar, build_coordinator,
};
use shelldl_core::ports::{PathProbe, Transfer};
use shelldl_core::{DownloadOptions, SessionId, Settings, TerminalState, TransferId, WindowId};

use crate::error::CliError;

const MAIN_WINDOW: u64 = 1;

/// A scripted host session.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Attach to the session up front, so unrequested transfers are handled.
    #[serde(default)]
    pub passive: bool,
    /// Defaults for unrequested transfers.
    #[serde(default)]
    pub passive_options: Option<ScenarioOptions>,
    pub steps: Vec<Step>,
}

/// Request options as written in a scenario file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioOptions {
    pub directory: Option<PathBuf>,
    pub filename: Option<String>,
    pub save_as: bool,
    pub open_folder_when_done: bool,
    pub error_message: Option<String>,
    pub error_title: Option<String>,
}

impl From<ScenarioOptions> for DownloadOptions {
    fn from(options: ScenarioOptions) -> Self {
        let mut out = Self::new()
            .save_as(options.save_as)
            .open_folder_when_done(options.open_folder_when_done);
        if let Some(directory) = options.directory {
            out = out.directory(directory);
        }
        if let Some(filename) = options.filename {
            out = out.filename(filename);
        }
        if let Some(message) = options.error_message {
            out = out.error_message(message);
        }
        if let Some(title) = options.error_title {
            out = out.error_title(title);
        }
        out
    }
}

fn main_window() -> Option<u64> {
    Some(MAIN_WINDOW)
}

/// One scripted host action.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// A caller asks for `url` in the main window.
    Request {
        url: String,
        #[serde(default)]
        options: ScenarioOptions,
    },
    /// The host announces a transfer.
    Start {
        id: u64,
        url: String,
        #[serde(default)]
        redirects: Vec<String>,
        #[serde(default)]
        filename: String,
        #[serde(default)]
        mime: String,
        #[serde(default)]
        total: u64,
        /// Owning window, `null` for none.
        #[serde(default = "main_window")]
        window: Option<u64>,
    },
    /// Bytes arrived.
    Progress {
        id: u64,
        received: u64,
        /// Late total size announcement.
        #[serde(default)]
        total: Option<u64>,
    },
    /// The user picked a path in the save dialog.
    Choose { id: u64, path: PathBuf },
    /// The transfer ended.
    Finish { id: u64, state: TerminalState },
    /// The user cancelled the transfer.
    Cancel { id: u64 },
    /// The owning window was destroyed.
    DestroyWindow {
        #[serde(default = "main_window")]
        window: Option<u64>,
    },
    /// The main window was closed.
    CloseWindow,
}

/// Parse a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, CliError> {
    let raw = std::fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| CliError::Scenario(e.to_string()))
}

struct Replay {
    coordinator: Coordinator,
    shell: Arc<RecordingShell>,
    events: CollectingEmitter,
    session: Arc<MemorySession>,
    window: Arc<MemoryWindow>,
    transfers: HashMap<u64, Arc<MemoryTransfer>>,
    requests: Vec<(String, PendingDownload)>,
    shell_seen: usize,
    lines: Vec<Value>,
}

impl Replay {
    fn new(settings: Settings, probe: Arc<dyn PathProbe>) -> Result<Self, CliError> {
        let shell = Arc::new(RecordingShell::default());
        let events = CollectingEmitter::new();
        let coordinator = build_coordinator(CoordinatorDeps {
            shell: shell.clone(),
            emitter: Arc::new(
                FanoutEmitter::new()
                    .with(TracingEventEmitter)
                    .with(events.clone()),
            ),
            mime: Arc::new(MimeGuessLookup),
            probe,
            settings,
        })?;
        let session = MemorySession::new(SessionId(1));
        let window = MemoryWindow::new(WindowId(MAIN_WINDOW), session.clone());

        Ok(Self {
            coordinator,
            shell,
            events,
            session,
            window,
            transfers: HashMap::new(),
            requests: Vec::new(),
            shell_seen: 0,
            lines: Vec::new(),
        })
    }

    fn transfer(&self, id: u64) -> Result<&Arc<MemoryTransfer>, CliError> {
        self.transfers
            .get(&id)
            .ok_or_else(|| CliError::Scenario(format!("unknown transfer {id}")))
    }

    fn apply(&mut self, step: Step) -> Result<(), CliError> {
        match step {
            Step::Request { url, options } => {
                let pending =
                    self.coordinator
                        .start_download(self.window.as_ref(), &url, options.into());
                self.requests.push((url, pending));
            }
            Step::Start {
                id,
                url,
                redirects,
                filename,
                mime,
                total,
                window,
            } => {
                if self.transfers.contains_key(&id) {
                    return Err(CliError::Scenario(format!("transfer {id} started twice")));
                }
                let builder = redirects.into_iter().fold(
                    MemoryTransfer::builder(TransferId(id), url),
                    |builder, url| builder.redirect(url),
                );
                let transfer = builder
                    .suggested_filename(filename)
                    .mime_type(mime)
                    .total_bytes(total)
                    .build();
                self.transfers.insert(id, transfer.clone());
                self.session.start_transfer(transfer, window.map(WindowId));
            }
            Step::Progress {
                id,
                received,
                total,
            } => {
                let transfer = self.transfer(id)?;
                if let Some(total) = total {
                    transfer.set_total(total);
                }
                transfer.set_received(received);
                transfer.emit_updated();
            }
            Step::Choose { id, path } => {
                self.transfer(id)?.set_save_path(&path);
            }
            Step::Finish { id, state } => {
                self.transfer(id)?.finish(state);
            }
            Step::Cancel { id } => {
                self.transfer(id)?.cancel();
            }
            Step::DestroyWindow { window } => {
                if let Some(window) = window {
                    self.shell.destroy_window(WindowId(window));
                }
            }
            Step::CloseWindow => self.window.close(),
        }
        self.flush()
    }

    /// Move new events and shell calls into the output.
    fn flush(&mut self) -> Result<(), CliError> {
        for event in self.events.drain() {
            let line = serde_json::to_value(&event).map_err(|e| CliError::Io(e.to_string()))?;
            self.lines.push(line);
        }

        let calls = self.shell.calls();
        for call in calls.iter().skip(self.shell_seen) {
            self.lines.push(shell_call_json(call));
        }
        self.shell_seen = calls.len();
        Ok(())
    }

    /// Report how each programmatic request ended.
    async fn settle(&mut self) {
        for (url, pending) in self.requests.drain(..) {
            // Settled requests resolve on the first poll.
            let line = match tokio::time::timeout(Duration::ZERO, pending).await {
                Ok(Ok(handle)) => json!({
                    "type": "request_resolved",
                    "url": url,
                    "id": handle.id(),
                    "path": handle.path(),
                }),
                Ok(Err(err)) => json!({
                    "type": "request_rejected",
                    "url": url,
                    "error": err.to_string(),
                }),
                Err(_) => json!({ "type": "request_pending", "url": url }),
            };
            self.lines.push(line);
        }
    }
}

fn shell_call_json(call: &ShellCall) -> Value {
    match call {
        ShellCall::SetProgressBar { window, progress } => match progress {
            ProgressBar::Value(value) => {
                json!({ "type": "shell_progress", "window": window, "value": value })
            }
            ProgressBar::Clear => json!({ "type": "shell_progress", "window": window, "value": null }),
        },
        ShellCall::DockDownloadFinished(path) => json!({ "type": "shell_dock", "path": path }),
        ShellCall::ShowItemInFolder(path) => json!({ "type": "shell_reveal", "path": path }),
        ShellCall::ShowErrorBox { title, message } => {
            json!({ "type": "shell_error_box", "title": title, "message": message })
        }
    }
}

/// Run a scenario and collect its output lines.
pub async fn run(
    settings: Settings,
    probe: Arc<dyn PathProbe>,
    scenario: Scenario,
) -> Result<Vec<Value>, CliError> {
    let mut replay = Replay::new(settings, probe)?;
    if let Some(options) = scenario.passive_options {
        replay.coordinator.set_passive_defaults(options.into());
    }
    if scenario.passive {
        replay.coordinator.attach(replay.session.clone());
    }

    for (index, step) in scenario.steps.into_iter().enumerate() {
        tracing::debug!(step = index, "Applying scenario step");
        replay.apply(step)?;
    }
    replay.settle().await;
    Ok(replay.lines)
}

pub async fn execute(settings: Settings, scenario_path: &Path) -> Result<(), CliError> {
    let scenario = load_scenario(scenario_path)?;
    let lines = run(settings, Arc::new(FsPathProbe), scenario).await?;
    for line in lines {
        println!("{line}");
    }
    Ok(())
}
