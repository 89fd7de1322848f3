use brmsf::engine::progress::{Progress, ProgressCallback};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch};
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

#[derive(Debug)]
pub enum UiEvent {
    Progress(Progress),
    Log(String),
}

/// Renders workflow phases as one spinner or bar at a time on stderr.
pub struct UiManager {
    mp: MultiProgress,
    phase: Option<PhaseView>,
    event_receiver: mpsc::Receiver<UiEvent>,
    shutdown_receiver: watch::Receiver<bool>,
}

/// The phase currently on screen.
struct PhaseView {
    name: &'static str,
    bar: ProgressBar,
    status: Option<String>,
    started: Instant,
}

impl PhaseView {
    fn start(mp: &MultiProgress, name: &'static str) -> Self {
        let bar = mp.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        bar.set_style(spinner_style());
        bar.set_message(name);
        Self {
            name,
            bar,
            status: None,
            started: Instant::now(),
        }
    }

    fn set_status(&mut self, text: String) {
        self.bar.set_message(format!("{} ({})", self.name, text));
        self.status = Some(text);
    }

    fn summary(&self) -> String {
        finish_line(self.name, self.status.as_deref(), self.started.elapsed())
    }
}

/// Line left in the scrollback once a phase completes.
fn finish_line(name: &str, status: Option<&str>, elapsed: Duration) -> String {
    match status {
        Some(status) => format!("✓ {} ({}, {:.1}s)", name, status, elapsed.as_secs_f64()),
        None => format!("✓ {} ({:.1}s)", name, elapsed.as_secs_f64()),
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

fn iteration_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg:<24} [{bar:40.cyan/blue}] {pos}/{len} iterations ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("━╸ ")
}

impl UiManager {
    pub fn new() -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        Self::with_draw_target(ProgressDrawTarget::stderr_with_hz(12))
    }

    fn with_draw_target(
        target: ProgressDrawTarget,
    ) -> (Self, mpsc::Sender<UiEvent>, watch::Sender<bool>) {
        let (event_sender, event_receiver) = mpsc::channel(1024);
        let (shutdown_sender, shutdown_receiver) = watch::channel(false);
        let mp = MultiProgress::with_draw_target(target);
        let manager = Self {
            mp,
            phase: None,
            event_receiver,
            shutdown_receiver,
        };
        (manager, event_sender, shutdown_sender)
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                Some(event) = self.event_receiver.recv() => {
                    self.handle_event(event);
                }
                result = self.shutdown_receiver.changed() => {
                    if result.is_err() || *self.shutdown_receiver.borrow() {
                        break;
                    }
                }
            }
        }
        // Flush whatever was queued before the shutdown signal.
        while let Ok(event) = self.event_receiver.try_recv() {
            self.handle_event(event);
        }
        if let Some(phase) = self.phase.take() {
            phase.bar.finish_and_clear();
        }
    }

    fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Log(line) => {
                self.mp.println(line).ok();
            }
            UiEvent::Progress(progress) => self.handle_progress(progress),
        }
    }

    fn handle_progress(&mut self, progress: Progress) {
        match progress {
            Progress::PhaseStart { name } => {
                if let Some(previous) = self.phase.take() {
                    previous.bar.finish_and_clear();
                }
                self.phase = Some(PhaseView::start(&self.mp, name));
            }
            Progress::PhaseFinish => {
                if let Some(phase) = self.phase.take() {
                    phase.bar.finish_and_clear();
                    self.mp.println(phase.summary()).ok();
                }
            }
            Progress::TaskStart { total } => {
                if let Some(phase) = &self.phase {
                    phase.bar.disable_steady_tick();
                    phase.bar.set_style(iteration_style());
                    phase.bar.set_length(total);
                    phase.bar.set_position(0);
                }
            }
            Progress::TaskIncrement { amount } => {
                if let Some(phase) = &self.phase {
                    phase.bar.inc(amount);
                }
            }
            Progress::TaskFinish => {
                if let Some(phase) = &self.phase {
                    phase.bar.finish();
                }
            }
            Progress::StatusUpdate { text } => {
                if let Some(phase) = &mut self.phase {
                    phase.set_status(text);
                }
            }
            Progress::Message(text) => {
                self.mp.println(format!("  {}", text)).ok();
            }
        }
    }
}

/// Turns core progress events into UI events on the channel.
#[derive(Clone)]
pub struct CliProgressHandler {
    sender: mpsc::Sender<UiEvent>,
}

impl CliProgressHandler {
    pub fn new(sender: mpsc::Sender<UiEvent>) -> Self {
        Self { sender }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let sender = self.sender.clone();
        Box::new(move |progress: Progress| {
            if let Err(e) = sender.try_send(UiEvent::Progress(progress)) {
                warn!("Failed to send progress update to UI channel: {}", e);
            }
        })
    }
}
