use exclusivity::engine::progress::{Progress, ProgressCallback};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Shows each workflow phase as a spinner on stderr.
///
/// A phase gets a fresh spinner; when it finishes the line is kept with a check mark,
/// so a completed comparison leaves one line per phase behind.
#[derive(Clone, Default)]
pub struct CliProgressHandler {
    current: Arc<Mutex<Option<ProgressBar>>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let current = Arc::clone(&self.current);
        Box::new(move |event| {
            let Ok(mut slot) = current.lock() else {
                warn!("Progress state was poisoned; dropping event {:?}.", event);
                return;
            };
            match event {
                Progress::PhaseStart { name } => {
                    if let Some(stale) = slot.take().filter(|pb| !pb.is_finished()) {
                        stale.abandon();
                    }
                    *slot = Some(phase_spinner(name));
                }
                Progress::PhaseFinish => {
                    if let Some(pb) = slot.as_ref().filter(|pb| !pb.is_finished()) {
                        pb.finish_with_message(format!("✓ {}", pb.message()));
                    }
                }
                Progress::Message(note) => match slot.as_ref() {
                    Some(pb) if !pb.is_finished() => pb.println(format!("  {note}")),
                    _ => eprintln!("  {note}"),
                },
            }
        })
    }

    #[cfg(test)]
    fn snapshot(&self) -> Option<(String, bool)> {
        let slot = self.current.lock().unwrap();
        slot.as_ref().map(|pb| (pb.message(), pb.is_finished()))
    }
}

fn phase_spinner(name: &'static str) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr())
        .with_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        )
        .with_message(name);
    pb.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
    pb
}

/// A bar counting finished manifest lines during a batch run.
pub fn batch_bar(total: u64) -> ProgressBar {
    let style = ProgressStyle::with_template("{msg:<12} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("##-");
    ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr())
        .with_style(style)
        .with_message("Dimer pairs")
}
