use biorun_core::engine::progress::{Progress, ProgressCallback};
use colored::*;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// Renders workflow progress events as a spinner or bar on stderr.
///
/// Lines that must survive the bar (commands, per-file outcomes) are printed to stdout with the
/// bar suspended, so they appear even when stderr is not a terminal.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new(0)
            .with_style(Self::spinner_style())
            .with_message("Initializing...");
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.disable_steady_tick();
        pb.finish_and_clear();

        Self {
            pb: Arc::new(Mutex::new(pb)),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => {
                    pb_guard.reset();
                    pb_guard.set_length(0);
                    pb_guard.set_style(Self::spinner_style());
                    pb_guard.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
                    pb_guard.set_message(name);
                }
                Progress::PhaseFinish => {
                    pb_guard.disable_steady_tick();
                    pb_guard.finish_and_clear();
                }
                Progress::TaskStart { total_steps } => {
                    pb_guard.reset();
                    pb_guard.set_length(total_steps);
                    pb_guard.set_position(0);
                    if total_steps > 1 {
                        pb_guard.disable_steady_tick();
                        pb_guard.set_style(Self::bar_style());
                    }
                }
                Progress::TaskIncrement => {
                    pb_guard.inc(1);
                }
                Progress::TaskFinish => {
                    if pb_guard.position() < pb_guard.length().unwrap_or(0) {
                        pb_guard.set_position(pb_guard.length().unwrap_or(0));
                    }
                    pb_guard.disable_steady_tick();
                    pb_guard.finish();
                }
                Progress::Command(cmd) => {
                    let line = format_command(&cmd);
                    pb_guard.suspend(|| println!("{}", line));
                }
                Progress::UnitFinished {
                    name,
                    success,
                    detail,
                } => {
                    let line = format_unit(&name, success, &detail);
                    pb_guard.suspend(|| println!("{}", line));
                }
                Progress::Message(msg) => {
                    if !pb_guard.is_finished() {
                        pb_guard.set_message(msg);
                    } else {
                        pb_guard.suspend(|| println!("  {}", msg));
                    }
                }
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .with_key(
                "eta",
                |state: &ProgressState, w: &mut dyn std::fmt::Write| {
                    let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
                },
            )
            .progress_chars("##-")
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn format_command(cmd: &str) -> String {
    format!("{} {}", "Running:".cyan().bold(), cmd.cyan())
}

fn format_unit(name: &str, success: bool, detail: &str) -> String {
    let mark = if success { "✓".green() } else { "✗".red() };
    if detail.is_empty() {
        format!("{} {}", mark, name)
    } else {
        format!("{} {} ({})", mark, name, detail)
    }
}
