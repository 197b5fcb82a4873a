use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use pwrmsd::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::warn;

const SPINNER_TICK_MS: u64 = 80;

/// One bar per cycle, stacked on stderr.
///
/// A finished cycle keeps its line, so the terminal ends up with a record of every
/// table computed by the run. Skips and free-form messages are printed above the bars
/// whether or not a cycle is in progress.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<CycleBars>>,
}

struct CycleBars {
    multi: MultiProgress,
    current: Option<ProgressBar>,
}

impl CycleBars {
    fn print(&self, line: String) {
        if let Err(e) = self.multi.println(line) {
            warn!("Failed to print progress message: {}", e);
        }
    }

    fn start_cycle(&mut self, label: String) {
        if let Some(stale) = self.current.take() {
            stale.abandon();
        }
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(spinner_style());
        bar.set_prefix(label);
        bar.set_message("loading geometries");
        bar.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.current = Some(bar);
    }

    fn finish_cycle(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish_with_message("done");
        }
    }
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            state: Arc::new(Mutex::new(CycleBars {
                multi: MultiProgress::with_draw_target(target),
                current: None,
            })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = self.state.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut bars) = state.lock() else {
                warn!("Progress state mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => bars.start_cycle(name),
                Progress::TaskStart { total_steps } => {
                    if let Some(bar) = &bars.current {
                        bar.disable_steady_tick();
                        bar.set_style(rows_style());
                        bar.set_length(total_steps);
                        bar.set_position(0);
                        bar.set_message("");
                    }
                }
                Progress::TaskIncrement => {
                    if let Some(bar) = &bars.current {
                        bar.inc(1);
                    }
                }
                Progress::TaskFinish => {
                    if let Some(bar) = &bars.current {
                        bar.set_position(bar.length().unwrap_or(0));
                    }
                }
                Progress::PhaseFinish => bars.finish_cycle(),
                Progress::CycleSkipped { cycle } => {
                    bars.print(format!("Cycle {:04}: table already present, skipped", cycle + 1));
                }
                Progress::Message(msg) => bars.print(msg),
            }
        })
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.green} {prefix:.bold} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn rows_style() -> ProgressStyle {
    ProgressStyle::with_template("  {prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} rows {msg} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}
