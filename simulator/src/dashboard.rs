//! Weather dashboard controller.
//!
//! A worker thread refreshes the weather record and icon and sends each
//! result over a channel. The render loop shows the loading spinner, then
//! redraws the weather panel every frame, picking up whatever the worker has
//! sent since the previous frame. A slow or failing fetch never blocks
//! rendering; the panel keeps showing the last record it received.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use embedded_graphics::pixelcolor::Rgb888;
use log::{debug, info, warn};
use matrix_common::animations::AnimationPhase;
use matrix_common::colors::CYAN;
use matrix_common::scheduler::PhaseEnd;
use matrix_common::widgets::{WeatherPanel, draw_weather_panel};
use matrix_common::{Canvas, Clock, Font, FramePresenter, Panel, Scheduler};

use crate::decode::decode_image;
use crate::timing::StopToken;
use crate::weather::{FetchError, IconFetcher, WeatherSource};

// =============================================================================
// Fetching
// =============================================================================

/// Fetch conditions and their icon. An icon failure is logged and leaves
/// the icon empty; only a conditions failure is an error.
pub fn fetch_panel(
    source: &impl WeatherSource,
    fetcher: &impl IconFetcher,
    location: &str,
) -> Result<WeatherPanel, FetchError> {
    let conditions = source.current_conditions(location)?;

    let icon = fetcher
        .fetch_bytes(&conditions.condition_icon_url)
        .and_then(|bytes| decode_image(&bytes).map_err(FetchError::from));
    let icon = match icon {
        Ok(icon) => Some(icon),
        Err(err) => {
            warn!("Icon unavailable ({}): {err}", conditions.condition_icon_url);
            None
        }
    };

    info!("Weather for {}: {:.1} C", conditions.location_name, conditions.temperature_celsius);
    Ok(WeatherPanel { conditions: Some(conditions), icon })
}

/// Spawn the refresh worker.
///
/// Fetches immediately, then every `refresh` until `stop` is set or the
/// receiver is dropped.
pub fn spawn_weather_worker<S, F>(
    source: S,
    fetcher: F,
    location: String,
    refresh: Duration,
    stop: StopToken,
) -> (Receiver<WeatherPanel>, JoinHandle<()>)
where
    S: WeatherSource + Send + 'static,
    F: IconFetcher + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let handle = thread::spawn(move || weather_worker(&source, &fetcher, &location, refresh, &stop, &tx));
    (rx, handle)
}

fn weather_worker(
    source: &impl WeatherSource,
    fetcher: &impl IconFetcher,
    location: &str,
    refresh: Duration,
    stop: &StopToken,
    tx: &Sender<WeatherPanel>,
) {
    info!("Weather worker started for '{location}' (refresh every {refresh:?})");

    loop {
        match fetch_panel(source, fetcher, location) {
            Ok(panel) => {
                if tx.send(panel).is_err() {
                    break;
                }
            }
            Err(err) => warn!("Weather fetch failed, keeping last known data: {err}"),
        }

        if !stop.sleep(refresh) {
            break;
        }
    }

    debug!("Weather worker stopped");
}

// =============================================================================
// Controller
// =============================================================================

/// Render-side state of the dashboard.
pub struct Dashboard {
    font: Font,
    location: String,
    color: Rgb888,
    panel: WeatherPanel,
    updates: Receiver<WeatherPanel>,
    connected: bool,
}

impl Dashboard {
    pub fn new(
        font: Font,
        location: String,
        updates: Receiver<WeatherPanel>,
    ) -> Self {
        Self { font, location, color: CYAN, panel: WeatherPanel::default(), updates, connected: true }
    }

    /// Take the newest record sent since the last call, if any.
    pub fn apply_updates(&mut self) {
        loop {
            match self.updates.try_recv() {
                Ok(panel) => self.panel = panel,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.connected {
                        warn!("Weather worker gone, showing last known data");
                        self.connected = false;
                    }
                    break;
                }
            }
        }
    }

    pub fn panel(&self) -> &WeatherPanel { &self.panel }

    pub fn render(
        &self,
        canvas: &mut Canvas,
    ) {
        draw_weather_panel(canvas, self.font, &self.panel, &self.location, self.color);
    }
}

/// Show the loading spinner for `loading`, then the weather panel every
/// `frame_time` until `keep_running` returns `false`.
///
/// Returns the back canvas and the number of steady-state frames presented.
pub fn run_dashboard<P, C, K>(
    presenter: &mut FramePresenter<P>,
    clock: &mut C,
    back: Canvas,
    dashboard: &mut Dashboard,
    loading: AnimationPhase,
    frame_time: Duration,
    mut keep_running: K,
) -> (Canvas, u64)
where
    P: Panel,
    C: Clock,
    K: FnMut() -> bool,
{
    let run = Scheduler::new(presenter, clock).run_phase(back, &loading, &mut keep_running);
    let mut back = run.back;
    if run.end == PhaseEnd::Stopped {
        return (back, 0);
    }

    info!("Dashboard running ({frame_time:?} per frame)");
    let mut frames = 0u64;
    while keep_running() {
        let frame_start = clock.now();

        dashboard.apply_updates();
        back.clear();
        dashboard.render(&mut back);
        back = presenter.swap_and_present(back);
        frames += 1;

        let spent = clock.now().saturating_sub(frame_start);
        if spent < frame_time {
            clock.sleep(frame_time - spent);
        }
    }

    debug!("Dashboard stopped after {frames} frames");
    (back, frames)
}
