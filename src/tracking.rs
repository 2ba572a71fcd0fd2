use std::time::Duration;

use spin_sleep::SpinSleeper;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use storepilot_geo::{map_to_grid, GeoBounds, GeoFix, GridPoint, GridSize};

use crate::blackboard::{clear_error, set_position_if, Blackboard, Mode};
use crate::bus::Topic;

/// Failures of the device geolocation source. All are recoverable: tracking
/// is disabled, the message is surfaced, and there is no automatic retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoWatchError {
    #[error("Geolocation is not supported on this platform.")]
    Unsupported,
    #[error("Please allow location access to use live tracking.")]
    PermissionDenied,
    #[error("Location information is unavailable.")]
    PositionUnavailable,
    #[error("The request to get user location timed out.")]
    Timeout,
    #[error("An unknown error occurred with geolocation.")]
    Unknown,
}

/// Subscription parameters handed to the location source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    pub high_accuracy: bool,
    /// Bounded wait for each fix; exceeding it surfaces `Timeout`.
    pub timeout: Duration,
    /// Oldest acceptable cached fix. Zero means fresh fixes only.
    pub maximum_age: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        WatchOptions {
            high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

/// One event from a live subscription: a fix, or a terminal error.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationEvent {
    Fix(GeoFix),
    Error(GeoWatchError),
}

/// Cancellable handle over a stream of location events.
///
/// Dropping the subscription or calling [`LocationSubscription::cancel`]
/// tells the source to stop producing.
#[derive(Debug)]
pub struct LocationSubscription {
    events: mpsc::Receiver<LocationEvent>,
    cancel: watch::Sender<bool>,
}

impl LocationSubscription {
    /// Creates the event channel for a subscription. The source keeps the
    /// returned sender and cancel receiver; the subscriber keeps the
    /// subscription.
    pub fn channel(
        buffer: usize,
    ) -> (mpsc::Sender<LocationEvent>, watch::Receiver<bool>, Self) {
        let (tx, rx) = mpsc::channel(buffer);
        let (cancel_tx, cancel_rx) = watch::channel(false);
        (
            tx,
            cancel_rx,
            LocationSubscription {
                events: rx,
                cancel: cancel_tx,
            },
        )
    }

    pub fn cancel(&self) {
        let _ = self.cancel.send(true);
    }
}

/// Seam over the platform's continuous location capability.
pub trait LocationSource: Send + Sync {
    /// Establishes a continuous watch.
    ///
    /// # Errors
    ///
    /// Returns `Err(GeoWatchError::Unsupported)` when the platform offers no
    /// geolocation source at all; other variants when the watch cannot be
    /// established.
    fn subscribe(&self, opts: WatchOptions) -> Result<LocationSubscription, GeoWatchError>;
}

struct ActiveWatch {
    cancel: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Owns the live subscription and feeds mapped fixes into the shared
/// position while `Mode::LiveTracking` holds write authorization.
#[derive(Default)]
pub struct TrackingController {
    active: Option<ActiveWatch>,
}

impl TrackingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a subscription exists and its consumer task is alive.
    /// A watch torn down by a source error counts as inactive.
    pub fn is_active(&self) -> bool {
        self.active
            .as_ref()
            .map(|w| !w.task.is_finished())
            .unwrap_or(false)
    }

    /// Starts consuming the subscription on the runtime.
    ///
    /// The mode does not change here: it flips to `LiveTracking` atomically
    /// with the first successful fix, and any animation cursor is discarded
    /// in the same write so no stale driver state survives into tracking.
    pub fn enable(
        &mut self,
        rt: &Handle,
        subscription: LocationSubscription,
        bb: Blackboard,
        positions: Topic<GridPoint>,
        bounds: GeoBounds,
        grid: GridSize,
    ) {
        let LocationSubscription { events, cancel } = subscription;
        let cancel_rx = cancel.subscribe();
        let task = rt.spawn(run_watch(events, cancel_rx, bb, positions, bounds, grid));
        self.active = Some(ActiveWatch { cancel, task });
        info!("live tracking watch established");
    }

    /// Cancels the subscription synchronously. The caller resets position
    /// and mode; after the cancel signal the consumer task can no longer
    /// pass the mode gate, so no late fix resurrects tracking.
    pub fn disable(&mut self) {
        if let Some(active) = self.active.take() {
            let _ = active.cancel.send(true);
            active.task.abort();
            info!("live tracking watch cancelled");
        }
    }
}

async fn run_watch(
    mut events: mpsc::Receiver<LocationEvent>,
    mut cancel_rx: watch::Receiver<bool>,
    bb: Blackboard,
    positions: Topic<GridPoint>,
    bounds: GeoBounds,
    grid: GridSize,
) {
    let mut first_fix = true;
    loop {
        tokio::select! {
            _ = cancel_rx.changed() => break,
            event = events.recv() => match event {
                Some(LocationEvent::Fix(fix)) => {
                    let p = map_to_grid(fix, bounds, grid);
                    if first_fix {
                        first_fix = false;
                        // Ownership handoff: discard any animation state and
                        // take the position in one write.
                        let mut g = bb.write();
                        g.cursor.reset();
                        g.route.clear();
                        g.mode = Mode::LiveTracking;
                        g.position = p;
                        g.error = None;
                        drop(g);
                        info!(x = p.x, y = p.y, "live tracking engaged on first fix");
                    } else if set_position_if(&bb, Mode::LiveTracking, p) {
                        // A good fix supersedes any earlier surfaced error.
                        clear_error(&bb);
                    } else {
                        // Tracking lost write authorization; stop consuming.
                        break;
                    }
                    positions.publish(p);
                }
                Some(LocationEvent::Error(e)) => {
                    warn!(error = %e, "geolocation watch failed");
                    let mut g = bb.write();
                    if g.mode == Mode::LiveTracking {
                        g.mode = Mode::Idle;
                    }
                    g.error = Some(e.to_string());
                    break;
                }
                None => break, // source hung up
            }
        }
    }
}

/// Simulated shopper walking the store: emits a bounded random walk of GPS
/// fixes inside the geofence. Stands in for the device location service on
/// desktop builds.
pub struct SimulatedWalkSource {
    bounds: GeoBounds,
}

impl SimulatedWalkSource {
    pub fn new(bounds: GeoBounds) -> Self {
        SimulatedWalkSource { bounds }
    }
}

impl LocationSource for SimulatedWalkSource {
    fn subscribe(&self, _opts: WatchOptions) -> Result<LocationSubscription, GeoWatchError> {
        let (tx, cancel_rx, subscription) = LocationSubscription::channel(16);
        let bounds = self.bounds;

        std::thread::Builder::new()
            .name("sim-gps".into())
            .spawn(move || {
                use rand::Rng;

                let sleeper = SpinSleeper::new(10_000);
                let mut rng = rand::rng();
                let mut lat = bounds.lat_min() + bounds.lat_span() * 0.5;
                let mut lon = bounds.lon_min() + bounds.lon_span() * 0.5;
                let lat_step = bounds.lat_span() / 40.0;
                let lon_step = bounds.lon_span() / 40.0;

                loop {
                    if *cancel_rx.borrow() {
                        break;
                    }
                    lat = (lat + rng.random_range(-lat_step..=lat_step))
                        .clamp(bounds.lat_min(), bounds.lat_max());
                    lon = (lon + rng.random_range(-lon_step..=lon_step))
                        .clamp(bounds.lon_min(), bounds.lon_max());
                    let fix = GeoFix::new(lat, lon);
                    if tx.blocking_send(LocationEvent::Fix(fix)).is_err() {
                        break;
                    }
                    sleeper.sleep(Duration::from_millis(500));
                }
            })
            .map_err(|_| GeoWatchError::Unknown)?;

        Ok(subscription)
    }
}
