//! [`SceneLoop`] – the single task that owns the robot.
//!
//! Two periodic drivers share one `tokio::select!`:
//!
//! * the **frame** driver (default 60 Hz) runs
//!   [`JogController::update`] and, when a joint moved, publishes the new
//!   pose on [`Topic::Scene`];
//! * the **monitor** driver (default 1 s) runs [`JointMonitor::tick`].
//!
//! Browser input arrives on [`Topic::Input`] and is applied in the same task,
//! so robot state is never shared and needs no locks.  The loop stops when
//! its shutdown flag is raised or the input channel closes.
//!
//! ```text
//!  Topic::Input ──► handle_input ──► JogController / ControlPanel / Stage
//!  frame tick   ──► JogController::update ──► Topic::Scene (Pose)
//!  monitor tick ──► JointMonitor::tick ──► UiSurface
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use jointview_control::{ControlPanel, FrameOutcome, JogConfig, JogController};
use jointview_hal::Robot;
use jointview_middleware::{EventBus, Topic, TopicReceiver};
use jointview_monitor::{JointMonitor, MonitorConfig, TickReport};
use jointview_types::{Event, EventPayload, InputEvent, UiSurface};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, trace, warn};

use crate::stage::Stage;

const SOURCE: &str = "jointview-runtime::scene";

/// Default render driver rate.
pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;

/// Construction parameters for [`SceneLoop`].
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub frame_rate_hz: u32,
    pub jog: JogConfig,
    pub monitor: MonitorConfig,
    /// Fixed seed for the sensor simulation; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            jog: JogConfig::default(),
            monitor: MonitorConfig::default(),
            seed: None,
        }
    }
}

impl SceneConfig {
    /// Period of the frame driver.  A zero rate is treated as 1 Hz.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz.max(1)))
    }
}

pub struct SceneLoop<U: UiSurface> {
    robot: Robot,
    jog: JogController,
    monitor: JointMonitor,
    panel: ControlPanel,
    stage: Stage,
    ui: U,
    rng: StdRng,
    bus: EventBus,
    input: TopicReceiver,
    frame_interval: Duration,
    shutdown: Arc<AtomicBool>,
}

impl<U: UiSurface> SceneLoop<U> {
    /// Wire the jog controller, the monitor and the control panel to `robot`
    /// and subscribe to browser input on `bus`.
    pub fn new(robot: Robot, mut ui: U, bus: EventBus, config: SceneConfig) -> Self {
        let frame_interval = config.frame_interval();
        let jog = JogController::new(&robot, config.jog);
        let monitor = JointMonitor::new(&robot, &mut ui, config.monitor);
        let mut panel = ControlPanel::new();
        panel.setup(&mut ui, jog.speed_deg());

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            input: bus.subscribe_to(Topic::Input),
            robot,
            jog,
            monitor,
            panel,
            stage: Stage::default(),
            ui,
            rng,
            bus,
            frame_interval,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Share an externally owned shutdown flag (builder-style).
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn jog(&self) -> &JogController {
        &self.jog
    }

    pub fn monitor(&self) -> &JointMonitor {
        &self.monitor
    }

    pub fn monitor_mut(&mut self) -> &mut JointMonitor {
        &mut self.monitor
    }

    pub fn panel(&self) -> &ControlPanel {
        &self.panel
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    /// One render frame: jog every held joint, then flush the pose if the
    /// world transforms went stale.
    pub fn frame(&mut self, now: Instant) -> FrameOutcome {
        let outcome = self.jog.update(&mut self.robot, &mut self.ui, now);
        if self.robot.take_world_dirty() {
            self.publish_scene(EventPayload::Pose(self.robot.pose()));
        }
        outcome
    }

    /// One monitoring pass.
    pub fn monitor_tick(&mut self) -> TickReport {
        self.monitor.tick(&self.robot, &mut self.ui, &mut self.rng)
    }

    /// Apply one browser input.
    pub fn handle_input(&mut self, input: InputEvent, now: Instant) {
        match input {
            InputEvent::Key { key, pressed: true } => self.jog.key_down(&key, &mut self.ui, now),
            InputEvent::Key {
                key,
                pressed: false,
            } => self.jog.key_up(&key, &mut self.ui),
            InputEvent::Speed { degrees } => {
                self.jog.set_speed_degrees(degrees, &mut self.ui);
            }
            InputEvent::Click { id } => {
                let outcome = self.panel.click(&id, &mut self.ui);
                debug!(id = %id, ?outcome, "Panel click");
            }
            InputEvent::Resize {
                width,
                height,
                pixel_ratio,
            } => {
                self.stage.resize(width, height, pixel_ratio);
                if let Some(payload) = self.stage.flush() {
                    self.publish_scene(payload);
                }
            }
            InputEvent::Ready => {
                debug!("Renderer ready, replaying scene state");
                self.ui.resync();
                self.publish_scene(EventPayload::Pose(self.robot.pose()));
                self.publish_scene(self.stage.payload());
            }
        }
    }

    /// Apply every input already queued on the bus without waiting.
    /// Returns the number of inputs handled.
    pub fn drain_inputs(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        loop {
            match self.input.try_recv() {
                Ok(event) => {
                    if let EventPayload::Input(input) = event.payload {
                        self.handle_input(input, now);
                        handled += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Input subscriber lagged; events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return handled,
            }
        }
    }

    /// Drive the frame and monitor ticks and apply input until shutdown.
    pub async fn run(mut self) {
        let mut frame_tick = tokio::time::interval(self.frame_interval);
        frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut monitor_tick = tokio::time::interval(self.monitor.tick_interval());
        monitor_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            robot = %self.robot.name(),
            joints = self.robot.joint_count(),
            frame_ms = self.frame_interval.as_millis() as u64,
            monitor_ms = self.monitor.tick_interval().as_millis() as u64,
            "Scene loop started"
        );

        while !self.shutdown.load(Ordering::Acquire) {
            tokio::select! {
                _ = frame_tick.tick() => {
                    self.frame(Instant::now());
                }
                _ = monitor_tick.tick() => {
                    let report = self.monitor_tick();
                    trace!(evaluated = report.evaluated, alerts = report.alerts.len(), "Monitor tick");
                }
                received = self.input.recv() => match received {
                    Ok(event) => {
                        if let EventPayload::Input(input) = event.payload {
                            self.handle_input(input, Instant::now());
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Input subscriber lagged; events dropped");
                    }
                    Err(RecvError::Closed) => {
                        info!("Input channel closed");
                        break;
                    }
                },
            }
        }

        info!("Scene loop stopped");
    }

    fn publish_scene(&self, payload: EventPayload) {
        if let Err(e) = self
            .bus
            .publish_to(Topic::Scene, Event::new(SOURCE, payload))
        {
            trace!(error = %e, "Scene event not delivered");
        }
    }
}
