//! Simulated system stats
//!
//! A background task jitters CPU and memory usage on a fixed interval so the
//! dashboard looks live. The task lives as long as its `SimulatorHandle`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::events::{EventBus, StoreEvent};

/// CPU usage band kept by the drift
pub const CPU_BAND: (f64, f64) = (10.0, 90.0);
/// Memory usage band kept by the drift
pub const MEMORY_BAND: (f64, f64) = (20.0, 95.0);
/// Full width of a CPU step (the delta is ±half of this)
pub const CPU_JITTER: f64 = 10.0;
/// Full width of a memory step
pub const MEMORY_JITTER: f64 = 5.0;
/// Default simulator period
pub const DEFAULT_TICK: Duration = Duration::from_secs(5);

/// Overall health indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemHealth {
    Healthy,
    Warning,
    Critical,
}

impl SystemHealth {
    /// Critical above 85% on either gauge, warning above 70%
    pub fn from_usage(cpu: f64, memory: f64) -> Self {
        let peak = cpu.max(memory);
        if peak > 85.0 {
            SystemHealth::Critical
        } else if peak > 70.0 {
            SystemHealth::Warning
        } else {
            SystemHealth::Healthy
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemHealth::Healthy => "Healthy",
            SystemHealth::Warning => "Warning",
            SystemHealth::Critical => "Critical",
        }
    }
}

impl std::fmt::Display for SystemHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Headline numbers for the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStats {
    pub active_agents: usize,
    pub pending_approvals: usize,
    pub active_workflows: usize,
    pub tools_active: usize,
    pub system_health: SystemHealth,
    pub cpu_usage: f64,
    pub memory_usage: f64,
    /// Milliseconds
    pub uptime: u64,
}

impl Default for SystemStats {
    fn default() -> Self {
        Self {
            active_agents: 0,
            pending_approvals: 0,
            active_workflows: 0,
            tools_active: 0,
            system_health: SystemHealth::Healthy,
            cpu_usage: CPU_BAND.0,
            memory_usage: MEMORY_BAND.0,
            uptime: 0,
        }
    }
}

/// Subset of stats fields to overwrite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsPatch {
    pub active_agents: Option<usize>,
    pub pending_approvals: Option<usize>,
    pub active_workflows: Option<usize>,
    pub tools_active: Option<usize>,
    pub system_health: Option<SystemHealth>,
    pub cpu_usage: Option<f64>,
    pub memory_usage: Option<f64>,
    pub uptime: Option<u64>,
}

impl StatsPatch {
    pub fn apply(self, stats: &mut SystemStats) {
        if let Some(v) = self.active_agents {
            stats.active_agents = v;
        }
        if let Some(v) = self.pending_approvals {
            stats.pending_approvals = v;
        }
        if let Some(v) = self.active_workflows {
            stats.active_workflows = v;
        }
        if let Some(v) = self.tools_active {
            stats.tools_active = v;
        }
        if let Some(v) = self.system_health {
            stats.system_health = v;
        }
        if let Some(v) = self.cpu_usage {
            stats.cpu_usage = v;
        }
        if let Some(v) = self.memory_usage {
            stats.memory_usage = v;
        }
        if let Some(v) = self.uptime {
            stats.uptime = v;
        }
    }
}

/// Stats shared between the dashboard and the simulator task
pub type SharedStats = Arc<RwLock<SystemStats>>;

/// Advance the stats by one simulator step
pub fn tick<R: Rng>(stats: &mut SystemStats, rng: &mut R, period: Duration) {
    let cpu_delta = (rng.gen::<f64>() - 0.5) * CPU_JITTER;
    let memory_delta = (rng.gen::<f64>() - 0.5) * MEMORY_JITTER;

    stats.cpu_usage = (stats.cpu_usage + cpu_delta).clamp(CPU_BAND.0, CPU_BAND.1);
    stats.memory_usage = (stats.memory_usage + memory_delta).clamp(MEMORY_BAND.0, MEMORY_BAND.1);
    stats.uptime = stats.uptime.saturating_add(period.as_millis() as u64);
}

/// Periodic drift of a shared stats record
pub struct StatsSimulator {
    stats: SharedStats,
    period: Duration,
    events: Option<EventBus>,
    seed: Option<u64>,
}

impl StatsSimulator {
    pub fn new(stats: SharedStats) -> Self {
        Self {
            stats,
            period: DEFAULT_TICK,
            events: None,
            seed: None,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Emit `StatsUpdated` after each step
    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Use a deterministic RNG
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start the background task. Must be called inside a tokio runtime.
    pub fn spawn(self) -> SimulatorHandle {
        let StatsSimulator {
            stats,
            period,
            events,
            seed,
        } = self;
        let period = period.max(Duration::from_millis(1));

        tracing::info!(period_ms = period.as_millis() as u64, "stats simulator started");
        let task = tokio::spawn(async move {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let mut interval = tokio::time::interval(period);
            // first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;
                let snapshot = {
                    let mut stats = stats.write();
                    tick(&mut stats, &mut rng, period);
                    stats.clone()
                };

                if let Some(events) = &events {
                    events.emit(StoreEvent::StatsUpdated {
                        cpu_usage: snapshot.cpu_usage,
                        memory_usage: snapshot.memory_usage,
                        uptime_ms: snapshot.uptime,
                        timestamp: Utc::now(),
                    });
                }
            }
        });

        SimulatorHandle { task }
    }
}

/// Owns the simulator task; dropping it stops the drift
#[derive(Debug)]
pub struct SimulatorHandle {
    task: JoinHandle<()>,
}

impl SimulatorHandle {
    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for SimulatorHandle {
    fn drop(&mut self) {
        if !self.task.is_finished() {
            tracing::info!("stats simulator stopped");
        }
        self.task.abort();
    }
}
