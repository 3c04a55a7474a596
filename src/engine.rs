//! Fixed-step loop driving a world's systems

use log::{debug, info};
use serde::Serialize;

use crate::ecs::{EcsResult, SystemContext, SystemRunReport, World};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Fixed timestep handed to systems each tick.
    pub delta_seconds: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            delta_seconds: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub living_entities: usize,
    pub system_reports: Vec<SystemRunReport>,
}

impl TickSummary {
    pub fn total_duration_ms(&self) -> f64 {
        self.system_reports.iter().map(|r| r.duration_ms).sum()
    }
}

/// Fixed-step update loop. The world is passed in explicitly on every
/// call, so one engine can drive any number of worlds in turn.
pub struct Engine {
    settings: EngineSettings,
    tick: u64,
}

impl Engine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings, tick: 0 }
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn tick(&mut self, world: &mut World) -> EcsResult<TickSummary> {
        self.tick += 1;
        let ctx = SystemContext {
            tick: self.tick,
            delta_seconds: self.settings.delta_seconds,
        };
        let system_reports = world.run_systems(&ctx)?;
        let summary = TickSummary {
            tick: self.tick,
            living_entities: world.living_entity_count(),
            system_reports,
        };
        debug!(
            "tick {} finished in {:.3} ms",
            summary.tick,
            summary.total_duration_ms()
        );
        Ok(summary)
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> EcsResult<Vec<TickSummary>> {
        let mut summaries = Vec::new();
        self.run_with_hook(world, ticks, |summary| summaries.push(summary.clone()))?;
        Ok(summaries)
    }

    pub fn run_with_hook<F>(&mut self, world: &mut World, ticks: u64, mut hook: F) -> EcsResult<()>
    where
        F: FnMut(&TickSummary),
    {
        info!("running {} ticks at dt = {}s", ticks, self.settings.delta_seconds);
        for _ in 0..ticks {
            let summary = self.tick(world)?;
            hook(&summary);
        }
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}
