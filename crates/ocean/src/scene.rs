//! Everything the draw step reads each frame, owned in one place.
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::clock::{AnimationClock, AnimationState, ClockSettings};
use crate::error::ClockError;
use crate::grid::{build_grid_topology, GridTopology};
use crate::settings::SceneSettings;
use crate::uniforms::{FrameUniforms, WaveUniforms};
use crate::waves::GerstnerWaveSet;

pub struct OceanScene {
    waves: GerstnerWaveSet,
    clock: AnimationClock,
    settings: SceneSettings,
    topology: GridTopology,
    extent: f32,
    seed: u64,
    rng: StdRng,
}

/// Serializable view of a scene, used for headless inspection.
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot<'a> {
    pub seed: u64,
    pub grid_length: u16,
    pub grid_triangles: usize,
    pub clock: AnimationState,
    pub waves: &'a GerstnerWaveSet,
}

impl OceanScene {
    /// Builds the grid once and samples the initial wave set.
    ///
    /// `seed` overrides `config.waves.seed`; with neither, a seed is drawn
    /// from entropy and kept so the run can be replayed.
    pub fn from_config(
        config: &sceneconfig::SceneConfig,
        seed: Option<u64>,
    ) -> Result<Self, ClockError> {
        let clock = AnimationClock::new(ClockSettings::from(&config.clock))?;
        let seed = seed
            .or(config.waves.seed)
            .unwrap_or_else(|| rand::thread_rng().gen());
        let mut scene = Self {
            waves: GerstnerWaveSet::new(),
            clock,
            settings: SceneSettings::from(&config.settings),
            topology: build_grid_topology(config.grid.length),
            extent: config.grid.extent,
            seed,
            rng: StdRng::seed_from_u64(seed),
        };
        scene.regenerate_waves(config.waves.count);
        tracing::info!(
            seed,
            grid_length = config.grid.length,
            waves = scene.waves.active_count(),
            "ocean scene ready"
        );
        Ok(scene)
    }

    pub fn regenerate_waves(&mut self, count: usize) -> usize {
        self.waves.regenerate(count, &mut self.rng)
    }

    pub fn tick(&mut self, dt: Duration) {
        self.clock.tick(dt);
    }

    pub fn waves(&self) -> &GerstnerWaveSet {
        &self.waves
    }

    pub fn waves_mut(&mut self) -> &mut GerstnerWaveSet {
        &mut self.waves
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut AnimationClock {
        &mut self.clock
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SceneSettings {
        &mut self.settings
    }

    pub fn topology(&self) -> &GridTopology {
        &self.topology
    }

    pub fn extent(&self) -> f32 {
        self.extent
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn wave_uniforms(&self) -> WaveUniforms {
        WaveUniforms::from_set(&self.waves, self.clock.wave_time())
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms::new(&self.clock.state(), &self.settings)
    }

    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        SceneSnapshot {
            seed: self.seed,
            grid_length: self.topology.length(),
            grid_triangles: self.topology.triangle_count(),
            clock: self.clock.state(),
            waves: &self.waves,
        }
    }
}
