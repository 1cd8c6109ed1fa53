//! Procedural ocean data model: Gerstner waves, the water grid, and the
//! animation clock that drives both.
//!
//! Nothing in this crate touches the GPU. The draw step reads the wave set,
//! the clock, and the static grid topology once per frame and packs them with
//! [`WaveUniforms`] and [`FrameUniforms`].

mod clock;
mod error;
mod grid;
mod scene;
mod settings;
mod uniforms;
mod waves;

pub use clock::{
    AnimationClock, AnimationState, ClockSettings, DEFAULT_MAX_HOURS, DEFAULT_MIN_HOURS,
};
pub use error::{ClockError, WaveError};
pub use grid::{build_grid_topology, build_grid_vertices, GridTopology, DEFAULT_GRID_LENGTH};
pub use scene::{OceanScene, SceneSnapshot};
pub use settings::{PolygonMode, SceneSettings, MAX_CLOUD_PROPORTION};
pub use uniforms::{FrameUniforms, GerstnerWaveUniform, WaveUniforms};
pub use waves::{
    sanitize_direction, GerstnerWave, GerstnerWaveSet, WaveEdit, AMPLITUDE_RANGE,
    DEFAULT_DIRECTION, FREQUENCY_RANGE, MAX_WAVES, PHASE_RANGE, STEEPNESS_RANGE,
};
