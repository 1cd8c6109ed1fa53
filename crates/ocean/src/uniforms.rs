//! std140 uniform blocks uploaded once per frame.
use bytemuck::{Pod, Zeroable};

use crate::clock::AnimationState;
use crate::settings::SceneSettings;
use crate::waves::{GerstnerWave, GerstnerWaveSet, MAX_WAVES};

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GerstnerWaveUniform {
    pub direction: [f32; 2],
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    pub steepness: f32,
    /// 1.0 for a populated entry, 0.0 otherwise.
    pub active: f32,
    /// `phase * wave_time` already reduced into `[0, 2pi)`.
    pub time_phase: f32,
}

unsafe impl Zeroable for GerstnerWaveUniform {}
unsafe impl Pod for GerstnerWaveUniform {}

impl GerstnerWaveUniform {
    pub fn new(wave: &GerstnerWave, wave_time: f64) -> Self {
        Self {
            direction: wave.direction().to_array(),
            amplitude: wave.amplitude(),
            frequency: wave.frequency(),
            phase: wave.phase(),
            steepness: wave.steepness(),
            active: 1.0,
            time_phase: wave.time_phase(wave_time),
        }
    }
}

/// Matches `layout(std140) uniform Waves { Wave waves[4]; int wave_count; }`.
///
/// Active waves are packed densely from index 0, so shaders loop
/// `for (int i = 0; i < wave_count; ++i)`.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveUniforms {
    pub waves: [GerstnerWaveUniform; MAX_WAVES],
    pub wave_count: i32,
    pub padding0: [i32; 3],
}

unsafe impl Zeroable for WaveUniforms {}
unsafe impl Pod for WaveUniforms {}

impl WaveUniforms {
    /// Packs active waves in slot order, skipping empty slots.
    pub fn from_set(set: &GerstnerWaveSet, wave_time: f64) -> Self {
        let mut uniforms = Self::zeroed();
        let mut count = 0;
        for ((_, wave), entry) in set.iter_active().zip(uniforms.waves.iter_mut()) {
            *entry = GerstnerWaveUniform::new(wave, wave_time);
            count += 1;
        }
        uniforms.wave_count = count;
        uniforms
    }
}

#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub time_of_day: f32,
    pub wave_phase: f32,
    /// Lossy after long runs; wave motion reads `GerstnerWaveUniform::time_phase`.
    pub wave_time: f32,
    pub cloud_proportion: f32,
    pub bump_roughness: f32,
    pub bump_steepness: f32,
    pub bounce_amplitude: f32,
    pub padding0: f32,
}

unsafe impl Zeroable for FrameUniforms {}
unsafe impl Pod for FrameUniforms {}

impl FrameUniforms {
    pub fn new(state: &AnimationState, settings: &SceneSettings) -> Self {
        Self {
            time_of_day: state.time_of_day_hours,
            wave_phase: state.wave_phase,
            wave_time: state.wave_time_seconds as f32,
            cloud_proportion: settings.cloud_proportion(),
            bump_roughness: settings.bump_roughness(),
            bump_steepness: settings.bump_steepness(),
            bounce_amplitude: settings.bounce_amplitude(),
            padding0: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::mem::size_of;

    #[test]
    fn blocks_have_std140_sizes() {
        assert_eq!(size_of::<GerstnerWaveUniform>(), 32);
        assert_eq!(size_of::<WaveUniforms>(), 32 * MAX_WAVES + 16);
        assert_eq!(size_of::<FrameUniforms>(), 32);
    }

    #[test]
    fn packs_sparse_wave_set_densely() {
        let mut set = GerstnerWaveSet::new();
        let wave = GerstnerWave::new(0.1, 1.0, 0.5, 0.25, Vec2::X);
        set.set_slot(2, Some(wave)).unwrap();

        let uniforms = WaveUniforms::from_set(&set, 3.0);
        assert_eq!(uniforms.wave_count, 1);
        assert_eq!(uniforms.waves[0].direction, [1.0, 0.0]);
        assert_eq!(uniforms.waves[0].active, 1.0);
        assert!((uniforms.waves[0].time_phase - 1.5).abs() < 1e-6);
        assert_eq!(uniforms.waves[2], GerstnerWaveUniform::zeroed());
        assert_eq!(bytemuck::bytes_of(&uniforms).len(), size_of::<WaveUniforms>());
    }

    #[test]
    fn every_entry_below_wave_count_is_active() {
        let mut set = GerstnerWaveSet::new();
        for slot in [1, 3] {
            let wave = GerstnerWave::new(0.1, 1.0, 0.5, 0.25, Vec2::Y);
            set.set_slot(slot, Some(wave)).unwrap();
        }

        let uniforms = WaveUniforms::from_set(&set, 0.0);
        let count = uniforms.wave_count as usize;
        assert_eq!(count, 2);
        assert!(uniforms.waves[..count].iter().all(|wave| wave.active == 1.0));
        assert!(uniforms.waves[count..].iter().all(|wave| wave.active == 0.0));
    }
}
