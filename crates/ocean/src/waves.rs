//! Gerstner wave descriptors and the fixed-capacity set the renderer reads.
//!
//! Every mutation funnels through [`GerstnerWave::sanitized`], a pure function
//! that pulls out-of-range values back into range instead of rejecting them.
//! Slider drags and typed-in values can overshoot transiently; the renderer
//! must never see them.
use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use glam::{Vec2, Vec3};
use rand::Rng;
use serde::Serialize;

use crate::error::WaveError;

/// Number of wave slots the displacement shader evaluates.
pub const MAX_WAVES: usize = 4;

/// Substituted for a direction that cannot be normalised.
pub const DEFAULT_DIRECTION: Vec2 = Vec2::new(0.0, 1.0);

pub const AMPLITUDE_RANGE: RangeInclusive<f32> = 0.05..=0.15;
pub const FREQUENCY_RANGE: RangeInclusive<f32> = 0.5..=2.0;
pub const PHASE_RANGE: RangeInclusive<f32> = 0.3..=1.0;
pub const STEEPNESS_RANGE: RangeInclusive<f32> = 0.0..=1.0;

/// One trochoidal wave: amplitude `A`, angular frequency `w`, phase constant
/// `phi`, steepness `Q`, and travel direction `D` on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GerstnerWave {
    amplitude: f32,
    frequency: f32,
    phase: f32,
    steepness: f32,
    direction: Vec2,
}

impl GerstnerWave {
    /// Builds a wave, clamping every field into range.
    pub fn new(amplitude: f32, frequency: f32, phase: f32, steepness: f32, direction: Vec2) -> Self {
        Self {
            amplitude,
            frequency,
            phase,
            steepness,
            direction,
        }
        .sanitized()
    }

    /// Draws a wave from the regeneration ranges.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let amplitude = rng.gen_range(AMPLITUDE_RANGE);
        let frequency = rng.gen_range(FREQUENCY_RANGE);
        let phase = rng.gen_range(PHASE_RANGE);
        let steepness = rng.gen_range(STEEPNESS_RANGE);
        let direction = Vec2::from_angle(rng.gen_range(0.0..TAU));
        Self::new(amplitude, frequency, phase, steepness, direction)
    }

    /// Returns a copy with every field forced back into range.
    ///
    /// Amplitude, frequency, and phase are floored at zero; steepness is
    /// clamped to `[0, 1]`; non-finite scalars fall back to zero. The
    /// direction goes through [`sanitize_direction`].
    pub fn sanitized(self) -> Self {
        Self {
            amplitude: non_negative(self.amplitude),
            frequency: non_negative(self.frequency),
            phase: non_negative(self.phase),
            steepness: if self.steepness.is_finite() {
                self.steepness.clamp(0.0, 1.0)
            } else {
                0.0
            },
            direction: sanitize_direction(self.direction),
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn steepness(&self) -> f32 {
        self.steepness
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Temporal term `phi * t` reduced into `[0, 2pi)`.
    ///
    /// Evaluated in f64 so long-running clocks keep sub-frame resolution; the
    /// GPU only ever sees the reduced angle.
    pub fn time_phase(&self, time: f64) -> f32 {
        (f64::from(self.phase) * time).rem_euclid(std::f64::consts::TAU) as f32
    }

    fn angle(&self, xz: Vec2, time: f64) -> f32 {
        self.frequency * self.direction.dot(xz) + self.time_phase(time)
    }
}

/// Clamps each component into `[-1, 1]` and normalises the result.
///
/// A vector that is exactly zero (or not finite) cannot be normalised and is
/// replaced by [`DEFAULT_DIRECTION`].
pub fn sanitize_direction(direction: Vec2) -> Vec2 {
    if !direction.is_finite() {
        return DEFAULT_DIRECTION;
    }
    let clamped = direction.clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
    if clamped.length() == 0.0 {
        DEFAULT_DIRECTION
    } else {
        clamped.normalize()
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Partial edit of a wave; `None` leaves a field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WaveEdit {
    pub amplitude: Option<f32>,
    pub frequency: Option<f32>,
    pub phase: Option<f32>,
    pub steepness: Option<f32>,
    pub direction: Option<Vec2>,
}

impl WaveEdit {
    /// Applies the edit and re-clamps the whole wave.
    pub fn apply(&self, wave: GerstnerWave) -> GerstnerWave {
        GerstnerWave {
            amplitude: self.amplitude.unwrap_or(wave.amplitude),
            frequency: self.frequency.unwrap_or(wave.frequency),
            phase: self.phase.unwrap_or(wave.phase),
            steepness: self.steepness.unwrap_or(wave.steepness),
            direction: self.direction.unwrap_or(wave.direction),
        }
        .sanitized()
    }
}

/// Fixed-capacity set of optional waves. Empty slots are inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GerstnerWaveSet {
    slots: [Option<GerstnerWave>; MAX_WAVES],
}

impl GerstnerWaveSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(&self) -> usize {
        MAX_WAVES
    }

    /// Replaces the first `count` slots with freshly sampled waves and clears
    /// the rest. `count` above capacity is clamped. Returns the number of
    /// active waves afterwards.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> usize {
        let count = if count > MAX_WAVES {
            tracing::warn!(requested = count, capacity = MAX_WAVES, "clamping wave count");
            MAX_WAVES
        } else {
            count
        };

        let mut slots = [None; MAX_WAVES];
        for slot in slots.iter_mut().take(count) {
            *slot = Some(GerstnerWave::sample(rng));
        }
        self.slots = slots;
        tracing::debug!(count, "regenerated gerstner waves");
        count
    }

    /// Applies a partial edit to an active slot and returns the clamped wave.
    pub fn set_descriptor(&mut self, index: usize, edit: &WaveEdit) -> Result<GerstnerWave, WaveError> {
        let slot = self.slot_mut(index)?;
        let current = (*slot).ok_or(WaveError::EmptySlot(index))?;
        let updated = edit.apply(current);
        *slot = Some(updated);
        Ok(updated)
    }

    /// Installs or clears a whole slot.
    pub fn set_slot(&mut self, index: usize, wave: Option<GerstnerWave>) -> Result<(), WaveError> {
        *self.slot_mut(index)? = wave.map(GerstnerWave::sanitized);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&GerstnerWave> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn slots(&self) -> &[Option<GerstnerWave>; MAX_WAVES] {
        &self.slots
    }

    /// Active waves with their slot index, skipping empty slots.
    pub fn iter_active(&self) -> impl Iterator<Item = (usize, &GerstnerWave)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|wave| (index, wave)))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Offset of the surface point at rest position `xz` after `time` seconds.
    ///
    /// Sums the closed-form Gerstner terms. Each wave's steepness is scaled by
    /// `1 / (w * A * n)` so `Q = 1` across all `n` active waves produces sharp
    /// crests without looping.
    pub fn displacement(&self, xz: Vec2, time: f64) -> Vec3 {
        let active = self.active_count() as f32;
        self.iter_active()
            .fold(Vec3::ZERO, |offset, (_, wave)| {
                let wa = wave.frequency * wave.amplitude;
                let q = if wa > 0.0 {
                    wave.steepness / (wa * active)
                } else {
                    0.0
                };
                let (sin, cos) = wave.angle(xz, time).sin_cos();
                let horizontal = wave.direction * (q * wave.amplitude * cos);
                offset + Vec3::new(horizontal.x, wave.amplitude * sin, horizontal.y)
            })
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut Option<GerstnerWave>, WaveError> {
        self.slots.get_mut(index).ok_or(WaveError::SlotOutOfRange {
            index,
            capacity: MAX_WAVES,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn assert_unit_or_default(direction: Vec2) {
        assert!(
            direction == DEFAULT_DIRECTION || (direction.length() - 1.0).abs() < 1e-5,
            "direction {direction:?} is neither unit-length nor the default"
        );
    }

    #[test]
    fn regenerate_zero_clears_all_slots() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut set = GerstnerWaveSet::new();
        set.regenerate(MAX_WAVES, &mut rng);
        assert_eq!(set.regenerate(0, &mut rng), 0);
        assert!(set.slots().iter().all(Option::is_none));
    }

    #[test]
    fn regenerate_capacity_fills_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut set = GerstnerWaveSet::new();
        assert_eq!(set.regenerate(MAX_WAVES, &mut rng), MAX_WAVES);
        assert_eq!(set.active_count(), MAX_WAVES);
        for (_, wave) in set.iter_active() {
            assert!(AMPLITUDE_RANGE.contains(&wave.amplitude()));
            assert!(FREQUENCY_RANGE.contains(&wave.frequency()));
            assert!(PHASE_RANGE.contains(&wave.phase()));
            assert!(STEEPNESS_RANGE.contains(&wave.steepness()));
            assert!((wave.direction().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn regenerate_replaces_rather_than_extends() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut set = GerstnerWaveSet::new();
        set.regenerate(4, &mut rng);
        set.regenerate(2, &mut rng);
        assert_eq!(set.active_count(), 2);
        assert!(set.get(2).is_none());
        assert!(set.get(3).is_none());
    }

    #[test]
    fn regenerate_clamps_count_to_capacity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut set = GerstnerWaveSet::new();
        assert_eq!(set.regenerate(9, &mut rng), MAX_WAVES);
    }

    #[test]
    fn equal_seeds_give_equal_sets() {
        let mut a = GerstnerWaveSet::new();
        let mut b = GerstnerWaveSet::new();
        a.regenerate(3, &mut StdRng::seed_from_u64(42));
        b.regenerate(3, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn edits_are_force_clamped() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut set = GerstnerWaveSet::new();
        set.regenerate(1, &mut rng);

        let edits = [
            WaveEdit {
                steepness: Some(1.7),
                ..WaveEdit::default()
            },
            WaveEdit {
                steepness: Some(-0.2),
                amplitude: Some(-3.0),
                ..WaveEdit::default()
            },
            WaveEdit {
                direction: Some(Vec2::new(5.0, -5.0)),
                ..WaveEdit::default()
            },
            WaveEdit {
                direction: Some(Vec2::new(0.3, 0.0)),
                frequency: Some(f32::NAN),
                ..WaveEdit::default()
            },
            WaveEdit {
                direction: Some(Vec2::ZERO),
                phase: Some(f32::INFINITY),
                ..WaveEdit::default()
            },
        ];
        for edit in &edits {
            let wave = set.set_descriptor(0, edit).unwrap();
            assert!((0.0..=1.0).contains(&wave.steepness()));
            assert!(wave.amplitude() >= 0.0);
            assert!(wave.frequency() >= 0.0);
            assert!(wave.phase() >= 0.0);
            assert_unit_or_default(wave.direction());
            assert_eq!(set.get(0), Some(&wave));
        }
    }

    #[test]
    fn zero_direction_becomes_default() {
        assert_eq!(sanitize_direction(Vec2::ZERO), DEFAULT_DIRECTION);
        assert_eq!(sanitize_direction(Vec2::new(f32::NAN, 0.5)), DEFAULT_DIRECTION);
        let diagonal = sanitize_direction(Vec2::new(3.0, 3.0));
        assert!((diagonal - Vec2::splat(std::f32::consts::FRAC_1_SQRT_2)).length() < 1e-6);
    }

    #[test]
    fn editing_an_empty_or_missing_slot_fails() {
        let mut set = GerstnerWaveSet::new();
        assert_eq!(
            set.set_descriptor(1, &WaveEdit::default()),
            Err(WaveError::EmptySlot(1))
        );
        assert_eq!(
            set.set_descriptor(MAX_WAVES, &WaveEdit::default()),
            Err(WaveError::SlotOutOfRange {
                index: MAX_WAVES,
                capacity: MAX_WAVES
            })
        );
    }

    #[test]
    fn empty_set_does_not_displace() {
        let set = GerstnerWaveSet::new();
        assert_eq!(set.displacement(Vec2::new(1.0, 2.0), 3.0), Vec3::ZERO);
    }

    #[test]
    fn single_wave_height_follows_sine() {
        let mut set = GerstnerWaveSet::new();
        let wave = GerstnerWave::new(0.1, 1.0, 0.5, 0.0, Vec2::X);
        set.set_slot(2, Some(wave)).unwrap();
        let offset = set.displacement(Vec2::new(0.25, 0.0), 2.0);
        let expected = 0.1 * (1.0_f32 * 0.25 + 0.5 * 2.0).sin();
        assert!((offset.y - expected).abs() < 1e-6);
        assert_eq!(offset.x, 0.0);
        assert_eq!(offset.z, 0.0);
    }

    #[test]
    fn displacement_stays_accurate_at_large_times() {
        let mut set = GerstnerWaveSet::new();
        set.set_slot(0, Some(GerstnerWave::new(0.1, 1.0, 0.7, 0.0, Vec2::X)))
            .unwrap();
        let time = 600_010.25_f64;
        let offset = set.displacement(Vec2::ZERO, time);
        let expected = 0.1 * (f64::from(0.7_f32) * time).sin();
        assert!((f64::from(offset.y) - expected).abs() < 1e-4, "{} vs {expected}", offset.y);

        let wave = set.get(0).unwrap();
        let phase = wave.time_phase(time);
        assert!((0.0..std::f32::consts::TAU).contains(&phase));
    }

    #[test]
    fn steep_wave_moves_points_along_direction() {
        let mut set = GerstnerWaveSet::new();
        set.set_slot(0, Some(GerstnerWave::new(0.1, 1.0, 0.0, 1.0, Vec2::Y)))
            .unwrap();
        let offset = set.displacement(Vec2::ZERO, 0.0);
        // Q / (w * A * n) * A * cos(0) = 1 / (1 * 0.1) * 0.1 = 1
        assert!((offset.z - 1.0).abs() < 1e-5);
        assert!(offset.x.abs() < 1e-6);
    }
}
