#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaveError {
    #[error("wave slot {index} is out of range (capacity {capacity})")]
    SlotOutOfRange { index: usize, capacity: usize },
    #[error("wave slot {0} is empty")]
    EmptySlot(usize),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClockError {
    #[error("time-of-day range [{min}, {max}] must be finite with min < max")]
    InvalidRange { min: f32, max: f32 },
}
