use std::fmt;

/// Pipeline phase a shader stage targets.
///
/// Variants are declared in attachment order, so sorting by `StageKind`
/// yields the deterministic order the linker attaches stages in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageKind {
    Vertex,
    TessControl,
    TessEval,
    Fragment,
}

impl StageKind {
    pub const ALL: [StageKind; 4] = [
        StageKind::Vertex,
        StageKind::TessControl,
        StageKind::TessEval,
        StageKind::Fragment,
    ];

    /// Whether every program must carry this stage.
    pub fn is_mandatory(self) -> bool {
        matches!(self, StageKind::Vertex | StageKind::Fragment)
    }

    /// Tag used on the diagnostics channel.
    pub fn tag(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex_shader",
            StageKind::TessControl => "tess_control_shader",
            StageKind::TessEval => "tess_eval_shader",
            StageKind::Fragment => "fragment_shader",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Opaque handle to a driver-side shader stage object.
///
/// Id `0` is never handed out by a device and marks a stage object that could
/// not be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StageHandle {
    id: u32,
    kind: StageKind,
}

impl StageHandle {
    pub fn new(id: u32, kind: StageKind) -> Self {
        Self { id, kind }
    }

    pub fn invalid(kind: StageKind) -> Self {
        Self { id: 0, kind }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn is_valid(&self) -> bool {
        self.id != 0
    }
}

/// Opaque handle to a driver-side program object.
///
/// The id is the driver's name for the object; `valid` records whether the
/// program linked. A program that failed to link keeps its id so the caller
/// can still release it, but must never be bound for drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle {
    id: u32,
    valid: bool,
}

impl ProgramHandle {
    /// Placeholder returned when no program object exists at all.
    pub const INVALID: ProgramHandle = ProgramHandle { id: 0, valid: false };

    pub fn new(id: u32) -> Self {
        Self { id, valid: id != 0 }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn invalidated(self) -> Self {
        Self {
            id: self.id,
            valid: false,
        }
    }
}

impl Default for ProgramHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_kinds_sort_in_attachment_order() {
        let mut kinds = vec![
            StageKind::Fragment,
            StageKind::TessEval,
            StageKind::Vertex,
            StageKind::TessControl,
        ];
        kinds.sort();
        assert_eq!(kinds, StageKind::ALL.to_vec());
    }

    #[test]
    fn zero_program_id_is_never_valid() {
        assert!(!ProgramHandle::new(0).is_valid());
        assert!(ProgramHandle::new(7).is_valid());
        let failed = ProgramHandle::new(7).invalidated();
        assert_eq!(failed.id(), 7);
        assert!(!failed.is_valid());
    }
}
