use crate::types::{ProgramHandle, StageHandle, StageKind};

/// The driver operations the compiler and linker need.
///
/// The shape follows the OpenGL object model: stage objects and program
/// objects are created, filled, queried for status and logs, and deleted
/// explicitly. Implementations must hand out non-zero ids and treat
/// operations on invalid handles as no-ops.
pub trait ShaderDevice {
    /// Allocates an empty stage object, or an invalid handle if the driver
    /// refuses.
    fn create_stage(&mut self, kind: StageKind) -> StageHandle;

    /// Compiles `source` into `stage` and reports whether it succeeded.
    fn compile_stage(&mut self, stage: StageHandle, source: &str) -> bool;

    /// Full compiler log for `stage`; empty when the driver had nothing to say.
    fn stage_log(&self, stage: StageHandle) -> String;

    fn delete_stage(&mut self, stage: StageHandle);

    fn create_program(&mut self) -> ProgramHandle;

    fn attach_stage(&mut self, program: ProgramHandle, stage: StageHandle);

    /// Links every attached stage and reports whether it succeeded.
    fn link_program(&mut self, program: ProgramHandle) -> bool;

    /// Full linker log for `program`.
    fn program_log(&self, program: ProgramHandle) -> String;

    fn delete_program(&mut self, program: ProgramHandle);
}
