use crate::device::ShaderDevice;
use crate::source::ShaderStagePayload;
use crate::types::{StageHandle, StageKind};
use crate::DIAGNOSTICS_TARGET;

/// A stage object produced by [`compile_stage`].
///
/// Neither `Clone` nor `Copy`; the linker consumes it. A stage that failed to
/// compile still carries its handle so the caller decides whether to go on
/// assembling the program.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "compiled stages must be linked or released"]
pub struct CompiledStage {
    handle: StageHandle,
    failure_log: Option<String>,
}

impl CompiledStage {
    pub fn handle(&self) -> StageHandle {
        self.handle
    }

    pub fn kind(&self) -> StageKind {
        self.handle.kind()
    }

    pub fn is_compiled(&self) -> bool {
        self.failure_log.is_none()
    }

    /// Compiler log when compilation failed.
    pub fn failure_log(&self) -> Option<&str> {
        self.failure_log.as_deref()
    }

    /// Deletes the stage object.
    pub fn release<D: ShaderDevice + ?Sized>(self, device: &mut D) {
        if self.handle.is_valid() {
            device.delete_stage(self.handle);
        }
    }
}

/// Compiles one stage, consuming its payload.
///
/// Failures are written to the diagnostics channel with the full compiler log
/// and never abort: the returned stage reports `is_compiled() == false`.
pub fn compile_stage<D: ShaderDevice + ?Sized>(
    device: &mut D,
    payload: ShaderStagePayload,
) -> CompiledStage {
    let kind = payload.kind();
    let handle = device.create_stage(kind);
    if !handle.is_valid() {
        let log = format!("driver refused to create a {kind} object");
        tracing::error!(target: DIAGNOSTICS_TARGET, stage = %kind, source = payload.name(), "Compilation error in {kind}: {log}");
        return CompiledStage {
            handle,
            failure_log: Some(log),
        };
    }

    let compiled = device.compile_stage(handle, payload.text());
    let log = device.stage_log(handle);
    let failure_log = if compiled {
        if !log.trim().is_empty() {
            tracing::debug!(target: DIAGNOSTICS_TARGET, stage = %kind, source = payload.name(), "{}", log.trim_end());
        }
        None
    } else {
        let log = if log.trim().is_empty() {
            format!("{kind} failed to compile without a driver log")
        } else {
            log
        };
        tracing::error!(target: DIAGNOSTICS_TARGET, stage = %kind, source = payload.name(), "Compilation error in {kind}: {}", log.trim_end());
        Some(log)
    };

    // The payload is released here, after the stage object holds the program.
    drop(payload);

    CompiledStage {
        handle,
        failure_log,
    }
}
