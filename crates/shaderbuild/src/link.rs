use crate::compile::CompiledStage;
use crate::device::ShaderDevice;
use crate::types::{ProgramHandle, StageKind};
use crate::DIAGNOSTICS_TARGET;

/// Outcome of a link attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedProgram {
    handle: ProgramHandle,
    failure_log: Option<String>,
}

impl LinkedProgram {
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn is_linked(&self) -> bool {
        self.failure_log.is_none() && self.handle.is_valid()
    }

    pub fn failure_log(&self) -> Option<&str> {
        self.failure_log.as_deref()
    }

    pub fn into_parts(self) -> (ProgramHandle, Option<String>) {
        (self.handle, self.failure_log)
    }
}

/// Links compiled stages into one program.
///
/// Stages are attached in [`StageKind`] order (vertex, tess-control,
/// tess-eval, fragment) whatever order they arrive in. The set must hold one
/// vertex and one fragment stage plus at most one of each tessellation stage.
///
/// Every stage passed in is deleted before this returns, whether or not the
/// link succeeded. On failure the returned handle keeps the driver id but is
/// marked invalid, and the full link log is written to the diagnostics
/// channel.
pub fn link_program<D: ShaderDevice + ?Sized>(
    device: &mut D,
    mut stages: Vec<CompiledStage>,
) -> LinkedProgram {
    stages.sort_by_key(CompiledStage::kind);

    if let Some(problem) = composition_problem(&stages) {
        release_all(device, stages);
        return failed(ProgramHandle::INVALID, problem);
    }

    let program = device.create_program();
    if !program.is_valid() {
        release_all(device, stages);
        return failed(program, "driver refused to create a program object".to_string());
    }

    for stage in &stages {
        if stage.handle().is_valid() {
            device.attach_stage(program, stage.handle());
        }
    }

    let linked = device.link_program(program);
    release_all(device, stages);

    if linked {
        let log = device.program_log(program);
        if !log.trim().is_empty() {
            tracing::debug!(target: DIAGNOSTICS_TARGET, program = program.id(), "{}", log.trim_end());
        }
        tracing::debug!(program = program.id(), "linked shader program");
        LinkedProgram {
            handle: program,
            failure_log: None,
        }
    } else {
        let log = device.program_log(program);
        let log = if log.trim().is_empty() {
            "program failed to link without a driver log".to_string()
        } else {
            log
        };
        failed(program.invalidated(), log)
    }
}

fn failed(handle: ProgramHandle, log: String) -> LinkedProgram {
    tracing::error!(target: DIAGNOSTICS_TARGET, program = handle.id(), "Linking error in program: {}", log.trim_end());
    LinkedProgram {
        handle: handle.invalidated(),
        failure_log: Some(log),
    }
}

fn release_all<D: ShaderDevice + ?Sized>(device: &mut D, stages: Vec<CompiledStage>) {
    for stage in stages {
        stage.release(device);
    }
}

fn composition_problem(stages: &[CompiledStage]) -> Option<String> {
    let count = |kind: StageKind| stages.iter().filter(|s| s.kind() == kind).count();
    let mut issues = Vec::new();
    for kind in StageKind::ALL {
        let found = count(kind);
        if kind.is_mandatory() && found == 0 {
            issues.push(format!("missing {kind}"));
        }
        if found > 1 {
            issues.push(format!("{found} {kind} stages supplied"));
        }
    }
    if issues.is_empty() {
        None
    } else {
        Some(format!("invalid stage set: {}", issues.join(", ")))
    }
}
