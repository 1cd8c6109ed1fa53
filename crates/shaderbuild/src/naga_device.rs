//! Offline [`ShaderDevice`] backed by naga's GLSL frontend.
//!
//! Stages are parsed and validated without a GPU context, which makes this
//! device suitable for checking shader sources ahead of time. Linking checks
//! that the program carries a vertex and a fragment stage and that every
//! fragment input location is fed by a vertex output. naga has no GLSL
//! frontend for tessellation stages, so those always fail to compile here.
use std::collections::{BTreeMap, BTreeSet};

use naga::front::glsl::{Frontend, Options};
use naga::valid::{Capabilities, ValidationFlags, Validator};

use crate::device::ShaderDevice;
use crate::types::{ProgramHandle, StageHandle, StageKind};

#[derive(Debug, Default)]
pub struct NagaDevice {
    next_id: u32,
    stages: BTreeMap<u32, NagaStage>,
    programs: BTreeMap<u32, NagaProgram>,
}

#[derive(Debug)]
struct NagaStage {
    kind: StageKind,
    interface: Option<StageInterface>,
    log: String,
}

/// Varying locations an entry point consumes and produces.
#[derive(Debug, Clone, Default)]
struct StageInterface {
    inputs: BTreeSet<u32>,
    outputs: BTreeSet<u32>,
}

#[derive(Debug, Default)]
struct NagaProgram {
    attached: Vec<u32>,
    log: String,
}

impl NagaDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage objects created and not yet deleted.
    pub fn live_stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Program objects created and not yet deleted.
    pub fn live_program_count(&self) -> usize {
        self.programs.len()
    }

    fn allocate(&mut self) -> u32 {
        self.next_id = self.next_id.wrapping_add(1).max(1);
        self.next_id
    }

    fn check_link(&self, program: &NagaProgram) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let mut vertex = None;
        let mut fragment = None;

        for id in &program.attached {
            let Some(stage) = self.stages.get(id) else {
                errors.push(format!("error: stage object {id} no longer exists"));
                continue;
            };
            match (&stage.interface, stage.kind) {
                (None, kind) => {
                    errors.push(format!("error: {kind} was not successfully compiled"))
                }
                (Some(interface), StageKind::Vertex) => vertex = Some(interface),
                (Some(interface), StageKind::Fragment) => fragment = Some(interface),
                (Some(_), kind) => errors.push(format!("error: {kind} is not supported")),
            }
        }

        if let (Some(vertex), Some(fragment)) = (vertex, fragment) {
            for location in fragment.inputs.difference(&vertex.outputs) {
                errors.push(format!(
                    "error: fragment_shader input at location {location} is not written by vertex_shader"
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl ShaderDevice for NagaDevice {
    fn create_stage(&mut self, kind: StageKind) -> StageHandle {
        let id = self.allocate();
        self.stages.insert(
            id,
            NagaStage {
                kind,
                interface: None,
                log: String::new(),
            },
        );
        StageHandle::new(id, kind)
    }

    fn compile_stage(&mut self, stage: StageHandle, source: &str) -> bool {
        let Some(entry) = self.stages.get_mut(&stage.id()) else {
            return false;
        };
        match compile_glsl(entry.kind, source) {
            Ok(interface) => {
                entry.interface = Some(interface);
                entry.log.clear();
                true
            }
            Err(log) => {
                entry.interface = None;
                entry.log = log;
                false
            }
        }
    }

    fn stage_log(&self, stage: StageHandle) -> String {
        self.stages
            .get(&stage.id())
            .map(|entry| entry.log.clone())
            .unwrap_or_default()
    }

    fn delete_stage(&mut self, stage: StageHandle) {
        self.stages.remove(&stage.id());
    }

    fn create_program(&mut self) -> ProgramHandle {
        let id = self.allocate();
        self.programs.insert(id, NagaProgram::default());
        ProgramHandle::new(id)
    }

    fn attach_stage(&mut self, program: ProgramHandle, stage: StageHandle) {
        if !self.stages.contains_key(&stage.id()) {
            return;
        }
        if let Some(entry) = self.programs.get_mut(&program.id()) {
            if !entry.attached.contains(&stage.id()) {
                entry.attached.push(stage.id());
            }
        }
    }

    fn link_program(&mut self, program: ProgramHandle) -> bool {
        let Some(entry) = self.programs.get(&program.id()) else {
            return false;
        };
        let result = self.check_link(entry);
        let (linked, log) = match result {
            Ok(()) => (true, String::new()),
            Err(errors) => (false, errors.join("\n")),
        };
        if let Some(entry) = self.programs.get_mut(&program.id()) {
            entry.log = log;
        }
        linked
    }

    fn program_log(&self, program: ProgramHandle) -> String {
        self.programs
            .get(&program.id())
            .map(|entry| entry.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.remove(&program.id());
    }
}

fn compile_glsl(kind: StageKind, source: &str) -> Result<StageInterface, String> {
    let stage = match kind {
        StageKind::Vertex => naga::ShaderStage::Vertex,
        StageKind::Fragment => naga::ShaderStage::Fragment,
        StageKind::TessControl | StageKind::TessEval => {
            return Err(format!(
                "error: {kind} cannot be compiled offline; naga has no tessellation frontend"
            ));
        }
    };

    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(stage), source)
        .map_err(|errors| errors.emit_to_string(source))?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|err| format!("error: {}", err.into_inner()))?;

    let entry = module
        .entry_points
        .iter()
        .find(|entry| entry.stage == stage)
        .ok_or_else(|| format!("error: no {kind} entry point found"))?;

    let mut interface = StageInterface::default();
    for argument in &entry.function.arguments {
        collect_locations(&module, argument.ty, argument.binding.as_ref(), &mut interface.inputs);
    }
    if let Some(result) = &entry.function.result {
        collect_locations(&module, result.ty, result.binding.as_ref(), &mut interface.outputs);
    }
    Ok(interface)
}

fn collect_locations(
    module: &naga::Module,
    ty: naga::Handle<naga::Type>,
    binding: Option<&naga::Binding>,
    out: &mut BTreeSet<u32>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => {
            out.insert(*location);
        }
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}
