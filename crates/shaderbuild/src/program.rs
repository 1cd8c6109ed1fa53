use crate::compile::compile_stage;
use crate::device::ShaderDevice;
use crate::error::BuildError;
use crate::link::link_program;
use crate::source::{ShaderSourceLoader, ShaderStagePayload};
use crate::types::{ProgramHandle, StageKind};
use crate::DIAGNOSTICS_TARGET;

/// Resource names for the stages of one program.
///
/// Tessellation stages take part only when named: the presence of a source is
/// the sole switch that activates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramSources {
    pub vertex: String,
    pub fragment: String,
    pub tess_control: Option<String>,
    pub tess_eval: Option<String>,
}

impl ProgramSources {
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
            tess_control: None,
            tess_eval: None,
        }
    }

    pub fn with_tess_control(mut self, name: impl Into<String>) -> Self {
        self.tess_control = Some(name.into());
        self
    }

    pub fn with_tess_eval(mut self, name: impl Into<String>) -> Self {
        self.tess_eval = Some(name.into());
        self
    }

    /// Named stages in attachment order.
    pub fn stages(&self) -> Vec<(StageKind, &str)> {
        let mut stages = vec![(StageKind::Vertex, self.vertex.as_str())];
        if let Some(name) = self.tess_control.as_deref() {
            stages.push((StageKind::TessControl, name));
        }
        if let Some(name) = self.tess_eval.as_deref() {
            stages.push((StageKind::TessEval, name));
        }
        stages.push((StageKind::Fragment, self.fragment.as_str()));
        stages
    }
}

/// A program handle plus everything that went wrong while building it.
///
/// Always produced, even when nothing could be built. Check
/// [`BuiltProgram::is_usable`] before binding the handle for drawing; a
/// feature whose program is unusable should simply skip its draw.
#[derive(Debug)]
pub struct BuiltProgram {
    handle: ProgramHandle,
    diagnostics: Vec<BuildError>,
}

impl BuiltProgram {
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    pub fn is_usable(&self) -> bool {
        self.handle.is_valid()
    }

    pub fn diagnostics(&self) -> &[BuildError] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (ProgramHandle, Vec<BuildError>) {
        (self.handle, self.diagnostics)
    }

    /// Deletes the program object, linked or not.
    pub fn release<D: ShaderDevice + ?Sized>(self, device: &mut D) {
        if self.handle.id() != 0 {
            device.delete_program(self.handle);
        }
    }
}

/// Loads, compiles, and links a program from named resources.
///
/// When any named resource cannot be loaded, no driver objects are created
/// and the returned handle is [`ProgramHandle::INVALID`].
pub fn build_program<D: ShaderDevice + ?Sized>(
    device: &mut D,
    loader: &ShaderSourceLoader,
    sources: &ProgramSources,
) -> BuiltProgram {
    let mut payloads = Vec::with_capacity(4);
    let mut diagnostics = Vec::new();
    for (kind, name) in sources.stages() {
        match loader.load(kind, name) {
            Ok(payload) => payloads.push(payload),
            Err(err) => {
                tracing::error!(target: DIAGNOSTICS_TARGET, stage = %kind, "{err}");
                diagnostics.push(err);
            }
        }
    }

    if !diagnostics.is_empty() {
        tracing::warn!(
            vertex = %sources.vertex,
            fragment = %sources.fragment,
            failures = diagnostics.len(),
            "skipping program assembly; shader sources unavailable"
        );
        return BuiltProgram {
            handle: ProgramHandle::INVALID,
            diagnostics,
        };
    }

    assemble_program(device, payloads)
}

/// Compiles and links already-loaded payloads.
///
/// Mandatory stages are always compiled; every payload is consumed by its
/// compile call. Compilation failures do not stop the link attempt, so the
/// driver's link log accompanies the compiler logs.
pub fn assemble_program<D: ShaderDevice + ?Sized>(
    device: &mut D,
    payloads: Vec<ShaderStagePayload>,
) -> BuiltProgram {
    let mut diagnostics = Vec::new();
    let mut stages = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let stage = compile_stage(device, payload);
        if let Some(log) = stage.failure_log() {
            diagnostics.push(BuildError::StageCompileFailed {
                stage: stage.kind(),
                log: log.to_string(),
            });
        }
        stages.push(stage);
    }

    let (handle, failure_log) = link_program(device, stages).into_parts();
    if let Some(log) = failure_log {
        diagnostics.push(BuildError::ProgramLinkFailed { log });
    }

    BuiltProgram {
        handle,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::device::fake::{FakeDevice, BROKEN};

    fn shader_dir(files: &[(&str, &str)]) -> (TempDir, ShaderSourceLoader) {
        let dir = TempDir::new().unwrap();
        for (name, text) in files {
            fs::write(dir.path().join(name), text).unwrap();
        }
        let loader = ShaderSourceLoader::new(vec![dir.path().to_path_buf()]);
        (dir, loader)
    }

    #[test]
    fn builds_two_stage_program() {
        let (_dir, loader) = shader_dir(&[("a.vert", "ok"), ("a.frag", "ok")]);
        let mut device = FakeDevice::new();
        let built = build_program(&mut device, &loader, &ProgramSources::new("a.vert", "a.frag"));
        assert!(built.is_usable());
        assert!(built.diagnostics().is_empty());
        assert_eq!(
            device.attached_kinds(built.handle()),
            vec![StageKind::Vertex, StageKind::Fragment]
        );
        assert_eq!(device.live_stages(), 0);
        built.release(&mut device);
        assert_eq!(device.live_programs(), 0);
    }

    #[test]
    fn tessellation_stages_activate_only_when_named() {
        let (_dir, loader) = shader_dir(&[
            ("w.vert", "ok"),
            ("w.tesc", "ok"),
            ("w.tese", "ok"),
            ("w.frag", "ok"),
        ]);
        let mut device = FakeDevice::new();
        let sources = ProgramSources::new("w.vert", "w.frag")
            .with_tess_control("w.tesc")
            .with_tess_eval("w.tese");
        let built = build_program(&mut device, &loader, &sources);
        assert!(built.is_usable());
        assert_eq!(device.attached_kinds(built.handle()), StageKind::ALL.to_vec());
        assert_eq!(device.live_stages(), 0);
    }

    #[test]
    fn missing_resource_returns_invalid_program_without_driver_objects() {
        let (_dir, loader) = shader_dir(&[("a.vert", "ok")]);
        let mut device = FakeDevice::new();
        let built = build_program(&mut device, &loader, &ProgramSources::new("a.vert", "gone.frag"));
        assert!(!built.is_usable());
        assert_eq!(built.handle(), ProgramHandle::INVALID);
        assert!(matches!(
            built.diagnostics(),
            [BuildError::ResourceUnavailable { name, .. }] if name == "gone.frag"
        ));
        assert_eq!(device.live_stages(), 0);
        assert_eq!(device.live_programs(), 0);
    }

    #[test]
    fn malformed_fragment_yields_link_failure_and_no_leaks() {
        let (_dir, loader) = shader_dir(&[("a.vert", "ok"), ("bad.frag", BROKEN)]);
        let mut device = FakeDevice::new();
        let built = build_program(&mut device, &loader, &ProgramSources::new("a.vert", "bad.frag"));
        assert!(!built.is_usable());
        assert_eq!(device.live_stages(), 0);
        assert_eq!(device.deleted_stages.len(), 2);

        let diagnostics = built.diagnostics();
        assert!(matches!(
            diagnostics[0],
            BuildError::StageCompileFailed {
                stage: StageKind::Fragment,
                ..
            }
        ));
        let link_log = diagnostics
            .iter()
            .find_map(|d| match d {
                BuildError::ProgramLinkFailed { log } => Some(log.as_str()),
                _ => None,
            })
            .expect("link failure reported");
        assert!(!link_log.is_empty());
        assert_eq!(diagnostics.last().map(BuildError::tag), Some("program"));

        built.release(&mut device);
        assert_eq!(device.live_programs(), 0);
    }

    #[test]
    fn empty_resource_is_diagnosed() {
        let (_dir, loader) = shader_dir(&[("a.vert", "ok"), ("a.frag", "")]);
        let mut device = FakeDevice::new();
        let built = build_program(&mut device, &loader, &ProgramSources::new("a.vert", "a.frag"));
        assert!(!built.is_usable());
        assert!(matches!(built.diagnostics(), [BuildError::ResourceEmpty { .. }]));
    }

    #[test]
    fn stage_listing_follows_attachment_order() {
        let sources = ProgramSources::new("v", "f").with_tess_eval("te");
        let kinds: Vec<_> = sources.stages().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![StageKind::Vertex, StageKind::TessEval, StageKind::Fragment]
        );
    }
}
