//! [`ShaderDevice`] over a live OpenGL context.
use std::num::NonZeroU32;

use glow::HasContext;

use crate::device::ShaderDevice;
use crate::types::{ProgramHandle, StageHandle, StageKind};

pub struct GlDevice<'gl> {
    gl: &'gl glow::Context,
}

impl<'gl> GlDevice<'gl> {
    /// Wraps a loaded OpenGL context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread for as long as the device
    /// is used, and must expose OpenGL 4.0 or newer when tessellation stages
    /// are compiled.
    pub unsafe fn new(gl: &'gl glow::Context) -> Self {
        Self { gl }
    }
}

fn gl_stage(kind: StageKind) -> u32 {
    match kind {
        StageKind::Vertex => glow::VERTEX_SHADER,
        StageKind::TessControl => glow::TESS_CONTROL_SHADER,
        StageKind::TessEval => glow::TESS_EVALUATION_SHADER,
        StageKind::Fragment => glow::FRAGMENT_SHADER,
    }
}

fn native_shader(stage: StageHandle) -> Option<glow::NativeShader> {
    NonZeroU32::new(stage.id()).map(glow::NativeShader)
}

fn native_program(program: ProgramHandle) -> Option<glow::NativeProgram> {
    NonZeroU32::new(program.id()).map(glow::NativeProgram)
}

impl ShaderDevice for GlDevice<'_> {
    fn create_stage(&mut self, kind: StageKind) -> StageHandle {
        // SAFETY: the context is current per `GlDevice::new`.
        match unsafe { self.gl.create_shader(gl_stage(kind)) } {
            Ok(shader) => StageHandle::new(shader.0.get(), kind),
            Err(err) => {
                tracing::warn!(stage = %kind, %err, "glCreateShader failed");
                StageHandle::invalid(kind)
            }
        }
    }

    fn compile_stage(&mut self, stage: StageHandle, source: &str) -> bool {
        let Some(shader) = native_shader(stage) else {
            return false;
        };
        unsafe {
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            self.gl.get_shader_compile_status(shader)
        }
    }

    fn stage_log(&self, stage: StageHandle) -> String {
        native_shader(stage)
            .map(|shader| unsafe { self.gl.get_shader_info_log(shader) })
            .unwrap_or_default()
    }

    fn delete_stage(&mut self, stage: StageHandle) {
        if let Some(shader) = native_shader(stage) {
            unsafe { self.gl.delete_shader(shader) };
        }
    }

    fn create_program(&mut self) -> ProgramHandle {
        match unsafe { self.gl.create_program() } {
            Ok(program) => ProgramHandle::new(program.0.get()),
            Err(err) => {
                tracing::warn!(%err, "glCreateProgram failed");
                ProgramHandle::INVALID
            }
        }
    }

    fn attach_stage(&mut self, program: ProgramHandle, stage: StageHandle) {
        if let (Some(program), Some(shader)) = (native_program(program), native_shader(stage)) {
            unsafe { self.gl.attach_shader(program, shader) };
        }
    }

    fn link_program(&mut self, program: ProgramHandle) -> bool {
        let Some(program) = native_program(program) else {
            return false;
        };
        unsafe {
            self.gl.link_program(program);
            self.gl.get_program_link_status(program)
        }
    }

    fn program_log(&self, program: ProgramHandle) -> String {
        native_program(program)
            .map(|program| unsafe { self.gl.get_program_info_log(program) })
            .unwrap_or_default()
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some(program) = native_program(program) {
            unsafe { self.gl.delete_program(program) };
        }
    }
}
