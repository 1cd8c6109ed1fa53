//! Shader program assembly for the wave-tool renderer.
//!
//! Programs are built in three steps, each owning what the previous one
//! produced:
//!
//! ```text
//!   ShaderSourceLoader::load ──▶ ShaderStagePayload
//!          │                            │
//!          │                   compile_stage (payload dropped)
//!          ▼                            ▼
//!   build_program ───────────▶ CompiledStage × 2..=4
//!                                       │
//!                              link_program (stages deleted)
//!                                       ▼
//!                                 ProgramHandle
//! ```
//!
//! Nothing here aborts on bad shader text. Load, compile, and link failures
//! are written to the `shaderbuild::diagnostics` tracing target and collected
//! on the returned [`BuiltProgram`]; the caller checks
//! [`BuiltProgram::is_usable`] and skips the dependent draw when it is not.
//!
//! Driver access goes through [`ShaderDevice`]. [`NagaDevice`] validates GLSL
//! offline; `GlDevice` (feature `gl`) drives a live OpenGL context.

mod compile;
mod device;
mod error;
#[cfg(feature = "gl")]
mod gl_device;
mod link;
#[cfg(feature = "naga")]
mod naga_device;
mod program;
mod source;
mod types;

pub use compile::{compile_stage, CompiledStage};
pub use device::ShaderDevice;
pub use error::BuildError;
#[cfg(feature = "gl")]
pub use gl_device::GlDevice;
pub use link::{link_program, LinkedProgram};
#[cfg(feature = "naga")]
pub use naga_device::NagaDevice;
pub use program::{assemble_program, build_program, BuiltProgram, ProgramSources};
pub use source::{ShaderSourceLoader, ShaderStagePayload};
pub use types::{ProgramHandle, StageHandle, StageKind};

/// Tracing target carrying compile and link diagnostics.
pub const DIAGNOSTICS_TARGET: &str = "shaderbuild::diagnostics";
