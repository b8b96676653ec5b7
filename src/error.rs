use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::gl_wrappers::shader::ShaderKind;

/// Anything that stops the window or GL context from coming up.
///
/// SDL reports its failures as strings; this keeps them intact.
#[derive(Debug, Error)]
#[error("could not create window: {0}")]
pub struct WindowCreationError(pub String);

/// Failures while turning shader sources into a linked program.
///
/// Every variant is terminal for the build attempt; no partially linked
/// program is ever handed out.
#[derive(Debug, Error)]
pub enum ProgramBuildError {
    /// The stage's source file could not be read.
    #[error("could not read {kind} shader source {path:?}: {source}")]
    StageSource {
        kind: ShaderKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The driver rejected the stage; `diagnostic` is the full info log.
    #[error("{stage} shader did not compile: {diagnostic}")]
    StageCompile { stage: ShaderKind, diagnostic: String },

    /// All stages compiled but the program did not link.
    #[error("could not link shader program: {diagnostic}")]
    ProgramLink { diagnostic: String },

    /// A program needs a vertex stage; nothing was compiled.
    #[error("shader set has no vertex stage")]
    MissingVertexStage,

    /// The same stage kind appeared twice; nothing was compiled.
    #[error("shader set lists the {0} stage twice")]
    DuplicateStage(ShaderKind),
}

/// The image behind a texture could not be read or decoded.
#[derive(Debug, Error)]
#[error("could not load texture {path:?}: {source}")]
pub struct TextureLoadError {
    pub path: PathBuf,
    #[source]
    pub source: image::ImageError,
}
