use std::ffi::CString;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::ptr::null;

use log::{error, info};

use crate::error::ProgramBuildError;

/// The five programmable stages a program can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    TessControl,
    TessEval,
    Geometry,
    Fragment,
}

impl ShaderKind {
    fn gl_enum(self) -> gl::types::GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::TessControl => gl::TESS_CONTROL_SHADER,
            ShaderKind::TessEval => gl::TESS_EVALUATION_SHADER,
            ShaderKind::Geometry => gl::GEOMETRY_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::TessControl => "tessellation control",
            ShaderKind::TessEval => "tessellation evaluation",
            ShaderKind::Geometry => "geometry",
            ShaderKind::Fragment => "fragment",
        })
    }
}

/// Shader source wrapped with its stage kind, not yet compiled.
pub struct Shader {
    inner: gl::types::GLuint,
    kind: ShaderKind,
    source: CString,
    was_compiled: bool,
}

impl Shader {
    /// Wrap shader source into a type-safe struct for one stage.
    pub fn new(kind: ShaderKind, source: CString) -> Self {
        let inner = unsafe { gl::CreateShader(kind.gl_enum()) };
        Self {
            inner,
            kind,
            source,
            was_compiled: false,
        }
    }

    /// Reads the whole source file before anything touches the driver.
    pub fn from_file(kind: ShaderKind, path: &Path) -> Result<Self, ProgramBuildError> {
        let stage_source = |source| ProgramBuildError::StageSource {
            kind,
            path: path.to_path_buf(),
            source,
        };
        let text = fs::read(path).map_err(stage_source)?;
        let source = CString::new(text)
            .map_err(|err| stage_source(io::Error::new(io::ErrorKind::InvalidData, err)))?;
        Ok(Self::new(kind, source))
    }

    pub fn compile(mut self) -> Result<CompiledShader, ProgramBuildError> {
        unsafe {
            gl::ShaderSource(self.inner, 1, &self.source.as_ptr(), null());
            gl::CompileShader(self.inner);

            let mut success = 0;
            gl::GetShaderiv(self.inner, gl::COMPILE_STATUS, &mut success);

            if success != gl::TRUE.into() {
                let diagnostic = shader_info_log(self.inner);
                error!(
                    "{} shader index {} did not compile:\n{diagnostic}",
                    self.kind,
                    self.inner
                );
                return Err(ProgramBuildError::StageCompile {
                    stage: self.kind,
                    diagnostic,
                });
            }
        }
        self.was_compiled = true;
        info!("compiled {} shader, index {}", self.kind, self.inner);
        Ok(CompiledShader {
            id: self.inner,
            kind: self.kind,
        })
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            if !self.was_compiled {
                gl::DeleteShader(self.inner);
            }
        }
    }
}

/// A stage the driver accepted. Deleted when dropped; GL keeps attached
/// stages alive until the owning program releases them.
pub struct CompiledShader {
    id: gl::types::GLuint,
    kind: ShaderKind,
}

impl CompiledShader {
    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }
}

impl Drop for CompiledShader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        }
    }
}

/// The driver's full info log for a shader, length-queried.
fn shader_info_log(shader: gl::types::GLuint) -> String {
    let mut len = 0;
    unsafe { gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len) };
    let mut infolog: Vec<u8> = vec![0; len.max(1) as usize];
    let mut written = 0;
    unsafe { gl::GetShaderInfoLog(shader, len, &mut written, infolog.as_mut_ptr().cast()) };
    infolog.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&infolog).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_name_their_stage() {
        assert_eq!(ShaderKind::Vertex.to_string(), "vertex");
        assert_eq!(ShaderKind::TessEval.to_string(), "tessellation evaluation");
        assert_eq!(ShaderKind::Fragment.to_string(), "fragment");
    }

    #[test]
    fn missing_source_file_reports_kind_and_path() {
        // Fails at the filesystem, before any driver call.
        let err = Shader::from_file(ShaderKind::Geometry, Path::new("no_such_shader.glsl"))
            .err()
            .expect("read should fail");
        match err {
            ProgramBuildError::StageSource { kind, path, .. } => {
                assert_eq!(kind, ShaderKind::Geometry);
                assert_eq!(path, Path::new("no_such_shader.glsl"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
