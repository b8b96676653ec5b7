use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::path::PathBuf;

use log::{debug, error, info, warn};
use nalgebra_glm as glm;

use super::shader::{CompiledShader, Shader, ShaderKind};
use crate::error::ProgramBuildError;

/// Where one stage's source lives and which stage it feeds.
#[derive(Debug, Clone)]
pub struct StageFile {
    pub kind: ShaderKind,
    pub path: PathBuf,
}

impl StageFile {
    pub fn new(kind: ShaderKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// A linked shader program and its uniform location table.
pub struct Program {
    id: gl::types::GLuint,
    uniforms: HashMap<CString, gl::types::GLint>,
}

impl Program {
    /// Attaches every compiled stage and links. The stages can be dropped
    /// (and thereby deleted) as soon as this returns.
    pub fn link(stages: &[CompiledShader]) -> Result<Self, ProgramBuildError> {
        let id = unsafe { gl::CreateProgram() };
        unsafe {
            for stage in stages {
                debug!("attaching {} shader {} to program {id}", stage.kind(), stage.id());
                gl::AttachShader(id, stage.id());
            }
            gl::LinkProgram(id);

            let mut success = 0;
            gl::GetProgramiv(id, gl::LINK_STATUS, &mut success);
            if success != gl::TRUE.into() {
                let diagnostic = program_info_log(id);
                error!("could not link shader program {id}:\n{diagnostic}");
                gl::DeleteProgram(id);
                return Err(ProgramBuildError::ProgramLink { diagnostic });
            }
            for stage in stages {
                gl::DetachShader(id, stage.id());
            }
        }
        info!("linked shader program {id}");
        Ok(Self {
            id,
            uniforms: HashMap::new(),
        })
    }

    /// Driver sanity check. The outcome only ends up in the log; a program
    /// that links but fails validation stays usable.
    pub fn validate(&self) -> bool {
        let mut success = 0;
        unsafe {
            gl::ValidateProgram(self.id);
            gl::GetProgramiv(self.id, gl::VALIDATE_STATUS, &mut success);
        }
        if success != gl::TRUE.into() {
            warn!(
                "program {} failed validation:\n{}",
                self.id,
                program_info_log(self.id)
            );
            return false;
        }
        debug!("program {} validated", self.id);
        true
    }

    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    pub fn id(&self) -> gl::types::GLuint {
        self.id
    }

    /// Looks a uniform up once and keeps it in the program's table.
    fn location(&mut self, name: &CStr) -> gl::types::GLint {
        if let Some(&location) = self.uniforms.get(name) {
            return location;
        }
        let location = unsafe { gl::GetUniformLocation(self.id, name.as_ptr()) };
        if location < 0 {
            warn!("uniform {name:?} is not active in program {}", self.id);
        }
        self.uniforms.insert(name.to_owned(), location);
        location
    }

    // The program must be current when these run.

    pub fn set_f32(&mut self, name: &CStr, value: f32) {
        let location = self.location(name);
        unsafe { gl::Uniform1f(location, value) };
    }

    pub fn set_vec3(&mut self, name: &CStr, value: &glm::Vec3) {
        let location = self.location(name);
        unsafe { gl::Uniform3f(location, value.x, value.y, value.z) };
    }

    pub fn set_mat3(&mut self, name: &CStr, value: &glm::Mat3) {
        let location = self.location(name);
        unsafe { gl::UniformMatrix3fv(location, 1, gl::FALSE, glm::value_ptr(value).as_ptr()) };
    }

    pub fn set_mat4(&mut self, name: &CStr, value: &glm::Mat4) {
        let location = self.location(name);
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, glm::value_ptr(value).as_ptr()) };
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

/// Compiles every stage in order and links the set into one program.
///
/// The first stage that fails to read or compile ends the build; the link
/// step only runs once every stage has compiled. Validation runs after a
/// successful link but only logs.
pub fn build_program(stages: &[StageFile]) -> Result<Program, ProgramBuildError> {
    check_stage_set(stages)?;

    let mut compiled = Vec::with_capacity(stages.len());
    for stage in stages {
        info!("creating {} shader from {}", stage.kind, stage.path.display());
        compiled.push(Shader::from_file(stage.kind, &stage.path)?.compile()?);
    }

    let program = Program::link(&compiled)?;
    program.validate();
    Ok(program)
}

/// A build needs a vertex stage and at most one shader per stage kind.
fn check_stage_set(stages: &[StageFile]) -> Result<(), ProgramBuildError> {
    let mut seen: Vec<ShaderKind> = Vec::with_capacity(stages.len());
    for stage in stages {
        if seen.contains(&stage.kind) {
            return Err(ProgramBuildError::DuplicateStage(stage.kind));
        }
        seen.push(stage.kind);
    }
    if !seen.contains(&ShaderKind::Vertex) {
        return Err(ProgramBuildError::MissingVertexStage);
    }
    Ok(())
}

/// The driver's full info log for a program, length-queried.
fn program_info_log(program: gl::types::GLuint) -> String {
    let mut len = 0;
    unsafe { gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len) };
    let mut infolog: Vec<u8> = vec![0; len.max(1) as usize];
    let mut written = 0;
    unsafe { gl::GetProgramInfoLog(program, len, &mut written, infolog.as_mut_ptr().cast()) };
    infolog.truncate(written.max(0) as usize);
    String::from_utf8_lossy(&infolog).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn stage(kind: ShaderKind, path: &str) -> StageFile {
        StageFile::new(kind, Path::new(path))
    }

    fn build_error(stages: &[StageFile]) -> ProgramBuildError {
        build_program(stages).err().expect("build should fail")
    }

    #[test]
    fn a_set_without_a_vertex_stage_is_rejected() {
        let stages = [stage(ShaderKind::Fragment, "frag.glsl")];
        match build_error(&stages) {
            ProgramBuildError::MissingVertexStage => {}
            other => panic!("expected MissingVertexStage, got {other:?}"),
        }
    }

    #[test]
    fn an_empty_set_is_rejected() {
        assert!(matches!(
            build_error(&[]),
            ProgramBuildError::MissingVertexStage
        ));
    }

    #[test]
    fn a_duplicated_stage_kind_is_rejected() {
        let stages = [
            stage(ShaderKind::Vertex, "a.glsl"),
            stage(ShaderKind::Vertex, "b.glsl"),
        ];
        match build_error(&stages) {
            ProgramBuildError::DuplicateStage(ShaderKind::Vertex) => {}
            other => panic!("expected DuplicateStage, got {other:?}"),
        }
    }

    #[test]
    fn an_unreadable_first_stage_ends_the_build() {
        // Both paths are missing; the reported stage must be the first one,
        // proving later stages were never touched.
        let stages = [
            stage(ShaderKind::Vertex, "missing_vert.glsl"),
            stage(ShaderKind::Fragment, "missing_frag.glsl"),
        ];
        match build_error(&stages) {
            ProgramBuildError::StageSource { kind, path, .. } => {
                assert_eq!(kind, ShaderKind::Vertex);
                assert_eq!(path, Path::new("missing_vert.glsl"));
            }
            other => panic!("expected StageSource, got {other:?}"),
        }
    }
}
