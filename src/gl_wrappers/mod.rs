//! Thin helpers over the raw GL bindings shared by the demo programs.

pub mod program;
pub mod shader;
pub mod texture;

use std::ffi::CStr;

use gl::types::{GLenum, GLint};
use log::info;

/// Matches the GL viewport to the drawable size.
pub fn update_viewport(width: u32, height: u32) {
    let real_width: i32 = width.try_into().unwrap_or(i32::MAX);
    let real_height: i32 = height.try_into().unwrap_or(i32::MAX);
    // SAFETY:
    // gl::Viewport does not fail with non-negative values.
    unsafe {
        gl::Viewport(0, 0, real_width, real_height);
    }
}

/// Owned copy of a driver string such as `gl::RENDERER`.
pub fn get_string(name: GLenum) -> String {
    // SAFETY:
    // With a current context, gl::GetString returns a static
    // NUL-terminated string for these names.
    unsafe { CStr::from_ptr(gl::GetString(name).cast()).to_string_lossy().into_owned() }
}

pub fn get_i32(name: GLenum) -> GLint {
    let mut value = 0;
    unsafe { gl::GetIntegerv(name, &mut value) };
    value
}

/// Renderer and version strings, queried once and logged.
pub fn log_driver_info() {
    info!("renderer: {}", get_string(gl::RENDERER));
    info!("OpenGL version supported: {}", get_string(gl::VERSION));
    info!("GLSL version supported: {}", get_string(gl::SHADING_LANGUAGE_VERSION));
}

/// Dumps the context limits that matter for this pipeline.
pub fn log_context_params() {
    const PARAMS: [(GLenum, &str); 9] = [
        (gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS, "GL_MAX_COMBINED_TEXTURE_IMAGE_UNITS"),
        (gl::MAX_CUBE_MAP_TEXTURE_SIZE, "GL_MAX_CUBE_MAP_TEXTURE_SIZE"),
        (gl::MAX_DRAW_BUFFERS, "GL_MAX_DRAW_BUFFERS"),
        (gl::MAX_FRAGMENT_UNIFORM_COMPONENTS, "GL_MAX_FRAGMENT_UNIFORM_COMPONENTS"),
        (gl::MAX_TEXTURE_IMAGE_UNITS, "GL_MAX_TEXTURE_IMAGE_UNITS"),
        (gl::MAX_TEXTURE_SIZE, "GL_MAX_TEXTURE_SIZE"),
        (gl::MAX_VERTEX_ATTRIBS, "GL_MAX_VERTEX_ATTRIBS"),
        (gl::MAX_VERTEX_TEXTURE_IMAGE_UNITS, "GL_MAX_VERTEX_TEXTURE_IMAGE_UNITS"),
        (gl::MAX_VERTEX_UNIFORM_COMPONENTS, "GL_MAX_VERTEX_UNIFORM_COMPONENTS"),
    ];

    info!("GL context params:");
    for (param, label) in PARAMS {
        info!("{label} {}", get_i32(param));
    }
    let mut dims: [GLint; 2] = [0, 0];
    unsafe { gl::GetIntegerv(gl::MAX_VIEWPORT_DIMS, dims.as_mut_ptr()) };
    info!("GL_MAX_VIEWPORT_DIMS {} {}", dims[0], dims[1]);
}
