#![allow(dead_code)]
//! Renders a tessellated icosahedron through a five-stage pipeline.
//!
//! Raise/lower the inner tessellation factor with Q/A, the outer factor
//! with W/S. Escape or closing the window quits.

use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context as _;
use log::{error, info};
use nalgebra_glm as glm;

mod error;
mod gl_wrappers;
mod input;
mod logging;
mod mesh;
mod scene;
mod window;

use gl_wrappers::program::{build_program, StageFile};
use gl_wrappers::shader::ShaderKind;
use input::TessControls;
use mesh::PatchMesh;
use scene::{Camera, FrameState, RunState, TessFactors};
use window::{DemoWindow, FpsCounter, ViewportState, WindowConfig};

const OPENGL_MAJOR_VER: u8 = 4;
const OPENGL_MINOR_VER: u8 = 1;

const START_WIDTH: u32 = 640;
const START_HEIGHT: u32 = 480;

const INITIAL_INNER_TESS: f32 = 3.0;
const INITIAL_OUTER_TESS: f32 = 2.0;

/// The base mesh is plain triangles: 3 vertices per patch.
const VERTICES_PER_PATCH: i32 = 3;

const FOV_DEGREES: f32 = 67.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 100.0;

const SHADER_DIR: &str = "shaders";

fn main() -> ExitCode {
    if let Err(err) = logging::init(Path::new(logging::GL_LOG_FILE)) {
        eprintln!("ERROR: could not open {} for writing: {err}", logging::GL_LOG_FILE);
        return ExitCode::FAILURE;
    }
    if let Err(err) = run() {
        error!("{err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> anyhow::Result<()> {
    let mut window = DemoWindow::create(&WindowConfig {
        title: "Tessellated icosahedron",
        width: START_WIDTH,
        height: START_HEIGHT,
        gl_major: OPENGL_MAJOR_VER,
        gl_minor: OPENGL_MINOR_VER,
    })?;

    gl_wrappers::log_driver_info();
    gl_wrappers::log_context_params();
    info!(
        "max supported patch vertices: {}",
        gl_wrappers::get_i32(gl::MAX_PATCH_VERTICES)
    );

    unsafe {
        gl::Enable(gl::DEPTH_TEST);
        gl::DepthFunc(gl::LESS);
        gl::Enable(gl::CULL_FACE);
        gl::ClearColor(0.7, 0.6, 0.5, 1.0);
        gl::PatchParameteri(gl::PATCH_VERTICES, VERTICES_PER_PATCH);
    }

    let mesh = PatchMesh::upload(&mesh::VERTICES, &mesh::INDICES);

    let shader_dir = Path::new(SHADER_DIR);
    let stages = [
        StageFile::new(ShaderKind::Vertex, shader_dir.join("vert_shader.glsl")),
        StageFile::new(ShaderKind::TessControl, shader_dir.join("tess_ctrl_shader.glsl")),
        StageFile::new(ShaderKind::TessEval, shader_dir.join("tess_eval_shader.glsl")),
        StageFile::new(ShaderKind::Geometry, shader_dir.join("geo_shader.glsl")),
        StageFile::new(ShaderKind::Fragment, shader_dir.join("frag_shader.glsl")),
    ];
    let mut program = build_program(&stages).context("building the tessellation program")?;
    program.bind();

    let mut viewport = ViewportState::new(START_WIDTH, START_HEIGHT);
    viewport.apply();

    let mut state = FrameState::new(
        Camera::default(),
        TessFactors {
            inner: INITIAL_INNER_TESS,
            outer: INITIAL_OUTER_TESS,
        },
    );

    program.set_mat4(c"Projection", &projection(&viewport));
    program.set_mat4(c"Modelview", state.view());
    program.set_mat3(c"NormalMatrix", &state.normal_matrix());
    program.set_vec3(c"LightPosition", &glm::vec3(0.25, 0.25, 1.0));
    program.set_vec3(c"AmbientMaterial", &glm::vec3(0.04, 0.04, 0.04));
    program.set_vec3(c"DiffuseMaterial", &glm::vec3(0.0, 0.75, 0.75));
    program.set_f32(c"TessLevelInner", state.factors.inner);
    program.set_f32(c"TessLevelOuter", state.factors.outer);

    let mut controls = TessControls::default();
    let mut run_state = RunState::Running;
    let mut fps = FpsCounter::new(Instant::now());
    let mut previous = Instant::now();

    'running: loop {
        let now = Instant::now();
        let dt = now.duration_since(previous).as_secs_f32();
        previous = now;

        let events = window.poll();
        run_state = run_state.step(events.close_requested);
        if !run_state.is_running() {
            break 'running;
        }
        if let Some((width, height)) = events.resized {
            viewport = ViewportState::new(width, height);
            viewport.apply();
            program.set_mat4(c"Projection", &projection(&viewport));
            info!("framebuffer resized to {width}x{height}");
        }

        let changes = controls.apply(window.factor_keys(), &mut state.factors);
        if changes.inner {
            info!("inner tess. factor = {:.1}", state.factors.inner);
            program.set_f32(c"TessLevelInner", state.factors.inner);
        }
        if changes.outer {
            info!("outer tess. factor = {:.1}", state.factors.outer);
            program.set_f32(c"TessLevelOuter", state.factors.outer);
        }

        state.advance(dt);

        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }
        program.bind();
        program.set_mat4(c"Modelview", state.view());
        program.set_mat3(c"NormalMatrix", &state.normal_matrix());
        mesh.draw_patches();

        window.swap();

        if let Some(rate) = fps.sample(Instant::now()) {
            window.set_title(&format!("opengl @ fps: {rate:.2}"));
        }
    }

    info!("shutting down after {:.1} s", state.elapsed());
    Ok(())
}

fn projection(viewport: &ViewportState) -> glm::Mat4 {
    glm::perspective(viewport.aspect(), FOV_DEGREES.to_radians(), NEAR_PLANE, FAR_PLANE)
}
