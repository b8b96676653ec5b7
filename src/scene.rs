//! Per-frame state: what the loop mutates between draws.

use nalgebra_glm as glm;

/// How fast the view spins around the X axis.
const SPIN_DEG_PER_SEC: f32 = 50.0;

/// One whole subdivision level per key press.
pub const TESS_STEP: f32 = 1.0;

/// Inner and outer subdivision levels fed to the tessellation stages.
///
/// The values are uploaded as-is; the pipeline clamps levels to the
/// implementation's supported range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TessFactors {
    pub inner: f32,
    pub outer: f32,
}

/// Fixed eye/target/up the view transform starts from.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: glm::Vec3,
    pub target: glm::Vec3,
    pub up: glm::Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: glm::vec3(0.0, 0.0, -5.0),
            target: glm::vec3(0.0, 0.0, 0.0),
            up: glm::vec3(0.0, 1.0, 0.0),
        }
    }
}

impl Camera {
    pub fn view(&self) -> glm::Mat4 {
        glm::look_at(&self.position, &self.target, &self.up)
    }
}

/// Everything the frame loop owns and mutates each iteration.
pub struct FrameState {
    pub camera: Camera,
    pub factors: TessFactors,
    view: glm::Mat4,
    elapsed: f32,
}

impl FrameState {
    pub fn new(camera: Camera, factors: TessFactors) -> Self {
        Self {
            view: camera.view(),
            camera,
            factors,
            elapsed: 0.0,
        }
    }

    /// Spins the view in proportion to how long the last iteration took.
    pub fn advance(&mut self, dt_seconds: f32) {
        let theta = (SPIN_DEG_PER_SEC * dt_seconds).to_radians();
        self.view = glm::rotate_x(&self.view, theta);
        self.elapsed += dt_seconds;
    }

    pub fn view(&self) -> &glm::Mat4 {
        &self.view
    }

    /// Upper-left 3x3 of the view transform, for transforming normals.
    pub fn normal_matrix(&self) -> glm::Mat3 {
        glm::mat4_to_mat3(&self.view)
    }

    /// Total simulated time so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}

/// The loop is either running or it has shut down for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Terminated,
}

impl RunState {
    /// `Terminated` is absorbing; a close request ends the run.
    pub fn step(self, close_requested: bool) -> RunState {
        match self {
            RunState::Terminated => RunState::Terminated,
            RunState::Running if close_requested => RunState::Terminated,
            RunState::Running => RunState::Running,
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, RunState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FrameState {
        FrameState::new(
            Camera::default(),
            TessFactors {
                inner: 3.0,
                outer: 2.0,
            },
        )
    }

    fn assert_mat4_eq(a: &glm::Mat4, b: &glm::Mat4) {
        for (x, y) in glm::value_ptr(a).iter().zip(glm::value_ptr(b)) {
            assert!((x - y).abs() < 1e-5, "matrices differ: {x} vs {y}");
        }
    }

    #[test]
    fn camera_defaults_match_the_initial_scene() {
        let camera = Camera::default();
        assert_eq!(camera.position, glm::vec3(0.0, 0.0, -5.0));
        assert_eq!(camera.target, glm::vec3(0.0, 0.0, 0.0));
        assert_eq!(camera.up, glm::vec3(0.0, 1.0, 0.0));
    }

    #[test]
    fn rotation_is_proportional_to_elapsed_time() {
        // Two half-steps land exactly where one full step does.
        let mut twice = state();
        twice.advance(0.1);
        twice.advance(0.1);

        let mut once = state();
        once.advance(0.2);

        assert_mat4_eq(twice.view(), once.view());
    }

    #[test]
    fn zero_elapsed_time_leaves_the_view_unchanged() {
        let mut s = state();
        let before = *s.view();
        s.advance(0.0);
        assert_mat4_eq(&before, s.view());
    }

    #[test]
    fn elapsed_time_accumulates() {
        let mut s = state();
        s.advance(0.25);
        s.advance(0.5);
        assert!((s.elapsed() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn normal_matrix_is_the_views_upper_left_block() {
        let mut s = state();
        s.advance(0.3);
        let view = s.view();
        let normal = s.normal_matrix();
        for col in 0..3 {
            for row in 0..3 {
                assert!((normal[(row, col)] - view[(row, col)]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn close_request_terminates_the_loop() {
        let next = RunState::Running.step(true);
        assert_eq!(next, RunState::Terminated);
        assert!(!next.is_running());
    }

    #[test]
    fn terminated_is_absorbing() {
        assert_eq!(RunState::Terminated.step(false), RunState::Terminated);
        assert_eq!(RunState::Terminated.step(true), RunState::Terminated);
    }

    #[test]
    fn running_stays_running_without_a_signal() {
        assert_eq!(RunState::Running.step(false), RunState::Running);
    }
}
