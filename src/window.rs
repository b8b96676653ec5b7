//! SDL2 window and GL context bootstrap, plus per-iteration event polling.

use std::time::Instant;

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::video;

use crate::error::WindowCreationError;
use crate::gl_wrappers;
use crate::input::FactorKeys;

/// Requested window size and context version.
pub struct WindowConfig {
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
    pub gl_major: u8,
    pub gl_minor: u8,
}

/// What the window reported for one loop iteration.
#[derive(Debug, Default, Clone, Copy)]
pub struct FrameEvents {
    /// Close button, quit signal, or the Escape cancel key.
    pub close_requested: bool,
    pub resized: Option<(u32, u32)>,
}

/// Owns the OS window, the GL context, and the SDL event pump.
///
/// Field order keeps the GL context alive no longer than the video
/// subsystem it came from.
pub struct DemoWindow {
    _gl_ctx: video::GLContext,
    window: video::Window,
    events: sdl2::EventPump,
    main_id: u32,
    _video_ctx: sdl2::VideoSubsystem,
    _sdl_ctx: sdl2::Sdl,
}

impl DemoWindow {
    /// Brings up a core-profile, forward-compatible context of the
    /// requested version with 4x multisampling, then loads the GL
    /// function pointers from it.
    pub fn create(config: &WindowConfig) -> Result<Self, WindowCreationError> {
        let sdl_ctx = sdl2::init().map_err(WindowCreationError)?;
        let video_ctx = sdl_ctx.video().map_err(WindowCreationError)?;
        video_ctx
            .gl_load_library_default()
            .map_err(WindowCreationError)?;

        video_ctx.gl_attr().set_context_flags().forward_compatible().set();
        video_ctx.gl_attr().set_context_major_version(config.gl_major);
        video_ctx.gl_attr().set_context_minor_version(config.gl_minor);
        video_ctx.gl_attr().set_context_profile(video::GLProfile::Core);
        video_ctx.gl_attr().set_multisample_buffers(1);
        video_ctx.gl_attr().set_multisample_samples(4);

        let window = video_ctx
            .window(config.title, config.width, config.height)
            .position_centered()
            .resizable()
            .opengl()
            .build()
            .map_err(|err| WindowCreationError(err.to_string()))?;
        let main_id = window.id();

        let gl_ctx = window.gl_create_context().map_err(WindowCreationError)?;
        gl::load_with(|s| video_ctx.gl_get_proc_address(s).cast());

        let events = sdl_ctx.event_pump().map_err(WindowCreationError)?;

        Ok(Self {
            _gl_ctx: gl_ctx,
            window,
            events,
            main_id,
            _video_ctx: video_ctx,
            _sdl_ctx: sdl_ctx,
        })
    }

    /// Drains pending events into what the loop needs to react to.
    pub fn poll(&mut self) -> FrameEvents {
        let mut out = FrameEvents::default();
        for event in self.events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::ESCAPE),
                    ..
                } => {
                    out.close_requested = true;
                }
                Event::Window {
                    window_id,
                    win_event: WindowEvent::Resized(width, height),
                    ..
                } if window_id == self.main_id => {
                    out.resized = Some((width.max(0) as u32, height.max(0) as u32));
                }
                _ => {}
            }
        }
        out
    }

    /// Samples the four factor keys as plain booleans, once per iteration.
    pub fn factor_keys(&self) -> FactorKeys {
        let state = self.events.keyboard_state();
        FactorKeys {
            raise_inner: state.is_scancode_pressed(Scancode::Q),
            lower_inner: state.is_scancode_pressed(Scancode::A),
            raise_outer: state.is_scancode_pressed(Scancode::W),
            lower_outer: state.is_scancode_pressed(Scancode::S),
        }
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    pub fn set_title(&mut self, title: &str) {
        // Only fails on interior NULs, which our titles never contain.
        let _ = self.window.set_title(title);
    }
}

/// Owned framebuffer size, updated from resize events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportState {
    pub width: u32,
    pub height: u32,
}

impl ViewportState {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn apply(&self) {
        gl_wrappers::update_viewport(self.width, self.height);
    }
}

/// Title-bar FPS readout, refreshed roughly four times a second.
pub struct FpsCounter {
    last_sample: Instant,
    frames: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            last_sample: now,
            frames: 0,
        }
    }

    /// Counts one frame; yields the rate whenever the sampling window closes.
    pub fn sample(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        let elapsed = now.duration_since(self.last_sample).as_secs_f64();
        if elapsed < 0.25 {
            return None;
        }
        let rate = f64::from(self.frames) / elapsed;
        self.last_sample = now;
        self.frames = 0;
        Some(rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn aspect_follows_the_viewport() {
        let viewport = ViewportState::new(640, 480);
        assert!((viewport.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn aspect_survives_a_zero_height() {
        let viewport = ViewportState::new(640, 0);
        assert!(viewport.aspect().is_finite());
    }

    #[test]
    fn fps_counter_waits_for_the_sampling_window() {
        let start = Instant::now();
        let mut fps = FpsCounter::new(start);
        assert_eq!(fps.sample(start + Duration::from_millis(100)), None);

        let rate = fps
            .sample(start + Duration::from_millis(500))
            .expect("window closed");
        // Two frames over half a second.
        assert!((rate - 4.0).abs() < 0.1);
    }

    #[test]
    fn fps_counter_resets_after_reporting() {
        let start = Instant::now();
        let mut fps = FpsCounter::new(start);
        fps.sample(start + Duration::from_millis(300)).expect("report");
        assert_eq!(fps.sample(start + Duration::from_millis(400)), None);
    }
}
