use std::rc::Rc;

use anyhow::{Context, Result};
use shadersource::{ShaderPaths, ShaderSources};
use winit::dpi::PhysicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use crate::clock::AnimationClock;
use crate::error::ContextError;
use crate::gl::GlInfo;
use crate::input::{InputRouter, WindowPlacement};
use crate::scene::Scene;
use crate::session::WindowSession;
use crate::types::RendererConfig;

/// Everything the event loop owns between frames.
///
/// `scene` is declared before `session` so GL objects are released while the
/// context still exists.
struct WindowApp {
    scene: Option<Scene<glow::Context>>,
    session: WindowSession,
    router: InputRouter,
    placement: WindowPlacement,
    clock: AnimationClock,
    paths: ShaderPaths,
}

impl WindowApp {
    fn handle_window_event(&mut self, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                self.router.close_requested();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.router.set_modifiers(modifiers.state());
            }
            WindowEvent::KeyboardInput { event, .. } if !event.repeat => {
                self.router.route(event.physical_key, event.state);
            }
            WindowEvent::Resized(size) => {
                self.placement.resized(size);
                self.session.resize(size);
            }
            WindowEvent::Moved(position) => {
                self.placement.moved(position);
            }
            _ => {}
        }
    }

    /// Applies pending actions and renders one frame. Returns false once the
    /// user asked to quit.
    fn frame(&mut self) -> bool {
        let actions = self.router.take_actions();
        if actions.close {
            return false;
        }

        if actions.reset_size {
            match self.placement.reset() {
                Some(restore) => self.session.restore(restore),
                None => tracing::debug!("size reset ignored while fullscreen"),
            }
        }
        if actions.toggle_fullscreen {
            match self.placement.toggle_fullscreen() {
                None => self.session.set_fullscreen(true),
                Some(restore) => {
                    self.session.set_fullscreen(false);
                    self.session.restore(restore);
                }
            }
            tracing::info!(mode = ?self.placement.mode(), "window mode changed");
        }
        if actions.toggle_pause {
            let paused = self.clock.toggle();
            tracing::info!(paused, "animation {}", if paused { "paused" } else { "resumed" });
        }

        let Some(scene) = self.scene.as_mut() else {
            return true;
        };
        if actions.reload {
            match ShaderSources::load(&self.paths) {
                Ok(sources) => {
                    if let Err(err) = scene.rebuild_program(&sources) {
                        tracing::error!("shader reload failed: {err}");
                    }
                }
                Err(err) => tracing::error!("shader reload failed: {err}"),
            }
        }
        if let Some(shape) = actions.shape {
            if let Err(err) = scene.select_shape(shape) {
                tracing::error!("shape change failed: {err}");
            }
        }

        let sample = self.clock.sample();
        scene.draw(
            self.session.framebuffer_size(),
            (!sample.paused).then_some(sample.seconds),
        );
        if let Err(err) = self.session.swap_buffers() {
            tracing::error!("failed to swap buffers: {err}");
        }
        true
    }

    fn shutdown(&mut self) {
        self.scene = None;
        self.session.close();
    }
}

/// Opens the window and runs the interactive loop until the user quits.
///
/// With `info_only` the GL strings are printed once the context exists and
/// the loop is never entered. `sources` defaults to loading
/// `config.shader_paths`.
pub(crate) fn run(config: RendererConfig, sources: Option<ShaderSources>) -> Result<()> {
    let event_loop = EventLoop::new()
        .map_err(|err| ContextError::ContextInitFailed(err.to_string()))?;
    let mut session = WindowSession::new()?;
    session.open(&event_loop, &config)?;
    let gl = session
        .gl()
        .ok_or_else(|| ContextError::ContextInitFailed("window session is not open".to_string()))?;

    let info = GlInfo::query(gl.as_ref());
    if config.info_only {
        println!("{info}");
        return Ok(());
    }
    tracing::info!(
        version = %info.version,
        glsl = %info.shading_language_version,
        renderer = %info.renderer,
        "OpenGL ready"
    );

    let sources = match sources {
        Some(sources) => sources,
        None => ShaderSources::load(&config.shader_paths).context("failed to load shaders")?,
    };
    let scene = Scene::new(Rc::clone(&gl), &sources, config.initial_shape)?;
    drop(gl);

    let (width, height) = config.window_size;
    let size = session
        .window()
        .map(|window| window.inner_size())
        .unwrap_or_else(|| PhysicalSize::new(width, height));
    let placement = WindowPlacement::new(session.position(), size);
    let mut app = WindowApp {
        scene: Some(scene),
        session,
        router: InputRouter::default(),
        placement,
        clock: AnimationClock::new(),
        paths: config.shader_paths,
    };

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => app.handle_window_event(event),
            Event::AboutToWait => {
                if !app.frame() {
                    tracing::debug!("quit requested");
                    elwt.exit();
                }
            }
            Event::LoopExiting => app.shutdown(),
            _ => {}
        })
        .context("window event loop error")?;
    Ok(())
}
