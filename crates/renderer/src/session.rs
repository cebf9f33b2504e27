//! The native window plus its OpenGL context.
//!
//! ```text
//!   WindowSession::new ──▶ Uninitialized ──open()──▶ Open ──close()/drop──▶ Closed
//!                                             │
//!                                             └─ DisplayBuilder (window + config)
//!                                                negotiate() over create_context
//!                                                surface, make_current, glow loader
//! ```
//!
//! Only one session may be alive per process; a second [`WindowSession::new`]
//! fails with [`ContextError::SessionActive`] until the first is dropped.
use std::num::NonZeroU32;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributes, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext,
    Version,
};
use glutin::display::GetGlDisplay;
use glutin::prelude::*;
use glutin::surface::{Surface, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::{HasRawWindowHandle, RawWindowHandle};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event_loop::EventLoopWindowTarget;
use winit::window::{Fullscreen, Window, WindowBuilder};

use crate::error::ContextError;
use crate::gl::install_debug_callback;
use crate::input::Restore;
use crate::negotiate::{self, ContextAttempt};
use crate::types::{ProfileRequest, RendererConfig};

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Process-wide claim on the single window session.
#[derive(Debug)]
struct SessionGuard;

impl SessionGuard {
    fn acquire() -> Result<Self, ContextError> {
        SESSION_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| SessionGuard)
            .map_err(|_| ContextError::SessionActive)
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        SESSION_ACTIVE.store(false, Ordering::Release);
    }
}

/// Live window resources. Field order is drop order: the GL function table
/// goes first and the window last.
pub struct OpenSession {
    gl: Rc<glow::Context>,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
    negotiated: ContextAttempt,
}

pub enum SessionState {
    Uninitialized,
    Open(Box<OpenSession>),
    Closed,
}

pub struct WindowSession {
    state: SessionState,
    _guard: SessionGuard,
}

impl WindowSession {
    /// Claims the process-wide session slot.
    pub fn new() -> Result<Self, ContextError> {
        Ok(Self {
            state: SessionState::Uninitialized,
            _guard: SessionGuard::acquire()?,
        })
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Creates the window and negotiates a current GL context for it.
    pub fn open(
        &mut self,
        target: &EventLoopWindowTarget<()>,
        config: &RendererConfig,
    ) -> Result<(), ContextError> {
        if !matches!(self.state, SessionState::Uninitialized) {
            return Err(ContextError::ContextInitFailed(
                "window session was already opened".to_string(),
            ));
        }
        negotiate::validate(&config.context)?;

        let (width, height) = config.window_size;
        let window_builder = WindowBuilder::new()
            .with_title(config.window_title.as_str())
            .with_inner_size(PhysicalSize::new(width.max(1), height.max(1)));
        let (window, gl_config) = DisplayBuilder::new()
            .with_window_builder(Some(window_builder))
            .build(target, ConfigTemplateBuilder::new(), pick_config)
            .map_err(|err| ContextError::ContextInitFailed(err.to_string()))?;
        let window = window.ok_or_else(|| {
            ContextError::ContextInitFailed("display was created without a window".to_string())
        })?;
        let raw_window_handle = window.raw_window_handle();
        let display = gl_config.display();

        let (not_current, negotiated) = negotiate::negotiate(&config.context, |attempt| {
            let attributes = context_attributes(attempt, config.context.debug, raw_window_handle);
            unsafe { display.create_context(&gl_config, &attributes) }
        })?;

        let surface_attributes = window.build_surface_attributes(Default::default());
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .map_err(|err| {
                ContextError::ContextInitFailed(format!("cannot create window surface: {err}"))
            })?;
        let context = not_current.make_current(&surface).map_err(|err| {
            ContextError::ContextInitFailed(format!("cannot make context current: {err}"))
        })?;
        if let Err(err) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN))
        {
            tracing::warn!("vsync unavailable: {err}");
        }

        let mut gl = unsafe {
            glow::Context::from_loader_function_cstr(|symbol| display.get_proc_address(symbol))
        };
        if config.context.debug && !install_debug_callback(&mut gl) {
            tracing::warn!("debug context requested but the driver has no debug output");
        }
        tracing::info!(context = %negotiated, "window opened");

        self.state = SessionState::Open(Box::new(OpenSession {
            gl: Rc::new(gl),
            surface,
            context,
            window,
            negotiated,
        }));
        Ok(())
    }

    /// Releases the window and context. Safe to call more than once.
    pub fn close(&mut self) {
        if matches!(self.state, SessionState::Open(_)) {
            self.state = SessionState::Closed;
            tracing::debug!("window session closed");
        }
    }

    fn open_session(&self) -> Option<&OpenSession> {
        match &self.state {
            SessionState::Open(session) => Some(session.as_ref()),
            _ => None,
        }
    }

    pub fn gl(&self) -> Option<Rc<glow::Context>> {
        self.open_session().map(|session| Rc::clone(&session.gl))
    }

    pub fn window(&self) -> Option<&Window> {
        self.open_session().map(|session| &session.window)
    }

    /// The attempt that produced the context.
    pub fn negotiated(&self) -> Option<ContextAttempt> {
        self.open_session().map(|session| session.negotiated)
    }

    pub fn framebuffer_size(&self) -> (u32, u32) {
        self.open_session()
            .map(|session| {
                let size = session.window.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }

    /// Outer position, when the platform reports one.
    pub fn position(&self) -> Option<PhysicalPosition<i32>> {
        self.open_session()
            .and_then(|session| session.window.outer_position().ok())
    }

    /// Resizes the GL surface; zero-sized (minimised) windows are skipped.
    pub fn resize(&self, size: PhysicalSize<u32>) {
        let Some(session) = self.open_session() else {
            return;
        };
        if let (Some(width), Some(height)) =
            (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        {
            session.surface.resize(&session.context, width, height);
        }
    }

    pub fn swap_buffers(&self) -> Result<(), glutin::error::Error> {
        match self.open_session() {
            Some(session) => session.surface.swap_buffers(&session.context),
            None => Ok(()),
        }
    }

    pub fn set_fullscreen(&self, fullscreen: bool) {
        if let Some(session) = self.open_session() {
            session
                .window
                .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        }
    }

    /// Applies remembered windowed geometry.
    pub fn restore(&self, restore: Restore) {
        let Some(session) = self.open_session() else {
            return;
        };
        if let Some(position) = restore.position {
            session.window.set_outer_position(position);
        }
        let _ = session.window.request_inner_size(restore.size);
    }
}

/// Config picker handed to `DisplayBuilder::build`.
///
/// glutin runs the picker only after `find_configs` succeeded, and its
/// backends report an empty match as an error, so the iterator is never empty.
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    most_samples(configs, |config| config.num_samples())
        .expect("glutin passes the picker at least one config")
}

/// First candidate with the highest sample count.
fn most_samples<T>(
    candidates: impl Iterator<Item = T>,
    samples: impl Fn(&T) -> u8,
) -> Option<T> {
    candidates.reduce(|best, next| {
        if samples(&next) > samples(&best) {
            next
        } else {
            best
        }
    })
}

fn context_attributes(
    attempt: &ContextAttempt,
    debug: bool,
    raw_window_handle: RawWindowHandle,
) -> ContextAttributes {
    let mut builder = ContextAttributesBuilder::new().with_debug(debug);
    if let Some(version) = attempt.version {
        builder = builder.with_context_api(ContextApi::OpenGl(Some(Version::new(
            version.major,
            version.minor,
        ))));
    }
    builder = match attempt.profile {
        ProfileRequest::Any => builder,
        ProfileRequest::Core => builder.with_profile(GlProfile::Core),
        ProfileRequest::Compatibility => builder.with_profile(GlProfile::Compatibility),
    };
    builder.build(Some(raw_window_handle))
}
