//! Renderer crate for the `shadertest` GLSL harness.
//!
//! Opens a single window with a negotiated OpenGL context and draws a fragment
//! shader onto simple geometry every frame. The overall flow is:
//!
//! ```text
//!   CLI / shadertest
//!          │ RendererConfig + ShaderSources
//!          ▼
//!   Renderer::run ──▶ WindowSession::open ──▶ negotiate() ──▶ glow::Context
//!          │                                                      │
//!          └─▶ winit event loop ──▶ InputRouter ──▶ RuntimeActions │
//!                        │                                         ▼
//!                        └──────── AboutToWait ──▶ Scene::draw ──▶ swap
//! ```
//!
//! GL calls go through the [`gl::GlBackend`] trait so the program, geometry
//! and frame logic can be tested without a display.

mod clock;
mod error;
mod geometry;
pub mod gl;
mod input;
mod negotiate;
mod scene;
mod session;
mod types;
mod window;

use anyhow::Result;
use shadersource::ShaderSources;

pub use clock::{AnimationClock, TimeSample};
pub use error::{ContextError, GeometryError, ShaderError, ShaderLinkError};
pub use geometry::{GeometryBuffers, Shape, Vertex};
pub use input::{
    action_for, Action, InputRouter, Restore, RuntimeActions, WindowMode, WindowPlacement,
};
pub use negotiate::{negotiate, plan, validate, ContextAttempt, CANDIDATE_VERSIONS};
pub use scene::Scene;
pub use session::{SessionState, WindowSession};
pub use types::{
    ContextRequest, GlVersion, ProfileRequest, RendererConfig, VersionFormatError, VersionRequest,
};

/// Entry point owning the start-up configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// `sources` are the shaders to start with; `None` loads them from the
    /// configured paths. Fails before any window exists when the context
    /// request is invalid.
    pub fn run(self, sources: Option<ShaderSources>) -> Result<()> {
        validate(&self.config.context)?;
        window::run(self.config, sources)
    }
}
