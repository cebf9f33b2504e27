//! The slice of OpenGL the harness needs, behind a trait.
//!
//! [`GlBackend`] is implemented for `glow::Context` in [`glow_backend`]; the
//! rest of the crate only talks to the trait so the link protocol, geometry
//! swaps and frame sequencing can be exercised against a recording double in
//! tests. All methods assume the owning context is current on this thread,
//! which `WindowSession` guarantees for its lifetime.
//!
//! - `program` compiles stages, links programs and owns program handles.
//! - `glow_backend` maps the trait onto `glow`.
use std::fmt;

mod glow_backend;
pub(crate) mod program;
#[cfg(test)]
pub(crate) mod testing;

pub(crate) use glow_backend::install_debug_callback;
pub use glow_backend::GlowVertexArray;
pub use program::{compile, link, ShaderObject, ShaderProgram};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// Driver identification strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoString {
    Version,
    ShadingLanguageVersion,
    Vendor,
    Renderer,
}

/// Raw GL operations used by the harness.
///
/// Handles are plain copyable names; ownership and release are handled by the
/// RAII wrappers in [`program`] and [`crate::geometry`].
pub trait GlBackend {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;
    type UniformLocation: fmt::Debug;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String>;
    /// Uploads the source and compiles; errors surface through the info log.
    fn compile_shader(&self, shader: Self::Shader, source: &str);
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn detach_shader(&self, program: Self::Program, shader: Self::Shader);
    /// Links and returns the link status.
    fn link_program(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&self, program: Self::Program);
    fn use_program(&self, program: Option<Self::Program>);
    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32>;
    fn uniform_location(&self, program: Self::Program, name: &str)
        -> Option<Self::UniformLocation>;
    fn set_uniform_f32(&self, location: &Self::UniformLocation, value: f32);
    fn set_uniform_vec2(&self, location: &Self::UniformLocation, x: f32, y: f32);

    /// Creates a buffer bound to `target` and fills it with static data.
    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    /// Captures the vertex/index buffers and the `vec2` float layout of
    /// `attribute`. Contexts without vertex array objects re-bind the
    /// buffers on every draw instead.
    fn create_vertex_array(
        &self,
        vertices: Self::Buffer,
        indices: Self::Buffer,
        attribute: Option<u32>,
    ) -> Result<Self::VertexArray, String>;
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);

    /// Sets the viewport to the full framebuffer and clears the colour buffer.
    fn begin_frame(&self, width: u32, height: u32);
    /// Draws `index_count` `u16` indices as triangles.
    fn draw_indexed(&self, vertex_array: Self::VertexArray, index_count: i32);

    fn info_string(&self, which: InfoString) -> String;
}

/// Driver identification reported by `--info-only`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlInfo {
    pub version: String,
    pub shading_language_version: String,
    pub vendor: String,
    pub renderer: String,
}

impl GlInfo {
    pub fn query<B: GlBackend + ?Sized>(gl: &B) -> Self {
        Self {
            version: gl.info_string(InfoString::Version),
            shading_language_version: gl.info_string(InfoString::ShadingLanguageVersion),
            vendor: gl.info_string(InfoString::Vendor),
            renderer: gl.info_string(InfoString::Renderer),
        }
    }
}

impl fmt::Display for GlInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "OpenGL Version: {}", self.version)?;
        writeln!(f, "GLSL Version: {}", self.shading_language_version)?;
        writeln!(f, "OpenGL Vendor: {}", self.vendor)?;
        write!(f, "OpenGL Renderer: {}", self.renderer)
    }
}
