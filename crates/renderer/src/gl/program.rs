use std::rc::Rc;

use shadersource::ShaderSources;

use super::{GlBackend, ShaderStage};
use crate::error::{ShaderError, ShaderLinkError};

/// A compiled (or failed-to-compile) shader stage.
///
/// The underlying shader object is deleted when the guard drops, so every
/// exit path out of [`link`] releases both stages.
pub struct ShaderObject<'a, B: GlBackend + ?Sized> {
    gl: &'a B,
    shader: B::Shader,
    stage: ShaderStage,
}

impl<B: GlBackend + ?Sized> ShaderObject<'_, B> {
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn info_log(&self) -> String {
        self.gl.shader_info_log(self.shader)
    }
}

impl<B: GlBackend + ?Sized> Drop for ShaderObject<'_, B> {
    fn drop(&mut self) {
        self.gl.delete_shader(self.shader);
    }
}

/// Compiles one stage. Compile errors are not checked here; they are
/// reported through the stage logs when the program fails to link.
pub fn compile<'a, B: GlBackend + ?Sized>(
    gl: &'a B,
    stage: ShaderStage,
    source: &str,
) -> Result<ShaderObject<'a, B>, ShaderError> {
    let shader = gl
        .create_shader(stage)
        .map_err(|message| ShaderError::CreateShader { stage, message })?;
    gl.compile_shader(shader, source);
    tracing::trace!(%stage, bytes = source.len(), "compiled shader stage");
    Ok(ShaderObject { gl, shader, stage })
}

/// Links two stages into a program and resolves its uniforms and attribute.
pub fn link<B: GlBackend>(
    gl: &Rc<B>,
    vertex: ShaderObject<'_, B>,
    fragment: ShaderObject<'_, B>,
) -> Result<ShaderProgram<B>, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::CreateProgram)?;

    gl.attach_shader(program, vertex.shader);
    gl.attach_shader(program, fragment.shader);
    let linked = gl.link_program(program);

    let failure = if linked {
        None
    } else {
        Some(ShaderLinkError {
            program_log: gl.program_info_log(program),
            vertex_log: vertex.info_log(),
            fragment_log: fragment.info_log(),
        })
    };

    gl.detach_shader(program, vertex.shader);
    gl.detach_shader(program, fragment.shader);
    drop(vertex);
    drop(fragment);

    if let Some(err) = failure {
        gl.delete_program(program);
        tracing::error!("program linker: {}", err.program_log.trim());
        if !err.vertex_log.trim().is_empty() {
            tracing::error!("vertex shader compiler: {}", err.vertex_log.trim());
        }
        if !err.fragment_log.trim().is_empty() {
            tracing::error!("fragment shader compiler: {}", err.fragment_log.trim());
        }
        return Err(err.into());
    }

    Ok(ShaderProgram::resolve(Rc::clone(gl), program))
}

/// A linked program and the locations the renderer feeds every frame.
pub struct ShaderProgram<B: GlBackend> {
    gl: Rc<B>,
    program: B::Program,
    time: Option<B::UniformLocation>,
    resolution: Option<B::UniformLocation>,
    vertex_attribute: Option<u32>,
}

impl<B: GlBackend> ShaderProgram<B> {
    /// Compiles and links a vertex/fragment pair.
    pub fn build(gl: &Rc<B>, sources: &ShaderSources) -> Result<Self, ShaderError> {
        let vertex = compile(gl.as_ref(), ShaderStage::Vertex, &sources.vertex)?;
        let fragment = compile(gl.as_ref(), ShaderStage::Fragment, &sources.fragment)?;
        link(gl, vertex, fragment)
    }

    fn resolve(gl: Rc<B>, program: B::Program) -> Self {
        let time = gl.uniform_location(program, "time");
        let resolution = gl.uniform_location(program, "resolution");
        let vertex_attribute = gl
            .attrib_location(program, "vertex")
            .or_else(|| gl.attrib_location(program, "position"));
        tracing::debug!(
            has_time = time.is_some(),
            has_resolution = resolution.is_some(),
            vertex_attribute = ?vertex_attribute,
            "program linked"
        );
        Self {
            gl,
            program,
            time,
            resolution,
            vertex_attribute,
        }
    }

    pub fn handle(&self) -> B::Program {
        self.program
    }

    /// Location of `vertex` (or `position`) if the program uses it.
    pub fn vertex_attribute(&self) -> Option<u32> {
        self.vertex_attribute
    }

    pub fn bind(&self) {
        self.gl.use_program(Some(self.program));
    }

    pub fn set_resolution(&self, width: f32, height: f32) {
        if let Some(location) = &self.resolution {
            self.gl.set_uniform_vec2(location, width, height);
        }
    }

    pub fn set_time(&self, seconds: f32) {
        if let Some(location) = &self.time {
            self.gl.set_uniform_f32(location, seconds);
        }
    }
}

impl<B: GlBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.gl.delete_program(self.program);
    }
}
