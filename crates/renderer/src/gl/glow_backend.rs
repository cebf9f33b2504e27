use glow::HasContext;

use super::{BufferTarget, GlBackend, InfoString, ShaderStage};

/// Vertex state for one piece of geometry.
///
/// `vao` is `None` on contexts without vertex array objects (desktop 2.x
/// without `ARB_vertex_array_object`); the layout is then replayed at draw
/// time from the stored buffers.
#[derive(Debug, Clone, Copy)]
pub struct GlowVertexArray {
    vao: Option<glow::VertexArray>,
    vertices: glow::Buffer,
    indices: glow::Buffer,
    attribute: Option<u32>,
}

const VERTEX_STRIDE: i32 = 2 * std::mem::size_of::<f32>() as i32;

fn supports_vertex_arrays(gl: &glow::Context) -> bool {
    gl.version().major >= 3
        || gl
            .supported_extensions()
            .iter()
            .any(|ext| ext == "GL_ARB_vertex_array_object" || ext == "GL_OES_vertex_array_object")
}

fn bind_layout(
    gl: &glow::Context,
    vertices: glow::Buffer,
    indices: glow::Buffer,
    attribute: Option<u32>,
) {
    unsafe {
        gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertices));
        gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(indices));
        if let Some(index) = attribute {
            gl.vertex_attrib_pointer_f32(index, 2, glow::FLOAT, false, VERTEX_STRIDE, 0);
            gl.enable_vertex_attrib_array(index);
        }
    }
}

impl GlBackend for glow::Context {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type Buffer = glow::Buffer;
    type VertexArray = GlowVertexArray;
    type UniformLocation = glow::UniformLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<Self::Shader, String> {
        let kind = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { HasContext::create_shader(self, kind) }
    }

    fn compile_shader(&self, shader: Self::Shader, source: &str) {
        unsafe {
            self.shader_source(shader, source);
            HasContext::compile_shader(self, shader);
        }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn detach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::detach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) -> bool {
        unsafe {
            HasContext::link_program(self, program);
            self.get_program_link_status(program)
        }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn delete_program(&self, program: Self::Program) {
        unsafe { HasContext::delete_program(self, program) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn attrib_location(&self, program: Self::Program, name: &str) -> Option<u32> {
        unsafe { self.get_attrib_location(program, name) }
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn set_uniform_f32(&self, location: &Self::UniformLocation, value: f32) {
        unsafe { self.uniform_1_f32(Some(location), value) }
    }

    fn set_uniform_vec2(&self, location: &Self::UniformLocation, x: f32, y: f32) {
        unsafe { self.uniform_2_f32(Some(location), x, y) }
    }

    fn create_buffer(&self, target: BufferTarget, data: &[u8]) -> Result<Self::Buffer, String> {
        let target = match target {
            BufferTarget::Vertex => glow::ARRAY_BUFFER,
            BufferTarget::Index => glow::ELEMENT_ARRAY_BUFFER,
        };
        unsafe {
            let buffer = HasContext::create_buffer(self)?;
            self.bind_buffer(target, Some(buffer));
            self.buffer_data_u8_slice(target, data, glow::STATIC_DRAW);
            Ok(buffer)
        }
    }

    fn delete_buffer(&self, buffer: Self::Buffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_vertex_array(
        &self,
        vertices: Self::Buffer,
        indices: Self::Buffer,
        attribute: Option<u32>,
    ) -> Result<Self::VertexArray, String> {
        let vao = if supports_vertex_arrays(self) {
            unsafe {
                let vao = HasContext::create_vertex_array(self)?;
                self.bind_vertex_array(Some(vao));
                bind_layout(self, vertices, indices, attribute);
                self.bind_vertex_array(None);
                Some(vao)
            }
        } else {
            None
        };
        Ok(GlowVertexArray {
            vao,
            vertices,
            indices,
            attribute,
        })
    }

    fn delete_vertex_array(&self, vertex_array: Self::VertexArray) {
        if let Some(vao) = vertex_array.vao {
            unsafe { HasContext::delete_vertex_array(self, vao) }
        }
    }

    fn begin_frame(&self, width: u32, height: u32) {
        unsafe {
            self.viewport(0, 0, width as i32, height as i32);
            self.clear_color(0.0, 0.0, 0.0, 1.0);
            self.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn draw_indexed(&self, vertex_array: Self::VertexArray, index_count: i32) {
        unsafe {
            match vertex_array.vao {
                Some(vao) => self.bind_vertex_array(Some(vao)),
                None => bind_layout(
                    self,
                    vertex_array.vertices,
                    vertex_array.indices,
                    vertex_array.attribute,
                ),
            }
            self.draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_SHORT, 0);
            if vertex_array.vao.is_some() {
                self.bind_vertex_array(None);
            }
        }
    }

    fn info_string(&self, which: InfoString) -> String {
        let parameter = match which {
            InfoString::Version => glow::VERSION,
            InfoString::ShadingLanguageVersion => glow::SHADING_LANGUAGE_VERSION,
            InfoString::Vendor => glow::VENDOR,
            InfoString::Renderer => glow::RENDERER,
        };
        unsafe { self.get_parameter_string(parameter) }
    }
}

/// Routes `KHR_debug` messages into `tracing`.
///
/// Must run before the context is shared, since glow needs `&mut` to install
/// the callback. Returns false when the driver has no debug output.
pub fn install_debug_callback(gl: &mut glow::Context) -> bool {
    if !gl.supports_debug() {
        return false;
    }
    unsafe {
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(|source, kind, id, severity, message| {
            match severity {
                glow::DEBUG_SEVERITY_HIGH => {
                    tracing::error!(source, kind, id, "gl: {message}")
                }
                glow::DEBUG_SEVERITY_MEDIUM => {
                    tracing::warn!(source, kind, id, "gl: {message}")
                }
                glow::DEBUG_SEVERITY_LOW => tracing::info!(source, kind, id, "gl: {message}"),
                _ => tracing::trace!(source, kind, id, "gl: {message}"),
            }
        });
    }
    true
}
