//! In-memory [`GlBackend`] that records what the renderer asks of it.
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use super::{BufferTarget, GlBackend, InfoString, ShaderStage};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    BeginFrame(u32, u32),
    UseProgram(Option<u32>),
    Draw { vertex_array: u32, index_count: i32 },
}

#[derive(Debug)]
pub struct RecordingGl {
    next_name: Cell<u32>,
    live_shaders: RefCell<HashSet<u32>>,
    live_programs: RefCell<HashSet<u32>>,
    live_buffers: RefCell<HashSet<u32>>,
    live_vertex_arrays: RefCell<HashSet<u32>>,
    detached: Cell<usize>,
    link_ok: Cell<bool>,
    logs: (String, String, String),
    shader_stages: RefCell<Vec<(u32, ShaderStage)>>,
    fail_shader: Option<ShaderStage>,
    fail_buffers: Cell<bool>,
    attributes: Vec<String>,
    attribute_location: Cell<u32>,
    vertex_array_attributes: RefCell<Vec<Option<u32>>>,
    uniforms: Vec<String>,
    uniform_writes: RefCell<Vec<(String, Vec<f32>)>>,
    calls: RefCell<Vec<Call>>,
}

impl Default for RecordingGl {
    fn default() -> Self {
        Self {
            next_name: Cell::new(1),
            live_shaders: RefCell::default(),
            live_programs: RefCell::default(),
            live_buffers: RefCell::default(),
            live_vertex_arrays: RefCell::default(),
            detached: Cell::new(0),
            link_ok: Cell::new(true),
            logs: Default::default(),
            shader_stages: RefCell::default(),
            fail_shader: None,
            fail_buffers: Cell::new(false),
            attributes: vec!["vertex".to_string()],
            attribute_location: Cell::new(0),
            vertex_array_attributes: RefCell::default(),
            uniforms: vec!["time".to_string(), "resolution".to_string()],
            uniform_writes: RefCell::default(),
            calls: RefCell::default(),
        }
    }
}

impl RecordingGl {
    pub fn failing_link(program_log: &str, vertex_log: &str, fragment_log: &str) -> Self {
        let gl = Self {
            logs: (
                program_log.to_string(),
                vertex_log.to_string(),
                fragment_log.to_string(),
            ),
            ..Self::default()
        };
        gl.link_ok.set(false);
        gl
    }

    pub fn failing_shader_creation(mut self, stage: ShaderStage) -> Self {
        self.fail_shader = Some(stage);
        self
    }

    pub fn with_attributes(mut self, names: &[&str]) -> Self {
        self.attributes = names.iter().map(|name| name.to_string()).collect();
        self
    }

    pub fn with_uniforms(mut self, names: &[&str]) -> Self {
        self.uniforms = names.iter().map(|name| name.to_string()).collect();
        self
    }

    /// Makes subsequent links succeed or fail.
    pub fn set_link_ok(&self, ok: bool) {
        self.link_ok.set(ok);
    }

    /// Location reported for every known attribute in later lookups.
    pub fn set_attribute_location(&self, location: u32) {
        self.attribute_location.set(location);
    }

    /// Attribute passed to each `create_vertex_array` call, oldest first.
    pub fn vertex_array_attributes(&self) -> Vec<Option<u32>> {
        self.vertex_array_attributes.borrow().clone()
    }

    pub fn set_buffers_fail(&self, fail: bool) {
        self.fail_buffers.set(fail);
    }

    pub fn live_shaders(&self) -> usize {
        self.live_shaders.borrow().len()
    }

    pub fn live_programs(&self) -> usize {
        self.live_programs.borrow().len()
    }

    pub fn live_buffers(&self) -> usize {
        self.live_buffers.borrow().len()
    }

    pub fn live_vertex_arrays(&self) -> usize {
        self.live_vertex_arrays.borrow().len()
    }

    pub fn detached_shaders(&self) -> usize {
        self.detached.get()
    }

    pub fn uniform_writes(&self) -> Vec<(String, Vec<f32>)> {
        self.uniform_writes.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        self.calls.borrow_mut().drain(..).collect()
    }

    /// Last value written to the `time` uniform.
    pub fn last_time(&self) -> Option<f32> {
        self.uniform_writes
            .borrow()
            .iter()
            .rev()
            .find(|(name, _)| name == "time")
            .map(|(_, values)| values[0])
    }

    fn allocate(&self, set: &RefCell<HashSet<u32>>) -> u32 {
        let name = self.next_name.get();
        self.next_name.set(name + 1);
        set.borrow_mut().insert(name);
        name
    }

    fn release(set: &RefCell<HashSet<u32>>, name: u32, what: &str) {
        assert!(set.borrow_mut().remove(&name), "double delete of {what} {name}");
    }
}

impl GlBackend for RecordingGl {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type VertexArray = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Result<u32, String> {
        if self.fail_shader == Some(stage) {
            return Err("out of shader names".to_string());
        }
        let name = self.allocate(&self.live_shaders);
        self.shader_stages.borrow_mut().push((name, stage));
        Ok(name)
    }

    fn compile_shader(&self, _shader: u32, _source: &str) {}

    fn shader_info_log(&self, shader: u32) -> String {
        let stage = self
            .shader_stages
            .borrow()
            .iter()
            .find(|(name, _)| *name == shader)
            .map(|(_, stage)| *stage);
        match stage {
            Some(ShaderStage::Vertex) => self.logs.1.clone(),
            Some(ShaderStage::Fragment) => self.logs.2.clone(),
            None => String::new(),
        }
    }

    fn delete_shader(&self, shader: u32) {
        Self::release(&self.live_shaders, shader, "shader");
    }

    fn create_program(&self) -> Result<u32, String> {
        Ok(self.allocate(&self.live_programs))
    }

    fn attach_shader(&self, _program: u32, _shader: u32) {}

    fn detach_shader(&self, _program: u32, _shader: u32) {
        self.detached.set(self.detached.get() + 1);
    }

    fn link_program(&self, _program: u32) -> bool {
        self.link_ok.get()
    }

    fn program_info_log(&self, _program: u32) -> String {
        self.logs.0.clone()
    }

    fn delete_program(&self, program: u32) {
        Self::release(&self.live_programs, program, "program");
    }

    fn use_program(&self, program: Option<u32>) {
        self.calls.borrow_mut().push(Call::UseProgram(program));
    }

    fn attrib_location(&self, _program: u32, name: &str) -> Option<u32> {
        self.attributes.iter().any(|attr| attr == name).then_some(self.attribute_location.get())
    }

    fn uniform_location(&self, _program: u32, name: &str) -> Option<String> {
        self.uniforms
            .iter()
            .any(|uniform| uniform == name)
            .then(|| name.to_string())
    }

    fn set_uniform_f32(&self, location: &String, value: f32) {
        self.uniform_writes
            .borrow_mut()
            .push((location.clone(), vec![value]));
    }

    fn set_uniform_vec2(&self, location: &String, x: f32, y: f32) {
        self.uniform_writes
            .borrow_mut()
            .push((location.clone(), vec![x, y]));
    }

    fn create_buffer(&self, _target: BufferTarget, _data: &[u8]) -> Result<u32, String> {
        if self.fail_buffers.get() {
            return Err("out of memory".to_string());
        }
        Ok(self.allocate(&self.live_buffers))
    }

    fn delete_buffer(&self, buffer: u32) {
        Self::release(&self.live_buffers, buffer, "buffer");
    }

    fn create_vertex_array(
        &self,
        _vertices: u32,
        _indices: u32,
        attribute: Option<u32>,
    ) -> Result<u32, String> {
        self.vertex_array_attributes.borrow_mut().push(attribute);
        Ok(self.allocate(&self.live_vertex_arrays))
    }

    fn delete_vertex_array(&self, vertex_array: u32) {
        Self::release(&self.live_vertex_arrays, vertex_array, "vertex array");
    }

    fn begin_frame(&self, width: u32, height: u32) {
        self.calls.borrow_mut().push(Call::BeginFrame(width, height));
    }

    fn draw_indexed(&self, vertex_array: u32, index_count: i32) {
        self.calls.borrow_mut().push(Call::Draw {
            vertex_array,
            index_count,
        });
    }

    fn info_string(&self, which: InfoString) -> String {
        match which {
            InfoString::Version => "4.6 (fake)".to_string(),
            InfoString::ShadingLanguageVersion => "4.60".to_string(),
            InfoString::Vendor => "nobody".to_string(),
            InfoString::Renderer => "recording".to_string(),
        }
    }
}
