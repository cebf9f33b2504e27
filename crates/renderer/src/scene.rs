use std::rc::Rc;

use anyhow::{Context, Result};
use shadersource::ShaderSources;

use crate::error::{GeometryError, ShaderError};
use crate::geometry::{GeometryBuffers, Shape};
use crate::gl::{GlBackend, ShaderProgram};

/// The program and geometry drawn every frame.
///
/// Programs are replaced only once the new one links. Geometry is released
/// before its replacement is uploaded, so a failed upload leaves the scene
/// without geometry until the next successful shape change.
pub struct Scene<B: GlBackend> {
    gl: Rc<B>,
    program: ShaderProgram<B>,
    geometry: Option<GeometryBuffers<B>>,
    shape: Shape,
    last_time: f32,
}

impl<B: GlBackend> Scene<B> {
    pub fn new(gl: Rc<B>, sources: &ShaderSources, shape: Shape) -> Result<Self> {
        let program =
            ShaderProgram::build(&gl, sources).context("failed to build shader program")?;
        let geometry = GeometryBuffers::upload(&gl, shape, program.vertex_attribute())
            .with_context(|| format!("failed to upload {shape} geometry"))?;
        Ok(Self {
            gl,
            program,
            geometry: Some(geometry),
            shape,
            last_time: 0.0,
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn program(&self) -> &ShaderProgram<B> {
        &self.program
    }

    /// Swaps in a program built from `sources`, keeping the current one on
    /// failure.
    pub fn rebuild_program(&mut self, sources: &ShaderSources) -> Result<(), ShaderError> {
        let program = ShaderProgram::build(&self.gl, sources)?;
        let attribute = program.vertex_attribute();
        self.program = program;
        tracing::info!("shader program rebuilt");

        let stale = self
            .geometry
            .as_ref()
            .map_or(true, |geometry| geometry.attribute() != attribute);
        if stale {
            if let Err(err) = self.select_shape(self.shape) {
                tracing::error!("{err}");
            }
        }
        Ok(())
    }

    /// Replaces the geometry with `shape`.
    pub fn select_shape(&mut self, shape: Shape) -> Result<(), GeometryError> {
        self.shape = shape;
        self.geometry = None;
        let geometry =
            GeometryBuffers::upload(&self.gl, shape, self.program.vertex_attribute())?;
        self.geometry = Some(geometry);
        tracing::info!(%shape, "shape selected");
        Ok(())
    }

    /// Renders one frame at `size`. `time` is `None` while paused, which
    /// holds the value from the last running frame.
    pub fn draw(&mut self, size: (u32, u32), time: Option<f32>) {
        if let Some(time) = time {
            self.last_time = time;
        }
        self.gl.begin_frame(size.0, size.1);
        self.program.bind();
        self.program.set_resolution(size.0 as f32, size.1 as f32);
        self.program.set_time(self.last_time);
        if let Some(geometry) = &self.geometry {
            geometry.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gl::testing::{Call, RecordingGl};

    fn scene(gl: &Rc<RecordingGl>) -> Scene<RecordingGl> {
        Scene::new(Rc::clone(gl), &ShaderSources::builtin(), Shape::Quad).unwrap()
    }

    #[test]
    fn draw_sequence_matches_frame_protocol() {
        let gl = Rc::new(RecordingGl::default());
        let mut scene = scene(&gl);
        let program = scene.program().handle();
        gl.take_calls();

        scene.draw((640, 480), Some(1.25));

        let calls = gl.take_calls();
        assert_eq!(calls[0], Call::BeginFrame(640, 480));
        assert_eq!(calls[1], Call::UseProgram(Some(program)));
        assert!(matches!(calls[2], Call::Draw { index_count: 6, .. }));
        assert_eq!(gl.last_time(), Some(1.25));
        assert!(gl
            .uniform_writes()
            .contains(&("resolution".to_string(), vec![640.0, 480.0])));
    }

    #[test]
    fn paused_frames_hold_last_time() {
        let gl = Rc::new(RecordingGl::default());
        let mut scene = scene(&gl);
        scene.draw((400, 400), Some(2.5));
        scene.draw((400, 400), None);
        scene.draw((400, 400), None);
        assert_eq!(gl.last_time(), Some(2.5));
        scene.draw((400, 400), Some(3.0));
        assert_eq!(gl.last_time(), Some(3.0));
    }

    #[test]
    fn failed_rebuild_keeps_previous_program() {
        let gl = Rc::new(RecordingGl::default());
        let mut scene = scene(&gl);
        let before = scene.program().handle();

        gl.set_link_ok(false);
        assert!(scene.rebuild_program(&ShaderSources::builtin()).is_err());
        assert_eq!(scene.program().handle(), before);
        assert_eq!(gl.live_programs(), 1);
        assert_eq!(gl.live_shaders(), 0);

        gl.set_link_ok(true);
        scene.rebuild_program(&ShaderSources::builtin()).unwrap();
        assert_ne!(scene.program().handle(), before);
        assert_eq!(gl.live_programs(), 1);
    }

    #[test]
    fn rebuild_reuploads_geometry_when_attribute_moves() {
        let gl = Rc::new(RecordingGl::default());
        let mut scene = scene(&gl);
        assert_eq!(gl.vertex_array_attributes(), vec![Some(0)]);

        gl.set_attribute_location(3);
        scene.rebuild_program(&ShaderSources::builtin()).unwrap();
        assert_eq!(gl.vertex_array_attributes(), vec![Some(0), Some(3)]);
        assert_eq!(gl.live_vertex_arrays(), 1);
        assert_eq!(gl.live_buffers(), 2);

        scene.rebuild_program(&ShaderSources::builtin()).unwrap();
        assert_eq!(gl.vertex_array_attributes(), vec![Some(0), Some(3)]);
        assert_eq!(scene.shape(), Shape::Quad);
    }

    #[test]
    fn legacy_fragment_renders_default_quad() {
        let sources = ShaderSources::from_fragment(
            "#version 120\nuniform float time;\nvoid main() { gl_FragColor = vec4(time); }\n"
                .to_string(),
        )
        .unwrap();
        assert!(sources.vertex.contains("attribute vec2 vertex;"));

        let gl = Rc::new(RecordingGl::default());
        let mut scene = Scene::new(Rc::clone(&gl), &sources, Shape::Quad).unwrap();
        gl.take_calls();
        scene.draw((400, 400), Some(0.5));
        assert!(gl
            .take_calls()
            .iter()
            .any(|call| matches!(call, Call::Draw { index_count: 6, .. })));
    }

    #[test]
    fn shape_change_replaces_geometry() {
        let gl = Rc::new(RecordingGl::default());
        let mut scene = scene(&gl);
        scene.select_shape(Shape::Triangle).unwrap();
        assert_eq!(scene.shape(), Shape::Triangle);
        assert_eq!(gl.live_buffers(), 2);
        assert_eq!(gl.live_vertex_arrays(), 1);

        gl.take_calls();
        scene.draw((100, 100), Some(0.0));
        assert!(gl
            .take_calls()
            .iter()
            .any(|call| matches!(call, Call::Draw { index_count: 3, .. })));
    }

    #[test]
    fn failed_shape_upload_draws_nothing() {
        let gl = Rc::new(RecordingGl::default());
        let mut scene = scene(&gl);
        gl.set_buffers_fail(true);
        assert!(scene.select_shape(Shape::Rectangle).is_err());
        assert_eq!(gl.live_buffers(), 0);

        gl.take_calls();
        scene.draw((100, 100), Some(0.0));
        assert!(!gl
            .take_calls()
            .iter()
            .any(|call| matches!(call, Call::Draw { .. })));
    }
}
