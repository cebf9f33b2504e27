use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};

use crate::error::GeometryError;
use crate::gl::{BufferTarget, GlBackend};

/// A single clip-space position fed to the `vertex` attribute.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
}

unsafe impl Zeroable for Vertex {}
unsafe impl Pod for Vertex {}

const fn v(x: f32, y: f32) -> Vertex {
    Vertex { position: [x, y] }
}

const QUAD_VERTICES: [Vertex; 4] = [v(-1.0, -1.0), v(1.0, -1.0), v(1.0, 1.0), v(-1.0, 1.0)];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

const TRIANGLE_VERTICES: [Vertex; 3] = [v(-1.0, -1.0), v(1.0, -1.0), v(0.0, 1.0)];
const TRIANGLE_INDICES: [u16; 3] = [0, 1, 2];

const RECTANGLE_VERTICES: [Vertex; 4] =
    [v(-0.75, -0.5), v(0.75, -0.5), v(0.75, 0.5), v(-0.75, 0.5)];

/// Geometry the fragment shader is rasterised onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// Covers the whole viewport.
    #[default]
    Quad,
    Triangle,
    /// Inset rectangle leaving a border of cleared background.
    Rectangle,
}

impl Shape {
    pub const ALL: [Shape; 3] = [Shape::Quad, Shape::Triangle, Shape::Rectangle];

    pub fn vertices(self) -> &'static [Vertex] {
        match self {
            Shape::Quad => &QUAD_VERTICES,
            Shape::Triangle => &TRIANGLE_VERTICES,
            Shape::Rectangle => &RECTANGLE_VERTICES,
        }
    }

    pub fn indices(self) -> &'static [u16] {
        match self {
            Shape::Quad | Shape::Rectangle => &QUAD_INDICES,
            Shape::Triangle => &TRIANGLE_INDICES,
        }
    }

    /// Maps the Alt+digit shortcuts (1, 2, 3) to shapes.
    pub fn from_digit(digit: u8) -> Option<Shape> {
        match digit {
            1 => Some(Shape::Quad),
            2 => Some(Shape::Triangle),
            3 => Some(Shape::Rectangle),
            _ => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Shape::Quad => "quad",
            Shape::Triangle => "triangle",
            Shape::Rectangle => "rectangle",
        })
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "quad" => Ok(Shape::Quad),
            "triangle" => Ok(Shape::Triangle),
            "rectangle" | "rect" => Ok(Shape::Rectangle),
            other => Err(format!(
                "unknown shape '{other}' (expected quad, triangle or rectangle)"
            )),
        }
    }
}

/// GPU copies of a [`Shape`]; released when dropped.
pub struct GeometryBuffers<B: GlBackend> {
    gl: Rc<B>,
    vertex_array: B::VertexArray,
    vertices: B::Buffer,
    indices: B::Buffer,
    index_count: i32,
    shape: Shape,
    attribute: Option<u32>,
}

impl<B: GlBackend> GeometryBuffers<B> {
    /// Uploads `shape` and records its layout for `attribute`.
    ///
    /// Anything allocated before a failure is released again.
    pub fn upload(
        gl: &Rc<B>,
        shape: Shape,
        attribute: Option<u32>,
    ) -> Result<Self, GeometryError> {
        let vertices = gl
            .create_buffer(BufferTarget::Vertex, bytemuck::cast_slice(shape.vertices()))
            .map_err(|message| GeometryError {
                what: "vertex buffer",
                message,
            })?;
        let index_bytes = bytemuck::cast_slice(shape.indices());
        let indices = match gl.create_buffer(BufferTarget::Index, index_bytes) {
            Ok(buffer) => buffer,
            Err(message) => {
                gl.delete_buffer(vertices);
                return Err(GeometryError {
                    what: "index buffer",
                    message,
                });
            }
        };
        let vertex_array = match gl.create_vertex_array(vertices, indices, attribute) {
            Ok(vertex_array) => vertex_array,
            Err(message) => {
                gl.delete_buffer(indices);
                gl.delete_buffer(vertices);
                return Err(GeometryError {
                    what: "vertex array",
                    message,
                });
            }
        };
        tracing::debug!(%shape, indices = shape.indices().len(), "geometry uploaded");
        Ok(Self {
            gl: Rc::clone(gl),
            vertex_array,
            vertices,
            indices,
            index_count: shape.indices().len() as i32,
            shape,
            attribute,
        })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Attribute location the layout was recorded for.
    pub fn attribute(&self) -> Option<u32> {
        self.attribute
    }

    pub fn index_count(&self) -> i32 {
        self.index_count
    }

    pub fn draw(&self) {
        self.gl.draw_indexed(self.vertex_array, self.index_count);
    }
}

impl<B: GlBackend> Drop for GeometryBuffers<B> {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.vertex_array);
        self.gl.delete_buffer(self.indices);
        self.gl.delete_buffer(self.vertices);
    }
}
