//! Shader source loading for shadertest.
//!
//! Turns the shader paths given on the command line into the final vertex and
//! fragment texts handed to the renderer:
//!
//! ```text
//!   ShaderPaths ──▶ read ──▶ #pragma include expansion ──▶ ShaderSources
//!                                     │
//!                   (no vertex path)  └─▶ synthesize_vertex_source()
//! ```
//!
//! When no paths are given the built-in default pair is used.
mod defaults;
mod include;
mod version;
mod vertex;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use defaults::{DEFAULT_FRAGMENT_SOURCE, DEFAULT_VERTEX_SOURCE};
pub use include::preprocess;
pub use version::{uses_modern_io, VersionDirective};
pub use vertex::synthesize_vertex_source;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unable to read shader file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("shader line {line}: unable to open include \"{path}\": {source}")]
    Include {
        line: usize,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid GLSL version \"{0}\"")]
    InvalidShaderVersion(String),
}

/// Shader files requested by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderPaths {
    pub fragment: Option<PathBuf>,
    pub vertex: Option<PathBuf>,
}

impl ShaderPaths {
    pub fn new(fragment: Option<PathBuf>, vertex: Option<PathBuf>) -> Self {
        Self { fragment, vertex }
    }

    /// True when nothing was requested and the built-in pair applies.
    pub fn is_default(&self) -> bool {
        self.fragment.is_none() && self.vertex.is_none()
    }
}

/// Where the vertex stage of a [`ShaderSources`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexOrigin {
    BuiltIn,
    File,
    Synthesized,
}

/// Final, preprocessed vertex + fragment texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
    pub vertex_origin: VertexOrigin,
}

impl ShaderSources {
    /// The built-in shader pair.
    pub fn builtin() -> Self {
        Self {
            vertex: DEFAULT_VERTEX_SOURCE.to_string(),
            fragment: DEFAULT_FRAGMENT_SOURCE.to_string(),
            vertex_origin: VertexOrigin::BuiltIn,
        }
    }

    /// Pairs a fragment shader with a synthesized pass-through vertex shader.
    pub fn from_fragment(fragment: String) -> Result<Self, SourceError> {
        let vertex = synthesize_vertex_source(&fragment)?;
        Ok(Self {
            vertex,
            fragment,
            vertex_origin: VertexOrigin::Synthesized,
        })
    }

    /// Reads, preprocesses and (if needed) completes the requested shader pair.
    ///
    /// A vertex path without a fragment path falls back to the built-in
    /// fragment shader.
    pub fn load(paths: &ShaderPaths) -> Result<Self, SourceError> {
        let fragment = match &paths.fragment {
            Some(path) => read_preprocessed(path)?,
            None if paths.vertex.is_none() => return Ok(Self::builtin()),
            None => DEFAULT_FRAGMENT_SOURCE.to_string(),
        };

        match &paths.vertex {
            Some(path) => Ok(Self {
                vertex: read_preprocessed(path)?,
                fragment,
                vertex_origin: VertexOrigin::File,
            }),
            None => Self::from_fragment(fragment),
        }
    }
}

/// Reads a shader file and expands its includes relative to its own directory.
pub fn read_preprocessed(path: &Path) -> Result<String, SourceError> {
    let raw = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    tracing::debug!(path = %path.display(), bytes = raw.len(), "read shader source");
    preprocess(&raw, base_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_paths_use_builtin_pair() {
        let sources = ShaderSources::load(&ShaderPaths::default()).unwrap();
        assert_eq!(sources, ShaderSources::builtin());
        assert!(ShaderPaths::default().is_default());
    }

    #[test]
    fn fragment_only_synthesizes_vertex() {
        let dir = TempDir::new().unwrap();
        let fragment = dir.path().join("shader.frag");
        fs::write(&fragment, "void main(){gl_FragColor=vec4(1.0);}").unwrap();

        let sources = ShaderSources::load(&ShaderPaths::new(Some(fragment), None)).unwrap();
        assert_eq!(sources.vertex_origin, VertexOrigin::Synthesized);
        assert!(sources.vertex.contains("attribute vec2 vertex;"));
        assert_eq!(sources.fragment, "void main(){gl_FragColor=vec4(1.0);}\n");
    }

    #[test]
    fn fragment_includes_are_expanded_before_synthesis() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("lib.glsl"), "uniform float time;").unwrap();
        let fragment = dir.path().join("shader.frag");
        fs::write(
            &fragment,
            "#version 140\n#pragma include \"lib.glsl\"\nout vec4 c;\nvoid main(){c=vec4(time);}",
        )
        .unwrap();

        let sources = ShaderSources::load(&ShaderPaths::new(Some(fragment), None)).unwrap();
        assert!(sources.fragment.contains("uniform float time;"));
        assert!(!sources.fragment.contains("#pragma include"));
        assert!(sources.vertex.starts_with("#version 140\nin vec2 vertex;"));
    }

    #[test]
    fn explicit_vertex_file_is_used_verbatim() {
        let dir = TempDir::new().unwrap();
        let fragment = dir.path().join("a.frag");
        let vertex = dir.path().join("a.vert");
        fs::write(&fragment, "void main(){}").unwrap();
        fs::write(&vertex, "attribute vec2 position;\nvoid main(){}").unwrap();

        let sources =
            ShaderSources::load(&ShaderPaths::new(Some(fragment), Some(vertex))).unwrap();
        assert_eq!(sources.vertex_origin, VertexOrigin::File);
        assert_eq!(sources.vertex, "attribute vec2 position;\nvoid main(){}\n");
    }

    #[test]
    fn missing_fragment_reports_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.frag");
        let err = ShaderSources::load(&ShaderPaths::new(Some(missing.clone()), None)).unwrap_err();
        match err {
            SourceError::Read { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
