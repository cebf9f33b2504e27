use crate::version::VersionDirective;
use crate::SourceError;

/// Builds a pass-through vertex shader matching the fragment shader's dialect.
///
/// The fragment shader's `#version` line (if it starts with one) is copied
/// verbatim so both stages compile under the same GLSL version; the input is a
/// single `vec2 vertex` written straight to `gl_Position`.
pub fn synthesize_vertex_source(fragment_source: &str) -> Result<String, SourceError> {
    let first_line = fragment_source.lines().next().unwrap_or_default();
    let directive = VersionDirective::parse(first_line)?;

    let mut vertex = String::new();
    let modern = match &directive {
        Some(directive) => {
            vertex.push_str(&directive.line);
            vertex.push('\n');
            directive.uses_modern_io()?
        }
        None => false,
    };

    vertex.push_str(if modern {
        "in vec2 vertex;\n"
    } else {
        "attribute vec2 vertex;\n"
    });
    vertex.push_str("void main() {\n  gl_Position = vec4(vertex, 0., 1.);\n}\n");

    tracing::trace!(
        version = directive.as_ref().map(|d| d.number),
        modern,
        "synthesized pass-through vertex shader"
    );
    Ok(vertex)
}
