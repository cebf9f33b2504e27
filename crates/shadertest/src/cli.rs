use std::path::PathBuf;

use clap::Parser;
use renderer::{ContextRequest, ProfileRequest, RendererConfig, Shape, VersionRequest};
use shadersource::ShaderPaths;

#[derive(Parser, Debug)]
#[command(
    name = "shadertest",
    author,
    version,
    about = "Render a GLSL fragment shader in an OpenGL window",
    after_help = "Keys: Ctrl+Q/Ctrl+W/Alt+F4 quit, Ctrl+R reset size, F11 fullscreen, \
                  Space/Ctrl+P pause, Alt+1/2/3 quad/triangle/rectangle, Ctrl+L reload shaders"
)]
pub struct Cli {
    /// Fragment shader to render; the built-in shader pair is used when omitted.
    #[arg(value_name = "FRAGMENT")]
    pub fragment: Option<PathBuf>,

    /// Vertex shader to pair with FRAGMENT instead of a synthesized pass-through.
    #[arg(long, value_name = "PATH", requires = "fragment")]
    pub vertex_shader: Option<PathBuf>,

    /// Print the OpenGL version, GLSL version, vendor and renderer, then exit.
    #[arg(long)]
    pub info_only: bool,

    /// OpenGL version to request: `X.Y`, `max` or `default`.
    #[arg(
        long = "gl",
        value_name = "X.Y|max|default",
        env = "SHADERTEST_GL",
        value_parser = parse_gl_request,
        default_value = "default"
    )]
    pub gl: VersionRequest,

    /// Request a core profile (needs --gl=3.3 or newer, or --gl=max).
    #[arg(long, conflicts_with = "compat")]
    pub core: bool,

    /// Request a compatibility profile (needs --gl=3.3 or newer, or --gl=max).
    #[arg(long)]
    pub compat: bool,

    /// Window title.
    #[arg(long, default_value = "Shader Test")]
    pub title: String,

    /// Initial window size.
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_window_size,
        default_value = "400x400"
    )]
    pub size: (u32, u32),

    /// Initial geometry: `quad`, `triangle` or `rectangle`.
    #[arg(long, value_parser = parse_shape, default_value = "quad")]
    pub shape: Shape,

    /// Print the final vertex and fragment sources before running.
    #[arg(long)]
    pub echo: bool,

    /// Request a debug context and log driver debug messages.
    #[arg(long)]
    pub debug_context: bool,
}

impl Cli {
    pub fn profile(&self) -> ProfileRequest {
        if self.core {
            ProfileRequest::Core
        } else if self.compat {
            ProfileRequest::Compatibility
        } else {
            ProfileRequest::Any
        }
    }

    pub fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            context: ContextRequest {
                version: self.gl,
                profile: self.profile(),
                debug: self.debug_context,
            },
            window_title: self.title.clone(),
            window_size: self.size,
            initial_shape: self.shape,
            shader_paths: ShaderPaths::new(self.fragment.clone(), self.vertex_shader.clone()),
            info_only: self.info_only,
        }
    }
}

/// Parses the process arguments; help and version requests come back as
/// errors too so the caller controls the exit code.
pub fn parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

pub fn parse_gl_request(value: &str) -> Result<VersionRequest, String> {
    if value.trim().is_empty() {
        return Err("GL version must not be empty".to_string());
    }
    value.parse().map_err(|err| format!("{err}"))
}

pub fn parse_window_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT (e.g. 640x480)".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid window width '{w}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid window height '{h}'"))?;
    if width == 0 || height == 0 {
        return Err("window size must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_shape(value: &str) -> Result<Shape, String> {
    value.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::GlVersion;

    fn parse_from(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("shadertest").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_match_builtin_configuration() {
        let cli = parse_from(&[]).unwrap();
        let config = cli.renderer_config();
        assert_eq!(config.window_title, "Shader Test");
        assert_eq!(config.window_size, (400, 400));
        assert_eq!(config.initial_shape, Shape::Quad);
        assert!(config.shader_paths.is_default());
        assert_eq!(config.context.profile, ProfileRequest::Any);
    }

    #[test]
    fn gl_flag_accepts_versions_and_keywords() {
        let cli = parse_from(&["--gl=3.3", "--core", "shader.frag"]).unwrap();
        assert_eq!(cli.gl, VersionRequest::Specific(GlVersion::new(3, 3)));
        assert_eq!(cli.profile(), ProfileRequest::Core);
        assert_eq!(cli.fragment, Some(PathBuf::from("shader.frag")));

        let cli = parse_from(&["--gl", "max", "--compat"]).unwrap();
        assert_eq!(cli.gl, VersionRequest::Maximum);
        assert_eq!(cli.profile(), ProfileRequest::Compatibility);

        assert!(parse_from(&["--gl=33"]).is_err());
        assert!(parse_from(&["--gl=x.y"]).is_err());
    }

    #[test]
    fn core_and_compat_conflict() {
        assert!(parse_from(&["--core", "--compat"]).is_err());
    }

    #[test]
    fn vertex_shader_requires_fragment() {
        assert!(parse_from(&["--vertex-shader", "pass.vert"]).is_err());
        let cli = parse_from(&["--vertex-shader", "pass.vert", "main.frag"]).unwrap();
        let paths = cli.renderer_config().shader_paths;
        assert_eq!(paths.vertex, Some(PathBuf::from("pass.vert")));
    }

    #[test]
    fn window_size_parser() {
        assert_eq!(parse_window_size("640x480"), Ok((640, 480)));
        assert_eq!(parse_window_size("800X600"), Ok((800, 600)));
        assert!(parse_window_size("640").is_err());
        assert!(parse_window_size("0x480").is_err());
        assert!(parse_window_size("wide x tall").is_err());
    }

    #[test]
    fn shape_flag() {
        let cli = parse_from(&["--shape", "rectangle"]).unwrap();
        assert_eq!(cli.shape, Shape::Rectangle);
        assert!(parse_from(&["--shape", "circle"]).is_err());
    }
}
