use anyhow::{Context, Result};
use renderer::Renderer;
use shadersource::{ShaderSources, VertexOrigin};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let config = cli.renderer_config();
    renderer::validate(&config.context).context("invalid OpenGL context request")?;

    let sources = if config.info_only {
        None
    } else {
        let sources =
            ShaderSources::load(&config.shader_paths).context("failed to load shaders")?;
        tracing::debug!(
            fragment = ?config.shader_paths.fragment,
            vertex_origin = ?sources.vertex_origin,
            "shader sources ready"
        );
        if cli.echo {
            print!("{}", echo_sources(&sources));
        }
        Some(sources)
    };

    tracing::info!(
        gl = %config.context.version,
        profile = %config.context.profile,
        size = ?config.window_size,
        shape = %config.initial_shape,
        "starting shadertest"
    );
    Renderer::new(config).run(sources)
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn echo_sources(sources: &ShaderSources) -> String {
    let origin = match sources.vertex_origin {
        VertexOrigin::BuiltIn => "built-in",
        VertexOrigin::File => "file",
        VertexOrigin::Synthesized => "synthesized",
    };
    let mut out = format!("// vertex shader ({origin})\n{}", sources.vertex);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("// fragment shader\n");
    out.push_str(&sources.fragment);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
