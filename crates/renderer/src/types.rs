use std::fmt;
use std::str::FromStr;

use shadersource::ShaderPaths;
use thiserror::Error;

use crate::geometry::Shape;

/// An OpenGL `major.minor` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    /// Lowest version that knows about core/compatibility profiles.
    pub const PROFILES_MIN: GlVersion = GlVersion::new(3, 3);

    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Whether a core/compatibility profile can be requested for this version.
    pub fn supports_profiles(self) -> bool {
        self >= Self::PROFILES_MIN
    }
}

impl fmt::Display for GlVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionFormatError {
    #[error("GL version must be in format \"X.Y\" (got \"{0}\")")]
    Format(String),
    #[error("GL version \"{0}\" is not a valid number")]
    Number(String),
}

impl FromStr for GlVersion {
    type Err = VersionFormatError;

    /// Parses `X.Y` where both components are single decimal digits.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = value.as_bytes();
        if bytes.len() != 3 || bytes[1] != b'.' {
            return Err(VersionFormatError::Format(value.to_string()));
        }
        let digit = |byte: u8| {
            (byte as char)
                .to_digit(10)
                .map(|d| d as u8)
                .ok_or_else(|| VersionFormatError::Number(value.to_string()))
        };
        Ok(Self::new(digit(bytes[0])?, digit(bytes[2])?))
    }
}

/// How the context version should be chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionRequest {
    /// Let the platform pick; no version hint is passed.
    #[default]
    Default,
    /// Exactly this version, tried once.
    Specific(GlVersion),
    /// Highest version from the known list that the platform accepts.
    Maximum,
}

impl FromStr for VersionRequest {
    type Err = VersionFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "max" | "maximum" => Ok(Self::Maximum),
            other => other.parse().map(Self::Specific),
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRequest::Default => f.write_str("default"),
            VersionRequest::Specific(version) => version.fmt(f),
            VersionRequest::Maximum => f.write_str("max"),
        }
    }
}

/// OpenGL profile requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileRequest {
    #[default]
    Any,
    Core,
    Compatibility,
}

impl ProfileRequest {
    /// True for core/compatibility, which constrain the usable versions.
    pub fn is_explicit(self) -> bool {
        !matches!(self, ProfileRequest::Any)
    }
}

impl fmt::Display for ProfileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileRequest::Any => f.write_str("any"),
            ProfileRequest::Core => f.write_str("core"),
            ProfileRequest::Compatibility => f.write_str("compatibility"),
        }
    }
}

/// Everything the negotiator needs to know about the desired context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextRequest {
    pub version: VersionRequest,
    pub profile: ProfileRequest,
    /// Ask for a debug context and forward driver messages to the log.
    pub debug: bool,
}

/// Immutable configuration passed to the renderer at start-up.
///
/// Built once by the CLI and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub context: ContextRequest,
    pub window_title: String,
    /// Initial inner window size in physical pixels.
    pub window_size: (u32, u32),
    pub initial_shape: Shape,
    /// Shader files, re-read when the user asks for a reload.
    pub shader_paths: ShaderPaths,
    /// Print the GL strings after context creation and stop.
    pub info_only: bool,
}

impl Default for RendererConfig {
    /// A 400x400 window rendering the built-in shader on a quad.
    fn default() -> Self {
        Self {
            context: ContextRequest::default(),
            window_title: "Shader Test".to_string(),
            window_size: (400, 400),
            initial_shape: Shape::Quad,
            shader_paths: ShaderPaths::default(),
            info_only: false,
        }
    }
}
