use std::fmt;

use thiserror::Error;

use crate::gl::ShaderStage;
use crate::negotiate::ContextAttempt;
use crate::types::{GlVersion, ProfileRequest};

/// Failures while bringing up the window and its GL context.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(
        "{profile} profile requires an explicit GL version >= {min} (requested {requested})",
        min = GlVersion::PROFILES_MIN
    )]
    InvalidProfileRequest {
        profile: ProfileRequest,
        requested: String,
    },

    #[error("cannot initialize the windowing system: {0}")]
    ContextInitFailed(String),

    #[error("cannot create an OpenGL window (tried {})", AttemptList(.attempts))]
    WindowCreationFailed { attempts: Vec<ContextAttempt> },

    #[error("a window session is already active")]
    SessionActive,
}

struct AttemptList<'a>(&'a [ContextAttempt]);

impl fmt::Display for AttemptList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("no candidates");
        }
        for (index, attempt) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            attempt.fmt(f)?;
        }
        Ok(())
    }
}

/// Info logs captured from a failed link.
///
/// Any of the logs may be empty; drivers often report a compile error only in
/// the stage log and leave the program log blank, or the other way round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub struct ShaderLinkError {
    pub program_log: String,
    pub vertex_log: String,
    pub fragment_log: String,
}

impl fmt::Display for ShaderLinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("error creating shader program")?;
        for (label, log) in [
            ("program linker", &self.program_log),
            ("vertex shader compiler", &self.vertex_log),
            ("fragment shader compiler", &self.fragment_log),
        ] {
            let log = log.trim();
            if !log.is_empty() {
                write!(f, "\n{label}: {log}")?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("cannot create {stage} shader object: {message}")]
    CreateShader { stage: ShaderStage, message: String },

    #[error("cannot create program object: {0}")]
    CreateProgram(String),

    #[error(transparent)]
    Link(#[from] ShaderLinkError),
}

#[derive(Debug, Error)]
#[error("cannot allocate {what}: {message}")]
pub struct GeometryError {
    pub what: &'static str,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GlVersion;

    #[test]
    fn link_error_lists_non_empty_logs() {
        let err = ShaderLinkError {
            program_log: "link failed".into(),
            vertex_log: String::new(),
            fragment_log: "0:1: syntax error\n".into(),
        };
        let message = err.to_string();
        assert!(message.contains("program linker: link failed"));
        assert!(message.contains("fragment shader compiler: 0:1: syntax error"));
        assert!(!message.contains("vertex shader compiler"));
    }

    #[test]
    fn creation_failure_lists_attempts() {
        let err = ContextError::WindowCreationFailed {
            attempts: vec![
                ContextAttempt::new(Some(GlVersion::new(4, 6)), ProfileRequest::Core),
                ContextAttempt::new(Some(GlVersion::new(3, 3)), ProfileRequest::Core),
            ],
        };
        assert_eq!(
            err.to_string(),
            "cannot create an OpenGL window (tried OpenGL 4.6 core, OpenGL 3.3 core)"
        );
    }

    #[test]
    fn invalid_profile_message_names_minimum() {
        let err = ContextError::InvalidProfileRequest {
            profile: ProfileRequest::Core,
            requested: "2.0".into(),
        };
        assert_eq!(
            err.to_string(),
            "core profile requires an explicit GL version >= 3.3 (requested 2.0)"
        );
    }
}
