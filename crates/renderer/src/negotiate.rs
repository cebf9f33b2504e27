//! OpenGL context version negotiation.
//!
//! Turns a [`ContextRequest`] into an ordered list of [`ContextAttempt`]s and
//! walks it with a caller-supplied creation closure until one succeeds. The
//! closure is the only part that touches the platform, which keeps the
//! ordering and validation rules testable without a display.
use std::fmt;

use crate::error::ContextError;
use crate::types::{ContextRequest, GlVersion, ProfileRequest, VersionRequest};

/// Versions tried by [`VersionRequest::Maximum`], best first.
pub const CANDIDATE_VERSIONS: [GlVersion; 13] = [
    GlVersion::new(4, 6),
    GlVersion::new(4, 5),
    GlVersion::new(4, 4),
    GlVersion::new(4, 3),
    GlVersion::new(4, 2),
    GlVersion::new(4, 1),
    GlVersion::new(4, 0),
    GlVersion::new(3, 3),
    GlVersion::new(3, 2),
    GlVersion::new(3, 1),
    GlVersion::new(3, 0),
    GlVersion::new(2, 1),
    GlVersion::new(2, 0),
];

/// One concrete set of context hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextAttempt {
    /// `None` leaves the version to the platform.
    pub version: Option<GlVersion>,
    pub profile: ProfileRequest,
}

impl ContextAttempt {
    pub fn new(version: Option<GlVersion>, profile: ProfileRequest) -> Self {
        Self { version, profile }
    }
}

impl fmt::Display for ContextAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.version {
            Some(version) => write!(f, "OpenGL {version}")?,
            None => f.write_str("OpenGL (platform default)")?,
        }
        if self.profile.is_explicit() {
            write!(f, " {}", self.profile)?;
        }
        Ok(())
    }
}

/// Checks the request without touching the platform.
///
/// Core/compatibility profiles only exist from GL 3.3 on, so they must be
/// paired with an explicit version of at least 3.3 or with `max`.
pub fn validate(request: &ContextRequest) -> Result<(), ContextError> {
    if !request.profile.is_explicit() {
        return Ok(());
    }
    let valid = match request.version {
        VersionRequest::Specific(version) => version.supports_profiles(),
        VersionRequest::Maximum => true,
        VersionRequest::Default => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ContextError::InvalidProfileRequest {
            profile: request.profile,
            requested: request.version.to_string(),
        })
    }
}

/// Expands a validated request into the attempts to make, in order.
pub fn plan(request: &ContextRequest) -> Result<Vec<ContextAttempt>, ContextError> {
    validate(request)?;
    let profile = request.profile;
    let attempts = match request.version {
        VersionRequest::Default => vec![ContextAttempt::new(None, profile)],
        VersionRequest::Specific(version) => vec![ContextAttempt::new(Some(version), profile)],
        VersionRequest::Maximum => CANDIDATE_VERSIONS
            .iter()
            .copied()
            .filter(|version| !profile.is_explicit() || version.supports_profiles())
            .map(|version| ContextAttempt::new(Some(version), profile))
            .collect(),
    };
    Ok(attempts)
}

/// Runs `create` for each planned attempt until one succeeds.
///
/// Only [`VersionRequest::Maximum`] ever makes more than one attempt; a
/// specific or default request fails on its first rejection.
pub fn negotiate<T, E, F>(
    request: &ContextRequest,
    mut create: F,
) -> Result<(T, ContextAttempt), ContextError>
where
    E: fmt::Display,
    F: FnMut(&ContextAttempt) -> Result<T, E>,
{
    let attempts = plan(request)?;
    for attempt in &attempts {
        tracing::info!("trying {attempt} ...");
        match create(attempt) {
            Ok(value) => {
                tracing::info!(%attempt, "context created");
                return Ok((value, *attempt));
            }
            Err(err) => {
                tracing::debug!(%attempt, error = %err, "context creation rejected");
            }
        }
    }
    Err(ContextError::WindowCreationFailed { attempts })
}
