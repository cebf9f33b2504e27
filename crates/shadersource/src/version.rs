//! Parsing of the GLSL `#version` directive and the qualifier style it implies.
//!
//! Shaders written for GLSL 1.30+ (desktop) or ESSL 3.00+ declare stage inputs
//! with `in`/`out`; older dialects use `attribute`/`varying`. The synthesized
//! vertex shader has to match the fragment shader's dialect or the link fails.
use std::fmt;

use crate::SourceError;

/// Desktop GLSL versions that still use `attribute`/`varying`.
///
/// `100` is technically ESSL but is accepted here without the `es` suffix since
/// that is how most hand-written test shaders spell it.
const LEGACY_DESKTOP: &[u32] = &[100, 110, 120];

/// Desktop GLSL versions that use `in`/`out`.
const MODERN_DESKTOP: &[u32] = &[130, 140, 150, 330, 400, 410, 420, 430, 440, 450, 460];

/// ESSL versions (with the `es` suffix) that use `in`/`out`.
const MODERN_ES: &[u32] = &[300, 310, 320];

/// A parsed `#version NNN [es|core|compatibility]` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionDirective {
    /// The directive exactly as written, minus trailing whitespace.
    pub line: String,
    pub number: u32,
    pub es: bool,
}

impl VersionDirective {
    /// Parses a single source line.
    ///
    /// Returns `Ok(None)` when the line is not a `#version` directive at all and
    /// an error when it is one but names no usable number.
    pub fn parse(line: &str) -> Result<Option<Self>, SourceError> {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix("#version") else {
            return Ok(None);
        };

        let mut tokens = rest.split_whitespace();
        let number = tokens
            .next()
            .and_then(|token| token.parse::<u32>().ok())
            .ok_or_else(|| SourceError::InvalidShaderVersion(trimmed.to_string()))?;
        let es = matches!(tokens.next(), Some("es"));

        Ok(Some(Self {
            line: line.trim_end().to_string(),
            number,
            es,
        }))
    }

    /// Whether this dialect declares stage inputs with `in`/`out`.
    pub fn uses_modern_io(&self) -> Result<bool, SourceError> {
        let known_modern = if self.es {
            MODERN_ES.contains(&self.number)
        } else {
            MODERN_DESKTOP.contains(&self.number)
        };
        if known_modern {
            return Ok(true);
        }
        if !self.es && LEGACY_DESKTOP.contains(&self.number) {
            return Ok(false);
        }
        Err(SourceError::InvalidShaderVersion(self.line.trim().to_string()))
    }
}

impl fmt::Display for VersionDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.line.trim())
    }
}

/// Classifies the first line of a shader source.
///
/// A source without a `#version` directive is legacy GLSL 1.10.
pub fn uses_modern_io(first_line: &str) -> Result<bool, SourceError> {
    match VersionDirective::parse(first_line)? {
        Some(directive) => directive.uses_modern_io(),
        None => Ok(false),
    }
}
