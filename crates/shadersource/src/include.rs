//! `#pragma include "<path>"` expansion.
//!
//! Includes are resolved relative to the directory of the file that contains
//! them and spliced in verbatim. Expansion is a single pass: directives inside
//! an included file are left untouched.
use std::fs;
use std::path::{Path, PathBuf};

use crate::SourceError;

const INCLUDE_PRAGMA: &str = "#pragma include";

/// Expands every include directive in `source`.
///
/// `base_dir` is the directory relative paths are resolved against; an empty
/// path means the current working directory.
pub fn preprocess(source: &str, base_dir: &Path) -> Result<String, SourceError> {
    let mut output = String::with_capacity(source.len());

    for (index, line) in source.lines().enumerate() {
        let Some(target) = include_target(line) else {
            output.push_str(line);
            output.push('\n');
            continue;
        };

        let path = base_dir.join(target);
        let contents = fs::read_to_string(&path).map_err(|source| SourceError::Include {
            line: index + 1,
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), line = index + 1, "expanded shader include");

        for included in contents.lines() {
            output.push_str(included);
            output.push('\n');
        }
    }

    Ok(output)
}

/// Returns the referenced path when `line` is an include directive.
fn include_target(line: &str) -> Option<PathBuf> {
    let rest = line.trim().strip_prefix(INCLUDE_PRAGMA)?;
    let target = rest.trim().trim_matches('"');
    if target.is_empty() {
        return None;
    }
    Some(PathBuf::from(target))
}
