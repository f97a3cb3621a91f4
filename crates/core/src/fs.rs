//! Filesystem checks

use std::path::Path;

/// Check if a path points at a regular file (the dataset must be one)
pub fn is_file(path: &str) -> bool {
    Path::new(path).is_file()
}
