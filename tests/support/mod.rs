//! Shared test utilities.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

pub mod runtime;

/// Temporary directory with a UTF-8 root path.
pub struct Workspace {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    /// Root of the temporary directory.
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }
}

/// Creates a temporary workspace for file output.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created or is not UTF-8.
pub fn create_workspace() -> Workspace {
    let temp =
        TempDir::new().unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"));
    let root = Utf8Path::from_path(temp.path())
        .unwrap_or_else(|| panic!("temporary directory is not UTF-8: {}", temp.path().display()))
        .to_path_buf();
    Workspace { _temp: temp, root }
}
