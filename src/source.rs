use std::fs;
use std::path::PathBuf;

use crate::Result;

/// Supplies `(file name, content)` pairs for candidate migration scripts.
///
/// The locator only needs names and text; where they come from (a directory,
/// an embedded bundle, a test fixture) is the source's business.
pub trait ScriptSource {
    fn scripts(&self) -> Result<Vec<(String, String)>>;
}

/// Reads candidate scripts from a flat directory.
///
/// Only regular files with a `.sql` extension are candidates; everything
/// else, including subdirectories, is ignored. Candidate names must follow
/// `V<version>__<description>.sql` or the run fails (see [`crate::script`]).
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ScriptSource for DirSource {
    fn scripts(&self) -> Result<Vec<(String, String)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("sql") {
                continue;
            }
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let content = fs::read_to_string(&path)?;
            entries.push((name, content));
        }
        Ok(entries)
    }
}
