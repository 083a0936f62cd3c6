//! Writing the config state back to disk.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use schemaconf_core::{Result, SchemaconfError};

use crate::config::Config;

impl Config {
    /// Serialize the state to its recorded file, or to `path`.
    ///
    /// An explicit `path` becomes the recorded target for later saves. The
    /// recorded format is kept for file-backed state; state loaded from a
    /// mapping takes the format implied by the target's extension. The
    /// state itself is never modified.
    ///
    /// Returns the path written.
    ///
    /// # Errors
    ///
    /// [`SchemaconfError::Config`] if there is no target to write to or
    /// the target's extension is unsupported.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf> {
        let mut descriptor = self.source.clone();
        if let Some(path) = path {
            descriptor.retarget(path)?;
        }
        let (Some(format), Some(target)) = (descriptor.format(), descriptor.path()) else {
            return Err(SchemaconfError::config(
                "no save target: config was loaded from a mapping and no path was given",
            ));
        };

        let text = format.serialize(&self.state)?;
        write_atomic(target, text.as_bytes())?;
        tracing::debug!(path = %target.display(), %format, "config saved");

        let target = target.to_path_buf();
        self.source = descriptor;
        Ok(target)
    }
}

/// Replace `path` with `bytes` via a sibling temp file and a rename, so
/// readers never observe a partially written file.
///
/// An existing target's permissions carry over to the replacement.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    match fs::metadata(path) {
        Ok(meta) => tmp.as_file().set_permissions(meta.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
