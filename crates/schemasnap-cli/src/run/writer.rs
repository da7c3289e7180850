use std::collections::BTreeMap;
use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use schemasnap_core::{ArtifactKind, ArtifactWriter, Error, Result};

/// Writes artifacts into a directory, one file per artifact.
#[derive(Debug, Clone)]
pub struct FsArtifactWriter {
    dir: PathBuf,
    names: BTreeMap<ArtifactKind, String>,
}

impl FsArtifactWriter {
    /// Writer using the default file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            names: BTreeMap::new(),
        }
    }

    /// Override the file name used for some artifacts.
    pub fn with_names(mut self, names: BTreeMap<ArtifactKind, String>) -> Self {
        self.names.extend(names);
        self
    }

    pub fn path_for(&self, kind: ArtifactKind) -> PathBuf {
        let name = self
            .names
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_file_name());
        self.dir.join(name)
    }
}

impl ArtifactWriter for FsArtifactWriter {
    fn write(&self, kind: ArtifactKind, content: &str) -> Result<()> {
        let path = self.path_for(kind);
        write_bytes_atomic(&path, content.as_bytes()).map_err(|err| Error::Write {
            artifact: kind.name().to_string(),
            message: format!("{}: {err}", path.display()),
        })
    }
}

/// Write `data` to a sibling temp file, sync it, then rename over `path`.
/// Readers see either the old content or the new content, never a mix.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path)?;
    let result = (|| {
        let mut file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&tmp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        std::fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid artifact path: {}", path.display()),
        )
    })?;
    let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
    Ok(path.with_file_name(tmp_name))
}
