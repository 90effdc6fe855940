//! File Store
//!
//! Root-directory file access shared by every server session.
//!
//! ## Responsibilities
//! - Create the root directory on startup
//! - Resolve bare filenames against the root, rejecting anything that
//!   would escape it
//! - Serialize concurrent uploads of the same name (advisory reservation
//!   + temp-file rename, so a reader never observes a half-written file)
//! - Enumerate the root for LIST
//!
//! ## Concurrency:
//! - `in_flight`: names currently being uploaded, protected by a Mutex
//! - All methods use `&self`; the store is shared across sessions via `Arc`

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

/// Shared access to the server's root directory
pub struct FileStore {
    /// Directory all operations are rooted at
    root: PathBuf,

    /// Names reserved by uploads that have been accepted but not yet
    /// committed. A PUT of a reserved name is rejected exactly like a
    /// PUT of a name already on disk.
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self {
            root,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        })
    }

    /// Get the root directory path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `name` is a bare filename this store will touch.
    ///
    /// The protocol serves a single flat directory, so anything with a
    /// path separator or a relative component is out of bounds.
    pub fn valid_name(name: &str) -> bool {
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('/')
            && !name.contains('\\')
            && !name.contains('\0')
    }

    /// Read a file's full contents
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` — file present
    /// - `Ok(None)` — file absent, or the name is invalid
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        if !Self::valid_name(name) {
            return Ok(None);
        }

        match fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a file of this name exists under the root
    pub fn contains(&self, name: &str) -> bool {
        Self::valid_name(name) && self.root.join(name).is_file()
    }

    /// Begin an upload of `name`
    ///
    /// Returns `None` when the upload must be rejected: the name is
    /// invalid, already on disk, or reserved by a concurrent upload.
    /// Otherwise the name is reserved and a [`PutGuard`] is returned;
    /// the reservation lasts until the guard commits or is dropped.
    pub fn begin_put(&self, name: &str) -> Option<PutGuard> {
        if !Self::valid_name(name) {
            return None;
        }

        let mut in_flight = self.in_flight.lock();
        if in_flight.contains(name) || self.root.join(name).exists() {
            return None;
        }
        in_flight.insert(name.to_string());

        Some(PutGuard {
            name: name.to_string(),
            root: self.root.clone(),
            in_flight: Arc::clone(&self.in_flight),
        })
    }

    /// Enumerate the immediate regular files of the root, sorted by name
    ///
    /// Hidden (dot-prefixed) entries are skipped; that also keeps the
    /// temp files of in-flight uploads out of listings.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }

        names.sort();
        Ok(names)
    }
}

/// Render directory entries as the LIST reply text
///
/// One `- name` line per entry, joined by newlines.
pub fn render_listing(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reservation of a filename for one in-flight upload
///
/// Created by [`FileStore::begin_put`]. Dropping the guard without
/// committing releases the reservation, so an aborted session never
/// blocks later uploads of the same name.
pub struct PutGuard {
    name: String,
    root: PathBuf,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl PutGuard {
    /// The reserved filename
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Write the uploaded bytes and make the file visible
    ///
    /// The payload goes to a dot-prefixed temp file first and is renamed
    /// into place, so a concurrent GET sees either nothing or the whole
    /// file.
    pub fn commit(self, bytes: &[u8]) -> Result<()> {
        let tmp_path = self.root.join(format!(".{}.part", self.name));
        let final_path = self.root.join(&self.name);

        if let Err(e) = fs::write(&tmp_path, bytes).and_then(|_| fs::rename(&tmp_path, &final_path))
        {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl Drop for PutGuard {
    fn drop(&mut self) {
        self.in_flight.lock().remove(&self.name);
    }
}
