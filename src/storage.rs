//! File persistence for container files.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use getrandom::fill;

use crate::error::ContainerError;

/// Reads and writes container files on disk.
///
/// Saves go through a temporary file and an atomic rename so a crash mid-write
/// leaves either the previous container or the new one in place, never a
/// truncated file.
#[derive(Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns `true` if the container file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads the whole container into memory.
    pub fn load(&self) -> Result<Vec<u8>, ContainerError> {
        Ok(fs::read(&self.path)?)
    }

    /// Saves container bytes atomically.
    ///
    /// Writes to a randomly named temporary file in the target directory,
    /// fsyncs it, renames it over the destination, then fsyncs the directory
    /// so the rename itself is durable. Creates parent directories as needed.
    pub fn save(&self, data: &[u8]) -> Result<(), ContainerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = self.random_tmp_path()?;

        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;

        tmp_file.write_all(data)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        if let Err(e) = self.atomic_replace(&tmp_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Some(parent) = self.path.parent() {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }

        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unique sibling path for the in-flight write: `name.tmp.<randomhex>`.
    fn random_tmp_path(&self) -> Result<PathBuf, ContainerError> {
        let mut buf = [0u8; 8];
        fill(&mut buf).map_err(|_| {
            ContainerError::Io(std::io::Error::other("OS random generator unavailable"))
        })?;

        let suffix = buf.iter().map(|b| format!("{b:02x}")).collect::<String>();

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "container".to_owned());

        Ok(self.path.with_file_name(format!("{file_name}.tmp.{suffix}")))
    }

    /// Replaces the destination with the temporary file.
    ///
    /// Windows `rename` over an existing file is not atomic; `ReplaceFileW`
    /// with write-through is.
    #[cfg(target_os = "windows")]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<(), ContainerError> {
        use std::ffi::OsStr;
        use std::os::windows::ffi::OsStrExt;
        use windows_sys::Win32::Storage::FileSystem::{REPLACEFILE_WRITE_THROUGH, ReplaceFileW};

        // ReplaceFileW fails if the destination does not exist yet.
        if !self.path.exists() {
            fs::rename(tmp_path, &self.path)?;
            return Ok(());
        }

        fn to_wide(s: &OsStr) -> Vec<u16> {
            s.encode_wide().chain(std::iter::once(0)).collect()
        }

        let target_w = to_wide(self.path.as_os_str());
        let tmp_w = to_wide(tmp_path.as_os_str());

        // SAFETY:
        // - Strings are valid UTF-16 and null-terminated
        // - Pointers remain valid during the call
        // - Windows does not retain the pointers after return
        let result = unsafe {
            ReplaceFileW(
                target_w.as_ptr(),
                tmp_w.as_ptr(),
                std::ptr::null(),
                REPLACEFILE_WRITE_THROUGH,
                std::ptr::null(),
                std::ptr::null(),
            )
        };

        if result == 0 {
            return Err(std::io::Error::last_os_error().into());
        }

        Ok(())
    }

    /// On Unix, `rename()` is atomic when both paths share a filesystem.
    #[cfg(not(target_os = "windows"))]
    fn atomic_replace(&self, tmp_path: &Path) -> Result<(), ContainerError> {
        fs::rename(tmp_path, &self.path)?;
        Ok(())
    }
}
