//! Size-capped append-only file with numbered backups.
//!
//! When appending a line would push the file past its size limit, the file is shifted
//! to `<name>.1`, every older backup moves up by one, and anything beyond the
//! retention count is deleted:
//!
//! ```text
//! spans.jsonl → spans.jsonl.1 → spans.jsonl.2 → spans.jsonl.3 → (deleted)
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_BACKUPS: usize = 3;

struct Current {
    file: File,
    len: u64,
}

pub struct RotatingFile {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    current: Mutex<Option<Current>>,
}

impl RotatingFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self::with_limits(path, DEFAULT_MAX_BYTES, DEFAULT_BACKUPS)
    }

    #[must_use]
    pub const fn with_limits(path: PathBuf, max_bytes: u64, backups: usize) -> Self {
        Self {
            path,
            max_bytes,
            backups,
            current: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` plus a newline, rotating first if the limit would be exceeded.
    ///
    /// A single line longer than the limit is still written, to a fresh file.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if rotating, opening or writing fails.
    pub fn append_line(&self, line: &str) -> io::Result<()> {
        let mut guard = self
            .current
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "trace file lock poisoned"))?;

        let incoming = line.len() as u64 + 1;
        let mut current = match guard.take() {
            Some(current) => current,
            None => self.open()?,
        };

        if current.len > 0 && current.len + incoming > self.max_bytes {
            drop(current);
            self.shift_backups()?;
            current = self.open()?;
        }

        writeln!(current.file, "{line}")?;
        current.file.flush()?;
        current.len += incoming;
        *guard = Some(current);
        Ok(())
    }

    fn open(&self) -> io::Result<Current> {
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let len = file.metadata()?.len();
        Ok(Current { file, len })
    }

    fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(format!(".{index}"));
        PathBuf::from(name)
    }

    fn shift_backups(&self) -> io::Result<()> {
        if self.backups == 0 {
            return fs::remove_file(&self.path);
        }

        let oldest = self.backup_path(self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let from = self.backup_path(index);
            if from.exists() {
                fs::rename(&from, self.backup_path(index + 1))?;
            }
        }
        fs::rename(&self.path, self.backup_path(1))
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("max_bytes", &self.max_bytes)
            .field("backups", &self.backups)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    #[test]
    fn appends_lines_below_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let file = RotatingFile::with_limits(path.clone(), 100, 2);

        file.append_line("a").unwrap();
        file.append_line("b").unwrap();

        assert_eq!(read(&path), "a\nb\n");
    }

    #[test]
    fn rotates_into_numbered_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let file = RotatingFile::with_limits(path.clone(), 8, 2);

        for line in ["one", "two", "three", "four"] {
            file.append_line(line).unwrap();
        }

        assert_eq!(read(&path), "four\n");
        assert_eq!(read(&file.backup_path(1)), "three\n");
        assert_eq!(read(&file.backup_path(2)), "one\ntwo\n");
        assert!(!file.backup_path(3).exists());
    }

    #[test]
    fn oldest_backup_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        let file = RotatingFile::with_limits(path.clone(), 4, 1);

        for line in ["aaa", "bbb", "ccc"] {
            file.append_line(line).unwrap();
        }

        assert_eq!(read(&path), "ccc\n");
        assert_eq!(read(&file.backup_path(1)), "bbb\n");
        assert!(!file.backup_path(2).exists());
    }

    #[test]
    fn resumes_size_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spans.jsonl");
        fs::write(&path, "0123456\n").unwrap();
        let file = RotatingFile::with_limits(path.clone(), 10, 1);

        file.append_line("next").unwrap();

        assert_eq!(read(&path), "next\n");
        assert_eq!(read(&file.backup_path(1)), "0123456\n");
    }
}
