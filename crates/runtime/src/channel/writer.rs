//! Publishing side of a channel.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ChannelError, ChannelStats, Result};

/// Replaces the slot's content atomically on every publish.
///
/// The record is written to a sibling temporary file and renamed over the
/// visible path, so a concurrent reader sees either the previous record or
/// the new one, never a prefix. No lock is taken.
#[derive(Debug)]
pub struct ChannelWriter {
    path: PathBuf,
    temp_path: PathBuf,
    dir_ready: bool,
    stats: ChannelStats,
}

impl ChannelWriter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let temp_path = temp_path_for(&path);
        Self {
            path,
            temp_path,
            dir_ready: false,
            stats: ChannelStats::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn stats(&self) -> &ChannelStats {
        &self.stats
    }

    /// Publishes one full record, replacing whatever the slot held.
    pub fn publish(&mut self, text: &str) -> Result<()> {
        match self.write_atomic(text) {
            Ok(()) => {
                self.stats.record_success();
                Ok(())
            }
            Err(err) => {
                self.stats.record_error(err.kind());
                Err(err)
            }
        }
    }

    fn write_atomic(&mut self, text: &str) -> Result<()> {
        if !self.dir_ready {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| ChannelError::io(parent, e))?;
            }
            self.dir_ready = true;
        }

        fs::write(&self.temp_path, text).map_err(|e| ChannelError::io(&self.temp_path, e))?;

        // Atomic replace; also overwrites an existing target on Windows.
        fs::rename(&self.temp_path, &self.path).map_err(|e| ChannelError::io(&self.path, e))?;

        tracing::debug!("Published {} bytes to {}", text.len(), self.path.display());

        Ok(())
    }
}

/// `state.json` -> `state.json.tmp`, in the same directory so the rename
/// never crosses filesystems.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("channel"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn publish_replaces_the_whole_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("action.json");
        let mut writer = ChannelWriter::new(&path);

        writer.publish("first record, longer").unwrap();
        writer.publish("second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!temp_path_for(&path).exists());
        assert_eq!(writer.stats().successes, 2);
    }

    #[test]
    fn missing_parent_directories_are_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mods").join("learner").join("state.json");
        let mut writer = ChannelWriter::new(&path);

        writer.publish("{}").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn failures_are_counted_and_returned() {
        let dir = TempDir::new().unwrap();
        // The target is a directory, so the rename cannot replace it.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let mut writer = ChannelWriter::new(&path);
        let err = writer.publish("{}").unwrap_err();

        assert_eq!(err.kind(), super::super::ErrorKind::ChannelIo);
        assert_eq!(writer.stats().total_errors, 1);
        assert_eq!(writer.stats().consecutive_errors, 1);
    }

    #[test]
    fn temp_path_is_a_sibling() {
        let path = Path::new("/tmp/learner/state.json");
        assert_eq!(
            temp_path_for(path),
            PathBuf::from("/tmp/learner/state.json.tmp")
        );
    }
}
