use std::path::{Path, PathBuf};

use crate::foundation::error::{TorsoError, TorsoResult};

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le_file(samples_interleaved: &[f32], out_path: &Path) -> TorsoResult<()> {
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            TorsoError::resource(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        TorsoError::resource(format!(
            "failed to write audio file '{}': {e}",
            out_path.display()
        ))
    })
}

/// Unique path in the system temp dir for one run's raw audio.
pub fn temp_f32le_path(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "torso_{tag}_{}_{}.f32le",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ))
}

/// Removes the file it holds when dropped.
#[derive(Debug, Default)]
pub struct TempFileGuard(pub Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
