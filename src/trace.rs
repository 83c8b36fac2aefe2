/*!
 * Debug-only diagnostic dumps.
 *
 * When enabled in the config, raw request and response payloads are written
 * to timestamped files under the temp directory so encoding problems can be
 * inspected in an editor. This is a trace hook, not a stable contract.
 */

use chrono::Local;
use log::{debug, warn};
use std::path::PathBuf;

/// Writes raw payload dumps when enabled
#[derive(Debug, Clone)]
pub struct DiagnosticsSink {
    enabled: bool,
    dir: PathBuf,
}

impl DiagnosticsSink {
    /// Create a sink writing under the system temp directory
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            dir: std::env::temp_dir(),
        }
    }

    /// Create a disabled sink
    pub fn disabled() -> Self {
        Self::new(false)
    }

    /// Dump a payload under a labeled, timestamped file name
    ///
    /// Returns the path written, or `None` when disabled or on write failure;
    /// dump failures are logged and never propagate.
    pub fn dump(&self, label: &str, bytes: &[u8]) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }

        let stamp = Local::now().format("%Y%m%d_%H%M%S%.3f");
        let path = self.dir.join(format!("textlens_{}_{}.json", label, stamp));

        match std::fs::write(&path, bytes) {
            Ok(()) => {
                debug!("Wrote {} dump to {}", label, path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to write {} dump: {}", label, e);
                None
            }
        }
    }
}
