/*!
 * Audio playback arbitration.
 *
 * Playback itself is the host's concern, behind the `AudioSink` trait. What
 * lives here is the single-speaker rule: across every session in the process,
 * at most one synthesized clip is registered and audible at a time.
 * Registering a new clip stops and replaces whichever one was active, no
 * matter which session owned it.
 *
 * The arbiter also owns the decoded temp file for the active clip, so the
 * file is removed only when its registration ends, never while the sink may
 * still be reading it.
 */

use log::{debug, warn};
use parking_lot::Mutex;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use uuid::Uuid;

use crate::errors::SpeechError;

/// Opaque handle to a playing clip, issued by the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AudioHandle(pub u64);

/// Host audio playback collaborator
pub trait AudioSink: Send + Sync {
    /// Start playing a decoded audio file, returning a handle to it
    fn play(&self, path: &Path) -> AudioHandle;

    /// Stop a clip if it is still playing
    fn stop(&self, handle: AudioHandle);

    /// Whether a clip is currently audible
    fn is_playing(&self, handle: AudioHandle) -> bool;
}

/// A sink that logs instead of playing, for headless use and tests
#[derive(Debug, Default)]
pub struct NullAudioSink {
    next_handle: Mutex<u64>,
}

impl AudioSink for NullAudioSink {
    fn play(&self, path: &Path) -> AudioHandle {
        let mut next = self.next_handle.lock();
        *next += 1;
        debug!("NullAudioSink: would play {}", path.display());
        AudioHandle(*next)
    }

    fn stop(&self, handle: AudioHandle) {
        debug!("NullAudioSink: stop {:?}", handle);
    }

    fn is_playing(&self, _handle: AudioHandle) -> bool {
        false
    }
}

/// The currently registered clip: its handle plus the temp file backing it
struct ActiveAudio {
    handle: AudioHandle,
    /// Removed from disk when this registration is dropped
    _file: TempPath,
}

/// Process-wide single-owner registry for synthesized audio
#[derive(Default)]
pub struct AudioArbiter {
    current: Mutex<Option<ActiveAudio>>,
}

impl AudioArbiter {
    /// Create an empty arbiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new clip, stopping and replacing any previous one
    ///
    /// Returns the handle issued by the sink. The previous clip's temp file
    /// is removed as its registration drops.
    pub fn acquire(&self, file: TempPath, sink: &dyn AudioSink) -> AudioHandle {
        let mut current = self.current.lock();
        if let Some(previous) = current.take() {
            sink.stop(previous.handle);
        }
        let handle = sink.play(&file);
        *current = Some(ActiveAudio { handle, _file: file });
        handle
    }

    /// Release a handle if it is still the registered one, stopping playback
    pub fn release(&self, handle: AudioHandle, sink: &dyn AudioSink) {
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|a| a.handle == handle) {
            sink.stop(handle);
            *current = None;
        }
    }

    /// Stop whatever is registered, if anything
    pub fn stop_current(&self, sink: &dyn AudioSink) {
        let mut current = self.current.lock();
        if let Some(active) = current.take() {
            sink.stop(active.handle);
        }
    }

    /// Whether the given handle is the currently registered one
    pub fn is_registered(&self, handle: AudioHandle) -> bool {
        self.current.lock().as_ref().is_some_and(|a| a.handle == handle)
    }
}

/// Write decoded audio bytes to a uniquely named temp file
///
/// The returned `TempPath` owns the file; handing it to the arbiter defers
/// removal to the end of the registration.
pub fn store_decoded_audio(bytes: &[u8]) -> Result<TempPath, SpeechError> {
    let dir = std::env::temp_dir();
    let path: PathBuf = dir.join(format!("textlens_audio_{}.mp3", Uuid::new_v4()));

    let mut file = std::fs::File::create(&path)
        .map_err(|e| SpeechError::Storage(format!("{}: {}", path.display(), e)))?;
    if let Err(e) = file.write_all(bytes) {
        warn!("Failed writing decoded audio to {}: {}", path.display(), e);
        let _ = std::fs::remove_file(&path);
        return Err(SpeechError::Storage(e.to_string()));
    }

    Ok(TempPath::from_path(path))
}
