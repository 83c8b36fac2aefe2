/*!
 * User-facing status messages.
 *
 * Sessions surface short quick messages ("Reading as ja-JP", provider
 * failures) through this seam; the host decides how to show them. The
 * default implementation routes them to the log.
 */

use log::info;

/// Receiver for short user-facing messages
pub trait StatusNotifier: Send + Sync {
    /// Show a transient quick message
    fn quick_message(&self, message: &str);

    /// Update a longer-lived status line; defaults to the quick message path
    fn status(&self, message: &str) {
        self.quick_message(message);
    }
}

/// Notifier that writes messages to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl StatusNotifier for LogNotifier {
    fn quick_message(&self, message: &str) {
        info!("{}", message);
    }
}
