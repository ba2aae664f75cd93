//! Output seams for embedders.
//!
//! The simulation never draws anything itself. Embedders supply sinks;
//! the defaults here just log, which is what the headless harness wants.

/// Receives speech bubbles as the narration scheduler shows them.
pub trait RenderSink {
    fn draw_floating_text(&mut self, speaker: u32, text: &str, duration_ms: u64);
}

/// Receives colony-wide notices (dates starting, scandals, and so on).
pub trait NotificationSink {
    fn notify(&mut self, text: &str);
}

/// Default render sink that writes bubbles to the log.
#[derive(Debug, Default)]
pub struct LogRenderSink;

impl RenderSink for LogRenderSink {
    fn draw_floating_text(&mut self, speaker: u32, text: &str, duration_ms: u64) {
        log::info!("[bubble] agent {} ({} ms): {}", speaker, duration_ms, text);
    }
}

/// Default notification sink that writes notices to the log.
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn notify(&mut self, text: &str) {
        log::info!("[notice] {}", text);
    }
}
