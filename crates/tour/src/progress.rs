/// Pipeline milestones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Discovering,
    Analyzed { files: usize },
    Welcome,
    /// 1-based group index
    BatchGroup { index: usize, total: usize },
    Validating,
}

/// Receives progress events; must not block
pub trait ProgressSink: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Logs every event at `info`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Discovering => log::info!("Discovering files..."),
            ProgressEvent::Analyzed { files } => log::info!("Analyzed {files} files"),
            ProgressEvent::Welcome => log::info!("Writing welcome step..."),
            ProgressEvent::BatchGroup { index, total } => {
                log::info!("Generating steps (group {index}/{total})...")
            }
            ProgressEvent::Validating => log::info!("Validating steps..."),
        }
    }
}
