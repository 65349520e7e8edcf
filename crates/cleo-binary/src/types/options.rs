//! Writer options.

/// Options for writing binary files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Flush file contents to disk before returning.
    pub sync_all: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self { sync_all: true }
    }
}

impl WriterOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to sync the file to disk after writing.
    #[must_use]
    pub fn with_sync_all(mut self, sync_all: bool) -> Self {
        self.sync_all = sync_all;
        self
    }
}
