//! Configuration for BARR file handles

/// Durability and batching knobs for a [`BinaryArrayFile`](crate::BinaryArrayFile)
#[derive(Debug, Clone)]
pub struct FileConfig {
    /// `sync_data` after every append, put or extend
    pub sync_on_write: bool,
    /// `sync_all` on close if anything was written
    pub sync_on_close: bool,
    /// Batch size from which records are encoded and decoded in parallel
    pub parallel_threshold: usize,
}

impl FileConfig {
    /// Config that syncs every mutation to disk before returning
    pub fn durable() -> Self {
        Self {
            sync_on_write: true,
            ..Self::default()
        }
    }

    /// Set per-write syncing
    pub fn with_sync_on_write(mut self, sync: bool) -> Self {
        self.sync_on_write = sync;
        self
    }

    /// Set syncing on close
    pub fn with_sync_on_close(mut self, sync: bool) -> Self {
        self.sync_on_close = sync;
        self
    }

    /// Set the batch size at which rayon is used
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Whether a batch of `len` records should be processed in parallel
    pub fn use_parallel(&self, len: usize) -> bool {
        len >= self.parallel_threshold
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            sync_on_write: false,
            sync_on_close: true,
            parallel_threshold: 64,
        }
    }
}
