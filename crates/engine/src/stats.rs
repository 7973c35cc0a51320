//! Byte accounting for a fan-out run.

/// Counters collected by the transfer loop.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferStats {
    bytes_pulled: u64,
    chunks: u64,
    destination_bytes: Vec<u64>,
    primary_bytes: u64,
}

impl TransferStats {
    /// Creates zeroed counters for `destinations` destinations.
    #[must_use]
    pub fn new(destinations: usize) -> Self {
        Self {
            destination_bytes: vec![0; destinations],
            ..Self::default()
        }
    }

    /// Total bytes moved from standard input.
    #[must_use]
    pub const fn bytes_pulled(&self) -> u64 {
        self.bytes_pulled
    }

    /// Number of non-empty pulls.
    #[must_use]
    pub const fn chunks(&self) -> u64 {
        self.chunks
    }

    /// Bytes delivered to each destination, in command line order.
    #[must_use]
    pub fn destination_bytes(&self) -> &[u64] {
        &self.destination_bytes
    }

    /// Bytes delivered to standard output.
    #[must_use]
    pub const fn primary_bytes(&self) -> u64 {
        self.primary_bytes
    }

    pub(crate) fn record_pull(&mut self, len: usize) {
        self.bytes_pulled += len as u64;
        self.chunks += 1;
    }

    pub(crate) fn record_destination(&mut self, index: usize, len: usize) {
        if let Some(total) = self.destination_bytes.get_mut(index) {
            *total += len as u64;
        }
    }

    pub(crate) fn record_primary(&mut self, len: usize) {
        self.primary_bytes += len as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_stats_track_each_destination() {
        let stats = TransferStats::new(3);
        assert_eq!(stats.destination_bytes(), [0, 0, 0]);
        assert_eq!(stats.chunks(), 0);
    }

    #[test]
    fn records_accumulate() {
        let mut stats = TransferStats::new(2);
        stats.record_pull(10);
        stats.record_pull(5);
        stats.record_destination(1, 15);
        stats.record_primary(15);

        assert_eq!(stats.bytes_pulled(), 15);
        assert_eq!(stats.chunks(), 2);
        assert_eq!(stats.destination_bytes(), [0, 15]);
        assert_eq!(stats.primary_bytes(), 15);
    }
}
