//! One-shot report channel.

use schedcheck_core::ResultRecord;
use std::io::{self, Write};

/// Write end of a worker's report channel.
///
/// `send` consumes the channel, so a worker can deliver at most one record;
/// dropping the channel closes it.
#[derive(Debug)]
pub struct ReportChannel<W: Write> {
    inner: W,
}

impl<W: Write> ReportChannel<W> {
    /// Wrap the write end of a channel.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Send `record` with a single write and close the channel.
    pub fn send(mut self, record: &ResultRecord) -> io::Result<()> {
        let buf = record.encode();
        self.inner.write_all(&buf)?;
        self.inner.flush()
    }

    /// Give back the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedcheck_core::{Priority, Tag, RECORD_LEN};

    #[test]
    fn test_send_writes_one_record() {
        let record = ResultRecord {
            tag: Tag::new('A').unwrap(),
            priority: Priority(4),
            start_tick: 1,
            half_tick: 2,
            done_tick: 3,
            markers: 20,
        };

        let mut sink = Vec::new();
        ReportChannel::new(&mut sink).send(&record).unwrap();
        assert_eq!(sink.len(), RECORD_LEN);
        assert_eq!(ResultRecord::decode(&sink).unwrap(), record);
    }

    #[test]
    fn test_dropped_channel_writes_nothing() {
        let mut sink = Vec::new();
        drop(ReportChannel::new(&mut sink));
        assert!(sink.is_empty());
    }
}
