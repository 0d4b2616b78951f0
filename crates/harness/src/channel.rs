//! Reading the harness end of a report channel.

use schedcheck_core::{RecordOutcome, Tag, RECORD_LEN};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

/// Read one record from `reader`, retrying until it is complete or the
/// channel ends.
///
/// A record may arrive in several pieces. End of stream or a read error
/// stops the loop; whatever arrived so far is classified as a short or
/// missing record. Blocks for as long as the writer keeps the channel open.
pub async fn read_record<R>(reader: &mut R, tag: Tag) -> RecordOutcome
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buf = vec![0u8; RECORD_LEN];
    let mut filled = 0;

    while filled < RECORD_LEN {
        match reader.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(%tag, filled, "report channel read failed: {}", e);
                break;
            }
        }
    }

    buf.truncate(filled);
    let outcome = RecordOutcome::classify(tag, &buf);
    debug!(%tag, bytes = filled, complete = outcome.is_complete(), "report channel drained");
    outcome
}
