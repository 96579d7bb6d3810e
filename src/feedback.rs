//! Feedback stream draining.
//!
//! The feedback service sends a plain concatenation of 38-byte records
//! with no count or terminator, then closes the stream. TCP may split
//! records across reads, so partial data is accumulated until a record
//! completes.

use tracing::{debug, warn};

use crate::codec::{FeedbackRecord, FEEDBACK_RECORD_LEN};
use crate::connection::Connection;
use crate::error::ApnsResult;
use crate::transport::Transport;

/// Reads feedback records until end-of-stream.
///
/// Zero-length reads are skipped. End-of-stream in the middle of a record
/// is a malformed tail and surfaces as an error; complete records read
/// before that point are discarded with it.
pub(crate) fn drain_records<T: Transport>(
    connection: &mut Connection<T>,
) -> ApnsResult<Vec<FeedbackRecord>> {
    let mut records = Vec::new();
    let mut pending: Vec<u8> = Vec::with_capacity(FEEDBACK_RECORD_LEN);

    while let Some(chunk) = connection.read_chunk(FEEDBACK_RECORD_LEN - pending.len())? {
        if chunk.is_empty() {
            continue;
        }
        pending.extend_from_slice(&chunk);
        if pending.len() == FEEDBACK_RECORD_LEN {
            records.push(FeedbackRecord::decode(&pending)?);
            pending.clear();
        }
    }

    if !pending.is_empty() {
        warn!("feedback stream ended {} bytes into a record", pending.len());
        // A partial record can never decode; this propagates the size error.
        FeedbackRecord::decode(&pending)?;
    }

    debug!("feedback drain complete: {} records", records.len());
    Ok(records)
}
