use log::{debug, warn};
use serde_json::Value;

use crate::api::constants::MAX_RECORDS_PER_REQUEST;
use crate::api::{InsertResult, PlatformSession, SessionError};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Insert `records` in consecutive chunks of at most `batch_size`.
///
/// Results are returned in submission order with one entry per record.
/// Per-record failures are logged and left in the results; any chunk-level
/// failure stops the load and is returned as an error.
pub async fn insert_in_batches(
    session: &dyn PlatformSession,
    sobject: &str,
    records: &[Value],
    batch_size: usize,
) -> Result<Vec<InsertResult>, SessionError> {
    let batch_size = batch_size.clamp(1, MAX_RECORDS_PER_REQUEST);
    let mut results = Vec::with_capacity(records.len());

    for (batch_index, chunk) in records.chunks(batch_size).enumerate() {
        debug!(
            "Submitting {} batch {} with {} records",
            sobject,
            batch_index + 1,
            chunk.len()
        );

        let chunk_results = session.insert(sobject, chunk).await?;
        if chunk_results.len() != chunk.len() {
            return Err(SessionError::UnexpectedResultCount {
                expected: chunk.len(),
                actual: chunk_results.len(),
            });
        }

        for (offset, result) in chunk_results.iter().enumerate() {
            if !result.success {
                warn!(
                    "{} row {} was not created: {}",
                    sobject,
                    batch_index * batch_size + offset + 1,
                    result.error_summary()
                );
            }
        }

        results.extend(chunk_results);
    }

    Ok(results)
}
