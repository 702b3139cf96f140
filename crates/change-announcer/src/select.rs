//! Watermark filtering and emission order.

use change_feed_client::ChangeRecord;
use watermark_store::Watermark;

/// Keep the records newer than `watermark`, oldest first.
///
/// Records sharing a timestamp keep their input order.
pub fn select(records: Vec<ChangeRecord>, watermark: Watermark) -> Vec<ChangeRecord> {
    let mut kept: Vec<ChangeRecord> = records
        .into_iter()
        .filter(|record| watermark.admits(record.timestamp))
        .collect();
    kept.sort_by_key(|record| record.timestamp);
    kept
}
