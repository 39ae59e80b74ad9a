//! Feed the job queue in batch order, then close it.

use crossbeam_channel::Sender;

use crate::{Batch, Record};

/// Offer every record in order and drop `job_tx`. Dropping the last sender is the only
/// "no more work" signal workers get. Returns the number of records offered.
pub fn feed_jobs(job_tx: Sender<Record>, batch: Batch) -> usize {
    let mut count = 0_usize;
    for record in batch {
        // Only fails if every worker is gone; nothing left to feed then.
        if job_tx.send(record).is_err() {
            log::error!("job queue closed early after {} record(s)", count);
            break;
        }
        count += 1;
    }
    drop(job_tx);
    count
}
