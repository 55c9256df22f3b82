//! Row partitioning for the parallel update.

use std::ops::Range;

use crate::error::{LifeError, Result};

/// A contiguous row range `[start_row, end_row)` owned by one worker for a
/// single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    pub start_row: usize,
    pub end_row: usize,
}

impl Partition {
    #[inline]
    pub fn len(&self) -> usize {
        self.end_row - self.start_row
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start_row == self.end_row
    }

    #[inline]
    pub fn rows(&self) -> Range<usize> {
        self.start_row..self.end_row
    }
}

/// Split `[0, total_rows)` into `worker_count` contiguous chunks of
/// `total_rows / worker_count` rows; the last chunk takes the remainder.
///
/// With more workers than rows the leading chunks are empty.
pub fn partition_rows(total_rows: usize, worker_count: usize) -> Result<Vec<Partition>> {
    if worker_count == 0 {
        return Err(LifeError::InvalidWorkerCount(worker_count));
    }
    let chunk = total_rows / worker_count;
    Ok((0..worker_count)
        .map(|i| Partition {
            start_row: i * chunk,
            end_row: if i + 1 == worker_count {
                total_rows
            } else {
                (i + 1) * chunk
            },
        })
        .collect())
}
