//! # Verification
//!
//! Checks a consumer's observations against what the producer committed.

use crate::error::{StressError, StressResult};

/// Checks the values a counter consumer observed as new.
///
/// The producer committed `1..=last`. Observations must lie in that range,
/// increase strictly, and end on `last`.
///
/// # Errors
///
/// [`StressError::NeverCommitted`], [`StressError::OutOfOrder`] or
/// [`StressError::FinalValueMissing`], for the first violation found.
pub fn check_counter(observed: &[u64], last: u64) -> StressResult<()> {
    let mut previous = 0;
    for &value in observed {
        if value == 0 || value > last {
            return Err(StressError::NeverCommitted(value));
        }
        if value <= previous {
            return Err(StressError::OutOfOrder {
                previous,
                observed: value,
            });
        }
        previous = value;
    }

    if previous != last {
        return Err(StressError::FinalValueMissing {
            expected: last,
            observed: previous,
        });
    }
    Ok(())
}

/// Checks that `consumed` appears in `produced`, in order, with gaps allowed.
///
/// Gaps are the batches the producer superseded before the consumer read.
///
/// # Errors
///
/// [`StressError::Mismatch`] with the position of the first consumed item
/// that cannot be matched.
pub fn check_subsequence<S: PartialEq>(consumed: &[S], produced: &[S]) -> StressResult<()> {
    let mut remaining = produced.iter();
    for (index, item) in consumed.iter().enumerate() {
        if !remaining.any(|candidate| candidate == item) {
            return Err(StressError::Mismatch { index });
        }
    }
    Ok(())
}
