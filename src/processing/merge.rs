//! Merging of overlapping and adjacent ranges.

use crate::models::Range;
use itertools::Itertools;

/// Sort `ranges` and fold every overlapping or adjacent run into one range.
///
/// The result is sorted by (family, start) and no two ranges of the same
/// family overlap or touch. Families are never merged with each other.
pub fn merge_ranges<I>(ranges: I) -> Vec<Range>
where
    I: IntoIterator<Item = Range>,
{
    ranges
        .into_iter()
        .sorted_unstable_by_key(|r| (r.family(), r.start(), r.end()))
        .coalesce(|current, next| {
            if current.touches(&next) {
                Ok(current.merge(next))
            } else {
                Err((current, next))
            }
        })
        .collect()
}
