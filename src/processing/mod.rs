//! Range consolidation logic.
//!
//! Stages run for each address family:
//! - `normalize` - raw tokens into validated ranges
//! - `merge` - overlapping/adjacent ranges folded together
//! - `decompose` - merged ranges split into maximal aligned blocks
//! - `consolidation` - public entry points tying the stages together

mod consolidation;
mod decompose;
mod merge;
mod normalize;

// Re-export public functions
pub use consolidation::{
    consolidate, consolidate_mixed, consolidate_ranges, consolidate_with, Consolidated,
    ConsolidationResult,
};
pub use decompose::{decompose_range, find_biggest_block};
pub use merge::merge_ranges;
pub use normalize::{normalize, normalize_family, normalize_token, NormalizeOptions, Normalized};
