//! # Comparators
//!
//! Sequence alignment strategies implementing
//! [`SequenceComparator`](crate::traits::comparator::SequenceComparator).
//!
//! - [`sequence_matcher`]: Ratcliff/Obershelp longest-matching-block alignment.

pub mod sequence_matcher;
