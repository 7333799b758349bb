//! # Labeler
//!
//! Turns alignment opcodes into per-token binary defect labels.

use crate::types::{OpTag, Opcode};

/// Marks `labels[start..max(start + 1, end)]`, clipped to the slice.
///
/// A zero-width range still marks the position right after the edit, so pure insertions and
/// deletions leave a trace on the side where nothing changed.
fn mark(labels: &mut [u8], start: usize, end: usize) {
    let end = end.max(start + 1).min(labels.len());
    if start < end {
        labels[start..end].fill(1);
    }
}

/// Labels for `(original, changed)` of lengths `len_a` and `len_b`.
///
/// Every position touched by a non-equal opcode becomes 1; everything else stays 0.
pub fn labels_from_opcodes(opcodes: &[Opcode], len_a: usize, len_b: usize) -> (Vec<u8>, Vec<u8>) {
    let mut original = vec![0u8; len_a];
    let mut changed = vec![0u8; len_b];

    for op in opcodes.iter().filter(|op| op.tag != OpTag::Equal) {
        mark(&mut original, op.i1, op.i2);
        mark(&mut changed, op.j1, op.j2);
    }

    (original, changed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_only_leaves_zeros() {
        let ops = vec![Opcode::new(OpTag::Equal, 0, 3, 0, 3)];
        assert_eq!(labels_from_opcodes(&ops, 3, 3), (vec![0, 0, 0], vec![0, 0, 0]));
    }

    #[test]
    fn replace_marks_both_ranges() {
        let ops = vec![
            Opcode::new(OpTag::Equal, 0, 2, 0, 2),
            Opcode::new(OpTag::Replace, 2, 3, 2, 4),
            Opcode::new(OpTag::Equal, 3, 4, 4, 5),
        ];
        assert_eq!(labels_from_opcodes(&ops, 4, 5), (vec![0, 0, 1, 0], vec![0, 0, 1, 1, 0]));
    }

    #[test]
    fn insertion_marks_boundary_on_original() {
        let ops = vec![
            Opcode::new(OpTag::Equal, 0, 1, 0, 1),
            Opcode::new(OpTag::Insert, 1, 1, 1, 3),
            Opcode::new(OpTag::Equal, 1, 2, 3, 4),
        ];
        assert_eq!(labels_from_opcodes(&ops, 2, 4), (vec![0, 1], vec![0, 1, 1, 0]));
    }

    #[test]
    fn trailing_deletion_is_clipped_on_changed() {
        let ops = vec![
            Opcode::new(OpTag::Equal, 0, 2, 0, 2),
            Opcode::new(OpTag::Delete, 2, 3, 2, 2),
        ];
        assert_eq!(labels_from_opcodes(&ops, 3, 2), (vec![0, 0, 1], vec![0, 0]));
    }

    #[test]
    fn insertion_into_empty_original() {
        let ops = vec![Opcode::new(OpTag::Insert, 0, 0, 0, 2)];
        assert_eq!(labels_from_opcodes(&ops, 0, 2), (vec![], vec![1, 1]));
    }
}
