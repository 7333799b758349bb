use crate::types::Opcode;

/// SequenceComparator is a strategy trait for aligning two token sequences.
///
/// Implementations must cover both sequences completely: the returned opcodes
/// are contiguous, start at `(0, 0)` and end at `(a.len(), b.len())`.
pub trait SequenceComparator: Send + Sync {
    fn opcodes(&self, a: &[String], b: &[String]) -> Vec<Opcode>;
}
