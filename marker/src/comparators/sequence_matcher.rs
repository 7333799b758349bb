//! Ratcliff/Obershelp sequence alignment.
//!
//! [`SequenceMatcher`] finds the longest contiguous matching block, then recurses on the pieces
//! to its left and right. The resulting matching blocks and opcodes are the same as those of
//! the classic `SequenceMatcher` with no junk predicate and the autojunk heuristic enabled.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::traits::comparator::SequenceComparator;
use crate::types::{Match, OpTag, Opcode};

/// Sequences of at least this length get the popular-element heuristic.
const AUTOJUNK_MIN_LEN: usize = 200;

pub struct SequenceMatcher<'a, T: Eq + Hash> {
    a: &'a [T],
    b: &'a [T],
    /// Positions of every non-popular element of `b`, ascending.
    b2j: HashMap<&'a T, Vec<usize>>,
    popular: HashSet<&'a T>,
}

impl<'a, T: Eq + Hash> SequenceMatcher<'a, T> {
    pub fn new(a: &'a [T], b: &'a [T]) -> Self {
        let mut b2j: HashMap<&'a T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }

        let mut popular = HashSet::new();
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            b2j.retain(|elt, idxs| {
                if idxs.len() > ntest {
                    popular.insert(*elt);
                    false
                } else {
                    true
                }
            });
        }

        Self { a, b, b2j, popular }
    }

    /// Elements of `b` ignored when seeding matches.
    pub fn popular(&self) -> &HashSet<&'a T> {
        &self.popular
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Ties go to the block starting earliest in `a`, then earliest in `b`. The block is then
    /// widened over equal neighbours, which lets popular elements join a match they could not
    /// seed.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the longest match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, elt) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut newj2len: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.b2j.get(elt) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                    let k = prev + 1;
                    newj2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = newj2len;
        }

        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi && bestj + bestsize < bhi && a[besti + bestsize] == b[bestj + bestsize] {
            bestsize += 1;
        }

        Match { a: besti, b: bestj, size: bestsize }
    }

    /// Non-overlapping matching blocks in ascending order, adjacent blocks merged, terminated
    /// by the sentinel `(a.len(), b.len(), 0)`.
    pub fn get_matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size > 0 {
                if alo < m.a && blo < m.b {
                    queue.push((alo, m.a, blo, m.b));
                }
                if m.a + m.size < ahi && m.b + m.size < bhi {
                    queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
                }
                blocks.push(m);
            }
        }
        blocks.sort();

        let mut merged = Vec::with_capacity(blocks.len() + 1);
        let mut current = Match { a: 0, b: 0, size: 0 };
        for m in blocks {
            if current.a + current.size == m.a && current.b + current.size == m.b {
                current.size += m.size;
            } else {
                if current.size > 0 {
                    merged.push(current);
                }
                current = m;
            }
        }
        if current.size > 0 {
            merged.push(current);
        }
        merged.push(Match { a: la, b: lb, size: 0 });
        merged
    }

    /// Opcodes turning `a` into `b`, covering both sequences end to end.
    pub fn get_opcodes(&self) -> Vec<Opcode> {
        let (mut i, mut j) = (0, 0);
        let mut opcodes = Vec::new();
        for m in self.get_matching_blocks() {
            let tag = match (i < m.a, j < m.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode::new(tag, i, m.a, j, m.b));
            }
            i = m.a + m.size;
            j = m.b + m.size;
            if m.size > 0 {
                opcodes.push(Opcode::new(OpTag::Equal, m.a, i, m.b, j));
            }
        }
        opcodes
    }
}

/// [`SequenceComparator`] backed by [`SequenceMatcher`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RatcliffObershelp;

impl SequenceComparator for RatcliffObershelp {
    fn opcodes(&self, a: &[String], b: &[String]) -> Vec<Opcode> {
        SequenceMatcher::new(a, b).get_opcodes()
    }
}
