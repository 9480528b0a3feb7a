//! Dense sets of atoms and nodes.
//!
//! Both atoms and node ids are small consecutive integers, so membership is a
//! single bit in a word vector indexed by the id itself.

use std::fmt;
use std::marker::PhantomData;

use crate::types::{Atom, NodeId};

/// Ids that map one-to-one onto small `usize` indices.
pub trait DenseId: Copy {
    fn to_index(self) -> usize;
    fn from_index(index: usize) -> Self;
}

impl DenseId for Atom {
    fn to_index(self) -> usize {
        self.id() as usize
    }

    fn from_index(index: usize) -> Self {
        Atom::new(index as u32)
    }
}

impl DenseId for NodeId {
    fn to_index(self) -> usize {
        self.index()
    }

    fn from_index(index: usize) -> Self {
        NodeId::new(index)
    }
}

const WORD: usize = u64::BITS as usize;

/// A set of ids of one type.
#[derive(Clone, Eq, PartialEq)]
pub struct IdSet<I> {
    words: Vec<u64>,
    _id: PhantomData<I>,
}

/// Set of atoms, e.g. the true atoms of an answer set.
pub type AtomSet = IdSet<Atom>;

/// Set of registry nodes.
pub type NodeSet = IdSet<NodeId>;

impl<I> Default for IdSet<I> {
    fn default() -> Self {
        Self {
            words: Vec::new(),
            _id: PhantomData,
        }
    }
}

impl<I: DenseId> IdSet<I> {
    /// An empty set sized for ids below `bound`.
    pub fn with_bound(bound: usize) -> Self {
        Self {
            words: vec![0; bound.div_ceil(WORD)],
            _id: PhantomData,
        }
    }

    pub fn contains(&self, id: I) -> bool {
        let i = id.to_index();
        self.words.get(i / WORD).is_some_and(|w| w >> (i % WORD) & 1 == 1)
    }

    /// Adds `id`, returning `false` if it was already present.
    pub fn insert(&mut self, id: I) -> bool {
        let i = id.to_index();
        if i / WORD >= self.words.len() {
            self.words.resize(i / WORD + 1, 0);
        }
        let word = &mut self.words[i / WORD];
        let mask = 1 << (i % WORD);
        let fresh = *word & mask == 0;
        *word |= mask;
        fresh
    }

    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Members in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = I> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(I::from_index(w * WORD + bit))
            })
        })
    }
}

impl<I: DenseId> Extend<I> for IdSet<I> {
    fn extend<T: IntoIterator<Item = I>>(&mut self, iter: T) {
        for id in iter {
            self.insert(id);
        }
    }
}

impl<I: DenseId> FromIterator<I> for IdSet<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<I: DenseId + fmt::Display> fmt::Debug for IdSet<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(|id| id.to_string())).finish()
    }
}
