use hashbrown::HashMap;
use core::hash::Hash;

use crate::types::{AlignmentKey, Count, Token, WordPair};

/// Sparse probability table: a map from key to probability with a default
/// value for absent keys. Entries are only ever inserted, never removed.
#[derive(Clone, Debug)]
pub struct ProbTable<K> {
    entries: HashMap<K, Count>,
    default: Count,
}

impl<K: Eq + Hash + Copy> ProbTable<K> {
    pub fn new(default: Count) -> Self {
        ProbTable {
            entries: HashMap::new(),
            default,
        }
    }

    pub fn from_entries<I>(default: Count, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Count)>,
    {
        ProbTable {
            entries: entries.into_iter().collect(),
            default,
        }
    }

    #[inline]
    pub fn get(&self, key: K) -> Count {
        self.entries.get(&key).copied().unwrap_or(self.default)
    }

    #[inline]
    pub fn set(&mut self, key: K, value: Count) {
        self.entries.insert(key, value);
    }

    /// Adds `delta` to the stored value, starting from 0 for an absent key.
    /// Only meaningful during count collection, where the table holds
    /// expected counts rather than probabilities.
    #[inline]
    pub fn accumulate(&mut self, key: K, delta: Count) {
        *self.entries.entry(key).or_insert(0.0) += delta;
    }

    pub fn default_value(&self) -> Count {
        self.default
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &Count)> {
        self.entries.iter()
    }
}

/// P(e|f): probability of target word `e` given source word `f`.
pub type TranslationModel = ProbTable<WordPair>;

/// P(i|j,l_e,l_f): probability of target position `i` given source
/// position `j` and the sentence lengths.
pub type AlignmentModel = ProbTable<AlignmentKey>;

impl TranslationModel {
    #[inline]
    pub fn translation(&self, e: Token, f: Token) -> Count {
        self.get((e, f))
    }
}

impl AlignmentModel {
    #[inline]
    pub fn position(&self, i: usize, j: usize, l_e: usize, l_f: usize) -> Count {
        self.get(AlignmentKey::new(i, j, l_e, l_f))
    }
}
