pub type Token = u32;
pub type Count = f64;

/// Translation table key: (target word id, source word id).
pub type WordPair = (Token, Token);

/// Positional alignment key: target index, source index, and the two
/// sentence lengths. Structural equality/hash is all the tables need.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AlignmentKey {
    pub i: u32,
    pub j: u32,
    pub l_e: u32,
    pub l_f: u32,
}

impl AlignmentKey {
    #[inline]
    pub fn new(i: usize, j: usize, l_e: usize, l_f: usize) -> Self {
        AlignmentKey {
            i: i as u32,
            j: j as u32,
            l_e: l_e as u32,
            l_f: l_f as u32,
        }
    }
}
