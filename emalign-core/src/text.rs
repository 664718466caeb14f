use hashbrown::HashMap;

use crate::error::AlignError;
use crate::types::Token;

/// Bidirectional word <-> id mapping. Ids are dense, assigned in
/// first-seen order starting at 0, and never reassigned.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary {
    word_to_id: HashMap<String, Token>,
    id_to_word: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Vocabulary::default()
    }

    pub fn add(&mut self, word: &str) -> Token {
        if let Some(&id) = self.word_to_id.get(word) {
            return id;
        }
        let id = self.id_to_word.len() as Token;
        self.word_to_id.insert(word.to_string(), id);
        self.id_to_word.push(word.to_string());
        id
    }

    pub fn id(&self, word: &str) -> Result<Token, AlignError> {
        self.word_to_id
            .get(word)
            .copied()
            .ok_or_else(|| AlignError::UnknownWord(word.to_string()))
    }

    pub fn word(&self, id: Token) -> Option<&str> {
        self.id_to_word.get(id as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.id_to_word.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_word.is_empty()
    }
}

/// One integer-encoded parallel sentence pair. Immutable once built;
/// `e` is the target-language side, `f` the source-language side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentencePair {
    pub e: Vec<Token>,
    pub f: Vec<Token>,
}

impl SentencePair {
    pub fn new(e: Vec<Token>, f: Vec<Token>) -> Self {
        SentencePair { e, f }
    }

    #[inline]
    pub fn l_e(&self) -> usize {
        self.e.len()
    }

    #[inline]
    pub fn l_f(&self) -> usize {
        self.f.len()
    }
}

#[derive(Clone, Debug)]
pub struct Corpus {
    pub pairs: Vec<SentencePair>,
    pub e_vocab: Vocabulary,
    pub f_vocab: Vocabulary,
}

/// Builds the integer corpus from two line-aligned plaintext strings,
/// one sentence per line, whitespace-tokenized. `limit` caps the number
/// of sentence pairs read.
pub fn parse_corpus(
    e_text: &str,
    f_text: &str,
    limit: Option<usize>,
) -> Result<Corpus, AlignError> {
    let e_lines: Vec<&str> = e_text.lines().collect();
    let f_lines: Vec<&str> = f_text.lines().collect();

    let n = match limit {
        Some(limit) => limit.min(e_lines.len()).min(f_lines.len()),
        None => {
            if e_lines.len() != f_lines.len() {
                return Err(AlignError::SentenceCountMismatch {
                    target_lines: e_lines.len(),
                    source_lines: f_lines.len(),
                });
            }
            e_lines.len()
        }
    };

    let mut e_vocab = Vocabulary::new();
    let mut f_vocab = Vocabulary::new();
    let mut pairs = Vec::with_capacity(n);

    let mut e_words_total = 0usize;
    let mut f_words_total = 0usize;
    let mut pair_total = 0usize;

    for k in 0..n {
        let e_tokens: Vec<Token> = e_lines[k]
            .split_whitespace()
            .map(|w| e_vocab.add(w))
            .collect();
        let f_tokens: Vec<Token> = f_lines[k]
            .split_whitespace()
            .map(|w| f_vocab.add(w))
            .collect();

        e_words_total += e_tokens.len();
        f_words_total += f_tokens.len();
        pair_total += e_tokens.len() * f_tokens.len();

        pairs.push(SentencePair::new(e_tokens, f_tokens));
    }

    log::info!(
        "corpus: {} sentence pairs, e vocab {} ({} words), f vocab {} ({} words), {} co-occurring pairs",
        pairs.len(),
        e_vocab.len(),
        e_words_total,
        f_vocab.len(),
        f_words_total,
        pair_total
    );

    Ok(Corpus {
        pairs,
        e_vocab,
        f_vocab,
    })
}

/// Renders alignments one line per sentence pair, `sourceIndex-targetIndex`
/// tokens separated by spaces. Input pairs are (target index, source index)
/// as the aligner emits them.
pub fn write_alignments(alignments: &[Vec<(usize, usize)>]) -> String {
    let mut out = String::new();
    for links in alignments {
        let mut first = true;
        for &(i, j) in links {
            if first {
                out.push_str(&format!("{}-{}", j, i));
                first = false;
            } else {
                out.push_str(&format!(" {}-{}", j, i));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_ids_first_seen_order() {
        let mut vocab = Vocabulary::new();
        assert_eq!(vocab.add("the"), 0);
        assert_eq!(vocab.add("cat"), 1);
        assert_eq!(vocab.add("the"), 0);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.id("cat").unwrap(), 1);
        assert_eq!(vocab.word(0), Some("the"));
        assert!(matches!(
            vocab.id("dog"),
            Err(AlignError::UnknownWord(_))
        ));
    }

    #[test]
    fn parse_corpus_encodes_both_sides() {
        let corpus = parse_corpus("le chat\nle chien\n", "the cat\nthe dog\n", None).unwrap();
        assert_eq!(corpus.pairs.len(), 2);
        assert_eq!(corpus.pairs[0].e, vec![0, 1]);
        assert_eq!(corpus.pairs[0].f, vec![0, 1]);
        assert_eq!(corpus.pairs[1].e, vec![0, 2]);
        assert_eq!(corpus.pairs[1].f, vec![0, 2]);
        assert_eq!(corpus.e_vocab.len(), 3);
        assert_eq!(corpus.f_vocab.len(), 3);
    }

    #[test]
    fn parse_corpus_respects_limit() {
        let corpus = parse_corpus("a\nb\nc\n", "x\ny\nz\n", Some(2)).unwrap();
        assert_eq!(corpus.pairs.len(), 2);
    }

    #[test]
    fn parse_corpus_rejects_ragged_files() {
        let err = parse_corpus("a\nb\n", "x\n", None).unwrap_err();
        assert!(matches!(
            err,
            AlignError::SentenceCountMismatch {
                target_lines: 2,
                source_lines: 1
            }
        ));
        assert_eq!(
            err.to_string(),
            "corpus line count mismatch: target has 2 sentences, source has 1"
        );
    }

    #[test]
    fn write_alignments_format() {
        let alignments = vec![vec![(0, 2), (1, 0)], vec![], vec![(0, 0)]];
        assert_eq!(write_alignments(&alignments), "2-0 0-1\n\n0-0\n");
    }
}
