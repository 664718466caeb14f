use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlignError {
    #[error("word not in vocabulary: {0:?}")]
    UnknownWord(String),

    #[error("corpus line count mismatch: target has {target_lines} sentences, source has {source_lines}")]
    SentenceCountMismatch {
        target_lines: usize,
        source_lines: usize,
    },

    // A zero normalizer means a word or position never co-occurred with
    // anything, which the corpus contract rules out. Abort rather than
    // let NaN/Inf leak into the next iteration.
    #[error("degenerate normalization of {what} in iteration {iteration}")]
    DegenerateNormalization {
        what: &'static str,
        iteration: usize,
    },

    #[error("malformed model file at line {line}: {reason}")]
    ModelParse { line: usize, reason: String },
}
