pub mod types;
pub mod error;
pub mod table;
pub mod text;
pub mod em;
pub mod viterbi;
pub mod persist;

pub use em::{Model1, Model2, ModelTrainer};
pub use error::AlignError;
pub use persist::{
    parse_alignment_model, parse_translation_model, write_alignment_model,
    write_translation_model,
};
pub use table::{AlignmentModel, ProbTable, TranslationModel};
pub use text::{parse_corpus, write_alignments, Corpus, SentencePair, Vocabulary};
pub use types::{AlignmentKey, Count, Token, WordPair};
pub use viterbi::viterbi_alignment;
