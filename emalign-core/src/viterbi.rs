use crate::table::{AlignmentModel, TranslationModel};
use crate::text::SentencePair;
use crate::types::Count;

/// Picks, for each target index `i`, the source index `j` maximizing
/// P(e_i|f_j) * P(i|j,l_e,l_f). Ties keep the first `j` scanned. A pair is
/// emitted only when its score is strictly above `threshold`; target words
/// with nothing above threshold stay unaligned (implicit NULL).
pub fn viterbi_alignment(
    pair: &SentencePair,
    translation: &TranslationModel,
    alignment: &AlignmentModel,
    threshold: Count,
) -> Vec<(usize, usize)> {
    let (l_e, l_f) = (pair.l_e(), pair.l_f());
    let mut links = Vec::new();

    for (i, &e) in pair.e.iter().enumerate() {
        let mut best_score: Count = 0.0;
        let mut best_j: Option<usize> = None;

        for (j, &f) in pair.f.iter().enumerate() {
            let score = translation.translation(e, f) * alignment.position(i, j, l_e, l_f);
            if score > best_score {
                best_score = score;
                best_j = Some(j);
            }
        }

        if let Some(j) = best_j {
            if best_score > threshold {
                links.push((i, j));
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ProbTable;
    use crate::types::AlignmentKey;

    #[test]
    fn below_threshold_words_are_dropped() {
        // l_e=2, l_f=3; word 0 peaks at j=2 with 0.9, word 1 peaks at j=2
        // with 0.05; threshold 0.1 keeps only (0,2)
        let pair = SentencePair::new(vec![0, 1], vec![0, 1, 2]);
        let mut tm: TranslationModel = ProbTable::new(0.0);
        tm.set((0, 2), 0.9);
        tm.set((0, 0), 0.3);
        tm.set((1, 2), 0.05);
        tm.set((1, 0), 0.01);
        let am = AlignmentModel::new(1.0);

        let links = viterbi_alignment(&pair, &tm, &am, 0.1);
        assert_eq!(links, vec![(0, 2)]);
    }

    #[test]
    fn position_probabilities_break_lexical_ties() {
        let pair = SentencePair::new(vec![0], vec![0, 1]);
        let mut tm: TranslationModel = ProbTable::new(0.0);
        tm.set((0, 0), 0.5);
        tm.set((0, 1), 0.5);
        let mut am = AlignmentModel::new(0.0);
        am.set(AlignmentKey::new(0, 0, 1, 2), 0.2);
        am.set(AlignmentKey::new(0, 1, 1, 2), 0.8);

        let links = viterbi_alignment(&pair, &tm, &am, 0.05);
        assert_eq!(links, vec![(0, 1)]);
    }

    #[test]
    fn exact_ties_keep_the_first_source_index() {
        let pair = SentencePair::new(vec![0], vec![0, 1]);
        let mut tm: TranslationModel = ProbTable::new(0.0);
        tm.set((0, 0), 0.6);
        tm.set((0, 1), 0.6);
        let am = AlignmentModel::new(1.0);

        let links = viterbi_alignment(&pair, &tm, &am, 0.1);
        assert_eq!(links, vec![(0, 0)]);
    }

    #[test]
    fn at_most_one_link_per_target_index() {
        let pair = SentencePair::new(vec![0, 1, 0], vec![0, 1]);
        let mut tm: TranslationModel = ProbTable::new(0.0);
        tm.set((0, 0), 0.9);
        tm.set((1, 1), 0.9);
        let am = AlignmentModel::new(1.0);

        let links = viterbi_alignment(&pair, &tm, &am, 0.1);
        let mut seen = std::collections::HashSet::new();
        for &(i, _) in &links {
            assert!(seen.insert(i), "target index {} linked twice", i);
        }
        assert_eq!(links, vec![(0, 0), (1, 1), (2, 0)]);
    }

    #[test]
    fn score_equal_to_threshold_is_not_emitted() {
        let pair = SentencePair::new(vec![0], vec![0]);
        let mut tm: TranslationModel = ProbTable::new(0.0);
        tm.set((0, 0), 0.1);
        let am = AlignmentModel::new(1.0);

        assert!(viterbi_alignment(&pair, &tm, &am, 0.1).is_empty());
    }
}
