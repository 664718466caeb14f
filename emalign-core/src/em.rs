use hashbrown::HashMap;
use rayon::prelude::*;

use crate::error::AlignError;
use crate::table::{AlignmentModel, TranslationModel};
use crate::text::SentencePair;
use crate::types::{AlignmentKey, Count, Token, WordPair};

// Fixed chunk size, so the merge order (and with it the floating-point
// summation order) does not depend on how many workers rayon runs.
const CHUNK_SIZE: usize = 1024;

/// One EM training stage. Takes ownership of both tables and hands back the
/// refined ones; stages are chained by feeding one stage's output tables to
/// the next as its initial state.
pub trait ModelTrainer {
    fn train(
        &self,
        corpus: &[SentencePair],
        translation: TranslationModel,
        alignment: AlignmentModel,
    ) -> Result<(TranslationModel, AlignmentModel), AlignError>;
}

/// Lexical-only EM: re-estimates P(e|f) from co-occurrence alone, positions
/// treated as uniform. The alignment table is passed through untouched.
pub struct Model1 {
    pub iterations: usize,
}

/// Joint lexical/positional EM: re-estimates P(e|f) together with
/// P(i|j,l_e,l_f). Normally seeded with a Model 1 translation table and a
/// uniform-default alignment table.
pub struct Model2 {
    pub iterations: usize,
}

#[derive(Default)]
struct LexCounts {
    count: HashMap<WordPair, Count>,
    total: HashMap<Token, Count>,
}

#[derive(Default)]
struct PosCounts {
    count: HashMap<AlignmentKey, Count>,
    // normalizer is a function of (j, l_e, l_f) alone
    total: HashMap<(u32, u32, u32), Count>,
}

fn merge_into<K: Eq + core::hash::Hash>(dst: &mut HashMap<K, Count>, src: HashMap<K, Count>) {
    for (key, value) in src {
        *dst.entry(key).or_insert(0.0) += value;
    }
}

fn collect_model1(
    chunk: &[SentencePair],
    translation: &TranslationModel,
    iteration: usize,
) -> Result<LexCounts, AlignError> {
    let mut acc = LexCounts::default();
    for pair in chunk {
        if pair.e.is_empty() || pair.f.is_empty() {
            continue;
        }
        for &e in &pair.e {
            let mut s_total: Count = 0.0;
            for &f in &pair.f {
                s_total += translation.translation(e, f);
            }
            if s_total <= 0.0 {
                return Err(AlignError::DegenerateNormalization {
                    what: "sTotal",
                    iteration,
                });
            }
            for &f in &pair.f {
                let delta = translation.translation(e, f) / s_total;
                *acc.count.entry((e, f)).or_insert(0.0) += delta;
                *acc.total.entry(f).or_insert(0.0) += delta;
            }
        }
    }
    Ok(acc)
}

fn collect_model2(
    chunk: &[SentencePair],
    translation: &TranslationModel,
    alignment: &AlignmentModel,
    iteration: usize,
) -> Result<(LexCounts, PosCounts), AlignError> {
    let mut lex = LexCounts::default();
    let mut pos = PosCounts::default();
    for pair in chunk {
        let (l_e, l_f) = (pair.l_e(), pair.l_f());
        if l_e == 0 || l_f == 0 {
            continue;
        }
        for (i, &e) in pair.e.iter().enumerate() {
            let mut s_total: Count = 0.0;
            for (j, &f) in pair.f.iter().enumerate() {
                s_total += translation.translation(e, f) * alignment.position(i, j, l_e, l_f);
            }
            if s_total <= 0.0 {
                return Err(AlignError::DegenerateNormalization {
                    what: "sTotal",
                    iteration,
                });
            }
            for (j, &f) in pair.f.iter().enumerate() {
                let delta =
                    translation.translation(e, f) * alignment.position(i, j, l_e, l_f) / s_total;
                *lex.count.entry((e, f)).or_insert(0.0) += delta;
                *lex.total.entry(f).or_insert(0.0) += delta;
                *pos.count
                    .entry(AlignmentKey::new(i, j, l_e, l_f))
                    .or_insert(0.0) += delta;
                *pos.total
                    .entry((j as u32, l_e as u32, l_f as u32))
                    .or_insert(0.0) += delta;
            }
        }
    }
    Ok((lex, pos))
}

// count[(e,f)] / total[f]; keys never accumulated keep their old value.
fn normalize_lexical(
    translation: &mut TranslationModel,
    counts: &LexCounts,
    iteration: usize,
) -> Result<(), AlignError> {
    for (&(e, f), &count) in &counts.count {
        let total = counts.total.get(&f).copied().unwrap_or(0.0);
        if total <= 0.0 {
            return Err(AlignError::DegenerateNormalization {
                what: "total",
                iteration,
            });
        }
        translation.set((e, f), count / total);
    }
    Ok(())
}

fn normalize_positional(
    alignment: &mut AlignmentModel,
    counts: &PosCounts,
    iteration: usize,
) -> Result<(), AlignError> {
    for (&key, &count) in &counts.count {
        let total = counts
            .total
            .get(&(key.j, key.l_e, key.l_f))
            .copied()
            .unwrap_or(0.0);
        if total <= 0.0 {
            return Err(AlignError::DegenerateNormalization {
                what: "totalA",
                iteration,
            });
        }
        alignment.set(key, count / total);
    }
    Ok(())
}

impl ModelTrainer for Model1 {
    fn train(
        &self,
        corpus: &[SentencePair],
        mut translation: TranslationModel,
        alignment: AlignmentModel,
    ) -> Result<(TranslationModel, AlignmentModel), AlignError> {
        for iteration in 0..self.iterations {
            log::info!("model 1 iteration {}", iteration);

            let locals = corpus
                .par_chunks(CHUNK_SIZE)
                .map(|chunk| collect_model1(chunk, &translation, iteration))
                .collect::<Result<Vec<_>, _>>()?;

            // chunk-index order keeps the reduction deterministic
            let mut merged = LexCounts::default();
            for local in locals {
                merge_into(&mut merged.count, local.count);
                merge_into(&mut merged.total, local.total);
            }

            normalize_lexical(&mut translation, &merged, iteration)?;
        }
        Ok((translation, alignment))
    }
}

impl ModelTrainer for Model2 {
    fn train(
        &self,
        corpus: &[SentencePair],
        mut translation: TranslationModel,
        mut alignment: AlignmentModel,
    ) -> Result<(TranslationModel, AlignmentModel), AlignError> {
        for iteration in 0..self.iterations {
            log::info!("model 2 iteration {}", iteration);

            let locals = corpus
                .par_chunks(CHUNK_SIZE)
                .map(|chunk| collect_model2(chunk, &translation, &alignment, iteration))
                .collect::<Result<Vec<_>, _>>()?;

            let mut lex = LexCounts::default();
            let mut pos = PosCounts::default();
            for (local_lex, local_pos) in locals {
                merge_into(&mut lex.count, local_lex.count);
                merge_into(&mut lex.total, local_lex.total);
                merge_into(&mut pos.count, local_pos.count);
                merge_into(&mut pos.total, local_pos.total);
            }

            normalize_lexical(&mut translation, &lex, iteration)?;
            normalize_positional(&mut alignment, &pos, iteration)?;
        }
        Ok((translation, alignment))
    }
}
