//! Textual model format: first line is the table's default probability,
//! then one entry per line (`key fields... probability`), order unspecified.
//! File I/O itself stays with the caller; this module only maps tables to
//! and from strings.

use core::str::{FromStr, SplitWhitespace};

use crate::error::AlignError;
use crate::table::{AlignmentModel, TranslationModel};
use crate::types::{AlignmentKey, Count};

fn field<T: FromStr>(
    it: &mut SplitWhitespace<'_>,
    line: usize,
    what: &str,
) -> Result<T, AlignError> {
    it.next()
        .ok_or_else(|| AlignError::ModelParse {
            line,
            reason: format!("missing {}", what),
        })?
        .parse()
        .map_err(|_| AlignError::ModelParse {
            line,
            reason: format!("unparseable {}", what),
        })
}

fn end_of_line(it: &mut SplitWhitespace<'_>, line: usize) -> Result<(), AlignError> {
    match it.next() {
        None => Ok(()),
        Some(extra) => Err(AlignError::ModelParse {
            line,
            reason: format!("trailing field {:?}", extra),
        }),
    }
}

fn parse_default(s: &str) -> Result<(Count, core::str::Lines<'_>), AlignError> {
    let mut lines = s.lines();
    let first = lines.next().ok_or_else(|| AlignError::ModelParse {
        line: 1,
        reason: "missing default probability".to_string(),
    })?;
    let default = first.trim().parse().map_err(|_| AlignError::ModelParse {
        line: 1,
        reason: "unparseable default probability".to_string(),
    })?;
    Ok((default, lines))
}

pub fn write_translation_model(model: &TranslationModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", model.default_value()));
    for (&(e, f), &p) in model.iter() {
        out.push_str(&format!("{} {} {}\n", e, f, p));
    }
    out
}

pub fn parse_translation_model(s: &str) -> Result<TranslationModel, AlignError> {
    let (default, lines) = parse_default(s)?;
    let mut entries = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let mut it = line.split_whitespace();
        let e = field(&mut it, line_no, "target word id")?;
        let f = field(&mut it, line_no, "source word id")?;
        let p = field(&mut it, line_no, "probability")?;
        end_of_line(&mut it, line_no)?;
        entries.push(((e, f), p));
    }
    Ok(TranslationModel::from_entries(default, entries))
}

pub fn write_alignment_model(model: &AlignmentModel) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", model.default_value()));
    for (key, &p) in model.iter() {
        out.push_str(&format!(
            "{} {} {} {} {}\n",
            key.i, key.j, key.l_e, key.l_f, p
        ));
    }
    out
}

pub fn parse_alignment_model(s: &str) -> Result<AlignmentModel, AlignError> {
    let (default, lines) = parse_default(s)?;
    let mut entries = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let mut it = line.split_whitespace();
        let key = AlignmentKey {
            i: field(&mut it, line_no, "target index")?,
            j: field(&mut it, line_no, "source index")?,
            l_e: field(&mut it, line_no, "target length")?,
            l_f: field(&mut it, line_no, "source length")?,
        };
        let p = field(&mut it, line_no, "probability")?;
        end_of_line(&mut it, line_no)?;
        entries.push((key, p));
    }
    Ok(AlignmentModel::from_entries(default, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ProbTable;

    #[test]
    fn translation_model_round_trip() {
        let mut model: TranslationModel = ProbTable::new(0.01);
        model.set((0, 0), 0.75);
        model.set((1, 0), 0.25);
        model.set((3, 9), 1.0 / 3.0);

        let parsed = parse_translation_model(&write_translation_model(&model)).unwrap();
        assert_eq!(parsed.default_value(), 0.01);
        assert_eq!(parsed.len(), model.len());
        for (&key, &p) in model.iter() {
            assert_eq!(parsed.get(key), p);
        }
        // absent keys still fall back to the default
        assert_eq!(parsed.get((42, 42)), 0.01);
    }

    #[test]
    fn alignment_model_round_trip() {
        let mut model: AlignmentModel = ProbTable::new(1.0);
        model.set(AlignmentKey::new(0, 1, 2, 3), 0.9);
        model.set(AlignmentKey::new(1, 1, 2, 3), 0.1);

        let parsed = parse_alignment_model(&write_alignment_model(&model)).unwrap();
        assert_eq!(parsed.default_value(), 1.0);
        assert_eq!(parsed.len(), 2);
        for (&key, &p) in model.iter() {
            assert_eq!(parsed.get(key), p);
        }
    }

    #[test]
    fn empty_table_is_just_the_default_line() {
        let model = TranslationModel::new(0.5);
        assert_eq!(write_translation_model(&model), "0.5\n");
        let parsed = parse_translation_model("0.5\n").unwrap();
        assert!(parsed.is_empty());
        assert_eq!(parsed.default_value(), 0.5);
    }

    #[test]
    fn malformed_lines_report_their_position() {
        let err = parse_translation_model("0.1\n0 0 0.5\n1 oops 0.5\n").unwrap_err();
        match err {
            AlignError::ModelParse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = parse_translation_model("").unwrap_err();
        assert!(matches!(err, AlignError::ModelParse { line: 1, .. }));

        let err = parse_alignment_model("1.0\n0 1 2 3\n").unwrap_err();
        assert!(matches!(err, AlignError::ModelParse { line: 2, .. }));
    }

    #[test]
    fn trailing_fields_are_rejected() {
        let err = parse_translation_model("0.1\n0 0 0.5 junk\n").unwrap_err();
        assert!(matches!(err, AlignError::ModelParse { line: 2, .. }));
    }
}
