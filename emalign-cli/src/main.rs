use clap::Parser;
use std::fs;

use emalign_core::{
    parse_corpus, parse_translation_model, viterbi_alignment, write_alignment_model,
    write_alignments, write_translation_model, AlignmentModel, Model1, Model2, ModelTrainer,
    TranslationModel,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source-language corpus file, one sentence per line ("-" for stdin)
    #[arg(short = 's', long = "source")]
    source: String,
    /// Target-language corpus file, line-aligned with the source
    #[arg(short = 't', long = "target")]
    target: String,
    /// Use at most this many sentence pairs
    #[arg(short = 'n', long = "limit")]
    limit: Option<usize>,
    /// Model 1 EM iterations
    #[arg(short = '1', default_value_t = 5)]
    it1: usize,
    /// Model 2 EM iterations
    #[arg(short = '2', default_value_t = 10)]
    it2: usize,
    /// Emit a link only when its score is strictly above this
    #[arg(long, default_value_t = 0.1)]
    threshold: f64,
    /// Default probability for absent translation-table entries
    #[arg(long = "default-prob", default_value_t = 1.0)]
    default_prob: f64,
    /// Alignment output ("-" for stdout)
    #[arg(short = 'o', long = "output", default_value = "-")]
    output: String,
    /// Seed training from a previously saved translation model
    #[arg(long = "load-translation")]
    load_translation: Option<String>,
    #[arg(long = "save-translation")]
    save_translation: Option<String>,
    #[arg(long = "save-alignment")]
    save_alignment: Option<String>,
}

fn read_all(path: &str) -> std::io::Result<String> {
    if path == "-" {
        use std::io::Read;
        let mut s = String::new();
        std::io::stdin().read_to_string(&mut s)?;
        Ok(s)
    } else {
        fs::read_to_string(path)
    }
}

fn write_all(path: &str, data: &str) -> std::io::Result<()> {
    if path == "-" {
        print!("{data}");
        Ok(())
    } else {
        fs::write(path, data)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let e_text = read_all(&args.target)?;
    let f_text = read_all(&args.source)?;
    let corpus = parse_corpus(&e_text, &f_text, args.limit)?;

    let translation = match &args.load_translation {
        Some(path) => parse_translation_model(&fs::read_to_string(path)?)?,
        None => TranslationModel::new(args.default_prob),
    };
    let alignment = AlignmentModel::new(1.0);

    let (translation, alignment) =
        Model1 { iterations: args.it1 }.train(&corpus.pairs, translation, alignment)?;
    let (translation, alignment) =
        Model2 { iterations: args.it2 }.train(&corpus.pairs, translation, alignment)?;

    log::info!(
        "trained tables: {} translation entries, {} alignment entries",
        translation.len(),
        alignment.len()
    );

    if let Some(path) = &args.save_translation {
        fs::write(path, write_translation_model(&translation))?;
    }
    if let Some(path) = &args.save_alignment {
        fs::write(path, write_alignment_model(&alignment))?;
    }

    let links: Vec<_> = corpus
        .pairs
        .iter()
        .map(|pair| viterbi_alignment(pair, &translation, &alignment, args.threshold))
        .collect();
    write_all(&args.output, &write_alignments(&links))?;

    Ok(())
}
