use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use unjumble_core::core::hamming::descramble_hamming;
use unjumble_core::core::signature::SignatureIndex;
use unjumble_core::corpus::BigramCounter;
use unjumble_core::scramble::scramble_text;
use unjumble_core::{store, DescrambleEngine};

const DEFAULT_WORDS_FILE: &str = "/usr/share/dict/words";

#[derive(Parser)]
#[command(
    name = "unjumble",
    version,
    about = "Scramble the letters inside words, and reconstruct scrambled text"
)]
struct Cli {
    /// Log progress and decode diagnostics to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Randomly permute letters inside each word of the text.
    Scramble {
        /// Share of each word's letters to permute, 0.0 to 1.0.
        #[arg(long, default_value_t = 0.5)]
        amount: f64,
        /// Seed for a reproducible scramble.
        #[arg(long)]
        seed: Option<u64>,
        text: String,
    },
    /// Replace each word by its nearest anagram from a word list, with no
    /// sequence context.
    DescrambleHamming {
        /// Word list, one word per line.
        #[arg(long, default_value = DEFAULT_WORDS_FILE)]
        words_file: PathBuf,
        text: String,
    },
    /// Reconstruct the most plausible word sequence using a bigram
    /// frequency model.
    DescrambleBigram {
        /// Persisted frequency model (.json, .bin, .db, .sqlite).
        #[arg(long)]
        model_file: PathBuf,
        text: String,
    },
    /// Count corpus bigrams into a persisted frequency model.
    MakeModel {
        /// Output model path; the extension picks the on-disk form.
        #[arg(long)]
        output: PathBuf,
        /// Treat inputs as iWeb corpus samples instead of plain text.
        #[arg(long)]
        iweb: bool,
        /// Corpus files to read.
        #[arg(required = true)]
        corpus: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Scramble { amount, seed, text } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            println!("{}", scramble_text(&text, amount, &mut rng));
        }
        Command::DescrambleHamming { words_file, text } => {
            let words = std::fs::read_to_string(&words_file)
                .with_context(|| format!("cannot read word list {}", words_file.display()))?;
            let index = SignatureIndex::build(words.lines());
            println!("{}", descramble_hamming(&index, &text));
        }
        Command::DescrambleBigram { model_file, text } => {
            let engine = DescrambleEngine::open(&model_file)
                .with_context(|| format!("cannot open model {}", model_file.display()))?;
            println!("{}", engine.descramble(&text)?);
        }
        Command::MakeModel {
            output,
            iweb,
            corpus,
        } => {
            let mut counter = BigramCounter::new();
            for path in &corpus {
                let file = File::open(path)
                    .with_context(|| format!("cannot read corpus file {}", path.display()))?;
                let reader = BufReader::new(file);
                if iweb {
                    counter.add_iweb_document(reader)?;
                } else {
                    counter.add_plain_document(reader)?;
                }
                info!(path = %path.display(), "corpus file counted");
            }
            let counts = counter.into_counts();
            store::write(&output, &counts)
                .with_context(|| format!("cannot write model {}", output.display()))?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info,unjumble_core=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
