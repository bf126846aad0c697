//! Gesture HMM CLI
//!
//! Command-line interface for segmenting training examples into word models
//! and decoding new recordings against them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use gesture_hmm::{
    data::{ObservationSequence, SyntheticGesture, TrainingSet},
    models::{GesturePath, State, WordModel},
    segmentation::{SegmenterConfig, SequenceSegmenter},
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gesture_hmm")]
#[command(about = "Three-state HMM segmentation and Viterbi decoding for gesture words")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a word model from three CSV training examples
    Segment {
        /// Gesture word label
        #[arg(short, long)]
        word: String,

        /// The three example CSV files (header row, one column per dimension)
        #[arg(short, long, num_args = 3, required = true)]
        examples: Vec<PathBuf>,

        /// Maximum boundary refinement passes
        #[arg(long, default_value = "1000")]
        max_iterations: usize,

        /// Decimal places kept in means and deviations
        #[arg(long, default_value = "3")]
        decimals: u32,

        /// Output JSON model path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a CSV recording with a JSON word model
    Decode {
        /// Word model produced by `segment`
        #[arg(short, long)]
        model: PathBuf,

        /// Evidence CSV file
        #[arg(short, long)]
        evidence: PathBuf,
    },

    /// Train and decode a synthetic two-dimensional gesture
    Demo {
        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Measurement noise standard deviation
        #[arg(long, default_value = "0.3")]
        noise: f64,

        /// Directory to write the generated example CSVs to
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gesture_hmm=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Segment {
            word,
            examples,
            max_iterations,
            decimals,
            output,
        } => {
            let config = SegmenterConfig {
                max_iterations,
                decimals,
            };
            segment_word(&word, &examples, config, output.as_deref())?;
        }
        Commands::Decode { model, evidence } => {
            decode_recording(&model, &evidence)?;
        }
        Commands::Demo {
            seed,
            noise,
            out_dir,
        } => {
            run_demo(seed, noise, out_dir.as_deref())?;
        }
    }

    Ok(())
}

fn segment_word(
    word: &str,
    examples: &[PathBuf],
    config: SegmenterConfig,
    output: Option<&Path>,
) -> Result<()> {
    let paths: &[PathBuf; 3] = examples
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected exactly 3 example files"))?;

    println!("{}", "Loading examples...".cyan());
    let training = TrainingSet::from_csv(word, paths)?;
    println!(
        "Loaded {} examples of '{}' ({} dimensions)",
        training.examples.len(),
        word,
        training.dims()
    );

    println!("{}", "Segmenting...".cyan());
    let segmenter = SequenceSegmenter::with_config(config);
    let results = training.segment(&segmenter)?;

    for (d, result) in results.iter().enumerate() {
        println!("\n{}", format!("Dimension {}", d).bold());
        println!("  Passes:     {}", result.iterations);
        for (k, b) in result.boundaries.iter().enumerate() {
            println!(
                "  Example {}:  [0, {}) [{}, {}) [{}, end)",
                k, b.index1, b.index1, b.index2, b.index2
            );
        }
        for s in State::ALL {
            let i = s.index();
            let [stay, advance] = result.transitions.rows()[i];
            println!(
                "  {}: mean {:>8.3}  std {:>7.3}  stay {:.3}  advance {:.3}",
                s, result.means[i], result.stds[i], stay, advance
            );
        }
    }

    let model = WordModel::from_segmentations(word, &results)?;
    let json = serde_json::to_string_pretty(&model)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("\n{}", format!("Saved model to {}", path.display()).green());
        }
        None => println!("\n{}", json),
    }

    Ok(())
}

fn decode_recording(model_path: &Path, evidence_path: &Path) -> Result<()> {
    let model: WordModel = serde_json::from_str(&std::fs::read_to_string(model_path)?)?;
    let evidence = ObservationSequence::from_csv(evidence_path)?;

    let path = match evidence.dims() {
        1 => model.decode(&evidence.column(0))?,
        2 => model.decode_nd(&evidence.points::<2>()?)?,
        3 => model.decode_nd(&evidence.points::<3>()?)?,
        d => anyhow::bail!("unsupported number of dimensions: {}", d),
    };

    print_path(&model.word, &path);
    Ok(())
}

fn run_demo(seed: u64, noise: f64, out_dir: Option<&Path>) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    // Two tracked coordinates moving through three phases
    let gesture = SyntheticGesture::new(vec![[0.0, 4.0, 8.0], [6.0, 2.0, 5.0]], noise)?;

    println!("{}", "Generating training examples...".cyan());
    let training = gesture.training_set("wave", [24, 30, 36], &mut rng)?;

    if let Some(dir) = out_dir {
        std::fs::create_dir_all(dir)?;
        for (k, example) in training.examples.iter().enumerate() {
            let path = dir.join(format!("wave_{}.csv", k));
            example.to_csv(&path, &["x", "y"])?;
        }
        println!("{}", format!("Wrote examples to {}", dir.display()).green());
    }

    println!("{}", "Segmenting...".cyan());
    let model = training.train(&SequenceSegmenter::new())?;

    println!("{}", "Decoding a fresh recording...".cyan());
    let recording = gesture.generate(27, &mut rng);
    let path = model.decode_nd(&recording.points::<2>()?)?;
    print_path(&model.word, &path);

    let truth = SyntheticGesture::true_states(recording.len());
    let agree = truth.iter().zip(&path.states).filter(|(a, b)| a == b).count();
    let accuracy = agree as f64 / truth.len() as f64;
    let accuracy_str = format!("{:.1}%", accuracy * 100.0);
    println!(
        "  Agreement with true states: {}",
        if accuracy >= 0.9 { accuracy_str.green() } else { accuracy_str.red() }
    );

    Ok(())
}

fn print_path(word: &str, path: &GesturePath) {
    println!("\n{}", format!("=== {} ===", word).bold());
    if path.is_empty() {
        println!("  (empty evidence)");
        return;
    }
    let labels: Vec<String> = path.labels().iter().map(|l| l.to_string()).collect();
    println!("  Path:            {}", labels.join(" "));
    let [d1, d2, d3] = path.dwell_counts();
    println!("  Dwell:           {} / {} / {}", d1, d2, d3);
    println!("  Log probability: {:.4}", path.log_probability);
}
