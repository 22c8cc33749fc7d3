// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `encode`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the autoencoder on a preprocessed SMILES dataset
    Train(TrainArgs),

    /// Encode a molecule into its latent vector using a trained checkpoint
    Encode(EncodeArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the preprocessed dataset JSON file
    /// (charset + train/validation SMILES splits)
    #[arg(long)]
    pub dataset: String,

    /// Directory to save checkpoints, charset, and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Number of full passes over the training data
    #[arg(long, default_value_t = 1)]
    pub num_epochs: usize,

    /// Number of molecules processed together in one forward pass
    #[arg(long, default_value_t = 250)]
    pub batch_size: usize,

    /// Initial learning rate — the plateau policy lowers it when
    /// validation loss stops improving
    #[arg(long, default_value_t = 1e-3)]
    pub learning_rate: f64,

    /// L2 regularisation strength
    #[arg(long, default_value_t = 0.0)]
    pub weight_decay: f64,

    /// SGD momentum
    #[arg(long, default_value_t = 0.9)]
    pub momentum: f64,

    /// Use GPU acceleration (WGPU backend)
    #[arg(long)]
    pub cuda: bool,

    /// Continue from the checkpoint in --checkpoint-dir, if present
    #[arg(long)]
    pub cont: bool,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            dataset:        a.dataset,
            checkpoint_dir: a.checkpoint_dir,
            num_epochs:     a.num_epochs,
            batch_size:     a.batch_size,
            learning_rate:  a.learning_rate,
            weight_decay:   a.weight_decay,
            momentum:       a.momentum,
            cuda:           a.cuda,
            cont:           a.cont,
        }
    }
}

/// All arguments for the `encode` command
#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// The SMILES string to embed
    #[arg(long)]
    pub smiles: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
