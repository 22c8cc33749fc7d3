// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`  — trains the autoencoder on a SMILES dataset
//   2. `encode` — loads a checkpoint and embeds a molecule
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, EncodeArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "smiles-autoencoder",
    version = "0.1.0",
    about = "Train an autoencoder on SMILES strings, then encode molecules into latent vectors."
)]
pub struct Cli {
    /// The subcommand to run (train or encode)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match &self.command {
            Commands::Train(args)  => self.run_train(args.clone()),
            Commands::Encode(args) => self.run_encode(args.clone()),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(&self, args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on dataset: {}", args.dataset);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Checkpoint saved.");
        Ok(())
    }

    /// Handles the `encode` subcommand.
    /// Loads the encoder from checkpoint and prints the latent vector.
    fn run_encode(&self, args: EncodeArgs) -> Result<()> {
        use crate::application::encode_use_case::EncodeUseCase;

        let use_case = EncodeUseCase::new(args.checkpoint_dir.clone())?;

        let latent = use_case.encode(&args.smiles)?;
        println!("{}", serde_json::to_string(&latent)?);
        Ok(())
    }
}
