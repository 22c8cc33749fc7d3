// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the dataset file     (Layer 4 - data)
//   Step 2: Encode both splits        (Layer 4 - data)
//   Step 3: Persist charset + config  (Layer 6 - infra)
//   Step 4: Pick the backend          (cuda flag)
//   Step 5: Run training loop         (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::Result;
use burn::backend::{Autodiff, NdArray, Wgpu};
use serde::{Deserialize, Serialize};

use crate::data::{dataset::SmilesDataset, loader::JsonDatasetLoader};
use crate::domain::traits::DatasetSource;
use crate::infra::{
    charset_store::CharsetStore,
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
};
use crate::ml::model::MolAutoencoderConfig;
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run, fixed at CLI parse time.
// Serialisable so a run's settings can be kept alongside its
// checkpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset:        String,
    pub checkpoint_dir: String,
    pub num_epochs:     usize,
    pub batch_size:     usize,
    pub learning_rate:  f64,
    pub weight_decay:   f64,
    pub momentum:       f64,
    pub cuda:           bool,
    pub cont:           bool,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset:        "dataset.json".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            num_epochs:     1,
            batch_size:     250,
            learning_rate:  1e-3,
            weight_decay:   0.0,
            momentum:       0.9,
            cuda:           false,
            cont:           false,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full training pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the preprocessed dataset ─────────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.dataset);
        let corpus = JsonDatasetLoader::new(&cfg.dataset).load()?;

        // ── Step 2: Encode both splits against the charset ────────────────────
        let train_dataset =
            SmilesDataset::from_smiles(&corpus.charset, corpus.pad_to, &corpus.train)?;
        let val_dataset =
            SmilesDataset::from_smiles(&corpus.charset, corpus.pad_to, &corpus.val)?;
        tracing::info!(
            "Encoded {} training and {} validation molecules",
            train_dataset.sample_count(),
            val_dataset.sample_count(),
        );

        // ── Step 3: Persist charset and model config for the encode command ───
        // The charset's index order and the module shapes must match
        // exactly when the checkpoint is reopened later.
        let model_cfg = MolAutoencoderConfig::new(corpus.vocab_size(), corpus.pad_to);

        CharsetStore::new(&cfg.checkpoint_dir).save(&corpus.charset)?;
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(&model_cfg)?;

        let metrics = MetricsLogger::new(&cfg.checkpoint_dir)?;

        // ── Step 4 + 5: Pick the backend and run the loop ─────────────────────
        // The cuda flag selects the whole backend type; both arms run
        // the same generic loop.
        if cfg.cuda {
            let device = burn::backend::wgpu::WgpuDevice::default();
            tracing::info!("Using WGPU device: {:?}", device);
            run_training::<Autodiff<Wgpu>>(
                cfg, &model_cfg, train_dataset, val_dataset, ckpt_manager, metrics, device,
            )
        } else {
            let device = burn::backend::ndarray::NdArrayDevice::Cpu;
            tracing::info!("Using CPU (NdArray) backend");
            run_training::<Autodiff<NdArray>>(
                cfg, &model_cfg, train_dataset, val_dataset, ckpt_manager, metrics, device,
            )
        }
    }
}
