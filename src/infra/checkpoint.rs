// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores training state using Burn's CompactRecorder.
//
// What gets saved per epoch:
//   1. encoder.mpk.gz   — encoder weights
//   2. decoder.mpk.gz   — decoder weights
//   3. optimizer.mpk.gz — SGD momentum buffers
//   4. checkpoint.json  — { epoch, avg_val_loss }
//
// When the epoch is a strict improvement the same four files are
// additionally copied under best_* names, so the best snapshot
// survives later, worse epochs. The latest snapshot is always
// overwritten — resume continues from wherever training stopped,
// not from the best epoch.
//
// Why save the model config separately?
//   When loading for encoding, we need the exact architecture
//   (latent_dim, seq_len, etc.) to rebuild the modules before
//   loading the weights into them.
//
// Burn's CompactRecorder:
//   - Serialises parameters to MessagePack format
//   - Compresses with gzip for smaller file size
//   - Type-safe: loading fails if architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use burn::{
    module::AutodiffModule,
    optim::Optimizer,
    prelude::*,
    record::{HalfPrecisionSettings, NamedMpkGzFileRecorder, Record, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::ml::model::{MolAutoencoder, MolAutoencoderConfig, MolDecoder, MolEncoder};

// Recorder used for all tensor snapshots. This is the gzip-compressed
// named-msgpack recorder, which appends ".mpk.gz" itself (matching
// RECORD_EXT below). HalfPrecisionSettings keeps the on-disk weights
// in half precision.
type CkptRecorder = NamedMpkGzFileRecorder<HalfPrecisionSettings>;

// File stems — the recorder appends ".mpk.gz" itself
const ENCODER_FILE: &str = "encoder";
const DECODER_FILE: &str = "decoder";
const OPTIMIZER_FILE: &str = "optimizer";
const RECORD_EXT: &str = "mpk.gz";

const META_FILE: &str = "checkpoint.json";
const BEST_META_FILE: &str = "best.json";
const CONFIG_FILE: &str = "model_config.json";

/// The non-tensor half of a checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMeta {
    /// Epoch this snapshot was taken after (1-based)
    pub epoch: usize,

    /// Average validation loss of that epoch — becomes the
    /// starting best loss when the run is resumed
    pub avg_val_loss: f64,
}

/// Manages saving and loading of training checkpoints.
/// All files are stored in the configured directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a new CheckpointManager.
    /// Creates the directory if it doesn't already exist.
    pub fn new(dir: impl Into<String>) -> Self {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir).ok();
        Self { dir }
    }

    /// True when a resumable snapshot exists — the existence check
    /// that gates --cont.
    pub fn has_checkpoint(&self) -> bool {
        self.dir.join(META_FILE).exists()
    }

    /// Write the full snapshot for one epoch.
    ///
    /// Always overwrites the latest files; refreshes the best_*
    /// copies only when `is_best` is set.
    pub fn save<B: AutodiffBackend>(
        &self,
        model: &MolAutoencoder<B>,
        optim_record: impl Record<B>,
        meta: &CheckpointMeta,
        is_best: bool,
    ) -> Result<()> {
        let recorder = CkptRecorder::new();

        recorder
            .record(model.encoder.clone().into_record(), self.dir.join(ENCODER_FILE))
            .with_context(|| format!("Failed to save encoder to '{}'", self.dir.display()))?;
        recorder
            .record(model.decoder.clone().into_record(), self.dir.join(DECODER_FILE))
            .with_context(|| format!("Failed to save decoder to '{}'", self.dir.display()))?;
        recorder
            .record(optim_record, self.dir.join(OPTIMIZER_FILE))
            .with_context(|| format!("Failed to save optimizer to '{}'", self.dir.display()))?;

        let meta_path = self.dir.join(META_FILE);
        fs::write(&meta_path, serde_json::to_string_pretty(meta)?)
            .with_context(|| format!("Failed to write '{}'", meta_path.display()))?;

        if is_best {
            for stem in [ENCODER_FILE, DECODER_FILE, OPTIMIZER_FILE] {
                let from = self.dir.join(format!("{stem}.{RECORD_EXT}"));
                let to = self.dir.join(format!("best_{stem}.{RECORD_EXT}"));
                fs::copy(&from, &to)
                    .with_context(|| format!("Failed to copy '{}'", from.display()))?;
            }
            fs::copy(&meta_path, self.dir.join(BEST_META_FILE))
                .with_context(|| "Failed to copy checkpoint metadata")?;
            tracing::debug!("New best checkpoint (avg_val_loss={:.4})", meta.avg_val_loss);
        }

        Ok(())
    }

    /// Read the latest snapshot's metadata.
    pub fn load_meta(&self) -> Result<CheckpointMeta> {
        let path = self.dir.join(META_FILE);
        let s = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read '{}'. Have you run 'train' first?",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&s)?)
    }

    /// Restore encoder weights into a freshly initialised module.
    /// The module must have the architecture the snapshot was
    /// saved with, or loading fails.
    pub fn load_encoder<B: Backend>(
        &self,
        encoder: MolEncoder<B>,
        device: &B::Device,
    ) -> Result<MolEncoder<B>> {
        let path = self.dir.join(ENCODER_FILE);
        let record = CkptRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load encoder record '{}'", path.display()))?;
        Ok(encoder.load_record(record))
    }

    /// Restore decoder weights into a freshly initialised module.
    pub fn load_decoder<B: Backend>(
        &self,
        decoder: MolDecoder<B>,
        device: &B::Device,
    ) -> Result<MolDecoder<B>> {
        let path = self.dir.join(DECODER_FILE);
        let record = CkptRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load decoder record '{}'", path.display()))?;
        Ok(decoder.load_record(record))
    }

    /// Restore optimizer state (momentum buffers) into a freshly
    /// configured optimizer. Hyperparameters are NOT part of the
    /// record — they always come from the current configuration.
    pub fn load_optimizer<B, M, O>(&self, optim: O, device: &B::Device) -> Result<O>
    where
        B: AutodiffBackend,
        M: AutodiffModule<B>,
        O: Optimizer<M, B>,
    {
        let path = self.dir.join(OPTIMIZER_FILE);
        let record = CkptRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load optimizer record '{}'", path.display()))?;
        Ok(optim.load_record(record))
    }

    /// Save the model architecture config to JSON.
    ///
    /// Must be called before training starts so the encode command
    /// can reconstruct the exact module shapes later.
    pub fn save_config(&self, cfg: &MolAutoencoderConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        cfg.save(&path)
            .with_context(|| format!("Cannot write model config to '{}'", path.display()))?;
        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    /// Load the model architecture config from JSON.
    pub fn load_config(&self) -> Result<MolAutoencoderConfig> {
        let path = self.dir.join(CONFIG_FILE);
        MolAutoencoderConfig::load(&path).map_err(|e| {
            anyhow::anyhow!(
                "Cannot load model config from '{}': {e}. \
                 Make sure you have run 'train' before 'encode'.",
                path.display()
            )
        })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "smiles-ckpt-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_has_checkpoint_false_on_empty_dir() {
        let dir = test_dir("empty");
        let ckpt = CheckpointManager::new(dir.display().to_string());
        assert!(!ckpt.has_checkpoint());
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_config_round_trip() {
        let dir = test_dir("config");
        let ckpt = CheckpointManager::new(dir.display().to_string());
        let cfg = MolAutoencoderConfig::new(7, 40).with_latent_dim(16);
        ckpt.save_config(&cfg).unwrap();
        let loaded = ckpt.load_config().unwrap();
        assert_eq!(loaded.vocab_size, 7);
        assert_eq!(loaded.seq_len, 40);
        assert_eq!(loaded.latent_dim, 16);
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_meta_without_checkpoint_is_an_error() {
        let dir = test_dir("no-meta");
        let ckpt = CheckpointManager::new(dir.display().to_string());
        assert!(ckpt.load_meta().is_err());
        fs::remove_dir_all(dir).ok();
    }
}
