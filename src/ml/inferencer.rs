// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::Result;
use burn::prelude::*;

use crate::domain::charset::Charset;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::MolEncoder;

// Encoding a handful of molecules is cheap — stay on the CPU backend
type InferBackend = burn::backend::NdArray;

/// Loads a trained encoder and maps SMILES strings into the
/// latent space. Only the encoder half of the checkpoint is
/// needed for this.
pub struct Inferencer {
    encoder: MolEncoder<InferBackend>,
    charset: Charset,
    pad_to:  usize,
    device:  <InferBackend as Backend>::Device,
}

impl Inferencer {
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, charset: Charset) -> Result<Self> {
        let device = Default::default();
        let cfg = ckpt_manager.load_config()?;
        let encoder = ckpt_manager.load_encoder(cfg.init_encoder(&device), &device)?;
        tracing::info!("Encoder loaded from checkpoint");
        Ok(Self { encoder, charset, pad_to: cfg.seq_len, device })
    }

    /// Embed one SMILES string as its latent mean vector.
    ///
    /// Uses mu directly rather than a sample — the deterministic
    /// embedding is what downstream similarity search wants.
    pub fn encode(&self, smiles: &str) -> Result<Vec<f32>> {
        let indices = self.charset.encode(smiles, self.pad_to)?;
        let vocab = self.charset.len();

        // One-hot [1, pad_to, vocab], same layout the batcher produces
        let mut flat = vec![0.0f32; self.pad_to * vocab];
        for (pos, &idx) in indices.iter().enumerate() {
            flat[pos * vocab + idx as usize] = 1.0;
        }
        let one_hot = Tensor::<InferBackend, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([1, self.pad_to, vocab]);

        let (mu, _logvar) = self.encoder.forward(one_hot);
        let latent = mu
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read latent tensor: {e:?}"))?;

        tracing::debug!("Encoded {:?} into {} latent dims", smiles, latent.len());
        Ok(latent)
    }
}
