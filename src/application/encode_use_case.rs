// ============================================================
// Layer 2 — Encode Use Case
// ============================================================
// Embeds a SMILES string with a trained encoder:
//   1. Load the charset the training run stored
//   2. Rebuild the encoder from the saved config + weights
//   3. Encode the molecule into its latent mean vector

use anyhow::Result;

use crate::infra::{charset_store::CharsetStore, checkpoint::CheckpointManager};
use crate::ml::inferencer::Inferencer;

pub struct EncodeUseCase {
    inferencer: Inferencer,
}

impl EncodeUseCase {
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let charset = CharsetStore::new(&checkpoint_dir).load()?;
        let ckpt = CheckpointManager::new(&checkpoint_dir);
        let inferencer = Inferencer::from_checkpoint(&ckpt, charset)?;
        Ok(Self { inferencer })
    }

    /// Latent mean vector for one molecule
    pub fn encode(&self, smiles: &str) -> Result<Vec<f32>> {
        self.inferencer.encode(smiles)
    }
}
