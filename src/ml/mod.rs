// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data layer's tensor plumbing.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without a GPU
//   - The model architecture is clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   model.rs     — The encoder/decoder pair
//                  • MolEncoder: Conv1d stack over the character
//                    axis, dense bottleneck, mu/logvar heads with
//                    reparameterised sampling
//                  • MolDecoder: dense expansion, repeated code,
//                    GRU stack, per-position character logits
//                  • MolAutoencoder: both halves as one trainable
//                    module with the combined CE + KL loss
//
//   trainer.rs   — The training loop
//                  Fresh-vs-resumed start, SGD with momentum and
//                  weight decay, epoch loop with validation,
//                  plateau LR policy, per-epoch checkpointing
//
//   scheduler.rs — Plateau learning-rate policy
//
//   inferencer.rs — Loads a checkpoint and embeds SMILES strings
//                   into the latent space
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)
//            Gómez-Bombarelli et al. (2018) - automatic chemical
//            design with molecular autoencoders

/// Encoder/decoder architecture
pub mod model;

/// Full training loop with validation and checkpointing
pub mod trainer;

/// Plateau-triggered learning-rate reduction
pub mod scheduler;

/// Inference engine — loads a checkpoint and encodes molecules
pub mod inferencer;
