// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs    — Saving and loading training snapshots
//                      Uses Burn's CompactRecorder for encoder,
//                      decoder, and optimizer records, plus JSON
//                      metadata ({epoch, avg_val_loss}) and the
//                      model architecture config.
//
//   charset_store.rs — Charset persistence
//                      Writes the training run's character
//                      vocabulary next to the checkpoints so
//                      encoding uses the exact same class order.
//
//   metrics.rs       — Training metrics logging
//                      Writes epoch-level metrics (losses,
//                      learning rate) to a CSV file for later
//                      analysis and plotting.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here:
//   - Prevents duplication across layers
//   - Makes it easy to swap implementations
//     (e.g. swap file checkpoints for S3 cloud storage)
//   - Keeps other layers focused on their core logic
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Training snapshot saving and loading
pub mod checkpoint;

/// Charset saving and loading
pub mod charset_store;

/// Training metrics CSV logger
pub mod metrics;
