// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the preprocessed dataset
// file all the way to device-ready tensor batches.
//
// The pipeline flows in this order:
//
//   dataset.json
//       │
//       ▼
//   JsonDatasetLoader → reads charset + train/val splits
//       │
//       ▼
//   Charset.encode    → SMILES → padded index sequences
//       │
//       ▼
//   SmilesDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   SmilesBatcher     → stacks samples into one-hot batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads the preprocessed dataset file
pub mod loader;

/// Implements Burn's Dataset trait for index-encoded molecules
pub mod dataset;

/// Implements Burn's Batcher trait to create one-hot tensor batches
pub mod batcher;
