// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// Traits are Rust's way of defining shared behaviour —
// similar to interfaces in Java or abstract classes in Python.
//
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - JsonDatasetLoader implements DatasetSource
//   - A future Hdf5Loader could also implement DatasetSource
//   - The application layer only sees DatasetSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)
//            Rust Book §17 (Object Oriented Patterns)

use anyhow::Result;
use crate::domain::corpus::SmilesCorpus;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Any component that can load a preprocessed molecular corpus.
///
/// Implementations:
///   - JsonDatasetLoader → loads from a single JSON dataset file
///   - (future) Hdf5Loader → loads from an HDF5 archive
pub trait DatasetSource {
    /// Load the full corpus (charset plus both splits).
    /// Returns the corpus or an error.
    fn load(&self) -> Result<SmilesCorpus>;
}
