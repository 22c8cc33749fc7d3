// ============================================================
// Layer 3 — Corpus Domain Type
// ============================================================
// The preprocessed dataset as the application layer sees it:
// a charset, a fixed sequence length, and two pre-split lists
// of SMILES strings. Splitting happens upstream in whatever
// tool produced the dataset file, so both splits arrive ready
// to use.

use serde::{Deserialize, Serialize};

use crate::domain::charset::Charset;

fn default_pad_to() -> usize {
    120
}

/// A preprocessed molecular corpus: vocabulary plus train and
/// validation splits. Deserialised straight from the dataset
/// JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmilesCorpus {
    /// The character vocabulary, in model class order
    pub charset: Charset,

    /// Fixed length every SMILES string is padded to
    #[serde(default = "default_pad_to")]
    pub pad_to: usize,

    /// Training split — used for parameter updates
    pub train: Vec<String>,

    /// Validation split — used for loss measurement only
    pub val: Vec<String>,
}

impl SmilesCorpus {
    /// Vocabulary size, i.e. the number of model output classes
    pub fn vocab_size(&self) -> usize {
        self.charset.len()
    }
}
