// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Loads the preprocessed dataset from a single JSON file.
//
// The file is produced by an upstream preprocessing step and
// already contains everything training needs:
//
//   {
//     "charset": "Cc1()=NO ... ",
//     "pad_to": 120,
//     "train": ["CC(=O)Oc1ccccc1", ...],
//     "val":   ["c1ccncc1", ...]
//   }
//
// The charset string doubles as the class ordering of the
// model's output softmax, so it is loaded verbatim — never
// re-derived from the SMILES strings.
//
// Reference: Rust Book §9 (Error Handling)
//            serde_json crate documentation

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::corpus::SmilesCorpus;
use crate::domain::traits::DatasetSource;

/// Loads a preprocessed SMILES corpus from a JSON dataset file.
/// Implements the DatasetSource trait from Layer 3.
pub struct JsonDatasetLoader {
    /// Path to the dataset file
    path: PathBuf,
}

impl JsonDatasetLoader {
    /// Create a new loader pointed at a dataset file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Implement the DatasetSource trait so the application layer
/// can call load() without knowing about the file format
impl DatasetSource for JsonDatasetLoader {
    fn load(&self) -> Result<SmilesCorpus> {
        let text = fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read dataset file '{}'", self.path.display()))?;

        let corpus: SmilesCorpus = serde_json::from_str(&text)
            .with_context(|| format!("Malformed dataset file '{}'", self.path.display()))?;

        // Every string must be encodable against the charset before
        // training starts — a mismatch here means the file was not
        // preprocessed with this charset.
        for smiles in corpus.train.iter().chain(corpus.val.iter()) {
            corpus
                .charset
                .encode(smiles, corpus.pad_to)
                .with_context(|| {
                    format!("Dataset file '{}' failed validation", self.path.display())
                })?;
        }

        if corpus.train.is_empty() {
            tracing::warn!(
                "Dataset '{}' has an empty training split",
                self.path.display()
            );
        }

        tracing::info!(
            "Loaded dataset: {} train, {} val, vocab {}, pad_to {}",
            corpus.train.len(),
            corpus.val.len(),
            corpus.vocab_size(),
            corpus.pad_to,
        );

        Ok(corpus)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "smiles-loader-{}-{}.json",
            name,
            std::process::id()
        ));
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_loads_valid_dataset() {
        let path = write_temp(
            "valid",
            r#"{"charset": " CNO()=c1", "pad_to": 16, "train": ["CCO", "c1ccccc1"], "val": ["C=O"]}"#,
        );
        let corpus = JsonDatasetLoader::new(&path).load().unwrap();
        assert_eq!(corpus.train.len(), 2);
        assert_eq!(corpus.val.len(), 1);
        assert_eq!(corpus.vocab_size(), 9);
        assert_eq!(corpus.pad_to, 16);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_pad_to_defaults_to_120() {
        let path = write_temp(
            "default-pad",
            r#"{"charset": " C", "train": ["CC"], "val": []}"#,
        );
        let corpus = JsonDatasetLoader::new(&path).load().unwrap();
        assert_eq!(corpus.pad_to, 120);
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = JsonDatasetLoader::new("/nonexistent/dataset.json")
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("dataset.json"));
    }

    #[test]
    fn test_rejects_smiles_outside_charset() {
        // 'N' appears in the training split but not in the charset
        let path = write_temp(
            "bad-char",
            r#"{"charset": " C", "pad_to": 8, "train": ["CN"], "val": []}"#,
        );
        assert!(JsonDatasetLoader::new(&path).load().is_err());
        fs::remove_file(path).ok();
    }
}
