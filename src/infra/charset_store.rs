// ============================================================
// Layer 6 — Charset Store
// ============================================================
// Persists the character vocabulary next to the checkpoints.
//
// The charset's index order is baked into the trained weights
// (index i is output class i), so encoding must use exactly the
// charset training used. Training writes it here; the encode
// command reads it back instead of trusting whatever dataset
// file happens to be around.

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};

use crate::domain::charset::Charset;

const CHARSET_FILE: &str = "charset.json";

pub struct CharsetStore {
    dir: PathBuf,
}

impl CharsetStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Write the charset used for this training run,
    /// overwriting any previous one.
    pub fn save(&self, charset: &Charset) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(CHARSET_FILE);
        fs::write(&path, serde_json::to_string(charset)?)
            .with_context(|| format!("Cannot write charset to '{}'", path.display()))?;
        tracing::debug!("Saved charset ({} characters)", charset.len());
        Ok(())
    }

    /// Load the charset a previous training run stored.
    pub fn load(&self) -> Result<Charset> {
        let path = self.dir.join(CHARSET_FILE);
        let s = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read charset from '{}'. Have you run 'train' first?",
                path.display()
            )
        })?;
        Ok(serde_json::from_str(&s)?)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = std::env::temp_dir().join(format!("smiles-charset-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let store = CharsetStore::new(dir.display().to_string());
        let charset = Charset::new(vec![' ', 'C', 'N', '=']).unwrap();
        store.save(&charset).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded.index_of('N'), Some(2));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_without_saved_charset_is_an_error() {
        let dir = std::env::temp_dir().join(format!("smiles-charset-miss-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        let store = CharsetStore::new(dir.display().to_string());
        assert!(store.load().is_err());
    }
}
