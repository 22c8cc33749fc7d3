use anyhow::Result;
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::charset::Charset;

/// One index-encoded molecule, padded to the corpus sequence length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmilesSample {
    pub indices: Vec<u32>,
}

impl SmilesSample {
    pub fn seq_len(&self) -> usize {
        self.indices.len()
    }
}

pub struct SmilesDataset {
    samples: Vec<SmilesSample>,
}

impl SmilesDataset {
    pub fn new(samples: Vec<SmilesSample>) -> Self {
        Self { samples }
    }

    /// Encode a list of SMILES strings against a charset.
    /// Fails on the first string that does not fit the vocabulary.
    pub fn from_smiles(charset: &Charset, pad_to: usize, smiles: &[String]) -> Result<Self> {
        let samples = smiles
            .iter()
            .map(|s| Ok(SmilesSample { indices: charset.encode(s, pad_to)? }))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(samples))
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

impl Dataset<SmilesSample> for SmilesDataset {
    fn get(&self, index: usize) -> Option<SmilesSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_smiles_encodes_and_pads() {
        let cs = Charset::new(vec![' ', 'C', 'O']).unwrap();
        let ds = SmilesDataset::from_smiles(&cs, 8, &["CO".into(), "CCO".into()]).unwrap();
        assert_eq!(ds.sample_count(), 2);
        let first = ds.get(0).unwrap();
        assert_eq!(first.seq_len(), 8);
        assert_eq!(&first.indices[..2], &[1, 2]);
    }

    #[test]
    fn test_from_smiles_propagates_encoding_errors() {
        let cs = Charset::new(vec![' ', 'C']).unwrap();
        assert!(SmilesDataset::from_smiles(&cs, 8, &["CN".into()]).is_err());
    }

    #[test]
    fn test_get_out_of_range_is_none() {
        let ds = SmilesDataset::new(vec![]);
        assert!(ds.get(0).is_none());
    }
}
