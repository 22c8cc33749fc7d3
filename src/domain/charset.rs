// ============================================================
// Layer 3 — Charset Domain Type
// ============================================================
// The molecular character vocabulary: an ordered set of the
// characters that may appear in a SMILES string, plus the
// padding character used to bring every string to a fixed
// length.
//
// Why character-level?
//   SMILES is a line notation where every character carries
//   chemical meaning ("C" carbon, "=" double bond, "(" branch).
//   The autoencoder reads and writes one character per
//   sequence position, so the vocabulary IS the character set.
//
// The index order matters: position i in the charset is class i
// in the model's output softmax. The order is fixed by the
// preprocessed dataset file and must be identical at training
// and encoding time (see infra::charset_store).
//
// Reference: Weininger (1988) SMILES
//            Gómez-Bombarelli et al. (2018) - continuous molecular
//            representations

use std::collections::HashMap;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// The character used to pad SMILES strings to a fixed length.
/// Must be present in every charset.
pub const PAD_CHAR: char = ' ';

/// An ordered character vocabulary with O(1) lookup both ways.
///
/// Serialises as a plain string ("c1CNO= ...") so the dataset
/// file and the stored charset.json stay human-readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Charset {
    /// Characters in index order — index i is model class i
    chars: Vec<char>,

    /// Reverse lookup: character → index
    index: HashMap<char, usize>,
}

impl Charset {
    /// Build a charset from an ordered list of characters.
    ///
    /// Errors if the list is empty, contains duplicates, or is
    /// missing the padding character.
    pub fn new(chars: Vec<char>) -> Result<Self> {
        if chars.is_empty() {
            bail!("charset is empty");
        }

        let mut index = HashMap::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            if index.insert(c, i).is_some() {
                bail!("charset contains duplicate character {c:?}");
            }
        }

        if !index.contains_key(&PAD_CHAR) {
            bail!("charset is missing the padding character {PAD_CHAR:?}");
        }

        Ok(Self { chars, index })
    }

    /// Number of characters — the model's vocabulary size
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Index of a character, or None if it is not in the vocabulary
    pub fn index_of(&self, c: char) -> Option<usize> {
        self.index.get(&c).copied()
    }

    /// Character at an index, or None if out of range
    pub fn char_at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    /// Index of the padding character
    pub fn pad_index(&self) -> u32 {
        // Present by construction — Charset::new rejects charsets without it
        self.index[&PAD_CHAR] as u32
    }

    /// Encode a SMILES string into a padded index sequence of
    /// exactly `pad_to` entries.
    ///
    /// Errors on characters outside the vocabulary and on strings
    /// longer than `pad_to` — both indicate a dataset that was not
    /// preprocessed against this charset.
    pub fn encode(&self, smiles: &str, pad_to: usize) -> Result<Vec<u32>> {
        let mut indices = Vec::with_capacity(pad_to);
        for (pos, c) in smiles.chars().enumerate() {
            match self.index_of(c) {
                Some(i) => indices.push(i as u32),
                None => bail!(
                    "character {c:?} at position {pos} of {smiles:?} is not in the charset"
                ),
            }
        }
        if indices.len() > pad_to {
            bail!(
                "SMILES string {smiles:?} has {} characters, more than pad_to={pad_to}",
                indices.len()
            );
        }
        indices.resize(pad_to, self.pad_index());
        Ok(indices)
    }

    /// Decode an index sequence back into a SMILES string,
    /// trimming trailing padding.
    ///
    /// Errors on indices outside the vocabulary.
    pub fn decode(&self, indices: &[u32]) -> Result<String> {
        let mut out = String::with_capacity(indices.len());
        for &i in indices {
            match self.char_at(i as usize) {
                Some(c) => out.push(c),
                None => bail!("index {i} is outside the charset (len {})", self.len()),
            }
        }
        Ok(out.trim_end_matches(PAD_CHAR).to_string())
    }
}

// Serde goes through a plain string so "charset": "Cc1(=O)N "
// in the dataset JSON round-trips exactly.
impl TryFrom<String> for Charset {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        Charset::new(s.chars().collect())
    }
}

impl From<Charset> for String {
    fn from(c: Charset) -> String {
        c.chars.into_iter().collect()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn charset() -> Charset {
        Charset::new(vec![' ', 'C', 'N', 'O', '(', ')', '=', '1']).unwrap()
    }

    #[test]
    fn test_encode_pads_to_fixed_length() {
        let cs = charset();
        let ids = cs.encode("C=O", 6).unwrap();
        assert_eq!(ids.len(), 6);
        assert_eq!(&ids[..3], &[1, 6, 3]);
        // Trailing entries are padding
        assert_eq!(&ids[3..], &[0, 0, 0]);
    }

    #[test]
    fn test_decode_trims_trailing_padding() {
        let cs = charset();
        let ids = cs.encode("CN(C)O", 10).unwrap();
        assert_eq!(cs.decode(&ids).unwrap(), "CN(C)O");
    }

    #[test]
    fn test_unknown_character_is_an_error() {
        let cs = charset();
        let err = cs.encode("C%O", 6).unwrap_err();
        assert!(err.to_string().contains('%'));
    }

    #[test]
    fn test_too_long_string_is_an_error() {
        let cs = charset();
        assert!(cs.encode("CCCC", 3).is_err());
    }

    #[test]
    fn test_rejects_charset_without_padding() {
        assert!(Charset::new(vec!['C', 'N']).is_err());
    }

    #[test]
    fn test_rejects_duplicate_characters() {
        assert!(Charset::new(vec![' ', 'C', 'C']).is_err());
    }

    #[test]
    fn test_serialises_as_plain_string() {
        let cs = charset();
        let json = serde_json::to_string(&cs).unwrap();
        assert_eq!(json, "\" CNO()=1\"");
        let back: Charset = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), cs.len());
        assert_eq!(back.index_of('='), Some(6));
    }
}
