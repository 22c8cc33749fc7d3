// ============================================================
// Layer 4 — SMILES Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<SmilesSample>
// into device-ready tensors.
//
// What is a Batcher?
//   A Batcher takes a list of individual samples and stacks
//   them into a single batch tensor. This is necessary because
//   accelerators are most efficient when processing many
//   samples at once.
//
// How batching works here:
//   Input:  Vec of N SmilesSamples, each with sequences of length S
//   Output: SmilesBatch with
//     one_hot: [N, S, V] float — the model input, V = vocab size
//     targets: [N, S]    int   — reconstruction targets
//
//   The one-hot planes are built on the CPU as one flat Vec<f32>
//   and reshaped once, so each batch costs a single host→device
//   transfer.
//
// Why is this easy here?
//   Because all sequences are already padded to the same length
//   in SmilesSample. If they weren't, we'd need dynamic padding.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::SmilesSample;

// ─── SmilesBatch ──────────────────────────────────────────────────────────────
/// A batch of molecules ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. Wgpu, NdArray) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct SmilesBatch<B: Backend> {
    /// One-hot encoded characters — shape: [batch_size, seq_len, vocab_size]
    pub one_hot: Tensor<B, 3>,

    /// Character class targets — shape: [batch_size, seq_len]
    /// Row i is sample i's index sequence, used as the
    /// reconstruction target
    pub targets: Tensor<B, 2, Int>,
}

// ─── SmilesBatcher ────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct GPU/CPU, and the vocabulary size
/// needed to shape the one-hot planes.
#[derive(Clone, Debug)]
pub struct SmilesBatcher<B: Backend> {
    /// The device to create tensors on
    pub device: B::Device,

    /// Number of character classes, the one-hot depth
    pub vocab_size: usize,
}

impl<B: Backend> SmilesBatcher<B> {
    /// Create a new batcher for the given device and vocabulary
    pub fn new(device: B::Device, vocab_size: usize) -> Self {
        Self { device, vocab_size }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// This is what makes SmilesBatcher work with Burn's DataLoader.
// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<SmilesSample, SmilesBatch<B>> for SmilesBatcher<B> {
    fn batch(&self, items: Vec<SmilesSample>) -> SmilesBatch<B> {
        let batch_size = items.len();
        // All sequences have the same length (pre-padded)
        let seq_len = items[0].indices.len();

        // ── Build the one-hot planes ──────────────────────────────────────────
        // One flat Vec<f32> of batch * seq * vocab zeros with a 1.0
        // at each character's class slot
        let mut one_hot_flat = vec![0.0f32; batch_size * seq_len * self.vocab_size];
        for (n, sample) in items.iter().enumerate() {
            for (s, &idx) in sample.indices.iter().enumerate() {
                one_hot_flat[(n * seq_len + s) * self.vocab_size + idx as usize] = 1.0;
            }
        }

        // ── Flatten targets ───────────────────────────────────────────────────
        // We go from Vec<Vec<u32>> to Vec<i32> (Burn uses i32 for Int tensors)
        let target_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.indices.iter().map(|&x| x as i32))
            .collect();

        // ── Create tensors ────────────────────────────────────────────────────
        // 1D tensors from the flat Vecs, then .reshape() gives the
        // correct [batch, seq, vocab] / [batch, seq] shapes

        let one_hot = Tensor::<B, 1>::from_floats(one_hot_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len, self.vocab_size]);

        let targets = Tensor::<B, 1, Int>::from_ints(target_flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        SmilesBatch { one_hot, targets }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let batcher = SmilesBatcher::<TestBackend>::new(device, 4);
        let items = vec![
            SmilesSample { indices: vec![1, 2, 0] },
            SmilesSample { indices: vec![3, 0, 0] },
        ];
        let batch = batcher.batch(items);
        assert_eq!(batch.one_hot.dims(), [2, 3, 4]);
        assert_eq!(batch.targets.dims(), [2, 3]);
    }

    #[test]
    fn test_one_hot_marks_exactly_one_class_per_position() {
        let device = Default::default();
        let batcher = SmilesBatcher::<TestBackend>::new(device, 3);
        let batch = batcher.batch(vec![SmilesSample { indices: vec![2, 0] }]);

        let values: Vec<f32> = batch.one_hot.into_data().to_vec::<f32>().unwrap();
        // Position 0 is class 2, position 1 is class 0
        assert_eq!(values, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    }
}
