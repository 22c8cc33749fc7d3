use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        gru::{Gru, GruConfig},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::Distribution,
};

// Convolution geometry over the character axis. Three valid
// convolutions shave kernel-1 positions each, so the flattened
// width is CONV3_CHANNELS * (seq_len - CONV_SPAN).
const CONV1_CHANNELS: usize = 9;
const CONV2_CHANNELS: usize = 9;
const CONV3_CHANNELS: usize = 10;
const CONV1_KERNEL: usize = 9;
const CONV2_KERNEL: usize = 9;
const CONV3_KERNEL: usize = 11;
const CONV_SPAN: usize = (CONV1_KERNEL - 1) + (CONV2_KERNEL - 1) + (CONV3_KERNEL - 1);

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct MolAutoencoderConfig {
    pub vocab_size: usize,
    pub seq_len: usize,
    #[config(default = 292)]
    pub latent_dim: usize,
    #[config(default = 435)]
    pub dense_dim: usize,
    #[config(default = 501)]
    pub gru_hidden: usize,
    #[config(default = 3)]
    pub gru_layers: usize,
}

impl MolAutoencoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MolAutoencoder<B> {
        MolAutoencoder {
            encoder: self.init_encoder(device),
            decoder: self.init_decoder(device),
        }
    }

    pub fn init_encoder<B: Backend>(&self, device: &B::Device) -> MolEncoder<B> {
        assert!(
            self.seq_len > CONV_SPAN,
            "seq_len ({}) must exceed the convolution span ({})",
            self.seq_len,
            CONV_SPAN
        );
        let conv_width = CONV3_CHANNELS * (self.seq_len - CONV_SPAN);
        MolEncoder {
            conv1: Conv1dConfig::new(self.vocab_size, CONV1_CHANNELS, CONV1_KERNEL).init(device),
            conv2: Conv1dConfig::new(CONV1_CHANNELS, CONV2_CHANNELS, CONV2_KERNEL).init(device),
            conv3: Conv1dConfig::new(CONV2_CHANNELS, CONV3_CHANNELS, CONV3_KERNEL).init(device),
            dense: LinearConfig::new(conv_width, self.dense_dim).init(device),
            mu_head: LinearConfig::new(self.dense_dim, self.latent_dim).init(device),
            logvar_head: LinearConfig::new(self.dense_dim, self.latent_dim).init(device),
        }
    }

    pub fn init_decoder<B: Backend>(&self, device: &B::Device) -> MolDecoder<B> {
        // First GRU reads the repeated latent code, the rest read the
        // previous layer's hidden states
        let grus: Vec<Gru<B>> = (0..self.gru_layers)
            .map(|i| {
                let d_input = if i == 0 { self.latent_dim } else { self.gru_hidden };
                GruConfig::new(d_input, self.gru_hidden, true).init(device)
            })
            .collect();
        MolDecoder {
            expand: LinearConfig::new(self.latent_dim, self.latent_dim).init(device),
            grus,
            proj: LinearConfig::new(self.gru_hidden, self.vocab_size).init(device),
            seq_len: self.seq_len,
        }
    }
}

/// Maps a one-hot character grid to a latent Gaussian.
#[derive(Module, Debug)]
pub struct MolEncoder<B: Backend> {
    pub conv1: Conv1d<B>,
    pub conv2: Conv1d<B>,
    pub conv3: Conv1d<B>,
    pub dense: Linear<B>,
    pub mu_head: Linear<B>,
    pub logvar_head: Linear<B>,
}

impl<B: Backend> MolEncoder<B> {
    /// one_hot: [batch, seq_len, vocab] → (mu, logvar): [batch, latent]
    pub fn forward(&self, one_hot: Tensor<B, 3>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        // Conv1d wants [batch, channels, length] — the character
        // classes are the input channels
        let x = one_hot.swap_dims(1, 2);
        let x = burn::tensor::activation::relu(self.conv1.forward(x));
        let x = burn::tensor::activation::relu(self.conv2.forward(x));
        let x = burn::tensor::activation::relu(self.conv3.forward(x));
        let x = x.flatten::<2>(1, 2); // [batch, channels * length]
        let x = burn::tensor::activation::relu(self.dense.forward(x));
        (self.mu_head.forward(x.clone()), self.logvar_head.forward(x))
    }

    /// Reparameterisation trick: z = mu + eps * exp(logvar / 2)
    /// with eps drawn from the unit Gaussian, so the sampling stays
    /// differentiable with respect to mu and logvar.
    pub fn sample(&self, mu: Tensor<B, 2>, logvar: Tensor<B, 2>) -> Tensor<B, 2> {
        let std = (logvar * 0.5).exp();
        let eps = Tensor::random(std.dims(), Distribution::Normal(0.0, 1.0), &std.device());
        mu + eps * std
    }
}

/// Maps a latent code back to per-position character logits.
#[derive(Module, Debug)]
pub struct MolDecoder<B: Backend> {
    pub expand: Linear<B>,
    pub grus: Vec<Gru<B>>,
    pub proj: Linear<B>,
    pub seq_len: usize,
}

impl<B: Backend> MolDecoder<B> {
    /// z: [batch, latent] → logits: [batch, seq_len, vocab]
    pub fn forward(&self, z: Tensor<B, 2>) -> Tensor<B, 3> {
        let [batch_size, latent_dim] = z.dims();
        let x = burn::tensor::activation::relu(self.expand.forward(z));

        // Repeat the code at every sequence position so the GRU stack
        // sees the same summary while unrolling the reconstruction
        let mut x = x
            .reshape([batch_size, 1, latent_dim])
            .expand([batch_size, self.seq_len, latent_dim]);
        for gru in &self.grus {
            x = gru.forward(x, None);
        }
        self.proj.forward(x)
    }
}

/// The encoder/decoder pair as one trainable module — a single
/// optimizer drives both halves.
#[derive(Module, Debug)]
pub struct MolAutoencoder<B: Backend> {
    pub encoder: MolEncoder<B>,
    pub decoder: MolDecoder<B>,
}

pub struct MolAutoencoderOutput<B: Backend> {
    pub logits: Tensor<B, 3>,
    pub mu: Tensor<B, 2>,
    pub logvar: Tensor<B, 2>,
}

impl<B: Backend> MolAutoencoder<B> {
    /// one_hot: [batch, seq_len, vocab] → reconstruction logits + latent stats
    pub fn forward(&self, one_hot: Tensor<B, 3>) -> MolAutoencoderOutput<B> {
        let (mu, logvar) = self.encoder.forward(one_hot);
        let z = self.encoder.sample(mu.clone(), logvar.clone());
        let logits = self.decoder.forward(z);
        MolAutoencoderOutput { logits, mu, logvar }
    }

    /// Loss = per-character cross-entropy + KL(q(z|x) ‖ N(0, I)),
    /// KL averaged over the batch.
    pub fn forward_loss(
        &self,
        one_hot: Tensor<B, 3>,
        targets: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, MolAutoencoderOutput<B>) {
        let output = self.forward(one_hot);
        let [batch_size, seq_len, vocab] = output.logits.dims();

        let ce = burn::nn::loss::CrossEntropyLossConfig::new()
            .init(&output.logits.device());
        let recon = ce.forward(
            output.logits.clone().reshape([batch_size * seq_len, vocab]),
            targets.reshape([batch_size * seq_len]),
        );

        let kl = (output.mu.clone().powf_scalar(2.0) + output.logvar.clone().exp()
            - output.logvar.clone()
            - 1.0)
            .sum_dim(1)
            .mean()
            * 0.5;

        (recon + kl, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    fn small_config() -> MolAutoencoderConfig {
        MolAutoencoderConfig::new(5, 30)
            .with_latent_dim(4)
            .with_dense_dim(8)
            .with_gru_hidden(8)
            .with_gru_layers(2)
    }

    fn one_hot_batch(batch: usize, seq: usize, vocab: usize) -> Tensor<TestBackend, 3> {
        // Every position is class 0 — enough to exercise shapes
        let mut flat = vec![0.0f32; batch * seq * vocab];
        for pos in 0..batch * seq {
            flat[pos * vocab] = 1.0;
        }
        Tensor::<TestBackend, 1>::from_floats(flat.as_slice(), &Default::default())
            .reshape([batch, seq, vocab])
    }

    #[test]
    fn test_forward_shapes() {
        let device = Default::default();
        let model: MolAutoencoder<TestBackend> = small_config().init(&device);
        let out = model.forward(one_hot_batch(2, 30, 5));
        assert_eq!(out.logits.dims(), [2, 30, 5]);
        assert_eq!(out.mu.dims(), [2, 4]);
        assert_eq!(out.logvar.dims(), [2, 4]);
    }

    #[test]
    fn test_loss_is_finite() {
        let device = Default::default();
        let model: MolAutoencoder<TestBackend> = small_config().init(&device);
        let targets = Tensor::<TestBackend, 1, Int>::from_ints(
            vec![0i32; 60].as_slice(),
            &device,
        )
        .reshape([2, 30]);
        let (loss, _) = model.forward_loss(one_hot_batch(2, 30, 5), targets);
        let value: f64 = loss.into_scalar().elem::<f64>();
        assert!(value.is_finite());
        // Cross-entropy over 5 classes plus a non-negative KL term
        assert!(value > 0.0);
    }

    #[test]
    #[should_panic(expected = "seq_len")]
    fn test_rejects_sequences_shorter_than_conv_span() {
        let device: <TestBackend as Backend>::Device = Default::default();
        let _ = MolAutoencoderConfig::new(5, 10).init::<TestBackend>(&device);
    }
}
