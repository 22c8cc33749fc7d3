// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Full train + validation loop using Burn's DataLoader and SGD.
//
// Per epoch:
//   1. one pass over the training loader with parameter updates
//   2. one pass over the validation loader (no updates — the
//      model is switched to the inner backend via .valid())
//   3. plateau policy step keyed on the average validation loss
//   4. metrics row appended to the CSV log
//   5. checkpoint written unconditionally; the best-marker copy
//      is refreshed only on a strict improvement
//
// The resume-vs-fresh decision is a single two-variant value
// (Warmstart) made once up front, not an if/else threaded
// through setup.
//
// Reference: Burn Book §5, Sutskever et al. (2013) momentum SGD

use anyhow::Result;
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, momentum::MomentumConfig, GradientsParams, Optimizer, SgdConfig},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::SmilesBatcher, dataset::SmilesDataset};
use crate::infra::checkpoint::{CheckpointManager, CheckpointMeta};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{MolAutoencoder, MolAutoencoderConfig};
use crate::ml::scheduler::ReduceLrOnPlateau;

/// Best-loss sentinel for runs that do not resume
const INITIAL_BEST_LOSS: f64 = 1e6;

/// Floor for the plateau policy
const MIN_LR: f64 = 1e-5;

/// How a training run obtains its starting state.
pub enum Warmstart {
    /// Freshly initialised parameters, sentinel best loss
    Fresh,
    /// Parameters, optimizer state, and best loss restored from
    /// the latest checkpoint
    Resumed(CheckpointMeta),
}

pub fn run_training<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    model_cfg:     &MolAutoencoderConfig,
    train_dataset: SmilesDataset,
    val_dataset:   SmilesDataset,
    ckpt_manager:  CheckpointManager,
    metrics:       MetricsLogger,
    device:        B::Device,
) -> Result<()> {

    // ── Resume or start fresh ─────────────────────────────────────────────────
    // Decided once; everything below just matches on the variant.
    let warmstart = if cfg.cont && ckpt_manager.has_checkpoint() {
        Warmstart::Resumed(ckpt_manager.load_meta()?)
    } else {
        if cfg.cont {
            tracing::warn!("--cont given but no checkpoint found; starting fresh");
        }
        Warmstart::Fresh
    };

    let (mut model, mut best_loss): (MolAutoencoder<B>, f64) = match &warmstart {
        Warmstart::Fresh => (model_cfg.init(&device), INITIAL_BEST_LOSS),
        Warmstart::Resumed(meta) => {
            tracing::info!(
                "Continuing from previous checkpoint (epoch {}, avg_val_loss {:.4})",
                meta.epoch,
                meta.avg_val_loss,
            );
            let encoder = ckpt_manager.load_encoder(model_cfg.init_encoder(&device), &device)?;
            let decoder = ckpt_manager.load_decoder(model_cfg.init_decoder(&device), &device)?;
            (MolAutoencoder { encoder, decoder }, meta.avg_val_loss)
        }
    };

    // ── SGD optimiser ─────────────────────────────────────────────────────────
    // Momentum and weight decay always come from the configuration,
    // fresh or resumed — a resume restores only the state record.
    let optim_cfg = SgdConfig::new()
        .with_momentum(Some(MomentumConfig::new().with_momentum(cfg.momentum)))
        .with_weight_decay(Some(WeightDecayConfig::new(cfg.weight_decay)));
    let mut optim = optim_cfg.init();
    if let Warmstart::Resumed(_) = warmstart {
        optim = ckpt_manager.load_optimizer(optim, &device)?;
    }

    let mut scheduler = ReduceLrOnPlateau::new(cfg.learning_rate, MIN_LR);

    // ── Training data loader (AutodiffBackend) ────────────────────────────────
    let train_batcher = SmilesBatcher::<B>::new(device.clone(), model_cfg.vocab_size);
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(42)
        .num_workers(1)
        .build(train_dataset);

    // ── Validation data loader (InnerBackend — no autodiff overhead) ──────────
    let val_batcher = SmilesBatcher::<B::InnerBackend>::new(device.clone(), model_cfg.vocab_size);
    let val_loader  = DataLoaderBuilder::new(val_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(val_dataset);

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=cfg.num_epochs {
        let lr = scheduler.lr();

        // ── Training phase ────────────────────────────────────────────────────
        let mut train_loss_sum = 0.0f64;
        let mut train_batches  = 0usize;

        for batch in train_loader.iter() {
            let (loss, _) = model.forward_loss(batch.one_hot, batch.targets);

            let loss_val: f64 = loss.clone().into_scalar().elem::<f64>();
            train_loss_sum += loss_val;
            train_batches  += 1;

            // Backward pass + SGD update
            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        let avg_train_loss = if train_batches > 0 {
            train_loss_sum / train_batches as f64
        } else { f64::NAN };

        // ── Validation phase ──────────────────────────────────────────────────
        // model.valid() → MolAutoencoder<B::InnerBackend>
        let model_valid = model.valid();

        let mut val_loss_sum = 0.0f64;
        let mut val_batches  = 0usize;

        for batch in val_loader.iter() {
            let (loss, _) = model_valid.forward_loss(batch.one_hot, batch.targets);
            val_loss_sum += loss.into_scalar().elem::<f64>();
            val_batches  += 1;
        }

        let avg_val_loss = if val_batches > 0 {
            val_loss_sum / val_batches as f64
        } else { f64::NAN };

        // Adjust the rate for the following epochs
        scheduler.step(avg_val_loss);

        println!(
            "Epoch {:>3}/{} | train_loss={:.4} | val_loss={:.4} | lr={:.2e}",
            epoch, cfg.num_epochs, avg_train_loss, avg_val_loss, lr,
        );

        let row = EpochMetrics::new(epoch, avg_train_loss, avg_val_loss, lr);
        metrics.log(&row)?;

        // Strictly-below-best; a NaN validation loss is never "best"
        let is_best = row.is_improvement(best_loss);
        if is_best {
            best_loss = avg_val_loss;
        }

        ckpt_manager.save(
            &model,
            optim.to_record(),
            &CheckpointMeta { epoch, avg_val_loss },
            is_best,
        )?;
        tracing::info!("Checkpoint saved for epoch {} (is_best={})", epoch, is_best);
    }

    tracing::info!("Training complete!");
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
// Run the real loop on the NdArray backend with a toy corpus —
// slow numerics are irrelevant, the orchestration is what's under test.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::charset::Charset;
    use std::fs;
    use std::path::PathBuf;

    type TestBackend = burn::backend::Autodiff<burn::backend::NdArray>;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "smiles-trainer-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn tiny_setup() -> (Charset, MolAutoencoderConfig, SmilesDataset, SmilesDataset) {
        let charset = Charset::new(vec![' ', 'C', 'N', 'O', '=']).unwrap();
        let pad_to = 30;
        let model_cfg = MolAutoencoderConfig::new(charset.len(), pad_to)
            .with_latent_dim(4)
            .with_dense_dim(8)
            .with_gru_hidden(8)
            .with_gru_layers(1);
        let train = SmilesDataset::from_smiles(
            &charset,
            pad_to,
            &["CCO".into(), "C=O".into(), "CNC".into(), "OCO".into()],
        )
        .unwrap();
        let val =
            SmilesDataset::from_smiles(&charset, pad_to, &["CCN".into(), "NCO".into()]).unwrap();
        (charset, model_cfg, train, val)
    }

    fn train_cfg(dir: &std::path::Path, num_epochs: usize, cont: bool) -> TrainConfig {
        TrainConfig {
            dataset: "unused.json".to_string(),
            checkpoint_dir: dir.display().to_string(),
            num_epochs,
            batch_size: 2,
            learning_rate: 1e-3,
            weight_decay: 0.0,
            momentum: 0.9,
            cuda: false,
            cont,
        }
    }

    fn run(dir: &std::path::Path, num_epochs: usize, cont: bool) {
        let (_, model_cfg, train, val) = tiny_setup();
        let cfg = train_cfg(dir, num_epochs, cont);
        run_training::<TestBackend>(
            &cfg,
            &model_cfg,
            train,
            val,
            CheckpointManager::new(cfg.checkpoint_dir.clone()),
            MetricsLogger::new(cfg.checkpoint_dir.clone()).unwrap(),
            Default::default(),
        )
        .unwrap();
    }

    #[test]
    fn test_checkpoint_written_every_epoch() {
        let dir = test_dir("every-epoch");
        run(&dir, 2, false);

        let ckpt = CheckpointManager::new(dir.display().to_string());
        assert!(ckpt.has_checkpoint());
        // The latest checkpoint belongs to the final epoch
        let meta = ckpt.load_meta().unwrap();
        assert_eq!(meta.epoch, 2);
        assert!(meta.avg_val_loss.is_finite());

        // One metrics row per epoch, plus the header
        let csv = fs::read_to_string(dir.join("metrics.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_first_epoch_beats_the_sentinel() {
        let dir = test_dir("sentinel");
        run(&dir, 1, false);

        // Any finite loss beats 1e6, so the best marker exists already
        assert!(dir.join("best.json").exists());
        assert!(dir.join("best_encoder.mpk.gz").exists());
        assert!(dir.join("best_decoder.mpk.gz").exists());
        assert!(dir.join("best_optimizer.mpk.gz").exists());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_resume_restores_best_loss_from_meta() {
        let dir = test_dir("resume");
        run(&dir, 1, false);

        let ckpt = CheckpointManager::new(dir.display().to_string());
        let first = ckpt.load_meta().unwrap();

        // Second run resumes — it must load cleanly and write a
        // fresh checkpoint for its own epoch 1
        run(&dir, 1, true);
        let second = ckpt.load_meta().unwrap();
        assert_eq!(second.epoch, 1);
        assert!(second.avg_val_loss.is_finite());
        assert!(first.avg_val_loss.is_finite());

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_cont_without_checkpoint_starts_fresh() {
        let dir = test_dir("cont-fresh");
        // No checkpoint exists yet — must not error
        run(&dir, 1, true);

        let ckpt = CheckpointManager::new(dir.display().to_string());
        assert!(ckpt.has_checkpoint());

        fs::remove_dir_all(dir).ok();
    }
}
