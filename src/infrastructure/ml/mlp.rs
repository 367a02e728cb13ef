//! Multilayer perceptron classifier on aprender's `nn` module
//!
//! ReLU hidden layers and a linear output layer trained with cross-entropy
//! and Adam on shuffled mini-batches. Inputs are standardized with the
//! training mean and standard deviation. The fitted weights are kept as an
//! aprender state dict, so the model itself is plain data and the network is
//! rebuilt for each prediction.

use aprender::autograd::{clear_graph, no_grad, Tensor};
use aprender::nn::loss::CrossEntropyLoss;
use aprender::nn::optim::Adam;
use aprender::nn::serialize::{state_dict, StateDict};
use aprender::nn::{Linear, Module, Optimizer, ReLU, Softmax};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::DomainError;

/// Hyperparameters for the MLP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpParams {
    pub hidden_layers: Vec<usize>,
    pub max_iter: usize,
    pub learning_rate: f32,
    pub batch_size: usize,
    /// Minimum loss improvement that resets the patience counter
    pub tol: f64,
    pub n_iter_no_change: usize,
    pub seed: u64,
}

impl Default for MlpParams {
    fn default() -> Self {
        Self {
            hidden_layers: vec![100],
            max_iter: 500,
            learning_rate: 1e-3,
            batch_size: 200,
            tol: 1e-4,
            n_iter_no_change: 10,
            seed: 42,
        }
    }
}

/// Live aprender layers, only alive while training or predicting
struct Network {
    layers: Vec<Linear>,
}

impl Network {
    fn seeded(sizes: &[usize], seed: u64) -> Self {
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, w)| Linear::with_seed(w[0], w[1], Some(seed.wrapping_add(i as u64))))
            .collect();

        Self { layers }
    }

    /// Rebuild from a state dict written by [`Network::state`]
    fn restore(sizes: &[usize], state: &StateDict) -> Result<Self, DomainError> {
        if sizes.len() < 2 || sizes.contains(&0) {
            return Err(DomainError::model(format!("Invalid MLP layer sizes {:?}", sizes)));
        }

        let mut layers = Vec::with_capacity(sizes.len().saturating_sub(1));

        for (i, w) in sizes.windows(2).enumerate() {
            let (inputs, outputs) = (w[0], w[1]);
            let weight = tensor_entry(state, &format!("{i}.0"), &[outputs, inputs])?;
            let bias = tensor_entry(state, &format!("{i}.1"), &[outputs])?;

            let mut layer = Linear::placeholder(inputs, outputs);
            layer.set_weight(weight);
            layer.set_bias(bias);
            layers.push(layer);
        }

        Ok(Self { layers })
    }

    fn forward(&self, input: &Tensor) -> Tensor {
        let last = self.layers.len().saturating_sub(1);

        self.layers
            .iter()
            .enumerate()
            .fold(input.clone(), |a, (i, layer)| {
                let z = layer.forward(&a);
                if i < last {
                    ReLU::new().forward(&z)
                } else {
                    z
                }
            })
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers
            .iter_mut()
            .flat_map(|layer| layer.parameters_mut())
            .collect()
    }

    /// `Linear` caches its transposed weight; it goes stale after every optimizer step
    fn refresh(&mut self) {
        for layer in &mut self.layers {
            layer.refresh_caches();
        }
    }

    fn state(&self) -> StateDict {
        self.layers
            .iter()
            .enumerate()
            .flat_map(|(i, layer)| state_dict(layer, &i.to_string()))
            .collect()
    }
}

fn tensor_entry(state: &StateDict, name: &str, shape: &[usize]) -> Result<Tensor, DomainError> {
    let (data, stored_shape) = state
        .get(name)
        .ok_or_else(|| DomainError::model(format!("MLP weights missing parameter '{}'", name)))?;

    if stored_shape.as_slice() != shape || data.len() != shape.iter().product::<usize>() {
        return Err(DomainError::model(format!(
            "MLP parameter '{}' has shape {:?}, expected {:?}",
            name, stored_shape, shape
        )));
    }

    Ok(Tensor::new(data, shape))
}

/// Fitted MLP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpClassifier {
    means: Vec<f64>,
    stds: Vec<f64>,
    /// Layer widths from the input features to the class logits
    sizes: Vec<usize>,
    weights: StateDict,
    epochs_run: usize,
    converged: bool,
}

impl MlpClassifier {
    /// Train on encoded labels `y` in `0..n_classes`
    ///
    /// Stops after `max_iter` epochs or once the loss stalls; both are success.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[u32],
        n_classes: usize,
        params: &MlpParams,
    ) -> Result<Self, DomainError> {
        if x.is_empty() || x.len() != y.len() {
            return Err(DomainError::model(format!(
                "Cannot fit MLP on {} rows and {} labels",
                x.len(),
                y.len()
            )));
        }

        if params.hidden_layers.iter().any(|&h| h == 0) || params.max_iter == 0 {
            return Err(DomainError::configuration(
                "MLP hidden layer sizes and max_iter must be positive",
            ));
        }

        if let Some(&class) = y.iter().find(|&&c| c as usize >= n_classes) {
            return Err(DomainError::model(format!(
                "Label id {} outside class range 0..{}",
                class, n_classes
            )));
        }

        let n_samples = x.len();
        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(DomainError::model("MLP training rows differ in length"));
        }

        let (means, stds) = standardization(x, n_features);
        let inputs: Vec<Vec<f32>> = x.iter().map(|row| scale(row, &means, &stds)).collect();

        let mut sizes = vec![n_features];
        sizes.extend(&params.hidden_layers);
        sizes.push(n_classes);

        let mut network = Network::seeded(&sizes, params.seed);
        let loss_fn = CrossEntropyLoss::new();
        let mut optimizer = Adam::new(network.parameters_mut(), params.learning_rate);

        let mut rng = StdRng::seed_from_u64(params.seed);
        let batch_size = params.batch_size.clamp(1, n_samples);
        let mut order: Vec<usize> = (0..n_samples).collect();
        let mut best_loss = f64::INFINITY;
        let mut no_improvement = 0;
        let mut epochs_run = 0;
        let mut converged = false;

        for epoch in 0..params.max_iter {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;

            for batch in order.chunks(batch_size) {
                let features: Vec<f32> = batch
                    .iter()
                    .flat_map(|&i| inputs[i].iter().copied())
                    .collect();
                let targets: Vec<f32> = batch.iter().map(|&i| y[i] as f32).collect();

                let xb = Tensor::new(&features, &[batch.len(), n_features]);
                let yb = Tensor::new(&targets, &[batch.len()]);

                network.refresh();
                let logits = network.forward(&xb);
                let loss = loss_fn.forward(&logits, &yb);
                let batch_loss = f64::from(loss.item());

                if !batch_loss.is_finite() {
                    clear_graph();
                    return Err(DomainError::model(format!(
                        "MLP loss diverged in epoch {}",
                        epoch + 1
                    )));
                }
                epoch_loss += batch_loss * batch.len() as f64;

                loss.backward();
                optimizer.step_with_params(&mut network.parameters_mut());
                optimizer.zero_grad();
                clear_graph();
            }

            epochs_run = epoch + 1;
            let loss = epoch_loss / n_samples as f64;

            if loss > best_loss - params.tol {
                no_improvement += 1;
            } else {
                no_improvement = 0;
            }
            best_loss = best_loss.min(loss);

            if no_improvement > params.n_iter_no_change {
                converged = true;
                break;
            }
        }

        debug!(
            epochs = epochs_run,
            converged,
            loss = best_loss,
            "MLP training finished"
        );

        Ok(Self {
            means,
            stds,
            weights: network.state(),
            sizes,
            epochs_run,
            converged,
        })
    }

    /// Class probabilities for each row
    pub fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, DomainError> {
        let n_features = self.means.len();

        if let Some(row) = rows.iter().find(|r| r.len() != n_features) {
            return Err(DomainError::model(format!(
                "Expected {} features, got {}",
                n_features,
                row.len()
            )));
        }

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let network = Network::restore(&self.sizes, &self.weights)?;
        let features: Vec<f32> = rows
            .iter()
            .flat_map(|row| scale(row, &self.means, &self.stds))
            .collect();
        let input = Tensor::new(&features, &[rows.len(), n_features]);

        let probs = no_grad(|| Softmax::new(-1).forward(&network.forward(&input)));

        Ok(probs
            .data()
            .chunks(self.n_classes())
            .map(|row| row.iter().map(|&p| f64::from(p)).collect())
            .collect())
    }

    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u32>, DomainError> {
        let probs = self.predict_proba(rows)?;

        Ok(probs
            .iter()
            .map(|row| {
                let mut best = 0;
                for (class, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = class;
                    }
                }
                best as u32
            })
            .collect())
    }

    pub fn n_classes(&self) -> usize {
        self.sizes.last().copied().unwrap_or(0)
    }

    pub fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    /// Whether training stopped on the loss criterion rather than the epoch budget
    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn hidden_layers(&self) -> &[usize] {
        self.sizes
            .get(1..self.sizes.len().saturating_sub(1))
            .unwrap_or_default()
    }
}

fn standardization(x: &[Vec<f64>], n_features: usize) -> (Vec<f64>, Vec<f64>) {
    let n = x.len() as f64;
    let means: Vec<f64> = (0..n_features)
        .map(|j| x.iter().map(|row| row[j]).sum::<f64>() / n)
        .collect();
    let stds = (0..n_features)
        .map(|j| {
            let var = x.iter().map(|row| (row[j] - means[j]).powi(2)).sum::<f64>() / n;
            if var > 0.0 { var.sqrt() } else { 1.0 }
        })
        .collect();

    (means, stds)
}

fn scale(row: &[f64], means: &[f64], stds: &[f64]) -> Vec<f32> {
    row.iter()
        .zip(means.iter().zip(stds))
        .map(|(v, (m, s))| ((v - m) / s) as f32)
        .collect()
}
