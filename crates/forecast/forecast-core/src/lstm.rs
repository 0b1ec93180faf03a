//! Stacked LSTM regressor
//!
//! Evaluates a pre-trained recurrent network on a `(1, W, 1)` window. The
//! weight layout follows the common Keras export: per layer a `kernel` of
//! shape `[input_dim][4 * units]`, a `recurrent_kernel` of shape
//! `[units][4 * units]` and a `bias` of length `4 * units`, with gate blocks
//! ordered input, forget, cell, output. A single-output dense layer reads the
//! final hidden state.

use forecast_spi::{ForecastError, ModelResult, SequenceModel, Window};
use serde::{Deserialize, Serialize};

/// Weights of one recurrent layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmLayer {
    pub units: usize,
    pub kernel: Vec<Vec<f64>>,
    pub recurrent_kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

/// Weights of the output projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    /// Shape `[units][1]`
    pub kernel: Vec<Vec<f64>>,
    /// Length 1
    pub bias: Vec<f64>,
}

/// Serialized form of a trained model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LstmWeights {
    #[serde(default)]
    pub name: Option<String>,
    /// Window length the network was trained on
    #[serde(default)]
    pub window_size: Option<usize>,
    pub layers: Vec<LstmLayer>,
    pub dense: DenseLayer,
}

/// A validated, immutable LSTM network
#[derive(Debug, Clone)]
pub struct LstmModel {
    name: String,
    window_size: Option<usize>,
    layers: Vec<LstmLayer>,
    dense: DenseLayer,
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn invalid(name: &str, reason: String) -> ForecastError {
    ForecastError::InvalidParameter {
        name: name.to_string(),
        reason,
    }
}

fn check_matrix(name: &str, m: &[Vec<f64>], rows: usize, cols: usize) -> Result<(), ForecastError> {
    if m.len() != rows {
        return Err(invalid(name, format!("expected {} rows, got {}", rows, m.len())));
    }
    for (i, row) in m.iter().enumerate() {
        if row.len() != cols {
            return Err(invalid(
                name,
                format!("row {} has {} columns, expected {}", i, row.len(), cols),
            ));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(invalid(name, format!("row {} contains non-finite weights", i)));
        }
    }
    Ok(())
}

fn check_vector(name: &str, v: &[f64], len: usize) -> Result<(), ForecastError> {
    if v.len() != len {
        return Err(invalid(name, format!("expected length {}, got {}", len, v.len())));
    }
    if v.iter().any(|x| !x.is_finite()) {
        return Err(invalid(name, "contains non-finite weights".to_string()));
    }
    Ok(())
}

impl LstmModel {
    /// Validate weight shapes and build the network
    pub fn from_weights(weights: LstmWeights) -> Result<Self, ForecastError> {
        if weights.layers.is_empty() {
            return Err(invalid("layers", "at least one LSTM layer is required".to_string()));
        }
        if weights.window_size == Some(0) {
            return Err(invalid("window_size", "must be positive".to_string()));
        }

        let mut input_dim = 1;
        for (idx, layer) in weights.layers.iter().enumerate() {
            if layer.units == 0 {
                return Err(invalid(
                    &format!("layers[{}].units", idx),
                    "must be positive".to_string(),
                ));
            }
            let gates = 4 * layer.units;
            check_matrix(&format!("layers[{}].kernel", idx), &layer.kernel, input_dim, gates)?;
            check_matrix(
                &format!("layers[{}].recurrent_kernel", idx),
                &layer.recurrent_kernel,
                layer.units,
                gates,
            )?;
            check_vector(&format!("layers[{}].bias", idx), &layer.bias, gates)?;
            input_dim = layer.units;
        }

        check_matrix("dense.kernel", &weights.dense.kernel, input_dim, 1)?;
        check_vector("dense.bias", &weights.dense.bias, 1)?;

        Ok(Self {
            name: weights.name.unwrap_or_else(|| "lstm".to_string()),
            window_size: weights.window_size,
            layers: weights.layers,
            dense: weights.dense,
        })
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Run one layer over a sequence, returning every hidden state
    fn run_layer(layer: &LstmLayer, inputs: &[Vec<f64>]) -> Vec<Vec<f64>> {
        let units = layer.units;
        let mut h = vec![0.0; units];
        let mut c = vec![0.0; units];
        let mut outputs = Vec::with_capacity(inputs.len());

        for x in inputs {
            let mut z = layer.bias.clone();
            for (xi, row) in x.iter().zip(&layer.kernel) {
                for (zj, w) in z.iter_mut().zip(row) {
                    *zj += xi * w;
                }
            }
            for (hi, row) in h.iter().zip(&layer.recurrent_kernel) {
                for (zj, u) in z.iter_mut().zip(row) {
                    *zj += hi * u;
                }
            }

            for k in 0..units {
                let i = sigmoid(z[k]);
                let f = sigmoid(z[units + k]);
                let g = z[2 * units + k].tanh();
                let o = sigmoid(z[3 * units + k]);
                c[k] = f * c[k] + i * g;
                h[k] = o * c[k].tanh();
            }
            outputs.push(h.clone());
        }

        outputs
    }

    fn forward(&self, values: &[f64]) -> f64 {
        let mut sequence: Vec<Vec<f64>> = values.iter().map(|&v| vec![v]).collect();
        for layer in &self.layers {
            sequence = Self::run_layer(layer, &sequence);
        }

        let last = sequence.last().cloned().unwrap_or_default();
        self.dense.bias[0]
            + last
                .iter()
                .zip(&self.dense.kernel)
                .map(|(h, row)| h * row[0])
                .sum::<f64>()
    }
}

impl SequenceModel for LstmModel {
    fn predict(&self, window: &Window) -> ModelResult<f64> {
        if window.is_empty() {
            return Err("empty input window".into());
        }
        if let Some(expected) = self.window_size {
            if window.len() != expected {
                return Err(format!(
                    "model expects {} time steps, got {}",
                    expected,
                    window.len()
                )
                .into());
            }
        }
        Ok(self.forward(window.values()))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn expected_window(&self) -> Option<usize> {
        self.window_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_weights(units: usize, dense_bias: f64) -> LstmWeights {
        LstmWeights {
            name: Some("zeros".to_string()),
            window_size: None,
            layers: vec![LstmLayer {
                units,
                kernel: vec![vec![0.0; 4 * units]],
                recurrent_kernel: vec![vec![0.0; 4 * units]; units],
                bias: vec![0.0; 4 * units],
            }],
            dense: DenseLayer {
                kernel: vec![vec![1.0]; units],
                bias: vec![dense_bias],
            },
        }
    }

    #[test]
    fn test_zero_weights_return_dense_bias() {
        // All gates sit at 0.5 and the candidate at 0, so the hidden state stays 0
        let model = LstmModel::from_weights(zero_weights(3, 0.4)).unwrap();
        let window = Window::new(vec![0.2, 0.9, 0.5, 0.1]);
        let y = model.predict(&window).unwrap();
        assert!((y - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_single_unit_single_step() {
        // i = f = o = sigmoid(0) = 0.5, g = tanh(x)
        let weights = LstmWeights {
            name: None,
            window_size: Some(1),
            layers: vec![LstmLayer {
                units: 1,
                kernel: vec![vec![0.0, 0.0, 1.0, 0.0]],
                recurrent_kernel: vec![vec![0.0; 4]],
                bias: vec![0.0; 4],
            }],
            dense: DenseLayer {
                kernel: vec![vec![2.0]],
                bias: vec![0.1],
            },
        };
        let model = LstmModel::from_weights(weights).unwrap();
        assert_eq!(model.name(), "lstm");

        let x: f64 = 0.8;
        let c = 0.5 * x.tanh();
        let h = 0.5 * c.tanh();
        let expected = 2.0 * h + 0.1;

        let y = model.predict(&Window::new(vec![x])).unwrap();
        assert!((y - expected).abs() < 1e-12, "{} vs {}", y, expected);
    }

    #[test]
    fn test_stacked_layers() {
        let mut weights = zero_weights(2, 0.0);
        weights.layers.push(LstmLayer {
            units: 1,
            kernel: vec![vec![0.0; 4]; 2],
            recurrent_kernel: vec![vec![0.0; 4]],
            bias: vec![0.0; 4],
        });
        weights.dense = DenseLayer {
            kernel: vec![vec![1.0]],
            bias: vec![0.7],
        };
        let model = LstmModel::from_weights(weights).unwrap();
        assert_eq!(model.layer_count(), 2);
        let y = model.predict(&Window::new(vec![0.1; 24])).unwrap();
        assert!((y - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_window_mismatch_rejected() {
        let mut weights = zero_weights(2, 0.0);
        weights.window_size = Some(24);
        let model = LstmModel::from_weights(weights).unwrap();
        assert_eq!(model.expected_window(), Some(24));

        let err = model.predict(&Window::new(vec![0.5; 12])).unwrap_err();
        assert!(err.to_string().contains("expects 24 time steps, got 12"));
    }

    #[test]
    fn test_empty_window_rejected() {
        let model = LstmModel::from_weights(zero_weights(1, 0.0)).unwrap();
        assert!(model.predict(&Window::new(Vec::new())).is_err());
    }

    #[test]
    fn test_bad_kernel_shape_rejected() {
        let mut weights = zero_weights(2, 0.0);
        weights.layers[0].kernel = vec![vec![0.0; 7]];
        let err = LstmModel::from_weights(weights).unwrap_err();
        assert!(matches!(
            err,
            ForecastError::InvalidParameter { ref name, .. } if name == "layers[0].kernel"
        ));
    }

    #[test]
    fn test_dense_shape_rejected() {
        let mut weights = zero_weights(2, 0.0);
        weights.dense.kernel = vec![vec![1.0]];
        assert!(LstmModel::from_weights(weights).is_err());
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let mut weights = zero_weights(1, 0.0);
        weights.layers[0].bias[2] = f64::NAN;
        assert!(LstmModel::from_weights(weights).is_err());
    }

    #[test]
    fn test_no_layers_rejected() {
        let mut weights = zero_weights(1, 0.0);
        weights.layers.clear();
        assert!(LstmModel::from_weights(weights).is_err());
    }

    #[test]
    fn test_weights_deserialize_from_json() {
        let json = r#"{
            "window_size": 2,
            "layers": [{
                "units": 1,
                "kernel": [[0, 0, 0, 0]],
                "recurrent_kernel": [[0, 0, 0, 0]],
                "bias": [0, 0, 0, 0]
            }],
            "dense": { "kernel": [[1]], "bias": [0.25] }
        }"#;
        let weights: LstmWeights = serde_json::from_str(json).unwrap();
        let model = LstmModel::from_weights(weights).unwrap();
        let y = model.predict(&Window::new(vec![0.3, 0.6])).unwrap();
        assert!((y - 0.25).abs() < 1e-12);
    }
}
