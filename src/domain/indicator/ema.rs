//! Exponential Moving Average with adjusted weighting.
//!
//! alpha = 2/(span+1). Weights (1-alpha)^k are normalised by their running sum,
//! so the average is defined from the first observation:
//!   y[0] = x[0]
//!   D[t] = 1 + (1-alpha) * D[t-1]
//!   y[t] = y[t-1] + (x[t] - y[t-1]) / D[t]

#[derive(Debug, Clone)]
pub struct Ema {
    decay: f64,
    weight_sum: f64,
    value: Option<f64>,
}

impl Ema {
    pub fn with_span(span: usize) -> Self {
        let alpha = 2.0 / (span as f64 + 1.0);
        Ema {
            decay: 1.0 - alpha,
            weight_sum: 0.0,
            value: None,
        }
    }

    pub fn push(&mut self, x: f64) -> f64 {
        let next = match self.value {
            None => {
                self.weight_sum = 1.0;
                x
            }
            Some(prev) => {
                self.weight_sum = 1.0 + self.decay * self.weight_sum;
                prev + (x - prev) / self.weight_sum
            }
        };
        self.value = Some(next);
        next
    }
}

pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let mut ema = Ema::with_span(span);
    values.iter().map(|&v| ema.push(v)).collect()
}
