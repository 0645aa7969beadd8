//! Sliding-window mean and sample variance.
//!
//! Uses a sliding Welford update so each push is O(1):
//! - filling:  mean += (x - mean) / n;  M2 += (x - mean_old) * (x - mean_new)
//! - sliding:  mean += (x - x_out) / n; M2 += (x - x_out) * (x - mean_new + x_out - mean_old)
//!
//! Variance is the sample variance M2 / (n - 1), undefined for a one-bar window.
//! When every value in the window is identical the accumulator snaps back to
//! `mean = x, M2 = 0` so flat input carries no rounding residue.

use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingStats {
    pub mean: f64,
    pub variance: Option<f64>,
}

impl RollingStats {
    pub fn std_dev(&self) -> Option<f64> {
        self.variance.map(f64::sqrt)
    }
}

#[derive(Debug, Clone)]
pub struct RollingWindow {
    period: usize,
    window: VecDeque<f64>,
    mean: f64,
    m2: f64,
    // Number of trailing values equal to the newest one.
    run_len: usize,
}

impl RollingWindow {
    pub fn new(period: usize) -> Self {
        RollingWindow {
            period,
            window: VecDeque::with_capacity(period),
            mean: 0.0,
            m2: 0.0,
            run_len: 0,
        }
    }

    /// Adds `x` and returns the window statistics once `period` values are held.
    pub fn push(&mut self, x: f64) -> Option<RollingStats> {
        if self.period == 0 {
            return None;
        }

        match self.window.back() {
            Some(&last) if last == x => self.run_len += 1,
            _ => self.run_len = 1,
        }

        let evicted = if self.window.len() == self.period {
            self.window.pop_front()
        } else {
            None
        };
        self.window.push_back(x);

        match evicted {
            Some(old) => {
                let n = self.period as f64;
                let old_mean = self.mean;
                self.mean = old_mean + (x - old) / n;
                self.m2 += (x - old) * (x - self.mean + old - old_mean);
            }
            None => {
                let n = self.window.len() as f64;
                let delta = x - self.mean;
                self.mean += delta / n;
                self.m2 += delta * (x - self.mean);
            }
        }

        if self.run_len >= self.window.len() {
            self.mean = x;
            self.m2 = 0.0;
        }

        if self.window.len() < self.period {
            return None;
        }

        let variance = if self.period > 1 {
            Some((self.m2 / (self.period - 1) as f64).max(0.0))
        } else {
            None
        };

        Some(RollingStats {
            mean: self.mean,
            variance,
        })
    }
}
