//! Removal of the leading bars where an indicator has not stabilised.

use crate::domain::error::BacktestError;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarmupTrim {
    /// Index of the first bar kept.
    pub offset: usize,
    /// Set when the series was too short to trim at all.
    pub low_confidence: bool,
}

impl WarmupTrim {
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        &items[self.offset.min(items.len())..]
    }
}

/// Decide how many leading bars of a `len`-bar series to drop.
///
/// A series shorter than `warmup` is kept whole and flagged low-confidence.
/// Otherwise the first `warmup` bars are dropped, and at least one bar has to
/// remain.
pub fn trim_warmup(len: usize, warmup: usize) -> Result<WarmupTrim, BacktestError> {
    if len < warmup {
        warn!(
            "only {len} bars available for a warmup period of {warmup}; \
             keeping all bars, results are low confidence"
        );
        return Ok(WarmupTrim {
            offset: 0,
            low_confidence: true,
        });
    }

    if len == warmup {
        return Err(BacktestError::InsufficientData {
            required: warmup + 1,
            available: len,
        });
    }

    Ok(WarmupTrim {
        offset: warmup,
        low_confidence: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_warmup_bars() {
        let trim = trim_warmup(100, 42).unwrap();
        assert_eq!(
            trim,
            WarmupTrim {
                offset: 42,
                low_confidence: false
            }
        );
        let values: Vec<usize> = (0..100).collect();
        let kept = trim.apply(&values);
        assert_eq!(kept.len(), 58);
        assert_eq!(kept[0], 42);
    }

    #[test]
    fn short_series_is_kept_and_flagged() {
        let trim = trim_warmup(30, 60).unwrap();
        assert_eq!(trim.offset, 0);
        assert!(trim.low_confidence);
        assert_eq!(trim.apply(&[1, 2, 3]), &[1, 2, 3]);
    }

    #[test]
    fn nothing_left_after_trim_is_an_error() {
        let err = trim_warmup(60, 60).unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InsufficientData {
                required: 61,
                available: 60
            }
        ));
    }

    #[test]
    fn zero_warmup_keeps_everything() {
        let trim = trim_warmup(5, 0).unwrap();
        assert_eq!(trim.offset, 0);
        assert!(!trim.low_confidence);
    }

    #[test]
    fn empty_series_with_zero_warmup_fails() {
        assert!(trim_warmup(0, 0).is_err());
    }
}
