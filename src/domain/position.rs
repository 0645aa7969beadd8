//! Position timeline: the exposure held at the close of each bar.

use crate::domain::indicator::{IndicatorSeries, IndicatorValue};
use crate::domain::signal::Signal;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    Long,
    #[default]
    Flat,
    Short,
}

impl Position {
    pub fn value(self) -> i8 {
        match self {
            Position::Long => 1,
            Position::Flat => 0,
            Position::Short => -1,
        }
    }

    pub fn is_flat(self) -> bool {
        self == Position::Flat
    }

    /// The position a non-`Hold` signal moves into.
    pub fn from_signal(signal: Signal) -> Option<Self> {
        match signal {
            Signal::Buy => Some(Position::Long),
            Signal::Sell => Some(Position::Short),
            Signal::Hold => None,
        }
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.value())
    }
}

/// Forward-fill `signals` into positions.
///
/// Each bar takes the most recent non-`Hold` signal; bars before the first
/// signal are `Flat`. With `seed = Some((f, p))`, bars `0..=f` are forced to
/// `p` and the fill continues from `p` for later bars.
pub fn resolve_positions(signals: &[Signal], seed: Option<(usize, Position)>) -> Vec<Position> {
    let mut held = Position::Flat;

    signals
        .iter()
        .enumerate()
        .map(|(i, &signal)| {
            held = match seed {
                Some((seed_index, seeded)) if i <= seed_index => seeded,
                _ => Position::from_signal(signal).unwrap_or(held),
            };
            held
        })
        .collect()
}

/// Initial position for an SMA crossover strategy: at the first bar where
/// both averages are defined, `Long` if the short average is above the long
/// one, otherwise `Flat`. `None` if no bar is defined.
pub fn sma_seed(series: &IndicatorSeries) -> Option<(usize, Position)> {
    let first = series.first_defined()?;
    let position = match series.values[first].value {
        Some(IndicatorValue::MovingAverages { short_ma, long_ma }) if short_ma > long_ma => {
            Position::Long
        }
        _ => Position::Flat,
    };
    Some((first, position))
}
