//! Descriptive statistics over a roll history and the reference distribution of two fair dice.

use alloc::{collections::BTreeMap, vec::Vec};

use serde::{Deserialize, Serialize};

use crate::Pips;

/// Expected value of the sum of two fair six-sided dice.
pub const THEORETICAL_MEAN: f64 = 7.0;

pub const MIN_SUM: Pips = 2;
pub const MAX_SUM: Pips = 12;

/// Number of distinct sums two dice can show.
pub const SUM_BINS: usize = (MAX_SUM - MIN_SUM + 1) as usize;

/// `P(sum = k)` for two independent fair dice.
pub fn theoretical_probability(sum: Pips) -> f64 {
    match sum {
        MIN_SUM..=7 => f64::from(sum - 1) / 36.0,
        8..=MAX_SUM => f64::from(13 - sum) / 36.0,
        _ => 0.0,
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub sum: u64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value, lowest one on ties.
    pub mode: Pips,
    /// Population variance.
    pub variance: f64,
    pub std_dev: f64,
    pub min: Pips,
    pub max: Pips,
}

impl Summary {
    /// `None` for an empty history.
    pub fn from_sums(sums: &[Pips]) -> Option<Self> {
        let count = sums.len();
        let min = *sums.iter().min()?;
        let max = *sums.iter().max()?;

        let sum: u64 = sums.iter().map(|&value| u64::from(value)).sum();
        let mean = sum as f64 / count as f64;
        let variance = sums
            .iter()
            .map(|&value| {
                let diff = f64::from(value) - mean;
                diff * diff
            })
            .sum::<f64>()
            / count as f64;

        let mut sorted = sums.to_vec();
        sorted.sort_unstable();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (f64::from(sorted[mid - 1]) + f64::from(sorted[mid])) / 2.0
        } else {
            f64::from(sorted[mid])
        };

        let mut counts: BTreeMap<Pips, usize> = BTreeMap::new();
        for &value in sums {
            *counts.entry(value).or_default() += 1;
        }
        // ascending iteration, so a strict comparison keeps the lowest value on ties
        let mut mode = (min, 0);
        for (&value, &seen) in &counts {
            if seen > mode.1 {
                mode = (value, seen);
            }
        }

        Some(Self {
            count,
            sum,
            mean,
            median,
            mode: mode.0,
            variance,
            std_dev: libm::sqrt(variance),
            min,
            max,
        })
    }
}

/// Cumulative mean after each roll.
pub fn running_means(sums: &[Pips]) -> Vec<f64> {
    let mut total = 0u64;
    sums.iter()
        .enumerate()
        .map(|(i, &value)| {
            total += u64::from(value);
            total as f64 / (i + 1) as f64
        })
        .collect()
}

/// Relative frequency of every sum from 2 to 12.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    frequencies: [f64; SUM_BINS],
}

impl Distribution {
    pub fn theoretical() -> Self {
        let mut frequencies = [0.0; SUM_BINS];
        for (sum, freq) in (MIN_SUM..=MAX_SUM).zip(frequencies.iter_mut()) {
            *freq = theoretical_probability(sum);
        }
        Self { frequencies }
    }

    /// Values outside 2..=12 count towards the total but have no bin.
    pub fn from_sums(sums: &[Pips]) -> Option<Self> {
        if sums.is_empty() {
            return None;
        }

        let mut frequencies = [0.0; SUM_BINS];
        let share = 1.0 / sums.len() as f64;
        for &value in sums {
            if let Some(bin) = Self::bin(value) {
                frequencies[bin] += share;
            }
        }
        Some(Self { frequencies })
    }

    fn bin(sum: Pips) -> Option<usize> {
        (MIN_SUM..=MAX_SUM)
            .contains(&sum)
            .then(|| usize::from(sum - MIN_SUM))
    }

    pub fn frequency(&self, sum: Pips) -> f64 {
        Self::bin(sum).map_or(0.0, |bin| self.frequencies[bin])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Pips, f64)> + '_ {
        (MIN_SUM..=MAX_SUM).zip(self.frequencies.iter().copied())
    }

    pub fn peak(&self) -> f64 {
        self.frequencies.iter().copied().fold(0.0, f64::max)
    }
}
