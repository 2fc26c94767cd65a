use std::collections::BTreeMap;
use std::fmt;

use crate::label::ClassLabel;

/// Shannon entropy of a class distribution, in bits.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize)]
pub struct Entropy(f64);

impl Entropy {
    /// Entropy of a split search that found no candidate.
    pub const UNSPLIT: Entropy = Entropy(f64::INFINITY);

    pub(crate) fn new(value: f64) -> Self {
        // Pure partitions compute as -0.0; report them as 0.0.
        if value <= 0.0 { Self(0.0) } else { Self(value) }
    }

    /// Return the raw entropy value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return `true` unless this is [`Entropy::UNSPLIT`].
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// Compute the base-2 entropy of a node from its class counts.
///
/// `-Σ(p_i · log2(p_i))` summed over classes with `p_i > 0`, where
/// `p_i = count_i / n_samples`. An empty partition has entropy 0.
#[must_use]
pub fn entropy(class_counts: &[usize], n_samples: usize) -> Entropy {
    if n_samples == 0 {
        return Entropy::new(0.0);
    }
    let n = n_samples as f64;
    let value = -class_counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / n;
            p * p.log2()
        })
        .sum::<f64>();
    Entropy::new(value)
}

/// Size-weighted mean entropy of the two sides of a binary split.
///
/// `(H_left · n_left + H_right · n_right) / (n_left + n_right)`.
#[must_use]
pub fn weighted_entropy(
    left_counts: &[usize],
    n_left: usize,
    right_counts: &[usize],
    n_right: usize,
) -> Entropy {
    let total = n_left + n_right;
    if total == 0 {
        return Entropy::new(0.0);
    }
    let left = entropy(left_counts, n_left).value();
    let right = entropy(right_counts, n_right).value();
    Entropy::new((left * n_left as f64 + right * n_right as f64) / total as f64)
}

/// Dense integer codes for a label sequence.
///
/// `classes` is sorted ascending and `codes[i]` indexes into it, so class
/// count vectors line up with label order.
#[derive(Debug, Clone)]
pub(crate) struct EncodedLabels {
    pub(crate) classes: Vec<ClassLabel>,
    pub(crate) codes: Vec<usize>,
}

impl EncodedLabels {
    pub(crate) fn new(labels: &[ClassLabel]) -> Self {
        let mut index: BTreeMap<&ClassLabel, usize> = labels.iter().map(|l| (l, 0)).collect();
        for (code, slot) in index.values_mut().enumerate() {
            *slot = code;
        }
        let codes = labels.iter().map(|l| index[l]).collect();
        let classes = index.into_keys().cloned().collect();
        Self { classes, codes }
    }

    pub(crate) fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub(crate) fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes()];
        for &code in &self.codes {
            counts[code] += 1;
        }
        counts
    }
}

/// Index of the most frequent class; ties go to the lowest index.
pub(crate) fn majority(class_counts: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in class_counts.iter().enumerate() {
        if c > class_counts[best] {
            best = i;
        }
    }
    best
}
