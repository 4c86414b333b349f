//! Halstead software science metrics.
//!
//! Operators and operands are counted from the token stream; derived
//! measures follow Halstead (1977):
//!
//! - vocabulary `n = n1 + n2`, length `N = N1 + N2`
//! - volume `V = N * log2(n)`
//! - difficulty `D = (n1 / 2) * (N2 / n2)`
//! - effort `E = V * D`, time `T = E / 18` seconds, bugs `B = V / 3000`

use std::collections::HashSet;

use crate::model::HalsteadMetrics;

/// Accumulates operator and operand tokens.
#[derive(Debug, Default, Clone)]
pub struct HalsteadCounter {
    operators: HashSet<String>,
    operands: HashSet<String>,
    total_operators: u32,
    total_operands: u32,
}

impl HalsteadCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_operator(&mut self, token: &str) {
        self.total_operators += 1;
        if !self.operators.contains(token) {
            self.operators.insert(token.to_string());
        }
    }

    pub fn add_operand(&mut self, token: &str) {
        self.total_operands += 1;
        if !self.operands.contains(token) {
            self.operands.insert(token.to_string());
        }
    }

    pub fn metrics(&self) -> HalsteadMetrics {
        from_counts(
            self.operators.len() as u32,
            self.operands.len() as u32,
            self.total_operators,
            self.total_operands,
        )
    }
}

/// Derive the Halstead measures from raw counts.
///
/// When either distinct count is zero every derived value is zero; the raw
/// counts are still reported.
pub fn from_counts(n1: u32, n2: u32, big_n1: u32, big_n2: u32) -> HalsteadMetrics {
    let mut metrics = HalsteadMetrics {
        distinct_operators: n1,
        distinct_operands: n2,
        total_operators: big_n1,
        total_operands: big_n2,
        ..Default::default()
    };
    if n1 == 0 || n2 == 0 {
        return metrics;
    }

    let vocabulary = n1 + n2;
    let length = big_n1 + big_n2;
    let volume = length as f64 * (vocabulary as f64).log2();
    let difficulty = (n1 as f64 / 2.0) * (big_n2 as f64 / n2 as f64);
    let effort = volume * difficulty;

    metrics.vocabulary = vocabulary;
    metrics.length = length;
    metrics.volume = volume;
    metrics.difficulty = difficulty;
    metrics.effort = effort;
    metrics.time_to_understand = effort / 18.0;
    metrics.bugs_delivered = volume / 3000.0;
    metrics
}
