// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sparse weight history

use serde::{Deserialize, Serialize};

/// `(time, weight)` samples, appended only when the weight changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightLog(Vec<(f64, f64)>);

impl WeightLog {
    /// Log starting with `(0, initial)`
    pub fn new(initial: f64) -> Self {
        Self(vec![(0.0, initial)])
    }

    /// Append `(time, weight)` unless `weight` equals the last logged value.
    /// Returns whether an entry was added.
    pub fn record(&mut self, time: f64, weight: f64) -> bool {
        match self.0.last() {
            Some(&(_, last)) if last == weight => false,
            _ => {
                self.0.push((time, weight));
                true
            }
        }
    }

    pub fn entries(&self) -> &[(f64, f64)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_entries(self) -> Vec<(f64, f64)> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_weight_not_logged() {
        let mut log = WeightLog::new(1.0);
        assert!(!log.record(100.0, 1.0));
        assert!(log.record(200.0, 1.5));
        assert!(!log.record(300.0, 1.5));
        assert_eq!(log.entries(), &[(0.0, 1.0), (200.0, 1.5)]);
    }
}
