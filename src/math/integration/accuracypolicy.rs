use serde::{
    Deserialize,
    Serialize
};

use super::integrationerror::{
    IntegrationError,
    IntegrationResult
};

pub const DEFAULT_RELATIVE_ACCURACY: f64 = 1.0e-6;
pub const DEFAULT_ABSOLUTE_ACCURACY: f64 = 1.0e-15;
pub const DEFAULT_MIN_ITERATIONS_COUNT: usize = 3;
pub const DEFAULT_MAX_ITERATIONS_COUNT: usize = i32::MAX as usize;

/// 積分器的收斂設定（建構後不可變）。
///
/// 每次迭代 `i >= minimal_iteration_count` 時以
///
/// ```text
/// delta = |current - previous|
/// limit = max(absolute_accuracy, relative_accuracy * (|current| + |previous|) / 2)
/// ```
///
/// 判斷是否收斂（`delta <= limit`）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccuracyPolicy {
    relative_accuracy: f64,
    absolute_accuracy: f64,
    minimal_iteration_count: usize,
    maximal_iteration_count: usize
}

impl Default for AccuracyPolicy {
    fn default() -> Self {
        AccuracyPolicy {
            relative_accuracy: DEFAULT_RELATIVE_ACCURACY,
            absolute_accuracy: DEFAULT_ABSOLUTE_ACCURACY,
            minimal_iteration_count: DEFAULT_MIN_ITERATIONS_COUNT,
            maximal_iteration_count: DEFAULT_MAX_ITERATIONS_COUNT
        }
    }
}

impl AccuracyPolicy {
    pub fn new(relative_accuracy: f64,
               absolute_accuracy: f64,
               minimal_iteration_count: usize,
               maximal_iteration_count: usize) -> IntegrationResult<AccuracyPolicy> {
        let policy = AccuracyPolicy {
            relative_accuracy,
            absolute_accuracy,
            minimal_iteration_count,
            maximal_iteration_count
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_accuracies(relative_accuracy: f64, absolute_accuracy: f64) -> IntegrationResult<AccuracyPolicy> {
        Self::new(relative_accuracy,
                  absolute_accuracy,
                  DEFAULT_MIN_ITERATIONS_COUNT,
                  DEFAULT_MAX_ITERATIONS_COUNT)
    }

    pub fn with_iteration_counts(minimal_iteration_count: usize,
                                 maximal_iteration_count: usize) -> IntegrationResult<AccuracyPolicy> {
        Self::new(DEFAULT_RELATIVE_ACCURACY,
                  DEFAULT_ABSOLUTE_ACCURACY,
                  minimal_iteration_count,
                  maximal_iteration_count)
    }

    /// 預設精度與最少迭代次數，最多迭代次數取演算法上限。
    pub(crate) fn default_with_ceiling(ceiling: usize) -> AccuracyPolicy {
        AccuracyPolicy {
            maximal_iteration_count: ceiling,
            ..AccuracyPolicy::default()
        }
    }

    /// 通用檢查：精度非負、`1 <= minimal <= maximal`。
    ///
    /// 由 serde 讀入的設定不經過 `new`，使用前必須再呼叫一次。
    pub fn validate(&self) -> IntegrationResult<()> {
        if !(self.relative_accuracy >= 0.0) {
            return Err(IntegrationError::InvalidAccuracy {
                parameter: "relative_accuracy",
                value: self.relative_accuracy
            });
        }
        if !(self.absolute_accuracy >= 0.0) {
            return Err(IntegrationError::InvalidAccuracy {
                parameter: "absolute_accuracy",
                value: self.absolute_accuracy
            });
        }
        if self.minimal_iteration_count == 0 {
            return Err(IntegrationError::NotStrictlyPositive {
                parameter: "minimal_iteration_count",
                value: 0
            });
        }
        if self.maximal_iteration_count < self.minimal_iteration_count {
            return Err(IntegrationError::MaximalBelowMinimal {
                minimal: self.minimal_iteration_count,
                maximal: self.maximal_iteration_count
            });
        }
        Ok(())
    }

    /// 各演算法自己的 maximal_iteration_count 上限。
    pub fn validate_with_ceiling(&self, ceiling: usize) -> IntegrationResult<()> {
        self.validate()?;
        if self.maximal_iteration_count > ceiling {
            return Err(IntegrationError::MaximalAboveCeiling {
                maximal: self.maximal_iteration_count,
                ceiling
            });
        }
        Ok(())
    }

    pub fn relative_accuracy(&self) -> f64 {
        self.relative_accuracy
    }

    pub fn absolute_accuracy(&self) -> f64 {
        self.absolute_accuracy
    }

    pub fn minimal_iteration_count(&self) -> usize {
        self.minimal_iteration_count
    }

    pub fn maximal_iteration_count(&self) -> usize {
        self.maximal_iteration_count
    }

    /// 回傳 `(delta, limit)`。
    pub fn delta_and_limit(&self, previous: f64, current: f64) -> (f64, f64) {
        let delta = (current - previous).abs();
        let relative_limit = self.relative_accuracy * (previous.abs() + current.abs()) * 0.5;
        (delta, self.absolute_accuracy.max(relative_limit))
    }

    pub fn has_converged(&self, previous: f64, current: f64) -> bool {
        let (delta, limit) = self.delta_and_limit(previous, current);
        delta <= limit
    }
}
