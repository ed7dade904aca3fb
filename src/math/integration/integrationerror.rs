use thiserror::Error;

pub type IntegrationResult<T> = Result<T, IntegrationError>;

// ─────────────────────────────────────────────────────────────────────────────
// IntegrationError
// ─────────────────────────────────────────────────────────────────────────────
//
// 分成四類：
//   1. 設定錯誤（區間、迭代次數、精度、rule 階數），建構或 integrate 開始時檢查
//   2. TooManyEvaluations：函數呼叫次數超過 max_eval
//   3. TooManyIterations：達到 maximal_iteration_count 仍未收斂
//   4. DimensionMismatch / NonMonotonicNodes：GaussIntegrator 建構時檢查

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    #[error("invalid interval [{lower}, {upper}]: lower bound must be strictly below upper bound")]
    InvalidInterval { lower: f64, upper: f64 },

    #[error("{parameter} must be strictly positive, got {value}")]
    NotStrictlyPositive { parameter: &'static str, value: usize },

    #[error("maximal iteration count {maximal} is below minimal iteration count {minimal}")]
    MaximalBelowMinimal { minimal: usize, maximal: usize },

    #[error("maximal iteration count {maximal} exceeds the ceiling {ceiling} of this method")]
    MaximalAboveCeiling { maximal: usize, ceiling: usize },

    #[error("{parameter} must be a non-negative number, got {value}")]
    InvalidAccuracy { parameter: &'static str, value: f64 },

    #[error("rule order {order} exceeds the supported maximum {maximum}")]
    OrderTooLarge { order: usize, maximum: usize },

    #[error("maximal count of evaluations ({max_evaluations}) exceeded")]
    TooManyEvaluations { max_evaluations: usize },

    #[error("maximal count of iterations ({max_iterations}) exceeded without convergence")]
    TooManyIterations { max_iterations: usize },

    #[error("dimension mismatch: {nodes} nodes but {weights} weights")]
    DimensionMismatch { nodes: usize, weights: usize },

    #[error("nodes are not strictly increasing at index {index} ({previous} >= {current})")]
    NonMonotonicNodes { index: usize, previous: f64, current: f64 },
}

impl IntegrationError {
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            IntegrationError::InvalidInterval { .. }
                | IntegrationError::NotStrictlyPositive { .. }
                | IntegrationError::MaximalBelowMinimal { .. }
                | IntegrationError::MaximalAboveCeiling { .. }
                | IntegrationError::InvalidAccuracy { .. }
                | IntegrationError::OrderTooLarge { .. }
        )
    }
}
