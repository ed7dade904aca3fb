use tracing::{
    debug,
    trace
};

use crate::math::univariatefunction::UnivariateFunction;

use super::accuracypolicy::AccuracyPolicy;
use super::evaluationbudget::{
    EvaluationBudget,
    IterationCounter
};
use super::integrationerror::{
    IntegrationError,
    IntegrationResult
};

// ─────────────────────────────────────────────────────────────────────────────
// UnivariateIntegrator
// ─────────────────────────────────────────────────────────────────────────────

/// 以反覆加密逼近 `∫_min^max f(x) dx` 的積分器。
///
/// 同一個實例可重複使用，但每次 `integrate` 都會重設迭代與求值次數；
/// 實例不可同時給多個執行緒使用（`&mut self`）。
pub trait UnivariateIntegrator {
    fn core(&self) -> &IntegratorCore;

    fn integrate(&mut self,
                 max_eval: usize,
                 f: &dyn UnivariateFunction,
                 min: f64,
                 max: f64) -> IntegrationResult<f64>;

    fn relative_accuracy(&self) -> f64 {
        self.core().policy().relative_accuracy()
    }

    fn absolute_accuracy(&self) -> f64 {
        self.core().policy().absolute_accuracy()
    }

    fn minimal_iteration_count(&self) -> usize {
        self.core().policy().minimal_iteration_count()
    }

    fn maximal_iteration_count(&self) -> usize {
        self.core().policy().maximal_iteration_count()
    }

    /// 上一次 `integrate`（成功或失敗）使用的函數求值次數。
    fn evaluations(&self) -> usize {
        self.core().evaluations()
    }

    /// 上一次 `integrate`（成功或失敗）完成的迭代次數。
    fn iterations(&self) -> usize {
        self.core().iterations()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// IntegratorCore：各演算法共用的設定與上次執行的計數
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct IntegratorCore {
    method: &'static str,
    policy: AccuracyPolicy,
    evaluations: usize,
    iterations: usize
}

impl IntegratorCore {
    pub fn new(method: &'static str, policy: AccuracyPolicy) -> IntegratorCore {
        IntegratorCore {
            method,
            policy,
            evaluations: 0,
            iterations: 0
        }
    }

    pub fn method(&self) -> &'static str {
        self.method
    }

    pub fn policy(&self) -> &AccuracyPolicy {
        &self.policy
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// 檢查區間、建立本次的 context 後交給 `strategy` 執行，
    /// 結束時記錄求值與迭代次數。
    pub fn run<S>(&mut self,
                  max_eval: usize,
                  f: &dyn UnivariateFunction,
                  min: f64,
                  max: f64,
                  strategy: S) -> IntegrationResult<f64>
    where
        S: FnOnce(&mut IntegrationContext<'_>) -> IntegrationResult<f64>
    {
        // 被拒絕的呼叫回報 0 次，而不是上一次的計數
        self.evaluations = 0;
        self.iterations = 0;
        verify_interval(min, max)?;

        let mut context = IntegrationContext::new(f, min, max, max_eval, self.policy);
        let result = strategy(&mut context);
        self.evaluations = context.evaluations();
        self.iterations = context.iterations();

        match &result {
            Ok(value) => debug!(
                method = self.method,
                iterations = self.iterations,
                evaluations = self.evaluations,
                value = *value,
                "integration converged"
            ),
            Err(error) => debug!(
                method = self.method,
                iterations = self.iterations,
                evaluations = self.evaluations,
                %error,
                "integration failed"
            )
        }
        result
    }
}

pub fn verify_interval(min: f64, max: f64) -> IntegrationResult<()> {
    // NaN 也一併擋掉
    if !(min < max) {
        return Err(IntegrationError::InvalidInterval { lower: min, upper: max });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// IntegrationContext：單次 integrate 的狀態
// ─────────────────────────────────────────────────────────────────────────────

pub struct IntegrationContext<'a> {
    function: &'a dyn UnivariateFunction,
    min: f64,
    max: f64,
    policy: AccuracyPolicy,
    budget: EvaluationBudget,
    iterations: IterationCounter
}

impl<'a> IntegrationContext<'a> {
    fn new(function: &'a dyn UnivariateFunction,
           min: f64,
           max: f64,
           max_eval: usize,
           policy: AccuracyPolicy) -> IntegrationContext<'a> {
        IntegrationContext {
            function,
            min,
            max,
            policy,
            budget: EvaluationBudget::new(max_eval),
            iterations: IterationCounter::new(policy.maximal_iteration_count())
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn policy(&self) -> &AccuracyPolicy {
        &self.policy
    }

    pub fn evaluations(&self) -> usize {
        self.budget.evaluations()
    }

    pub fn iterations(&self) -> usize {
        self.iterations.count()
    }

    pub fn max_evaluations(&self) -> usize {
        self.budget.max_evaluations()
    }

    /// 所有函數求值都必須經過這裡，才會計入預算。
    pub fn compute_objective_value(&mut self, x: f64) -> IntegrationResult<f64> {
        self.budget.consume()?;
        Ok(self.function.value(x))
    }

    /// 共用的加密迴圈。
    ///
    /// `estimate(self, 0)` 為初始估計；之後每次迭代 `i`（從 1 開始）呼叫
    /// `estimate(self, i)` 得到新估計，`i >= minimal_iteration_count`
    /// 且收斂時回傳。未收斂則迭代數加一，超過上限即 TooManyIterations。
    pub fn refine<E>(&mut self, mut estimate: E) -> IntegrationResult<f64>
    where
        E: FnMut(&mut Self, usize) -> IntegrationResult<f64>
    {
        let mut previous = estimate(self, 0)?;
        self.iterations.increment()?;
        loop {
            let i = self.iterations.count();
            let current = estimate(self, i)?;
            let (delta, limit) = self.policy.delta_and_limit(previous, current);
            trace!(iteration = i, estimate = current, delta, limit, "refinement");
            if i >= self.policy.minimal_iteration_count() && delta <= limit {
                return Ok(current);
            }
            previous = current;
            self.iterations.increment()?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core(minimal: usize, maximal: usize) -> IntegratorCore {
        let policy = AccuracyPolicy::new(1.0e-12, 1.0e-12, minimal, maximal).unwrap();
        IntegratorCore::new("test", policy)
    }

    #[test]
    fn inverted_and_degenerate_intervals_are_rejected_before_any_evaluation() {
        let mut core = core(1, 10);
        let f = |x: f64| x;
        for (min, max) in [(1.0, 0.0), (1.0, 1.0), (f64::NAN, 1.0)] {
            let result = core.run(100, &f, min, max, |context| context.compute_objective_value(min));
            assert!(matches!(result, Err(IntegrationError::InvalidInterval { .. })));
            assert_eq!(core.evaluations(), 0);
        }
    }

    #[test]
    fn refine_stops_once_converged_after_minimal_iterations() {
        let mut core = core(2, 10);
        let f = |x: f64| x;
        // 估計序列 1, 1, 1, ...：第 1 次就收斂，但要等到第 2 次才允許回傳
        let value = core.run(100, &f, 0.0, 1.0, |context| {
            context.refine(|_, _| Ok(1.0))
        }).unwrap();
        assert_eq!(value, 1.0);
        assert_eq!(core.iterations(), 2);
    }

    #[test]
    fn refine_fails_when_iterations_run_out() {
        let mut core = core(1, 3);
        let f = |x: f64| x;
        let result = core.run(100, &f, 0.0, 1.0, |context| {
            context.refine(|_, i| Ok(i as f64))
        });
        assert_eq!(result, Err(IntegrationError::TooManyIterations { max_iterations: 3 }));
        assert_eq!(core.iterations(), 3);
    }

    #[test]
    fn evaluations_are_counted_and_bounded() {
        let mut core = core(1, 10);
        let f = |x: f64| 2.0 * x;
        let result = core.run(3, &f, 0.0, 1.0, |context| {
            let mut sum = 0.0;
            for k in 0..5 {
                sum += context.compute_objective_value(k as f64)?;
            }
            Ok(sum)
        });
        assert_eq!(result, Err(IntegrationError::TooManyEvaluations { max_evaluations: 3 }));
        assert_eq!(core.evaluations(), 3);
    }
}
