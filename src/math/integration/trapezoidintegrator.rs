use crate::math::univariatefunction::UnivariateFunction;

use super::accuracypolicy::AccuracyPolicy;
use super::integrationerror::{
    IntegrationError,
    IntegrationResult
};
use super::univariateintegrator::{
    IntegrationContext,
    IntegratorCore,
    UnivariateIntegrator
};

pub const TRAPEZOID_MAX_ITERATIONS_COUNT: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// TrapezoidStages
// ─────────────────────────────────────────────────────────────────────────────
//
// 第 n 階把 [min, max] 切成 2^n 等分。第 0 階直接用兩端點：
//
//   s_0 = (max - min) * (f(min) + f(max)) / 2
//
// 之後每一階只計算新增的 2^(n-1) 個中點：
//
//   s_n = (s_{n-1} + spacing * Σ f(新中點)) / 2,   spacing = (max - min) / 2^(n-1)
//
// Simpson 與 Romberg 都直接重用這些階段值，所以階段必須依序 0, 1, 2, ... 呼叫。

pub(crate) struct TrapezoidStages {
    s: f64
}

impl TrapezoidStages {
    pub(crate) fn new() -> TrapezoidStages {
        TrapezoidStages { s: 0.0 }
    }

    pub(crate) fn stage(&mut self, context: &mut IntegrationContext<'_>, n: usize) -> IntegrationResult<f64> {
        let min = context.min();
        let max = context.max();
        if n == 0 {
            let f_min = context.compute_objective_value(min)?;
            let f_max = context.compute_objective_value(max)?;
            self.s = 0.5 * (max - min) * (f_min + f_max);
            return Ok(self.s);
        }

        // 新點數超出 u128 時不可能在任何預算內完成
        let new_points = u32::try_from(n - 1)
            .ok()
            .and_then(|shift| 1u128.checked_shl(shift))
            .ok_or_else(|| IntegrationError::TooManyEvaluations {
                max_evaluations: context.max_evaluations()
            })?;
        let spacing = (max - min) / new_points as f64;
        let mut x = min + 0.5 * spacing;
        let mut sum = 0.0;
        for _ in 0..new_points {
            sum += context.compute_objective_value(x)?;
            x += spacing;
        }
        self.s = 0.5 * (self.s + sum * spacing);
        Ok(self.s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TrapezoidIntegrator
// ─────────────────────────────────────────────────────────────────────────────

/// 逐次加倍取樣密度的梯形法。
pub struct TrapezoidIntegrator {
    core: IntegratorCore
}

impl TrapezoidIntegrator {
    pub fn new(policy: AccuracyPolicy) -> IntegrationResult<TrapezoidIntegrator> {
        policy.validate_with_ceiling(TRAPEZOID_MAX_ITERATIONS_COUNT)?;
        Ok(TrapezoidIntegrator { core: IntegratorCore::new("trapezoid", policy) })
    }

    pub fn with_accuracies(relative_accuracy: f64,
                           absolute_accuracy: f64,
                           minimal_iteration_count: usize,
                           maximal_iteration_count: usize) -> IntegrationResult<TrapezoidIntegrator> {
        Self::new(AccuracyPolicy::new(relative_accuracy,
                                      absolute_accuracy,
                                      minimal_iteration_count,
                                      maximal_iteration_count)?)
    }
}

impl Default for TrapezoidIntegrator {
    fn default() -> Self {
        let policy = AccuracyPolicy::default_with_ceiling(TRAPEZOID_MAX_ITERATIONS_COUNT);
        TrapezoidIntegrator { core: IntegratorCore::new("trapezoid", policy) }
    }
}

impl UnivariateIntegrator for TrapezoidIntegrator {
    fn core(&self) -> &IntegratorCore {
        &self.core
    }

    fn integrate(&mut self,
                 max_eval: usize,
                 f: &dyn UnivariateFunction,
                 min: f64,
                 max: f64) -> IntegrationResult<f64> {
        self.core.run(max_eval, f, min, max, |context| {
            let mut stages = TrapezoidStages::new();
            context.refine(|context, i| stages.stage(context, i))
        })
    }
}
