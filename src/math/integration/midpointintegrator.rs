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

pub const MIDPOINT_MAX_ITERATIONS_COUNT: usize = 64;

// 開放式中點法，每階把子區間數乘以 3，舊的中點仍是新子區間的中點：
//
//   s_0 = (max - min) * f((min + max) / 2)
//   s_n = (s_{n-1} + (max - min) * Σ f(新點) / 3^(n-1)) / 3
//
// 每階新增 2 * 3^(n-1) 個點，不會在端點求值。
struct MidPointStages {
    s: f64
}

impl MidPointStages {
    fn new() -> MidPointStages {
        MidPointStages { s: 0.0 }
    }

    fn stage(&mut self, context: &mut IntegrationContext<'_>, n: usize) -> IntegrationResult<f64> {
        let min = context.min();
        let diff = context.max() - min;
        if n == 0 {
            self.s = diff * context.compute_objective_value(min + 0.5 * diff)?;
            return Ok(self.s);
        }

        let intervals = u32::try_from(n - 1)
            .ok()
            .and_then(|exponent| 3u128.checked_pow(exponent))
            .ok_or_else(|| IntegrationError::TooManyEvaluations {
                max_evaluations: context.max_evaluations()
            })?;
        let tnm = intervals as f64;
        let del = diff / (3.0 * tnm);
        let ddel = del + del;
        let mut x = min + 0.5 * del;
        let mut sum = 0.0;
        for _ in 0..intervals {
            sum += context.compute_objective_value(x)?;
            x += ddel;
            sum += context.compute_objective_value(x)?;
            x += del;
        }
        self.s = (self.s + diff * sum / tnm) / 3.0;
        Ok(self.s)
    }
}

pub struct MidPointIntegrator {
    core: IntegratorCore
}

impl MidPointIntegrator {
    pub fn new(policy: AccuracyPolicy) -> IntegrationResult<MidPointIntegrator> {
        policy.validate_with_ceiling(MIDPOINT_MAX_ITERATIONS_COUNT)?;
        Ok(MidPointIntegrator { core: IntegratorCore::new("midpoint", policy) })
    }

    pub fn with_accuracies(relative_accuracy: f64,
                           absolute_accuracy: f64,
                           minimal_iteration_count: usize,
                           maximal_iteration_count: usize) -> IntegrationResult<MidPointIntegrator> {
        Self::new(AccuracyPolicy::new(relative_accuracy,
                                      absolute_accuracy,
                                      minimal_iteration_count,
                                      maximal_iteration_count)?)
    }
}

impl Default for MidPointIntegrator {
    fn default() -> Self {
        let policy = AccuracyPolicy::default_with_ceiling(MIDPOINT_MAX_ITERATIONS_COUNT);
        MidPointIntegrator { core: IntegratorCore::new("midpoint", policy) }
    }
}

impl UnivariateIntegrator for MidPointIntegrator {
    fn core(&self) -> &IntegratorCore {
        &self.core
    }

    fn integrate(&mut self,
                 max_eval: usize,
                 f: &dyn UnivariateFunction,
                 min: f64,
                 max: f64) -> IntegrationResult<f64> {
        self.core.run(max_eval, f, min, max, |context| {
            let mut stages = MidPointStages::new();
            context.refine(|context, i| stages.stage(context, i))
        })
    }
}
