use crate::math::univariatefunction::UnivariateFunction;

use super::accuracypolicy::AccuracyPolicy;
use super::integrationerror::IntegrationResult;
use super::trapezoidintegrator::TrapezoidStages;
use super::univariateintegrator::{
    IntegratorCore,
    UnivariateIntegrator
};

pub const SIMPSON_MAX_ITERATIONS_COUNT: usize = 64;

/// Simpson 法：兩個相鄰梯形階段的 Richardson 組合
///
/// ```text
/// s_i = (4 * t_i - t_{i-1}) / 3
/// ```
///
/// 迭代 `i` 使用梯形第 `i + 1` 階。`minimal_iteration_count == 1` 時只回傳
/// `(4 * t_1 - t_0) / 3`，不進入迭代。
pub struct SimpsonIntegrator {
    core: IntegratorCore
}

impl SimpsonIntegrator {
    pub fn new(policy: AccuracyPolicy) -> IntegrationResult<SimpsonIntegrator> {
        policy.validate_with_ceiling(SIMPSON_MAX_ITERATIONS_COUNT)?;
        Ok(SimpsonIntegrator { core: IntegratorCore::new("simpson", policy) })
    }

    pub fn with_accuracies(relative_accuracy: f64,
                           absolute_accuracy: f64,
                           minimal_iteration_count: usize,
                           maximal_iteration_count: usize) -> IntegrationResult<SimpsonIntegrator> {
        Self::new(AccuracyPolicy::new(relative_accuracy,
                                      absolute_accuracy,
                                      minimal_iteration_count,
                                      maximal_iteration_count)?)
    }
}

impl Default for SimpsonIntegrator {
    fn default() -> Self {
        let policy = AccuracyPolicy::default_with_ceiling(SIMPSON_MAX_ITERATIONS_COUNT);
        SimpsonIntegrator { core: IntegratorCore::new("simpson", policy) }
    }
}

impl UnivariateIntegrator for SimpsonIntegrator {
    fn core(&self) -> &IntegratorCore {
        &self.core
    }

    fn integrate(&mut self,
                 max_eval: usize,
                 f: &dyn UnivariateFunction,
                 min: f64,
                 max: f64) -> IntegrationResult<f64> {
        let single_shot = self.core.policy().minimal_iteration_count() == 1;
        self.core.run(max_eval, f, min, max, |context| {
            let mut stages = TrapezoidStages::new();
            if single_shot {
                let t0 = stages.stage(context, 0)?;
                let t1 = stages.stage(context, 1)?;
                return Ok((4.0 * t1 - t0) / 3.0);
            }

            let mut previous_t = 0.0;
            context.refine(|context, i| {
                if i == 0 {
                    let t0 = stages.stage(context, 0)?;
                    previous_t = stages.stage(context, 1)?;
                    return Ok((4.0 * previous_t - t0) / 3.0);
                }
                let t = stages.stage(context, i + 1)?;
                let s = (4.0 * t - previous_t) / 3.0;
                previous_t = t;
                Ok(s)
            })
        })
    }
}
