use std::sync::Arc;

use crate::math::univariatefunction::UnivariateFunction;

use super::accuracypolicy::AccuracyPolicy;
use super::gauss::gaussintegratorfactory::GaussIntegratorFactory;
use super::gauss::rulecache::MAX_RULE_ORDER;
use super::integrationerror::{
    IntegrationError,
    IntegrationResult
};
use super::univariateintegrator::{
    IntegrationContext,
    IntegratorCore,
    UnivariateIntegrator
};

// ─────────────────────────────────────────────────────────────────────────────
// IterativeLegendreGaussIntegrator
// ─────────────────────────────────────────────────────────────────────────────
//
// 第 n 階把 [min, max] 切成 n 段，每段用固定階數的高精度 Gauss-Legendre 規則。
// 初始估計 n = 1，第一次加密 n = 2；之後依上一次的誤差放大段數：
//
//   ratio  = min(4, (delta / limit)^(0.5 / number_of_points))
//   n_next = max(floor(ratio * n), n + 1)
//
// 每次加密都是全新的取樣，不重用前一階的函數值。

/// 固定階數、逐次增加子區間的 Gauss-Legendre 積分。
pub struct IterativeLegendreGaussIntegrator {
    core: IntegratorCore,
    number_of_points: usize,
    factory: Arc<GaussIntegratorFactory>
}

impl IterativeLegendreGaussIntegrator {
    pub fn new(number_of_points: usize, policy: AccuracyPolicy) -> IntegrationResult<IterativeLegendreGaussIntegrator> {
        Self::with_factory(number_of_points, policy, Arc::new(GaussIntegratorFactory::new()))
    }

    /// 與其他積分器共用同一個規則快取。
    pub fn with_factory(number_of_points: usize,
                        policy: AccuracyPolicy,
                        factory: Arc<GaussIntegratorFactory>) -> IntegrationResult<IterativeLegendreGaussIntegrator> {
        if number_of_points == 0 {
            return Err(IntegrationError::NotStrictlyPositive {
                parameter: "number_of_points",
                value: number_of_points
            });
        }
        if number_of_points > MAX_RULE_ORDER {
            return Err(IntegrationError::OrderTooLarge {
                order: number_of_points,
                maximum: MAX_RULE_ORDER
            });
        }
        policy.validate()?;
        Ok(IterativeLegendreGaussIntegrator {
            core: IntegratorCore::new("iterative_legendre_gauss", policy),
            number_of_points,
            factory
        })
    }

    pub fn with_accuracies(number_of_points: usize,
                           relative_accuracy: f64,
                           absolute_accuracy: f64,
                           minimal_iteration_count: usize,
                           maximal_iteration_count: usize) -> IntegrationResult<IterativeLegendreGaussIntegrator> {
        Self::new(number_of_points,
                  AccuracyPolicy::new(relative_accuracy,
                                      absolute_accuracy,
                                      minimal_iteration_count,
                                      maximal_iteration_count)?)
    }

    pub fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    pub fn factory(&self) -> &Arc<GaussIntegratorFactory> {
        &self.factory
    }
}

fn stage(factory: &GaussIntegratorFactory,
         number_of_points: usize,
         context: &mut IntegrationContext<'_>,
         n: usize) -> IntegrationResult<f64> {
    let min = context.min();
    let step = (context.max() - min) / n as f64;
    let mut sum = 0.0;
    for k in 0..n {
        let a = min + k as f64 * step;
        let gauss = factory.legendre_high_precision_on(number_of_points, a, a + step)?;
        sum += gauss.try_integrate(|x| context.compute_objective_value(x))?;
    }
    Ok(sum)
}

fn next_subintervals(number_of_points: usize, n: usize, delta: f64, limit: f64) -> usize {
    // limit 為 0 時 powf 得到 inf 或 NaN，f64::min 都會取 4
    let ratio = f64::min(4.0, (delta / limit).powf(0.5 / number_of_points as f64));
    usize::max((ratio * n as f64) as usize, n + 1)
}

impl UnivariateIntegrator for IterativeLegendreGaussIntegrator {
    fn core(&self) -> &IntegratorCore {
        &self.core
    }

    fn integrate(&mut self,
                 max_eval: usize,
                 f: &dyn UnivariateFunction,
                 min: f64,
                 max: f64) -> IntegrationResult<f64> {
        let number_of_points = self.number_of_points;
        let factory = &self.factory;
        self.core.run(max_eval, f, min, max, |context| {
            let mut n = 1;
            let mut history = (0.0, 0.0);
            context.refine(|context, i| {
                if i == 1 {
                    n = 2;
                } else if i > 1 {
                    let (delta, limit) = context.policy().delta_and_limit(history.0, history.1);
                    n = next_subintervals(number_of_points, n, delta, limit);
                }
                let estimate = stage(factory, number_of_points, context, n)?;
                history = (history.1, estimate);
                Ok(estimate)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn integrator(number_of_points: usize, minimal: usize, maximal: usize) -> IterativeLegendreGaussIntegrator {
        IterativeLegendreGaussIntegrator::with_accuracies(number_of_points, 1.0e-12, 1.0e-10, minimal, maximal).unwrap()
    }

    #[test]
    fn low_degree_polynomials_converge_on_the_first_refinement() {
        // 5 點規則對 9 次以下多項式精確：n = 1 與 n = 2 的結果相同
        let f = |x: f64| x.powi(9) - 2.0 * x * x;
        let mut gauss = integrator(5, 1, 10);
        let value = gauss.integrate(1_000, &f, 0.0, 2.0).unwrap();
        assert_abs_diff_eq!(value, 102.4 - 16.0 / 3.0, epsilon = 1e-10);
        assert_eq!(gauss.iterations(), 1);
        assert_eq!(gauss.evaluations(), 15);
    }

    #[test]
    fn integrates_sine() {
        let mut gauss = integrator(5, 1, 64);
        let value = gauss.integrate(1_000_000, &f64::sin, 0.0, PI).unwrap();
        assert_abs_diff_eq!(value, 2.0, epsilon = 1e-10);
    }

    #[test]
    fn subinterval_growth_is_at_least_one() {
        assert_eq!(next_subintervals(5, 2, 0.0, 1.0), 3);
        assert_eq!(next_subintervals(5, 3, 1.0e20, 1.0), 12);
        assert_eq!(next_subintervals(5, 3, 1.0, 0.0), 12);
    }

    #[test]
    fn rules_come_from_the_shared_factory() {
        let factory = Arc::new(GaussIntegratorFactory::new());
        let policy = AccuracyPolicy::new(1.0e-12, 1.0e-10, 1, 64).unwrap();
        let mut gauss = IterativeLegendreGaussIntegrator::with_factory(4, policy, Arc::clone(&factory)).unwrap();
        gauss.integrate(10_000, &|x: f64| x.exp(), 0.0, 1.0).unwrap();
        assert_eq!(factory.legendre_high_precision_cache().cached_orders(), 4);
        assert_eq!(factory.legendre_cache().cached_orders(), 0);
    }

    #[test]
    fn invalid_number_of_points() {
        let policy = AccuracyPolicy::default();
        assert!(matches!(
            IterativeLegendreGaussIntegrator::new(0, policy),
            Err(IntegrationError::NotStrictlyPositive { parameter: "number_of_points", value: 0 })
        ));
        assert!(matches!(
            IterativeLegendreGaussIntegrator::new(MAX_RULE_ORDER + 1, policy),
            Err(IntegrationError::OrderTooLarge { .. })
        ));
    }

    #[test]
    fn single_iteration_is_not_enough_for_sine_with_two_points() {
        let mut gauss = integrator(2, 1, 1);
        assert_eq!(
            gauss.integrate(1_000, &f64::sin, 0.0, PI),
            Err(IntegrationError::TooManyIterations { max_iterations: 1 })
        );
        assert_eq!(gauss.evaluations(), 6);
    }
}
