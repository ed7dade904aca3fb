use crate::math::integration::integrationerror::IntegrationResult;
use crate::math::integration::univariateintegrator::verify_interval;

use super::gaussintegrator::GaussIntegrator;
use super::hermiterulegenerator::HermiteRuleGenerator;
use super::legendrehighprecisionrulegenerator::LegendreHighPrecisionRuleGenerator;
use super::legendrerulegenerator::LegendreRuleGenerator;
use super::rulecache::RuleCache;

// ─────────────────────────────────────────────────────────────────────────────
// GaussIntegratorFactory
// ─────────────────────────────────────────────────────────────────────────────
//
// 每種規則各有一個獨立的快取，快取隨 factory 存活。
// 需要共用時以 Arc<GaussIntegratorFactory> 明確傳遞，不提供全域實例。

pub struct GaussIntegratorFactory {
    legendre: RuleCache<LegendreRuleGenerator>,
    legendre_high_precision: RuleCache<LegendreHighPrecisionRuleGenerator>,
    hermite: RuleCache<HermiteRuleGenerator>
}

impl GaussIntegratorFactory {
    pub fn new() -> GaussIntegratorFactory {
        GaussIntegratorFactory {
            legendre: RuleCache::new(LegendreRuleGenerator),
            legendre_high_precision: RuleCache::new(LegendreHighPrecisionRuleGenerator),
            hermite: RuleCache::new(HermiteRuleGenerator)
        }
    }

    /// [-1, 1] 上的 Gauss-Legendre 積分器。
    pub fn legendre(&self, order: usize) -> IntegrationResult<GaussIntegrator> {
        GaussIntegrator::from_rule(self.legendre.get_rule(order)?)
    }

    /// [lower, upper] 上的 Gauss-Legendre 積分器。
    pub fn legendre_on(&self, order: usize, lower: f64, upper: f64) -> IntegrationResult<GaussIntegrator> {
        verify_interval(lower, upper)?;
        let rule = self.legendre.get_rule(order)?;
        GaussIntegrator::new_mapped(&rule, lower, upper)
    }

    pub fn legendre_high_precision(&self, order: usize) -> IntegrationResult<GaussIntegrator> {
        GaussIntegrator::from_rule(self.legendre_high_precision.get_rule(order)?)
    }

    pub fn legendre_high_precision_on(&self,
                                      order: usize,
                                      lower: f64,
                                      upper: f64) -> IntegrationResult<GaussIntegrator> {
        verify_interval(lower, upper)?;
        let rule = self.legendre_high_precision.get_rule(order)?;
        GaussIntegrator::new_mapped(&rule, lower, upper)
    }

    /// `∫ f(x) exp(-x^2) dx`（整個實數線）的 Gauss-Hermite 積分器。
    pub fn hermite(&self, order: usize) -> IntegrationResult<GaussIntegrator> {
        GaussIntegrator::from_rule(self.hermite.get_rule(order)?)
    }

    pub fn legendre_cache(&self) -> &RuleCache<LegendreRuleGenerator> {
        &self.legendre
    }

    pub fn legendre_high_precision_cache(&self) -> &RuleCache<LegendreHighPrecisionRuleGenerator> {
        &self.legendre_high_precision
    }

    pub fn hermite_cache(&self) -> &RuleCache<HermiteRuleGenerator> {
        &self.hermite
    }
}

impl Default for GaussIntegratorFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::integration::integrationerror::IntegrationError;

    fn assert_exact_for_monomials(gauss: &GaussIntegrator, tolerance: f64) {
        let n = gauss.number_of_points();
        for k in 0..(2 * n) {
            let expected = if k % 2 == 1 { 0.0 } else { 2.0 / (k as f64 + 1.0) };
            let value = gauss.integrate(&|x: f64| x.powi(k as i32));
            assert_abs_diff_eq!(value, expected, epsilon = tolerance);
        }
    }

    #[test]
    fn legendre_rules_integrate_monomials_exactly() {
        let factory = GaussIntegratorFactory::new();
        for order in 1..=20 {
            assert_exact_for_monomials(&factory.legendre(order).unwrap(), 1e-13);
            assert_exact_for_monomials(&factory.legendre_high_precision(order).unwrap(), 1e-13);
        }
    }

    #[test]
    fn weights_are_positive_and_nodes_symmetric() {
        let factory = GaussIntegratorFactory::new();
        for order in 1..=30 {
            let gauss = factory.legendre(order).unwrap();
            let rule = gauss.rule();
            assert!(rule.weights().iter().all(|&w| w > 0.0));
            let sum: f64 = rule.weights().iter().sum();
            assert_abs_diff_eq!(sum, 2.0, epsilon = 1e-13);

            for i in 0..order {
                let mirror = order - 1 - i;
                assert_eq!(rule.nodes()[i], -rule.nodes()[mirror]);
                assert_eq!(rule.weights()[i], rule.weights()[mirror]);
            }
            assert!(rule.nodes().iter().all(|x| x.abs() < 1.0));
        }
    }

    #[test]
    fn mapped_rules_integrate_constants_to_the_interval_length() {
        let factory = GaussIntegratorFactory::new();
        for (order, lower, upper) in [(1, 0.0, 1.0), (4, -3.0, 7.5), (11, 2.0, 2.5)] {
            let gauss = factory.legendre_on(order, lower, upper).unwrap();
            assert_abs_diff_eq!(gauss.integrate(&|_x: f64| 1.0), upper - lower, epsilon = 1e-13);
            let high = factory.legendre_high_precision_on(order, lower, upper).unwrap();
            assert_abs_diff_eq!(high.integrate(&|_x: f64| 1.0), upper - lower, epsilon = 1e-13);
        }
        let gauss = factory.legendre_on(5, 0.0, PI).unwrap();
        assert_abs_diff_eq!(gauss.integrate(&f64::sin), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn mapping_rejects_inverted_intervals() {
        let factory = GaussIntegratorFactory::new();
        assert_eq!(
            factory.legendre_on(3, 1.0, 1.0).unwrap_err(),
            IntegrationError::InvalidInterval { lower: 1.0, upper: 1.0 }
        );
        assert!(factory.legendre_high_precision_on(3, 2.0, -1.0).is_err());
    }

    #[test]
    fn repeated_requests_reuse_the_cached_rule() {
        let factory = GaussIntegratorFactory::new();
        let first = factory.legendre(16).unwrap();
        assert_eq!(factory.legendre_cache().computations(), 16);

        let second = factory.legendre(16).unwrap();
        assert_eq!(factory.legendre_cache().computations(), 16);
        assert!(Arc::ptr_eq(first.rule(), second.rule()));
        assert_eq!(first.rule().nodes(), second.rule().nodes());
        assert_eq!(first.rule().weights(), second.rule().weights());

        // 各精度的快取互不影響
        assert_eq!(factory.legendre_high_precision_cache().cached_orders(), 0);
        assert_eq!(factory.hermite_cache().cached_orders(), 0);
    }

    #[test]
    fn invalid_orders_are_rejected() {
        let factory = GaussIntegratorFactory::new();
        assert_eq!(
            factory.legendre(0).unwrap_err(),
            IntegrationError::NotStrictlyPositive { parameter: "order", value: 0 }
        );
        assert!(matches!(factory.hermite(1001), Err(IntegrationError::OrderTooLarge { .. })));
    }

    #[test]
    fn hermite_integrates_gaussian_moments() {
        let factory = GaussIntegratorFactory::new();
        let gauss = factory.hermite(8).unwrap();
        assert_abs_diff_eq!(gauss.integrate(&|_x: f64| 1.0), PI.sqrt(), epsilon = 1e-13);
        assert_abs_diff_eq!(gauss.integrate(&|x: f64| x.powi(4)), 0.75 * PI.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(gauss.integrate(&|x: f64| x.powi(5)), 0.0, epsilon = 1e-12);
    }
}
