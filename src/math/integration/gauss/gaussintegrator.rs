use std::convert::Infallible;
use std::sync::Arc;

use crate::math::integration::integrationerror::{
    IntegrationError,
    IntegrationResult
};
use crate::math::univariatefunction::UnivariateFunction;

use super::rule::Rule;

/// 固定節點與權重的加權和 `Σ w_i f(x_i)`。
///
/// 節點數量與權重數量必須相同，且節點嚴格遞增；建構時檢查，求值時不再檢查。
#[derive(Debug, Clone)]
pub struct GaussIntegrator {
    rule: Arc<Rule>
}

impl GaussIntegrator {
    pub fn new(points: Vec<f64>, weights: Vec<f64>) -> IntegrationResult<GaussIntegrator> {
        Self::from_rule(Arc::new(Rule::from_parts(points, weights)))
    }

    pub fn from_rule(rule: Arc<Rule>) -> IntegrationResult<GaussIntegrator> {
        check_rule(&rule)?;
        Ok(GaussIntegrator { rule })
    }

    /// 把標準區間上的規則轉到 [lower, upper] 後建構。
    pub fn new_mapped(rule: &Rule, lower: f64, upper: f64) -> IntegrationResult<GaussIntegrator> {
        Self::from_rule(Arc::new(rule.map_to_interval(lower, upper)))
    }

    pub fn rule(&self) -> &Arc<Rule> {
        &self.rule
    }

    pub fn number_of_points(&self) -> usize {
        self.rule.order()
    }

    pub fn point(&self, index: usize) -> f64 {
        self.rule.nodes()[index]
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.rule.weights()[index]
    }

    pub fn integrate(&self, f: &dyn UnivariateFunction) -> f64 {
        match self.try_integrate(|x| Ok::<f64, Infallible>(f.value(x))) {
            Ok(value) => value,
            Err(never) => match never {}
        }
    }

    /// 可失敗的求值版本（例如經過求值預算的函數）。第一個錯誤即中止。
    ///
    /// 以 Kahan 補償求和累加，`c` 記錄每次加法遺失的低位。
    pub fn try_integrate<F, E>(&self, mut f: F) -> Result<f64, E>
    where
        F: FnMut(f64) -> Result<f64, E>
    {
        let mut s = 0.0;
        let mut c = 0.0;
        for (&x, &w) in self.rule.nodes().iter().zip(self.rule.weights()) {
            let y = w * f(x)? - c;
            let t = s + y;
            c = (t - s) - y;
            s = t;
        }
        Ok(s)
    }
}

fn check_rule(rule: &Rule) -> IntegrationResult<()> {
    let nodes = rule.nodes();
    let weights = rule.weights();
    if nodes.len() != weights.len() {
        return Err(IntegrationError::DimensionMismatch {
            nodes: nodes.len(),
            weights: weights.len()
        });
    }
    for (index, pair) in nodes.windows(2).enumerate() {
        // NaN 也視為未排序
        if !(pair[0] < pair[1]) {
            return Err(IntegrationError::NonMonotonicNodes {
                index: index + 1,
                previous: pair[0],
                current: pair[1]
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn construction_checks_dimensions_and_order() {
        assert_eq!(
            GaussIntegrator::new(vec![0.0, 1.0], vec![1.0]).unwrap_err(),
            IntegrationError::DimensionMismatch { nodes: 2, weights: 1 }
        );
        assert_eq!(
            GaussIntegrator::new(vec![0.0, 2.0, 2.0], vec![1.0, 1.0, 1.0]).unwrap_err(),
            IntegrationError::NonMonotonicNodes { index: 2, previous: 2.0, current: 2.0 }
        );
        assert!(GaussIntegrator::new(vec![], vec![]).is_ok());
    }

    #[test]
    fn weighted_sum() {
        let gauss = GaussIntegrator::new(vec![-1.0, 0.0, 1.0], vec![1.0 / 3.0, 4.0 / 3.0, 1.0 / 3.0]).unwrap();
        assert_eq!(gauss.number_of_points(), 3);
        assert_eq!(gauss.point(2), 1.0);
        assert_eq!(gauss.weight(1), 4.0 / 3.0);
        assert_abs_diff_eq!(gauss.integrate(&|x: f64| x * x), 2.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn compensated_summation_keeps_small_terms() {
        // 1 + 1e-16 * 10000 在一般求和下會遺失全部小項
        let n = 10_001;
        let points: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let mut weights = vec![1.0e-16; n];
        weights[0] = 1.0;
        let gauss = GaussIntegrator::new(points, weights).unwrap();
        let value = gauss.integrate(&|_x: f64| 1.0);
        assert_abs_diff_eq!(value, 1.0 + 1.0e-12, epsilon = 1e-15);
    }

    #[test]
    fn first_error_stops_the_sum() {
        let gauss = GaussIntegrator::new(vec![0.0, 1.0, 2.0], vec![1.0, 1.0, 1.0]).unwrap();
        let mut calls = 0;
        let result = gauss.try_integrate(|x| {
            calls += 1;
            if x > 0.5 { Err("budget") } else { Ok(x) }
        });
        assert_eq!(result, Err("budget"));
        assert_eq!(calls, 2);
    }
}
