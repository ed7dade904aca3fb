use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize
};

use super::accuracypolicy::AccuracyPolicy;
use super::gauss::gaussintegratorfactory::GaussIntegratorFactory;
use super::integrationerror::{
    IntegrationError,
    IntegrationResult
};
use super::iterativelegendregaussintegrator::IterativeLegendreGaussIntegrator;
use super::midpointintegrator::{
    MidPointIntegrator,
    MIDPOINT_MAX_ITERATIONS_COUNT
};
use super::rombergintegrator::{
    RombergIntegrator,
    ROMBERG_MAX_ITERATIONS_COUNT
};
use super::simpsonintegrator::{
    SimpsonIntegrator,
    SIMPSON_MAX_ITERATIONS_COUNT
};
use super::trapezoidintegrator::{
    TrapezoidIntegrator,
    TRAPEZOID_MAX_ITERATIONS_COUNT
};
use super::univariateintegrator::UnivariateIntegrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationMethod {
    Trapezoid,
    Simpson,
    Romberg,
    MidPoint,
    IterativeLegendreGauss
}

impl IntegrationMethod {
    /// maximal_iteration_count 的上限；Gauss 類方法沒有上限。
    pub fn ceiling(&self) -> Option<usize> {
        match self {
            IntegrationMethod::Trapezoid => Some(TRAPEZOID_MAX_ITERATIONS_COUNT),
            IntegrationMethod::Simpson => Some(SIMPSON_MAX_ITERATIONS_COUNT),
            IntegrationMethod::Romberg => Some(ROMBERG_MAX_ITERATIONS_COUNT),
            IntegrationMethod::MidPoint => Some(MIDPOINT_MAX_ITERATIONS_COUNT),
            IntegrationMethod::IterativeLegendreGauss => None
        }
    }

    /// 未指定的欄位沿用各方法的預設值。
    pub fn default_policy(&self) -> AccuracyPolicy {
        self.ceiling().map_or_else(AccuracyPolicy::default, AccuracyPolicy::default_with_ceiling)
    }
}

/// 一組積分器設定；每次 `generate` 都產生一個新的積分器實例。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorGenerator {
    method: IntegrationMethod,
    #[serde(default)]
    relative_accuracy: Option<f64>,
    #[serde(default)]
    absolute_accuracy: Option<f64>,
    #[serde(default)]
    minimal_iteration_count: Option<usize>,
    #[serde(default)]
    maximal_iteration_count: Option<usize>,
    #[serde(default)]
    number_of_points: Option<usize>
}

impl IntegratorGenerator {
    pub fn new(method: IntegrationMethod) -> IntegratorGenerator {
        IntegratorGenerator {
            method,
            relative_accuracy: None,
            absolute_accuracy: None,
            minimal_iteration_count: None,
            maximal_iteration_count: None,
            number_of_points: None
        }
    }

    pub fn with_relative_accuracy(mut self, relative_accuracy: f64) -> Self {
        self.relative_accuracy = Some(relative_accuracy);
        self
    }

    pub fn with_absolute_accuracy(mut self, absolute_accuracy: f64) -> Self {
        self.absolute_accuracy = Some(absolute_accuracy);
        self
    }

    pub fn with_iteration_counts(mut self, minimal_iteration_count: usize, maximal_iteration_count: usize) -> Self {
        self.minimal_iteration_count = Some(minimal_iteration_count);
        self.maximal_iteration_count = Some(maximal_iteration_count);
        self
    }

    pub fn with_number_of_points(mut self, number_of_points: usize) -> Self {
        self.number_of_points = Some(number_of_points);
        self
    }

    pub fn method(&self) -> IntegrationMethod {
        self.method
    }

    pub fn number_of_points(&self) -> Option<usize> {
        self.number_of_points
    }

    pub fn policy(&self) -> IntegrationResult<AccuracyPolicy> {
        let default = self.method.default_policy();
        let policy = AccuracyPolicy::new(self.relative_accuracy.unwrap_or(default.relative_accuracy()),
                                         self.absolute_accuracy.unwrap_or(default.absolute_accuracy()),
                                         self.minimal_iteration_count.unwrap_or(default.minimal_iteration_count()),
                                         self.maximal_iteration_count.unwrap_or(default.maximal_iteration_count()))?;
        if let Some(ceiling) = self.method.ceiling() {
            policy.validate_with_ceiling(ceiling)?;
        }
        Ok(policy)
    }

    /// Gauss 類方法的規則取自 `factory`，多個積分器可共用同一份快取。
    pub fn generate(&self, factory: &Arc<GaussIntegratorFactory>) -> IntegrationResult<Box<dyn UnivariateIntegrator>> {
        let policy = self.policy()?;
        let integrator: Box<dyn UnivariateIntegrator> = match self.method {
            IntegrationMethod::Trapezoid => Box::new(TrapezoidIntegrator::new(policy)?),
            IntegrationMethod::Simpson => Box::new(SimpsonIntegrator::new(policy)?),
            IntegrationMethod::Romberg => Box::new(RombergIntegrator::new(policy)?),
            IntegrationMethod::MidPoint => Box::new(MidPointIntegrator::new(policy)?),
            IntegrationMethod::IterativeLegendreGauss => {
                // 缺少點數視為 0 點
                let number_of_points = self.number_of_points.ok_or(IntegrationError::NotStrictlyPositive {
                    parameter: "number_of_points",
                    value: 0
                })?;
                Box::new(IterativeLegendreGaussIntegrator::with_factory(number_of_points,
                                                                        policy,
                                                                        Arc::clone(factory))?)
            }
        };
        Ok(integrator)
    }
}
