use crate::math::univariatefunction::UnivariateFunction;

use super::accuracypolicy::AccuracyPolicy;
use super::integrationerror::IntegrationResult;
use super::trapezoidintegrator::TrapezoidStages;
use super::univariateintegrator::{
    IntegratorCore,
    UnivariateIntegrator
};

pub const ROMBERG_MAX_ITERATIONS_COUNT: usize = 32;

// ─────────────────────────────────────────────────────────────────────────────
// Romberg
// ─────────────────────────────────────────────────────────────────────────────
//
// 第 i 列第 0 欄是梯形第 i 階，第 j 欄（1 <= j <= i）是 Richardson 外插：
//
//   T[i][j] = T[i][j-1] + (T[i][j-1] - T[i-1][j-1]) / (4^j - 1)
//
// 對角線 T[i][i] 是第 i 次迭代的估計。只保留上一列與目前列，兩列輪流交換。

struct RombergTable {
    previous_row: Vec<f64>,
    current_row: Vec<f64>
}

impl RombergTable {
    fn new(maximal_iteration_count: usize) -> RombergTable {
        RombergTable {
            previous_row: vec![0.0; maximal_iteration_count + 1],
            current_row: vec![0.0; maximal_iteration_count + 1]
        }
    }

    /// 放入第 `i` 列的梯形值並回傳對角線 `T[i][i]`。
    fn push_row(&mut self, i: usize, trapezoid: f64) -> f64 {
        std::mem::swap(&mut self.previous_row, &mut self.current_row);
        self.current_row[0] = trapezoid;
        for j in 1..=i {
            let r = 4f64.powi(j as i32) - 1.0;
            let t_i_jm1 = self.current_row[j - 1];
            self.current_row[j] = t_i_jm1 + (t_i_jm1 - self.previous_row[j - 1]) / r;
        }
        self.current_row[i]
    }
}

pub struct RombergIntegrator {
    core: IntegratorCore
}

impl RombergIntegrator {
    pub fn new(policy: AccuracyPolicy) -> IntegrationResult<RombergIntegrator> {
        policy.validate_with_ceiling(ROMBERG_MAX_ITERATIONS_COUNT)?;
        Ok(RombergIntegrator { core: IntegratorCore::new("romberg", policy) })
    }

    pub fn with_accuracies(relative_accuracy: f64,
                           absolute_accuracy: f64,
                           minimal_iteration_count: usize,
                           maximal_iteration_count: usize) -> IntegrationResult<RombergIntegrator> {
        Self::new(AccuracyPolicy::new(relative_accuracy,
                                      absolute_accuracy,
                                      minimal_iteration_count,
                                      maximal_iteration_count)?)
    }
}

impl Default for RombergIntegrator {
    fn default() -> Self {
        let policy = AccuracyPolicy::default_with_ceiling(ROMBERG_MAX_ITERATIONS_COUNT);
        RombergIntegrator { core: IntegratorCore::new("romberg", policy) }
    }
}

impl UnivariateIntegrator for RombergIntegrator {
    fn core(&self) -> &IntegratorCore {
        &self.core
    }

    fn integrate(&mut self,
                 max_eval: usize,
                 f: &dyn UnivariateFunction,
                 min: f64,
                 max: f64) -> IntegrationResult<f64> {
        let maximal_iteration_count = self.core.policy().maximal_iteration_count();
        self.core.run(max_eval, f, min, max, |context| {
            let mut stages = TrapezoidStages::new();
            let mut table = RombergTable::new(maximal_iteration_count);
            context.refine(|context, i| {
                let trapezoid = stages.stage(context, i)?;
                Ok(table.push_row(i, trapezoid))
            })
        })
    }
}
