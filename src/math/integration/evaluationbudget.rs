use super::integrationerror::{
    IntegrationError,
    IntegrationResult
};

/// 單次積分的函數呼叫預算。
///
/// `consume` 在呼叫函數之前執行：第 `max_evaluations + 1` 次呼叫直接失敗，
/// 函數本身不會被呼叫。
#[derive(Debug, Clone)]
pub struct EvaluationBudget {
    max_evaluations: usize,
    evaluations: usize
}

impl EvaluationBudget {
    pub fn new(max_evaluations: usize) -> EvaluationBudget {
        EvaluationBudget { max_evaluations, evaluations: 0 }
    }

    pub fn consume(&mut self) -> IntegrationResult<()> {
        if self.evaluations >= self.max_evaluations {
            return Err(IntegrationError::TooManyEvaluations {
                max_evaluations: self.max_evaluations
            });
        }
        self.evaluations += 1;
        Ok(())
    }

    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    pub fn max_evaluations(&self) -> usize {
        self.max_evaluations
    }
}

/// 迭代計數器：超過 `maximal_count` 即為 TooManyIterations。
#[derive(Debug, Clone)]
pub struct IterationCounter {
    maximal_count: usize,
    count: usize
}

impl IterationCounter {
    pub fn new(maximal_count: usize) -> IterationCounter {
        IterationCounter { maximal_count, count: 0 }
    }

    pub fn increment(&mut self) -> IntegrationResult<()> {
        if self.count >= self.maximal_count {
            return Err(IntegrationError::TooManyIterations {
                max_iterations: self.maximal_count
            });
        }
        self.count += 1;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_refuses_the_call_past_the_maximum() {
        let mut budget = EvaluationBudget::new(2);
        assert!(budget.consume().is_ok());
        assert!(budget.consume().is_ok());
        assert_eq!(
            budget.consume(),
            Err(IntegrationError::TooManyEvaluations { max_evaluations: 2 })
        );
        assert_eq!(budget.evaluations(), 2);
    }

    #[test]
    fn zero_budget_refuses_everything() {
        let mut budget = EvaluationBudget::new(0);
        assert!(budget.consume().is_err());
        assert_eq!(budget.evaluations(), 0);
    }

    #[test]
    fn iteration_counter_stops_at_the_maximum() {
        let mut counter = IterationCounter::new(1);
        assert!(counter.increment().is_ok());
        assert_eq!(counter.count(), 1);
        assert_eq!(
            counter.increment(),
            Err(IntegrationError::TooManyIterations { max_iterations: 1 })
        );
        assert_eq!(counter.count(), 1);
    }
}
