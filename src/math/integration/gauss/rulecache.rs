use std::sync::atomic::{
    AtomicUsize,
    Ordering
};
use std::sync::{
    Arc,
    Mutex,
    PoisonError
};

use tracing::debug;

use crate::math::integration::integrationerror::{
    IntegrationError,
    IntegrationResult
};
use super::rule::Rule;

/// 可快取的最高階數。
pub const MAX_RULE_ORDER: usize = 1000;

/// 由 n-1 階規則算出 n 階規則。
///
/// `previous` 為 `None` 時回傳 1 階（遞迴的起點）；否則回傳
/// `previous.order() + 1` 階。n-1 階的節點與 n 階的根交錯，作為二分法的區間。
pub trait RuleGenerator: Send + Sync {
    fn compute_rule(&self, previous: Option<&Rule>) -> Rule;
}

// ─────────────────────────────────────────────────────────────────────────────
// RuleCache
// ─────────────────────────────────────────────────────────────────────────────
//
// rules[k] 是 k + 1 階規則，只增不減，寫入後不再修改。
//
// 取 n 階時若尚未計算，從目前最高階往上逐階補齊（迴圈，不用遞迴），
// 整段 "查詢 + 補齊 + 寫入" 都在同一把鎖內完成：其他執行緒不會看到
// 補到一半的鏈，也不會重複計算同一階。
//
// Vec::push 是唯一的寫入動作，panic 不會留下半寫入的項目，所以
// poisoned lock 可以直接取回內容繼續使用。

pub struct RuleCache<G: RuleGenerator> {
    generator: G,
    rules: Mutex<Vec<Arc<Rule>>>,
    computations: AtomicUsize
}

impl<G: RuleGenerator> RuleCache<G> {
    pub fn new(generator: G) -> RuleCache<G> {
        RuleCache {
            generator,
            rules: Mutex::new(Vec::new()),
            computations: AtomicUsize::new(0)
        }
    }

    pub fn get_rule(&self, order: usize) -> IntegrationResult<Arc<Rule>> {
        if order == 0 {
            return Err(IntegrationError::NotStrictlyPositive { parameter: "order", value: order });
        }
        if order > MAX_RULE_ORDER {
            return Err(IntegrationError::OrderTooLarge { order, maximum: MAX_RULE_ORDER });
        }

        let mut rules = self.rules.lock().unwrap_or_else(PoisonError::into_inner);
        while rules.len() < order {
            let rule = self.generator.compute_rule(rules.last().map(|rule| rule.as_ref()));
            self.computations.fetch_add(1, Ordering::Relaxed);
            debug!(order = rule.order(), "generated quadrature rule");
            rules.push(Arc::new(rule));
        }
        Ok(Arc::clone(&rules[order - 1]))
    }

    /// 目前已快取的最高階數。
    pub fn cached_orders(&self) -> usize {
        self.rules.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// 累計呼叫 `compute_rule` 的次數。
    pub fn computations(&self) -> usize {
        self.computations.load(Ordering::Relaxed)
    }
}
