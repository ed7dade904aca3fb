use rust_decimal::Decimal;
use rust_decimal::prelude::{
    FromPrimitive,
    ToPrimitive
};

use super::legendrerulegenerator::symmetric_rule;
use super::rule::Rule;
use super::rulecache::RuleGenerator;

// ─────────────────────────────────────────────────────────────────────────────
// Gauss-Legendre（高精度）
// ─────────────────────────────────────────────────────────────────────────────
//
// 與 LegendreRuleGenerator 相同的遞迴與二分法，但根與權重以 rust_decimal
// （96 bit 尾數，約 28 位有效數字）計算，最後才四捨五入成 f64。
// 高階時雙精度遞迴的捨入誤差會累積到節點上，這裡不會。
//
// 上一階節點只用來夾住根，f64 的精度已經足夠。

/// 二分法停止寬度 1e-27。
const BISECTION_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 27);

pub struct LegendreHighPrecisionRuleGenerator;

fn legendre_pair(n: usize, x: Decimal) -> (Decimal, Decimal) {
    let mut p_previous = Decimal::ONE;
    let mut p = x;
    for j in 1..n {
        let j = Decimal::from(j);
        let p_next = ((Decimal::TWO * j + Decimal::ONE) * x * p - j * p_previous) / (j + Decimal::ONE);
        p_previous = p;
        p = p_next;
    }
    (p_previous, p)
}

fn legendre_at_zero(n: usize) -> Decimal {
    let mut p = Decimal::ONE;
    let mut j = 1;
    while j < n {
        let jd = Decimal::from(j);
        p = -jd * p / (jd + Decimal::ONE);
        j += 2;
    }
    p
}

fn changes_sign(pa: Decimal, pc: Decimal) -> bool {
    // 小數相乘可能捨入成 0，只比較符號
    pc.is_zero() || pa.is_sign_negative() != pc.is_sign_negative()
}

fn to_f64(value: Decimal) -> f64 {
    // Decimal 的範圍（約 ±7.9e28）完全落在 f64 內，to_f64 對任何值都回傳 Some
    value.to_f64().unwrap_or(f64::NAN)
}

fn from_f64(value: f64) -> Decimal {
    // 只用於上一階的節點，恆在 (-1, 1) 內；夾住後 from_f64 不會失敗
    Decimal::from_f64(value.clamp(-1.0, 1.0)).unwrap_or_default()
}

impl RuleGenerator for LegendreHighPrecisionRuleGenerator {
    fn compute_rule(&self, previous: Option<&Rule>) -> Rule {
        let previous_nodes = match previous {
            None => return Rule::from_parts(vec![0.0], vec![2.0]),
            Some(rule) => rule.nodes()
        };
        let n = previous_nodes.len() + 1;
        let n_decimal = Decimal::from(n);

        let positive: Vec<(f64, f64)> = (0..n / 2)
            .map(|i| {
                let mut a = from_f64(previous_nodes[n - 2 - i]);
                let mut b = if i == 0 { Decimal::ONE } else { from_f64(previous_nodes[n - 1 - i]) };
                let (_, mut pa) = legendre_pair(n, a);

                let mut c = (a + b) / Decimal::TWO;
                loop {
                    let done = b - a <= BISECTION_TOLERANCE || c == a || c == b;
                    let (pmc, pc) = legendre_pair(n, c);
                    if done {
                        let d = n_decimal * (pmc - c * pc);
                        let w = Decimal::TWO * (Decimal::ONE - c * c) / (d * d);
                        return (to_f64(c), to_f64(w));
                    }
                    if changes_sign(pa, pc) {
                        b = c;
                    } else {
                        a = c;
                        pa = pc;
                    }
                    c = (a + b) / Decimal::TWO;
                }
            })
            .collect();

        let center_weight = (n % 2 == 1).then(|| {
            let d = n_decimal * legendre_at_zero(n);
            to_f64(Decimal::TWO / (d * d))
        });
        symmetric_rule(n, &positive, center_weight)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::math::integration::gauss::legendrerulegenerator::LegendreRuleGenerator;

    fn rules(order: usize) -> (Rule, Rule) {
        let mut low = LegendreRuleGenerator.compute_rule(None);
        let mut high = LegendreHighPrecisionRuleGenerator.compute_rule(None);
        while low.order() < order {
            low = LegendreRuleGenerator.compute_rule(Some(&low));
            high = LegendreHighPrecisionRuleGenerator.compute_rule(Some(&high));
        }
        (low, high)
    }

    #[test]
    fn agrees_with_double_precision() {
        let (low, high) = rules(12);
        for (x_low, x_high) in low.nodes().iter().zip(high.nodes()) {
            assert_abs_diff_eq!(x_low, x_high, epsilon = 1e-14);
        }
        for (w_low, w_high) in low.weights().iter().zip(high.weights()) {
            assert_abs_diff_eq!(w_low, w_high, epsilon = 1e-13);
        }
    }

    #[test]
    fn closed_form_nodes_are_correctly_rounded() {
        let (_, high) = rules(3);
        assert_abs_diff_eq!(high.nodes()[2], 0.6f64.sqrt(), epsilon = 2.0 * f64::EPSILON);
        assert_abs_diff_eq!(high.weights()[0], 5.0 / 9.0, epsilon = 2.0 * f64::EPSILON);
        assert_abs_diff_eq!(high.weights()[1], 8.0 / 9.0, epsilon = 2.0 * f64::EPSILON);
    }

    #[test]
    fn conversions_stay_exact_inside_the_node_range() {
        for x in [-1.0, -0.5, 0.0, 0.6f64.sqrt(), 1.0] {
            assert_abs_diff_eq!(to_f64(from_f64(x)), x, epsilon = f64::EPSILON);
        }
        assert_eq!(from_f64(2.0), Decimal::ONE);
        assert!((to_f64(Decimal::MAX) / 7.922_816_251_426_434e28 - 1.0).abs() < 1e-15);
    }

    #[test]
    fn sign_test_ignores_underflowing_products() {
        let tiny = Decimal::new(1, 20);
        assert!(!changes_sign(tiny, tiny));
        assert!(changes_sign(tiny, -tiny));
        assert!(changes_sign(tiny, Decimal::ZERO));
    }
}
