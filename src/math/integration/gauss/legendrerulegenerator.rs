use super::rule::Rule;
use super::rulecache::RuleGenerator;

// ─────────────────────────────────────────────────────────────────────────────
// Gauss-Legendre（雙精度）
// ─────────────────────────────────────────────────────────────────────────────
//
// n 階節點是 P_n 的根，以三項遞迴計算：
//
//   P_0 = 1,  P_1 = x,  P_{j+1} = ((2j + 1) x P_j - j P_{j-1}) / (j + 1)
//
// n-1 階節點與 n 階的根交錯，因此第 i 大的正根落在
// (x_{n-1}[n-2-i], x_{n-1}[n-1-i]) 之間（i = 0 時上界為 1）。
// 只搜尋正根，負根與權重取鏡像；二分到區間寬度不超過中點的一個 ulp。
//
// 權重：
//
//   w = 2 (1 - c^2) / (n (P_{n-1}(c) - c P_n(c)))^2
//
// n 為奇數時 0 也是根，權重用 P_{n-1}(0) 的封閉形式：w = 2 / (n P_{n-1}(0))^2。

pub struct LegendreRuleGenerator;

/// 回傳 `(P_{n-1}(x), P_n(x))`。
pub(crate) fn legendre_pair(n: usize, x: f64) -> (f64, f64) {
    let mut p_previous = 1.0;
    let mut p = x;
    for j in 1..n {
        let j = j as f64;
        let p_next = ((2.0 * j + 1.0) * x * p - j * p_previous) / (j + 1.0);
        p_previous = p;
        p = p_next;
    }
    (p_previous, p)
}

/// 與 `x` 同號方向上相鄰浮點數的距離。
pub(crate) fn ulp(x: f64) -> f64 {
    let x = x.abs();
    f64::from_bits(x.to_bits() + 1) - x
}

/// `P_{n-1}(0)`，n 為奇數。
pub(crate) fn legendre_at_zero(n: usize) -> f64 {
    let mut p = 1.0;
    let mut j = 1;
    while j < n {
        p = -(j as f64) * p / (j as f64 + 1.0);
        j += 2;
    }
    p
}

/// 依鏡像對稱組出完整規則：`positive[i]` 是第 i 大的正根與其權重。
pub(crate) fn symmetric_rule(order: usize, positive: &[(f64, f64)], center_weight: Option<f64>) -> Rule {
    let mut nodes = vec![0.0; order];
    let mut weights = vec![0.0; order];
    for (i, &(c, w)) in positive.iter().enumerate() {
        nodes[order - 1 - i] = c;
        weights[order - 1 - i] = w;
        nodes[i] = -c;
        weights[i] = w;
    }
    if let Some(w) = center_weight {
        nodes[order / 2] = 0.0;
        weights[order / 2] = w;
    }
    Rule::from_parts(nodes, weights)
}

impl RuleGenerator for LegendreRuleGenerator {
    fn compute_rule(&self, previous: Option<&Rule>) -> Rule {
        let previous_nodes = match previous {
            None => return Rule::from_parts(vec![0.0], vec![2.0]),
            Some(rule) => rule.nodes()
        };
        let n = previous_nodes.len() + 1;

        let positive: Vec<(f64, f64)> = (0..n / 2)
            .map(|i| {
                let mut a = previous_nodes[n - 2 - i];
                let mut b = if i == 0 { 1.0 } else { previous_nodes[n - 1 - i] };
                let (_, mut pa) = legendre_pair(n, a);

                let mut c = 0.5 * (a + b);
                loop {
                    let done = b - a <= ulp(c);
                    let (pmc, pc) = legendre_pair(n, c);
                    if done {
                        let d = n as f64 * (pmc - c * pc);
                        return (c, 2.0 * (1.0 - c * c) / (d * d));
                    }
                    if pa * pc <= 0.0 {
                        b = c;
                    } else {
                        a = c;
                        pa = pc;
                    }
                    c = 0.5 * (a + b);
                }
            })
            .collect();

        let center_weight = (n % 2 == 1).then(|| {
            let d = n as f64 * legendre_at_zero(n);
            2.0 / (d * d)
        });
        symmetric_rule(n, &positive, center_weight)
    }
}
