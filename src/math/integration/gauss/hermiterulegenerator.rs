use std::f64::consts::PI;

use super::legendrerulegenerator::{
    symmetric_rule,
    ulp
};
use super::rule::Rule;
use super::rulecache::RuleGenerator;

// Gauss-Hermite：∫ f(x) exp(-x^2) dx，積分範圍為整個實數線。
//
// 使用正規化的 Hermite 多項式避免高階溢位：
//
//   h_0 = π^(-1/4),  h_1 = sqrt(2) π^(-1/4) x
//   h_{j+1} = sqrt(2 / (j + 1)) x h_j - sqrt(j / (j + 1)) h_{j-1}
//
// 最大根小於 sqrt(2 (n - 1))，其餘根同樣由 n-1 階節點夾住。
// 權重 w = 2 / (sqrt(2n) h_{n-1}(c))^2。

pub struct HermiteRuleGenerator;

fn h0() -> f64 {
    PI.powf(-0.25)
}

fn hermite_pair(n: usize, x: f64) -> (f64, f64) {
    let mut h_previous = h0();
    let mut h = std::f64::consts::SQRT_2 * h0() * x;
    for j in 1..n {
        let jp1 = (j + 1) as f64;
        let s = (2.0 / jp1).sqrt();
        let sm = (j as f64 / jp1).sqrt();
        let h_next = s * x * h - sm * h_previous;
        h_previous = h;
        h = h_next;
    }
    (h_previous, h)
}

impl RuleGenerator for HermiteRuleGenerator {
    fn compute_rule(&self, previous: Option<&Rule>) -> Rule {
        let previous_nodes = match previous {
            None => return Rule::from_parts(vec![0.0], vec![PI.sqrt()]),
            Some(rule) => rule.nodes()
        };
        let n = previous_nodes.len() + 1;
        let sqrt_two_n = (2.0 * n as f64).sqrt();
        let upper_bound = (2.0 * (n - 1) as f64).sqrt();

        let positive: Vec<(f64, f64)> = (0..n / 2)
            .map(|i| {
                let mut a = previous_nodes[n - 2 - i];
                let mut b = if i == 0 { upper_bound } else { previous_nodes[n - 1 - i] };
                let (_, mut ha) = hermite_pair(n, a);

                let mut c = 0.5 * (a + b);
                loop {
                    let done = b - a <= ulp(c);
                    let (hmc, hc) = hermite_pair(n, c);
                    if done {
                        let d = sqrt_two_n * hmc;
                        return (c, 2.0 / (d * d));
                    }
                    if ha * hc <= 0.0 {
                        b = c;
                    } else {
                        a = c;
                        ha = hc;
                    }
                    c = 0.5 * (a + b);
                }
            })
            .collect();

        let center_weight = (n % 2 == 1).then(|| {
            let mut hm = h0();
            let mut j = 1;
            while j < n {
                hm = -(j as f64 / (j + 1) as f64).sqrt() * hm;
                j += 2;
            }
            let d = sqrt_two_n * hm;
            2.0 / (d * d)
        });
        symmetric_rule(n, &positive, center_weight)
    }
}
