/// 求積規則：遞增節點與對應權重。
///
/// 由 rule generator 產生的規則定義在 [-1, 1]（Legendre）或實數線（Hermite），
/// `map_to_interval` 轉到任意 [a, b]。
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    nodes: Vec<f64>,
    weights: Vec<f64>
}

impl Rule {
    /// 不檢查長度與排序；公開的建構入口是 `GaussIntegrator::new`。
    pub(crate) fn from_parts(nodes: Vec<f64>, weights: Vec<f64>) -> Rule {
        Rule { nodes, weights }
    }

    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn order(&self) -> usize {
        self.nodes.len()
    }

    /// 把 [-1, 1] 上的規則線性轉到 [lower, upper]：
    ///
    /// ```text
    /// scale = (upper - lower) / 2
    /// shift = lower + scale
    /// x -> x * scale + shift
    /// w -> w * scale
    /// ```
    ///
    /// 不檢查 `lower < upper`；反向或退化的區間會在 `GaussIntegrator` 建構時被拒絕。
    pub fn map_to_interval(&self, lower: f64, upper: f64) -> Rule {
        let scale = (upper - lower) / 2.0;
        let shift = lower + scale;
        Rule {
            nodes: self.nodes.iter().map(|x| x * scale + shift).collect(),
            weights: self.weights.iter().map(|w| w * scale).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn mapping_scales_nodes_and_weights() {
        let x = 1.0 / 3.0f64.sqrt();
        let rule = Rule::from_parts(vec![-x, x], vec![1.0, 1.0]);
        let mapped = rule.map_to_interval(2.0, 6.0);
        assert_eq!(mapped.order(), 2);
        assert_abs_diff_eq!(mapped.nodes()[0], 4.0 - 2.0 * x, epsilon = 1e-15);
        assert_abs_diff_eq!(mapped.nodes()[1], 4.0 + 2.0 * x, epsilon = 1e-15);
        assert_eq!(mapped.weights(), &[2.0, 2.0]);
        // 原規則不變
        assert_eq!(rule.weights(), &[1.0, 1.0]);
    }
}
