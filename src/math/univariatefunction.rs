/// 單變數實函數 `f: R -> R`，積分器唯一需要的函數介面。
///
/// 任何 `Fn(f64) -> f64` closure 都自動實作此 trait。
pub trait UnivariateFunction {
    fn value(&self, x: f64) -> f64;
}

impl<F> UnivariateFunction for F
where
    F: Fn(f64) -> f64,
{
    fn value(&self, x: f64) -> f64 {
        self(x)
    }
}
