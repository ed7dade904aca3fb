use serde::{
    Serialize,
    Deserialize
};

/// JSON 物件中用來登錄到 `Manager` 的名稱欄位。
#[derive(Clone, Serialize, Deserialize)]
pub struct NamedJsonObject {
    name: String
}


impl NamedJsonObject {
    pub fn name(&self) -> &str {
        &self.name
    }
}
