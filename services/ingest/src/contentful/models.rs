use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtfSys {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Product fields as authored in Contentful. Values are kept raw because
/// editors are free to store numbers as text and vice versa.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CtfProductFields {
    #[serde(default)]
    pub sku: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub brand: Option<Value>,
    #[serde(default)]
    pub model: Option<Value>,
    #[serde(default)]
    pub color: Option<Value>,
    #[serde(default)]
    pub currency: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub stock: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtfEntry {
    pub sys: CtfSys,
    #[serde(default)]
    pub fields: Option<CtfProductFields>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CtfListResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub items: Vec<CtfEntry>,
}
