use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Body of `POST /foods`. Numbers may arrive as JSON numbers or strings.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    pub name: Option<String>,
    pub kcal: Option<Value>,
    #[serde(alias = "kh")]
    pub carbs: Option<Value>,
    #[serde(alias = "zucker")]
    pub sugar: Option<Value>,
    #[serde(alias = "fett")]
    pub fat: Option<Value>,
    #[serde(alias = "eiweiss")]
    pub protein: Option<Value>,
    #[serde(alias = "zustand")]
    pub state: Option<String>,
    #[serde(alias = "anbau")]
    pub cultivation: Option<String>,
    #[serde(alias = "empfehlung")]
    pub recommendation: Option<String>,
    #[serde(alias = "notiz")]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}
