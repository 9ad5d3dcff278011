use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One record of a `/beers/{category}` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beer {
    pub id: u64,
    pub name: String,
    pub price: f64,
}

impl Beer {
    pub fn new(id: u64, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
        }
    }

    /// Wire form of the record. A non-finite price has no JSON number and
    /// becomes `null`.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("id".into(), Value::from(self.id));
        obj.insert("name".into(), Value::from(self.name.clone()));
        obj.insert("price".into(), Value::from(self.price));
        Value::Object(obj)
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Body the service sends with 404/405 responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
