use serde::{Deserialize, Serialize};

/// Response of `/api/equity-stockIndices`; the index itself is the first row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexQuote {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub data: Vec<IndexConstituent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConstituent {
    pub symbol: String,

    #[serde(rename = "lastPrice")]
    pub last_price: Option<f64>,

    #[serde(default)]
    pub open: Option<f64>,

    #[serde(rename = "previousClose", default)]
    pub previous_close: Option<f64>,
}
