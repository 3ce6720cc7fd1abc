use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// POS backend wire models

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Live scale reading plus the current price table, keyed by product name.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorStatus {
    pub weight: f64,
    pub is_stable: bool,
    #[serde(default)]
    pub prices: HashMap<String, f64>,
}

impl SensorStatus {
    pub fn price_of(&self, name: &str) -> f64 {
        self.prices.get(name).copied().unwrap_or(0.0)
    }
}

impl Default for SensorStatus {
    fn default() -> Self {
        Self {
            weight: 0.0,
            is_stable: true,
            prices: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub result: String,
}

/// One cart line as the checkout endpoint expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub name: String,
    pub weight: f64,
    pub price: f64,
    pub qty: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItem>,
    pub total: f64,
    pub cashier: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutResponse {
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub txn_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecentTransaction {
    pub id: i64,
    pub time: String,
    pub amount: f64,
    #[serde(default)]
    pub cashier: Option<String>,
}

impl RecentTransaction {
    /// Short wall-clock label in UTC; falls back to the raw value when the
    /// backend sends a format we don't recognise.
    ///
    /// The backend records naive UTC timestamps, so a value without an offset
    /// is read as UTC.
    pub fn time_label(&self) -> String {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%dT%H:%M:%S%.f") {
            return naive.and_utc().format("%H:%M:%S UTC").to_string();
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.time) {
            return dt.with_timezone(&Utc).format("%H:%M:%S UTC").to_string();
        }
        self.time.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyStats {
    pub total_sales: f64,
    pub transaction_count: u64,
    #[serde(default)]
    pub recent_txns: Vec<RecentTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub msg: Option<String>,
}

/// Body of the backend's root endpoint, used by the healthcheck.
#[derive(Debug, Clone, Deserialize)]
pub struct RootStatus {
    pub status: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_without_prices() {
        let status: SensorStatus =
            serde_json::from_str(r#"{"weight": 1.25, "is_stable": false}"#).unwrap();
        assert_eq!(status.weight, 1.25);
        assert!(!status.is_stable);
        assert!(status.prices.is_empty());
        assert_eq!(status.price_of("Carrot"), 0.0);
    }

    #[test]
    fn test_daily_stats_with_recent() {
        let json = r#"{
            "total_sales": 123.5,
            "transaction_count": 4,
            "recent_txns": [
                {"id": 9, "time": "2024-05-01T10:12:33.123456", "amount": 40.0, "cashier": "admin"}
            ]
        }"#;
        let stats: DailyStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.transaction_count, 4);
        assert_eq!(stats.recent_txns.len(), 1);
        assert_eq!(stats.recent_txns[0].time_label(), "10:12:33 UTC");
    }

    #[test]
    fn test_time_label_with_offset_shown_in_utc() {
        let txn = RecentTransaction {
            id: 2,
            time: "2024-05-01T17:12:33+07:00".to_string(),
            amount: 1.0,
            cashier: None,
        };
        assert_eq!(txn.time_label(), "10:12:33 UTC");
    }

    #[test]
    fn test_time_label_fallback() {
        let txn = RecentTransaction {
            id: 1,
            time: "yesterday".to_string(),
            amount: 1.0,
            cashier: None,
        };
        assert_eq!(txn.time_label(), "yesterday");
    }

    #[test]
    fn test_checkout_item_wire_names() {
        let item = CheckoutItem {
            name: "Tomato".to_string(),
            weight: 1.5,
            price: 40.0,
            qty: 2,
            total: 120.0,
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["qty"], 2);
        assert_eq!(value["price"], 40.0);
        assert_eq!(value["total"], 120.0);
    }
}
