use async_trait::async_trait;
use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::api::{
    CheckoutRequest, CheckoutResponse, DailyStats, Product, RecentTransaction, SensorStatus,
    TokenResponse,
};
use crate::services::api::PosApi;

pub const MOCK_TOKEN: &str = "test-token";

/// Knobs that make individual mock calls fail
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub status: bool,
    pub predict: bool,
    pub checkout: bool,
    pub daily: bool,
    pub products: bool,
    pub update_price: bool,
}

/// Mock implementation of PosApi for testing
///
/// Everything lives in memory; the only valid credentials are
/// `admin` / `1234` and the only valid token is [`MOCK_TOKEN`].
#[derive(Debug, Clone, Default)]
pub struct MockPosApi {
    status: Arc<Mutex<SensorStatus>>,
    predict_result: Arc<Mutex<String>>,
    products: Arc<Mutex<Vec<Product>>>,
    daily: Arc<Mutex<Option<DailyStats>>>,
    failures: Arc<Mutex<Failures>>,
    checkouts: Arc<Mutex<Vec<CheckoutRequest>>>,
    price_updates: Arc<Mutex<Vec<(String, f64)>>>,
    status_calls: Arc<Mutex<usize>>,
    predict_calls: Arc<Mutex<usize>>,
}

impl MockPosApi {
    /// Create a new empty MockPosApi
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MockPosApi pre-populated with a small produce catalogue
    pub fn with_test_data() -> Self {
        let service = Self::new();

        let products = vec![
            Product { id: 1, name: "Tomato".to_string(), price: 40.0 },
            Product { id: 2, name: "Carrot".to_string(), price: 25.0 },
            Product { id: 3, name: "Pumpkin".to_string(), price: 30.0 },
            Product { id: 4, name: "Bell_Pepper".to_string(), price: 90.0 },
        ];
        let prices: HashMap<String, f64> =
            products.iter().map(|p| (p.name.clone(), p.price)).collect();
        *service.products.lock().unwrap() = products;

        *service.status.lock().unwrap() = SensorStatus {
            weight: 1.5,
            is_stable: true,
            prices,
        };
        *service.predict_result.lock().unwrap() = "Tomato".to_string();

        *service.daily.lock().unwrap() = Some(DailyStats {
            total_sales: 1234.5,
            transaction_count: 7,
            recent_txns: vec![RecentTransaction {
                id: 7,
                time: "2024-05-01T10:12:33.123456".to_string(),
                amount: 60.0,
                cashier: Some("admin".to_string()),
            }],
        });

        service
    }

    pub fn set_status(&self, status: SensorStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_failures(&self, failures: Failures) {
        *self.failures.lock().unwrap() = failures;
    }

    pub fn checkouts(&self) -> Vec<CheckoutRequest> {
        self.checkouts.lock().unwrap().clone()
    }

    pub fn price_updates(&self) -> Vec<(String, f64)> {
        self.price_updates.lock().unwrap().clone()
    }

    pub fn status_calls(&self) -> usize {
        *self.status_calls.lock().unwrap()
    }

    pub fn predict_calls(&self) -> usize {
        *self.predict_calls.lock().unwrap()
    }

    fn check_token(token: &str) -> Result<()> {
        if token != MOCK_TOKEN {
            bail!("401 Unauthorized");
        }
        Ok(())
    }

    fn failures(&self) -> Failures {
        *self.failures.lock().unwrap()
    }
}

#[async_trait]
impl PosApi for MockPosApi {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        if username == "admin" && password == "1234" {
            Ok(TokenResponse {
                access_token: MOCK_TOKEN.to_string(),
                token_type: Some("bearer".to_string()),
            })
        } else {
            bail!("POST /auth/token non-success: 400 Bad Request body: {{\"detail\":\"Incorrect\"}}")
        }
    }

    async fn status(&self, token: &str) -> Result<SensorStatus> {
        *self.status_calls.lock().unwrap() += 1;
        Self::check_token(token)?;
        if self.failures().status {
            bail!("connection refused");
        }
        Ok(self.status.lock().unwrap().clone())
    }

    async fn predict(&self, token: &str, _image: Vec<u8>) -> Result<String> {
        *self.predict_calls.lock().unwrap() += 1;
        Self::check_token(token)?;
        if self.failures().predict {
            bail!("classifier unavailable");
        }
        Ok(self.predict_result.lock().unwrap().clone())
    }

    async fn checkout(&self, token: &str, request: &CheckoutRequest) -> Result<CheckoutResponse> {
        Self::check_token(token)?;
        if self.failures().checkout {
            bail!("POST /api/checkout non-success: 500 Internal Server Error body: ");
        }
        let mut checkouts = self.checkouts.lock().unwrap();
        checkouts.push(request.clone());
        Ok(CheckoutResponse {
            msg: Some("Saved".to_string()),
            txn_id: Some(checkouts.len() as i64),
        })
    }

    async fn daily_stats(&self, token: &str) -> Result<DailyStats> {
        Self::check_token(token)?;
        if self.failures().daily {
            bail!("GET /api/daily non-success: 502 Bad Gateway body: ");
        }
        self.daily
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("no stats configured"))
    }

    async fn list_products(&self, token: &str) -> Result<Vec<Product>> {
        Self::check_token(token)?;
        if self.failures().products {
            bail!("GET /api/products non-success: 500 Internal Server Error body: ");
        }
        Ok(self.products.lock().unwrap().clone())
    }

    async fn update_price(&self, token: &str, name: &str, price: f64) -> Result<()> {
        Self::check_token(token)?;
        if self.failures().update_price {
            bail!("PUT /api/products non-success: 500 Internal Server Error body: ");
        }
        self.price_updates
            .lock()
            .unwrap()
            .push((name.to_string(), price));

        let mut products = self.products.lock().unwrap();
        if let Some(product) = products.iter_mut().find(|p| p.name == name) {
            product.price = price;
        }
        Ok(())
    }
}
