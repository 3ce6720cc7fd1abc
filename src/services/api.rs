use async_trait::async_trait;
use anyhow::Result;

use crate::models::api::{
    CheckoutRequest, CheckoutResponse, DailyStats, Product, SensorStatus, TokenResponse,
};

/// PosApi trait defines every backend call the client makes.
///
/// This trait abstracts the HTTP backend to enable:
/// - Testing screens against an in-memory mock
/// - Sharing one client between the UI and the status poller
///
/// All calls except `login` take the session's bearer token.
#[async_trait]
pub trait PosApi: Send + Sync + 'static {
    // ========================================================================
    // Authentication
    // ========================================================================

    /// Exchange credentials for a bearer token
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse>;

    // ========================================================================
    // Sell
    // ========================================================================

    /// Current scale reading and price table
    async fn status(&self, token: &str) -> Result<SensorStatus>;

    /// Classify a captured JPEG frame, returning the product label
    async fn predict(&self, token: &str, image: Vec<u8>) -> Result<String>;

    /// Record a sale
    async fn checkout(&self, token: &str, request: &CheckoutRequest) -> Result<CheckoutResponse>;

    // ========================================================================
    // Dashboard
    // ========================================================================

    /// Today's aggregate sales
    async fn daily_stats(&self, token: &str) -> Result<DailyStats>;

    // ========================================================================
    // Price Settings
    // ========================================================================

    /// List all priced products (backend order)
    async fn list_products(&self, token: &str) -> Result<Vec<Product>>;

    /// Set the unit price of the product with this exact name
    async fn update_price(&self, token: &str, name: &str, price: f64) -> Result<()>;
}
