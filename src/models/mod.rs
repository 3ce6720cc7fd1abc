pub mod api;
pub mod cart;
pub mod config;
pub mod session;

// Re-export commonly used types at models root for convenience
pub use api::{
    CheckoutItem, CheckoutRequest, CheckoutResponse, DailyStats, LoginRequest, Product,
    RecentTransaction, SensorStatus, TokenResponse,
};
pub use cart::{AddRejection, Cart, CartLine};
pub use config::AppConfig;
pub use session::Session;
