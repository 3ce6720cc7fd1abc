pub mod api;
pub mod frame_source;
pub mod http_api;
#[cfg(test)]
pub mod mock_api;
pub mod session_store;

pub use api::PosApi;
pub use frame_source::{FrameSource, NoCamera, SnapshotFile};
pub use http_api::HttpPosApi;
pub use session_store::SessionStore;
