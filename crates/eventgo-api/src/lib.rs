// eventgo-api: Async Rust client for the EventGo ticketing backend

pub mod auth;
pub mod checkin;
pub mod client;
pub mod error;
pub mod events;
pub mod models;
pub mod transport;

pub use auth::BearerToken;
pub use client::EventGoClient;
pub use error::Error;
pub use models::{CheckinResponse, EventDetail, LoginResponse};
pub use transport::{TlsMode, TransportConfig};
