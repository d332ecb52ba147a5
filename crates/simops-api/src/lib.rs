// simops-api: Async Rust client for the reseller reporting REST API

mod cache;
pub mod client;
pub mod error;
pub mod session;
pub mod types;

mod admin;
mod auth;
mod endpoints;
mod export;
mod instances;
mod usage;

pub use client::{ApiClient, Download, Scope};
pub use error::Error;
pub use session::{AuthMethod, Session, SessionSnapshot, UserProfile};
