//! Ferrous Route Application Layer
pub mod ports;
pub mod response;
pub mod router;
pub mod services;
pub mod use_cases;

pub use response::{Response, SentResponse};
pub use router::Router;
