#![doc = "The `mechanic_connect` library crate."]
#![doc = ""]
#![doc = "Client core for the customer/mechanic marketplace: the session state machine,"]
#![doc = "the shared HTTP transport with its interceptors, and the typed domain API helpers."]
#![doc = "UI hosts construct a `Transport` and a `SessionStore` once and pass them around."]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod storage;
pub mod transport;

pub use config::Config;
pub use error::{AppError, ErrorKind};
pub use models::AccountKind;
pub use session::{AuthOutcome, Session, SessionStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use transport::{ApiResponse, LogEvents, Transport, TransportEvents};
