pub mod account;
pub mod auth;
pub mod mechanic;
pub mod profile;
pub mod review;

pub use account::AccountKind;
pub use auth::{LoginRequest, RegisterRequest};
pub use mechanic::{MechanicSearchQuery, SearchPage};
pub use profile::ProfileUpdate;
pub use review::{Review, ReviewInput};
