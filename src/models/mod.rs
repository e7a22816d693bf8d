// Domain entities and request payloads

pub mod user;
pub mod workout;

pub use user::*;
pub use workout::*;
