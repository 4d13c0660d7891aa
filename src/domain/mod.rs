//! Domain Layer - switcher logic with no platform dependencies
//!
//! This layer contains:
//! - **Entities**: candidate windows, the candidate list, the switcher session
//! - **Value Objects**: window ids, icon bitmaps, key input, geometry, colours
//! - **Domain Services**: overlay geometry
//! - **Domain Errors**: error types shared by the application

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use errors::{AppError, ConfigError};
pub use value_objects::*;
