// isogeo-api: Async Rust client for the Isogeo geospatial metadata catalog API
//
// Typed entities with schema-driven (de)serialization, an OAuth2 bearer
// session that refreshes its token before every request, and one generic
// CRUD route implementation shared by all entity families.

pub mod auth;
pub mod cache;
pub mod checker;
pub mod enums;
pub mod error;
pub mod model;
pub mod outcome;
pub mod routes;
pub mod session;
pub mod transport;

pub use auth::{BearerToken, Credentials, Endpoints, Platform};
pub use cache::{CacheScope, NameCache};
pub use error::Error;
pub use model::{
    Condition, Contact, Dict, Entity, License, Metadata, Share, Specification, Workgroup,
    to_dict, to_dict_creation,
};
pub use outcome::Outcome;
pub use routes::{ListOptions, Resource, Routes, SearchPage};
pub use session::Session;
pub use transport::{TlsMode, TransportConfig};
