pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;

pub use catalog::{Catalog, CatalogStore, SearchQuery, DEFAULT_SEARCH_LIMIT};
pub use domain::chat::{ChatResult, APOLOGY_MESSAGE};
pub use domain::conversation::{ConversationTurn, SessionId, TurnRole};
pub use domain::product::{Category, Product, ProductId, Specifications};
pub use errors::{ApplicationError, DomainError, InterfaceError};
