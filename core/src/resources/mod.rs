//! Resource handlers: one per entity, each bound to a fixed path prefix.
//!
//! # Design
//! Handlers borrow a shared `RequestExecutor` and translate domain actions
//! into verb calls. They never validate entity fields and never inspect the
//! status code; that is left to the caller and the assertion helpers.
//!
//! Read operations call `reset_template` first, discarding anything staged
//! on the executor. Write operations honor staged state, so a caller can
//! stage an extra header (e.g. `api_key`) before a delete.

mod pet;
mod store;
mod user;

pub use pet::PetApi;
pub use store::StoreApi;
pub use user::UserApi;
