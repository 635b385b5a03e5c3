//! Test-automation client for the petstore HTTP API.
//!
//! # Overview
//! A blocking `RequestExecutor` sends verb calls against a configured base
//! URI. `PetApi`, `StoreApi` and `UserApi` bind domain actions to fixed
//! paths on top of it, and the `assertions` module checks the resulting
//! `Response` values with diagnosable failure messages.
//!
//! # Design
//! - `Config` is built once and passed into the executor by value.
//! - Handlers hold a reference to the executor rather than wrapping it, so
//!   several handlers can share one executor on a thread.
//! - Every call starts from a fresh request template. Extra state is carried
//!   into a call only when the caller stages it explicitly.
//! - A 4xx/5xx is a normal `Response`; only transport failures are errors.
//!
//! ```no_run
//! use petstore_core::{assertions, Config, PetApi, Pet, RequestExecutor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = RequestExecutor::new(Config::load()?);
//! let pets = PetApi::new(&executor);
//! let response = pets.add_pet(&Pet::new("Bella", "available").with_id(123))?;
//! assertions::assert_status_code(&response, 200)?;
//! assertions::assert_json_path(&response, "name", "Bella")?;
//! # Ok(())
//! # }
//! ```

pub mod assertions;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod json_path;
pub mod logging;
pub mod resources;
pub mod testdata;
pub mod types;

pub use client::RequestExecutor;
pub use config::Config;
pub use error::{AssertionError, Error, Result};
pub use http::{HttpMethod, HttpRequest, RequestTemplate, Response};
pub use resources::{PetApi, StoreApi, UserApi};
pub use types::{ApiMessage, Category, Order, Pet, Tag, User};
