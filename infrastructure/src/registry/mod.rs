//! Tool registry files
//!
//! - [`RegistryFileLoader`]: TOML `[[tools]]` tables or JSON function definitions

mod loader;

pub use loader::{RegistryFileLoader, RegistryLoadError};
