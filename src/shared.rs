pub mod error;
pub mod settings;
pub mod types;

// Re-export the domain errors for convenience
pub use error::{ConvertError, CurrencyError, StoreError};
