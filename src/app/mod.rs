pub mod context;
pub mod error;

pub use context::{AppContext, OutputPaths};
pub use error::{ClippingError, Result};
