#[cfg(feature = "backend")]
mod native;
#[cfg(feature = "backend")]
pub use native::*;

#[cfg(feature = "wasm")]
pub mod tracing;
