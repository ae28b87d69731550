pub mod memory;

#[cfg(feature = "wasm")]
pub mod wasm;
