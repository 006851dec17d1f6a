// WASM-specific implementations
pub mod storage_impl;
pub mod utils;

// Re-exports
pub use storage_impl::*;
pub use utils::*;
