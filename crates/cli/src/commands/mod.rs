//! Command implementations.

mod info;
mod validate;
mod write;

pub use info::run_info;
pub use validate::run_validate;
pub use write::run_write;
