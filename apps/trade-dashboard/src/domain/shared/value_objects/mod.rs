//! Shared value objects.

mod symbol;
mod timestamp;

pub use symbol::Symbol;
pub use timestamp::Timestamp;
