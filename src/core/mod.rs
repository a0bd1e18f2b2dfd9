//! Core types: targets and the command lines they map to.

pub mod invocation;
pub mod target;

pub use invocation::Invocation;
pub use target::Target;
