// Concrete implementations for external systems.

pub mod http;
pub mod identity;
