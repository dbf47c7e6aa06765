//! Top-level facade crate for SecurePath.
//!
//! Re-exports the monitoring core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use securepath_core::*;
}

pub mod gateway {
    pub use securepath_gateway::*;
}
