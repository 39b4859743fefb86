//! Shared building blocks for the hotel operations backend.
//!
//! Response envelopes, logging bootstrap and runtime environment checks used
//! by both the HTTP crate and the binary.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok", timestamp: "2024-01-01T00:00:00Z".into() };
        assert_eq!(h.status, "ok");
    }
}
