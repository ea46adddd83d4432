//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the extension points adapters implement to integrate with
//! external systems. The gateway core depends on these traits, never on a
//! concrete exchange client.

pub mod outbound;
