//! Outbound adapters (driven side).

pub mod rest;
