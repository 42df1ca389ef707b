// handlers/elevated/mod.rs - admin-only endpoints
//
// Routed behind both the identity gate and the admin gate.

pub mod admin;
pub mod catalog;
