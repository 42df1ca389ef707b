// handlers/mod.rs - handlers grouped by security tier
//
// Public (no auth) -> Protected (bearer token) -> Elevated (bearer token + admin flag)
// Tiers are enforced by route layers in app.rs, not inside the handlers.

pub mod elevated;
pub mod protected;
pub mod public;
