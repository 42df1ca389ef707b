// handlers/protected/mod.rs - endpoints behind the identity gate
//
// Every handler here can rely on a `CurrentUser` extension.

pub mod analytics;
pub mod auth;
pub mod data;
pub mod progress;
pub mod routines;
pub mod subjects;
pub mod tasks;
