//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration; the session controller and
//! preference store arrive via context from the app shell.

pub mod dashboard;
pub mod login;
