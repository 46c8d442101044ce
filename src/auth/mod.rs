//! The authentication subsystem: CSRF guard, credential ownership, and the
//! session lifecycle controller.
//!
//! ARCHITECTURE
//! ============
//! `csrf` and `credential` own the two durable secrets; `controller` is the
//! only module with side effects beyond storage (network calls, redirects)
//! and drives both through the capability traits in `net` and `util`.

pub mod controller;
pub mod credential;
pub mod csrf;
