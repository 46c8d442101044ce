//! Networking modules for the REST boundary.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles the authentication REST calls and `types` defines the
//! shared wire schema. Everything else the dashboard talks to (quotes,
//! search, chat, backtesting) lives behind its own page-level fetches.

pub mod api;
pub mod types;
