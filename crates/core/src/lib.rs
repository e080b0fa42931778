//! # Agentdeck Core
//!
//! Domain types, traits, and error definitions for the Agentdeck
//! reasoning-engine console. This crate has **zero framework dependencies**
//! — it defines the domain model that the other crates implement against.
//!
//! The remote service is only ever touched through the seams defined here:
//! `TokenProvider` supplies opaque bearer tokens, `EngineName` validates
//! resource paths, and `SessionMap` tracks the per-agent conversation ids
//! the gateway hands out.

pub mod agent;
pub mod auth;
pub mod error;
pub mod resource;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentDetails, AgentSummary};
pub use auth::TokenProvider;
pub use error::{EngineError, Error, Result};
pub use resource::EngineName;
pub use session::SessionMap;
