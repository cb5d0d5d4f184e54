//! relock - lock file maintenance library
//!
//! This library provides the core pipeline for dependency extraction and
//! lock file regeneration across package ecosystems:
//! - Elixir (mix.exs / mix.lock)
//! - Rust (Cargo.toml / Cargo.lock)
//! - Node.js (package.json / package-lock.json)

pub mod artifacts;
pub mod auth;
pub mod cli;
pub mod discovery;
pub mod domain;
pub mod ecosystems;
pub mod error;
pub mod exec;
pub mod extract;
pub mod fsx;
pub mod lockfile;
pub mod orchestrator;
pub mod output;
pub mod progress;
