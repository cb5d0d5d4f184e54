//! Core domain models for relock
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - Dependency records and per-file extraction results
//! - Ecosystem and run configuration
//! - Artifact update requests and result shapes
//! - Host rules for private registry credentials

mod artifact;
mod config;
mod dependency;
mod host_rules;

pub use artifact::{
    ArtifactError, ArtifactResult, FileAddition, LockFileState, UpdateArtifactRequest,
};
pub use config::{EcosystemConfig, ExtractConfig, ToolConstraint, UpdateConfig};
pub use dependency::{Dependency, PackageFileResult};
pub use host_rules::{HostRule, HostRules, OrganizationCredential};
