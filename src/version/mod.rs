//! Version lookup and drift evaluation
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Registry  │────▶│ QueryResult │────▶│   Checker   │
//! │  (lookup)   │     │  (outcome)  │     │   (drift)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │  Registries │
//! │   (maven)   │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for looking up the latest published version
//! - [`registries`]: Concrete registry implementations (Maven Central)
//! - [`checker`]: Drift classification and record construction
//! - [`error`]: Error types for registry and report operations
//! - [`types`]: Lookup outcome types

pub mod checker;
pub mod error;
pub mod registries;
pub mod registry;
pub mod types;
