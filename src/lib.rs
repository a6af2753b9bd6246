//! fabtree - Terminal tree explorer and enrollment tooling for a permissioned ledger
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Ledger Data
//! - [`models`] - Wire types for the query backend's JSON envelope
//! - [`client`] - HTTP client for the `/byblocknum`, `/bytxid`, `/bykey` endpoints
//!
//! ## Tree Rendering
//! - [`tree`] - JSON-to-tree flattening and base64 value decoding
//! - [`ui`] - Interactive terminal tree view
//!
//! ## Identity & Enrollment
//! - [`ca`] - Certificate-authority client (register / enroll)
//! - [`wallet`] - File-backed identity store and active user context
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//! - [`cli`] - CLI utilities

#![forbid(unsafe_code)]

// ============================================================================
// Ledger Data
// ============================================================================
pub mod client;
pub mod models;

// ============================================================================
// Tree Rendering
// ============================================================================
pub mod tree;
pub mod ui;

// ============================================================================
// Identity & Enrollment
// ============================================================================
pub mod ca;
pub mod wallet;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod cli;
pub mod config;
pub mod error;
