//! Test doubles and scenario helpers for the selection engine.
//!
//! Provides scriptable fakes for the platform collaborators (subscription
//! registry, scan driver) that record every call they receive, plus
//! deterministic observation-batch generation for integration testing.

pub mod fakes;
pub mod scenario;
