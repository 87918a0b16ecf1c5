//! # oppnet-selector
//!
//! Opportunistic data-profile selection and switch coordination.
//!
//! Given a caller-declared list of candidate cellular profiles (priority +
//! allowed network identifiers) and the set of profiles the platform
//! currently exposes as usable, this crate decides which profile should
//! carry data traffic and coordinates a token-correlated asynchronous
//! switch to it. Radio scanning and the actual subscription switch are
//! performed by external collaborators behind the [`registry`] traits.
//!
//! ## Crate structure
//!
//! - [`profile`] — candidate/usable profile types, scan observations
//! - [`matcher`] — sorted-merge intersection of candidates × usable profiles
//! - [`evaluator`] — best-candidate ranking over scan observations
//! - [`switchover`] — correlation tokens and pending-switch tracking
//! - [`selector`] — the session state machine
//! - [`runtime`] — serialized event worker and the public handle
//! - [`registry`] — collaborator traits (subscription registry, scan driver)
//! - [`config`] — TOML-loadable runtime configuration

pub mod config;
pub mod evaluator;
pub mod matcher;
pub mod profile;
pub mod registry;
pub mod runtime;
pub mod selector;
pub mod switchover;
