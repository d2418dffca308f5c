//! Shared types and helpers of the restaurant discovery backend.
//!
//! The localized content helpers ([`localization`]) and the derived aggregates
//! ([`aggregates`]) are pure functions that every list and detail screen goes
//! through. [`types`] holds the per-table records, the mapping of raw rows
//! into them and the localized views; [`messages`] the actor messages the
//! server's services answer.

pub mod aggregates;
pub mod config;
pub mod constants;
pub mod error;
pub mod localization;
pub mod logger;
pub mod messages;
pub mod types;
pub mod utils;
