//! acctdiff-sync: account synchronization driven by the acctdiff reconciler.
//!
//! Loads known and provider account lists from JSON, classifies them, turns
//! the classification into a sync plan, lets a human decide on duplicate
//! candidates, and records every run in a JSONL audit trail.

pub mod accounts;
pub mod audit;
pub mod config;
pub mod error;
pub mod plan;
pub mod workflow;
