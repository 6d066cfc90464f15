//! Module for core business logic services.
//!
//! This module encapsulates services that orchestrate work across the
//! database layer, such as assembling aggregated channel and watch-history
//! views for the API.

pub mod profile_aggregator;
