//! Household carbon footprint estimation.
//!
//! [`calculator::EmissionsEngine`] prices a household's activities per category, asking an
//! [`provider::EstimateProvider`] first and falling back to the local
//! [`factors::EmissionFactors`] whenever the provider cannot answer.

pub mod activity;
pub mod calculator;
pub mod config;
pub mod factors;
pub mod output;
pub mod provider;
pub mod records;
pub mod server;
pub mod types;
pub mod validation;
