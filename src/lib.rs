//! medguard - A strict, deterministic, auditable clinical decision rule engine
//!
//! Evaluates a patient's structured clinical facts against a versioned,
//! provenance-tracked bundle of safety rules and produces reproducible,
//! auditable alerts.

pub mod audit;
pub mod bundle;
pub mod cli;
pub mod consent;
pub mod engine;
pub mod facts;
pub mod governance;
pub mod observability;
pub mod registry;
pub mod rules;
