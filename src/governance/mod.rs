//! Content governance subsystem
//!
//! The lifecycle state machine for rules: DRAFT → ACTIVE (promote),
//! ACTIVE → DEPRECATED (deprecate), plus logged clinical overrides that
//! change no state.
//!
//! # Design Principles
//!
//! - The controller is the only mutator of lifecycle state
//! - Transitions are explicit and event-driven; there is no background or
//!   automatic promotion
//! - Every transition emits exactly one governance event
//! - If promotion safety cannot be proven, promotion is rejected; the
//!   system does not guess

mod controller;
mod errors;
mod events;
mod policy;

pub use controller::GovernanceController;
pub use errors::{GovernanceResult, GovernanceTransitionError, GovernanceTransitionErrorKind};
pub use events::{GovernanceEvent, TransitionKind};
pub use policy::{PromotionDenial, PromotionPolicy};
