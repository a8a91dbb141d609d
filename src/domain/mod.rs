//! Domain layer.
//!
//! - `foundation` - identifiers, errors, state machine trait
//! - `gateway` - VoguePay request/response rules and settlement decisions

pub mod foundation;
pub mod gateway;
