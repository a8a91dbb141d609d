//! VoguePay Gateway - Card payment gateway module for billing hosts
//!
//! This crate signs outbound requests to the VoguePay command API, verifies
//! processor replies and callbacks, and settles each transaction at most once.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
