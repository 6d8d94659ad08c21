//! Planning Poker - session consistency and delivery engine
//!
//! Runs planning-poker sessions in memory: serializes mutations per session,
//! publishes a domain event after every change, and delivers each viewer
//! their own masked view by long poll or push.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
