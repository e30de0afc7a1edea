//! Core port modules
//!
//! Contains configuration, shared kernel state, hook contracts, and the
//! scheduler bootstrap.

pub mod config;
pub mod context;
pub mod critical;
pub mod error;
pub mod fault;
pub mod hooks;
pub mod isr_stack;
pub mod sched;
pub mod types;
