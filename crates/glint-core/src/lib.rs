//! Core primitives for the Glint scaffold.
//!
//! This crate provides the small, GPU-agnostic building blocks used by the
//! rest of the workspace:
//! - Scoped release guards for externally managed resources
//! - A counting semaphore with a fixed maximum
//! - Worker threads and main-thread task dispatch

pub mod guard;
pub mod semaphore;
pub mod worker;

pub use guard::ScopeGuard;
pub use semaphore::Semaphore;
pub use worker::{MainThreadHandle, MainThreadQueue, Worker};
