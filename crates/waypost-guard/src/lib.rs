//! Navigation guard for Waypost.
//!
//! This crate decides whether an in-app navigation may proceed:
//!
//! 1. **Route policy** ([`RouteTable`]) — declarative, nested route
//!    records whose access requirements propagate from ancestors to
//!    descendants
//! 2. **The guard** ([`NavigationGuard`]) — the per-attempt state
//!    machine that consults the session store (hydrating it if needed)
//!    and produces exactly one [`GuardOutcome`]
//!
//! # How it fits in the stack
//!
//! ```text
//! Host shell (above)       ← calls check() on every navigation attempt,
//!                            applies the returned outcome
//!     ↕
//! Guard Layer (this crate) ← policy lookup + the allow/redirect decision
//!     ↕
//! Session Layer (below)    ← authentication/privilege flags, hydration
//! ```
//!
//! The guard never throws: every attempt terminates in exactly one
//! allow/redirect outcome, which is what makes the navigation state
//! deterministic no matter how the session behaves underneath.

#![allow(async_fn_in_trait)]

mod guard;
mod policy;

pub use guard::{GuardOutcome, NavigationGuard, ProfileHydrator};
pub use policy::{AccessPolicy, Route, RouteTable};
