//! Application-level orchestration.
//!
//! This module owns the fetch/submit lifecycle: it turns UI commands into store
//! calls and reports the outcomes as events. UI/CLI layers call into this
//! module to keep responsibilities separated.

mod controller;

pub(crate) use controller::{run_controller, UiCommand};
