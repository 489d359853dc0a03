//! # Integrations Module
//!
//! Side effects on other applications that follow a theme change.
//!
//! | Kind | When | Failure policy |
//! |------|------|----------------|
//! | [`live`] injection | synchronously inside apply | logged, returned as warnings |
//! | [`reload`] tasks | after apply returns, async | logged, returned as outcomes |
//!
//! Neither kind can make an apply fail: the pointer switch is the
//! authoritative change, everything here is best-effort.

pub mod live;
pub mod reload;

pub use live::inject_all;
pub use reload::{run_all, ReloadTask, TaskOutcome, EXTERNAL_COMMAND_TIMEOUT};
