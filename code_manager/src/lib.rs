//! Bounded fan-out/fan-in execution of independent work items.
//!
//! [`manager::manager::WorkerPool`] runs every item of a batch on its own tokio
//! task, never more than `max_concurrent` at once, and hands back a stream of
//! [`manager::manager::TaskOutcome`]s in completion order. A failing or
//! panicking item only affects its own outcome.

pub mod manager;
