#![forbid(unsafe_code)]

//! Test harness and reference fixtures for Canopy.
//!
//! # Role in Canopy
//! `canopy-harness` is the shared test toolbox. It is a dev-dependency of the
//! other crates and is never linked into production builds.
//!
//! # Primary responsibilities
//! - **Journal**: a thread-safe log of emitter lifecycle calls and layout
//!   notifications, in the order they happened.
//! - **RecordingEmitter**: an emitter that writes every call into a journal.
//! - **NodeFactory**: terse builders for node trees wired to one journal.
//! - **Tracing capture**: a `tracing-subscriber` layer that records spans and
//!   events so tests can assert on instrumentation.

pub mod fixtures;
pub mod journal;
pub mod tracing_capture;

pub use fixtures::{NodeFactory, mutation_summary, replace_children, replace_props};
pub use journal::{Journal, JournalEntry, RecordingEmitter};
pub use tracing_capture::{CaptureHandle, CapturedEvent, CapturedSpan, with_captured_tracing};
