#![forbid(unsafe_code)]

//! Commit engine: the authoritative, versioned scene graph of a surface.
//!
//! # Role in Canopy
//! `canopy-commit` sits between the producers of new trees (a reconciler, a
//! layout-constraint change, a state update deep in the tree) and the
//! mounting layer that turns mutations into native views.
//!
//! # Primary responsibilities
//! - **Root slot**: wait-free reads of the current root, optimistic
//!   identity-checked installs of new ones.
//! - **Commit paths**: whole-child-list replacement, single-node replacement
//!   with ancestor clone-chain rebuild, and relayout under new constraints.
//! - **Emitter lifecycle**: enable on Create, disable on Delete, inside the
//!   commit and under the process-wide dispatch lock.
//! - **Layout events**: `on_layout` for nodes whose geometry changed.
//! - **Delegate**: synchronous notification of every successful commit.
//!
//! # How it fits in the system
//! Nodes, layout and emitters come from `canopy-core`; the mutation list is
//! computed by `canopy-diff`. Construction parameters can be loaded from TOML
//! or JSON with the default `config` feature.

pub mod config;
pub mod delegate;
mod emitter_toggle;
mod layout_events;
pub mod root_slot;
pub mod shadow_tree;
pub mod stats;

pub use config::{ConfigError, ShadowTreeConfig};
pub use delegate::ShadowTreeDelegate;
pub use shadow_tree::{ShadowTree, SharedShadowTreeDelegate};
pub use stats::CommitStats;
