#![forbid(unsafe_code)]

//! Core: immutable scene-graph nodes and the types that flow through a commit.
//!
//! # Role in Canopy
//! `canopy-core` is the data layer. It owns the node contract the commit
//! engine relies on, plus simple reference collaborators so the engine can be
//! exercised end to end.
//!
//! # Primary responsibilities
//! - **ShadowNode**: immutable-after-seal nodes with structural sharing,
//!   copy-on-write access and ancestor-path resolution.
//! - **RootShadowNode**: the snapshot type, carrying layout constraints and
//!   context.
//! - **Event emitters**: counted enable/disable emitters and the
//!   process-wide dispatch domain.
//! - **Layout**: a reference stack solver that writes metrics copy-on-write.
//! - **Mutations**: [`ShadowView`] and [`ShadowViewMutation`] records.
//!
//! # How it fits in the system
//! `canopy-diff` turns two roots into a mutation list and `canopy-commit`
//! sequences layout, diffing, the commit itself and emitter toggling.

pub mod event_emitter;
pub mod geometry;
pub mod layout;
pub mod mutation;
pub mod node;
pub mod props;
pub mod root;

pub use event_emitter::{
    BaseEventEmitter, EventEmitter, LayoutEventEmitter, SharedEventEmitter, ViewEventEmitter,
};
pub use geometry::{
    DisplayType, EdgeInsets, LayoutConstraints, LayoutContext, LayoutDirection, LayoutMetrics,
    Point, Rect, Size,
};
pub use mutation::{MutationKind, ShadowView, ShadowViewMutation, ShadowViewMutationList};
pub use node::{
    AncestorPath, ShadowNode, ShadowNodeFragment, ShadowNodeList, SharedShadowNode,
    SharedShadowNodeList, SurfaceId, Tag,
};
pub use props::{Dimension, FlexDirection, PropValue, Props, RootProps, SharedProps, Style, ViewProps};
pub use root::{RootShadowNode, SharedRootShadowNode};
