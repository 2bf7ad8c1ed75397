#![forbid(unsafe_code)]

//! Per-node event emitters.
//!
//! An emitter is created together with its node family and shared by every
//! clone of that node. The commit engine enables it when the node is created
//! and disables it when the node is deleted; in between it forwards events to
//! an [`EventDispatcher`].
//!
//! # Dispatch domain
//!
//! Enablement toggles and event delivery are serialized by one process-wide
//! reentrant lock, [`dispatch_lock`]. It is shared by every surface because an
//! emitter may be reachable from outside the tree that owns it.
//!
//! A commit takes its tree's root-slot gate before the dispatch lock, so an
//! [`EventDispatcher`] must never commit synchronously from `dispatch`; it
//! queues the event and lets the consumer commit later, off the lock.
//!
//! Enablement itself is a balanced counter ([`Enablement`]).

use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

use crate::geometry::LayoutMetrics;
use crate::node::Tag;
use crate::props::PropValue;

/// Shared emitter handle.
pub type SharedEventEmitter = Arc<dyn EventEmitter>;

/// Shared dispatcher handle.
pub type SharedEventDispatcher = Arc<dyn EventDispatcher>;

static DISPATCH_LOCK: LazyLock<ReentrantMutex<()>> = LazyLock::new(|| ReentrantMutex::new(()));

/// Acquire the process-wide emitter dispatch domain.
pub fn dispatch_lock() -> ReentrantMutexGuard<'static, ()> {
    DISPATCH_LOCK.lock()
}

// ---------------------------------------------------------------------------
// Enablement
// ---------------------------------------------------------------------------

/// Lifecycle position of an emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnablementState {
    /// Never enabled.
    Fresh,
    /// Mounted at least once more than unmounted; events are delivered.
    Enabled,
    /// Was enabled, every enable has been balanced by a disable.
    Disabled,
}

/// Balanced enable/disable counter.
///
/// The emitter is enabled while the count is positive. A node deleted and
/// created again within one batch (a move to another parent) sees one
/// enable and one disable on the same emitter, which net out. A disable at
/// zero is ignored.
#[derive(Debug, Default)]
pub struct Enablement {
    count: AtomicU32,
    mounted: AtomicBool,
}

impl Enablement {
    /// A fresh counter.
    pub const fn new() -> Self {
        Self {
            count: AtomicU32::new(0),
            mounted: AtomicBool::new(false),
        }
    }

    /// Current state.
    pub fn state(&self) -> EnablementState {
        if self.count.load(Ordering::Acquire) > 0 {
            EnablementState::Enabled
        } else if self.mounted.load(Ordering::Acquire) {
            EnablementState::Disabled
        } else {
            EnablementState::Fresh
        }
    }

    /// Current enable count.
    pub fn depth(&self) -> u32 {
        self.count.load(Ordering::Acquire)
    }

    /// Increment the count. Returns the new count.
    pub fn enable(&self) -> u32 {
        self.mounted.store(true, Ordering::Release);
        self.count.fetch_add(1, Ordering::AcqRel).saturating_add(1)
    }

    /// Decrement the count. Returns the new count, or `None` when the
    /// emitter was not enabled and nothing changed.
    pub fn disable(&self) -> Option<u32> {
        self.count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                count.checked_sub(1)
            })
            .ok()
            .map(|previous| previous - 1)
    }

    /// True while the count is positive.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.count.load(Ordering::Acquire) > 0
    }
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Lifecycle contract every emitter implements.
pub trait EventEmitter: fmt::Debug + Send + Sync {
    /// Start delivering events. Called for every Create mutation.
    fn enable(&self);

    /// Balance one `enable`. Called for every Delete mutation.
    fn disable(&self);

    /// Whether events are currently delivered.
    fn is_enabled(&self) -> bool;

    /// Layout notification capability, if this emitter supports it.
    fn layout_events(&self) -> Option<&dyn LayoutEventEmitter> {
        None
    }
}

/// Capability: receives geometry after a commit.
pub trait LayoutEventEmitter {
    /// Report the committed layout metrics of the node.
    fn on_layout(&self, metrics: &LayoutMetrics);
}

/// Event payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    Empty,
    Layout(LayoutMetrics),
    Value(PropValue),
}

/// An event addressed to one node.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub target: Tag,
    pub name: Cow<'static, str>,
    pub payload: EventPayload,
}

/// Receives events from enabled emitters (the bridge to user code).
pub trait EventDispatcher: Send + Sync {
    /// Accept one event. Runs under [`dispatch_lock`]: enqueue and return,
    /// never commit to a shadow tree from here.
    fn dispatch(&self, event: Event);
}

// ---------------------------------------------------------------------------
// BaseEventEmitter
// ---------------------------------------------------------------------------

/// Plain emitter with no layout capability.
pub struct BaseEventEmitter {
    tag: Tag,
    enablement: Enablement,
    dispatcher: Option<SharedEventDispatcher>,
}

impl BaseEventEmitter {
    /// Create an emitter for `tag`. Without a dispatcher events are dropped.
    pub fn new(tag: Tag, dispatcher: Option<SharedEventDispatcher>) -> Self {
        Self {
            tag,
            enablement: Enablement::new(),
            dispatcher,
        }
    }

    /// Tag of the node family this emitter belongs to.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Lifecycle position.
    pub fn state(&self) -> EnablementState {
        self.enablement.state()
    }

    /// Deliver an event if enabled. Returns whether it reached a dispatcher.
    pub fn dispatch_event(&self, name: impl Into<Cow<'static, str>>, payload: EventPayload) -> bool {
        let _domain = dispatch_lock();
        if !self.enablement.is_enabled() {
            tracing::trace!(
                target: "canopy.emitter",
                tag = self.tag,
                state = ?self.enablement.state(),
                "event dropped by inactive emitter"
            );
            return false;
        }
        let Some(dispatcher) = &self.dispatcher else {
            return false;
        };
        dispatcher.dispatch(Event {
            target: self.tag,
            name: name.into(),
            payload,
        });
        true
    }
}

impl fmt::Debug for BaseEventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BaseEventEmitter")
            .field("tag", &self.tag)
            .field("state", &self.enablement.state())
            .field("has_dispatcher", &self.dispatcher.is_some())
            .finish()
    }
}

impl EventEmitter for BaseEventEmitter {
    fn enable(&self) {
        let _domain = dispatch_lock();
        let depth = self.enablement.enable();
        if depth > 1 {
            tracing::trace!(target: "canopy.emitter", tag = self.tag, depth, "nested enable");
        }
    }

    fn disable(&self) {
        let _domain = dispatch_lock();
        if self.enablement.disable().is_none() {
            tracing::trace!(target: "canopy.emitter", tag = self.tag, "disable of inactive emitter ignored");
        }
    }

    fn is_enabled(&self) -> bool {
        self.enablement.is_enabled()
    }
}

// ---------------------------------------------------------------------------
// ViewEventEmitter
// ---------------------------------------------------------------------------

/// Emitter for view nodes; supports layout notifications.
#[derive(Debug)]
pub struct ViewEventEmitter {
    base: BaseEventEmitter,
}

impl ViewEventEmitter {
    /// Name of the layout event.
    pub const LAYOUT_EVENT: &'static str = "layout";

    /// Create a view emitter for `tag`.
    pub fn new(tag: Tag, dispatcher: Option<SharedEventDispatcher>) -> Self {
        Self {
            base: BaseEventEmitter::new(tag, dispatcher),
        }
    }

    /// An emitter that never delivers anything (used by fresh roots).
    pub fn noop(tag: Tag) -> Self {
        Self::new(tag, None)
    }

    /// The underlying plain emitter.
    pub fn base(&self) -> &BaseEventEmitter {
        &self.base
    }
}

impl EventEmitter for ViewEventEmitter {
    fn enable(&self) {
        self.base.enable();
    }

    fn disable(&self) {
        self.base.disable();
    }

    fn is_enabled(&self) -> bool {
        self.base.is_enabled()
    }

    fn layout_events(&self) -> Option<&dyn LayoutEventEmitter> {
        Some(self)
    }
}

impl LayoutEventEmitter for ViewEventEmitter {
    fn on_layout(&self, metrics: &LayoutMetrics) {
        self.base
            .dispatch_event(Self::LAYOUT_EVENT, EventPayload::Layout(*metrics));
    }
}
