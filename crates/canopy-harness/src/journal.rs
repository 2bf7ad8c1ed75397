#![forbid(unsafe_code)]

//! Ordered record of emitter calls.

use std::sync::Arc;

use canopy_core::event_emitter::Enablement;
use canopy_core::{EventEmitter, LayoutEventEmitter, LayoutMetrics, Tag};
use parking_lot::Mutex;

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum JournalEntry {
    /// `enable` was called on the emitter of `tag`.
    Enabled(Tag),
    /// `disable` was called on the emitter of `tag`.
    Disabled(Tag),
    /// `on_layout` was called; `enabled` is the emitter state at that moment.
    Layout {
        tag: Tag,
        metrics: LayoutMetrics,
        enabled: bool,
    },
}

impl JournalEntry {
    pub fn tag(&self) -> Tag {
        match self {
            Self::Enabled(tag) | Self::Disabled(tag) | Self::Layout { tag, .. } => *tag,
        }
    }
}

/// Shared, append-only call log.
#[derive(Debug, Default)]
pub struct Journal {
    entries: Mutex<Vec<JournalEntry>>,
}

impl Journal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn record(&self, entry: JournalEntry) {
        self.entries.lock().push(entry);
    }

    /// Snapshot of every entry so far.
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries.lock().clone()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Tags passed to `enable`, in call order.
    pub fn enabled(&self) -> Vec<Tag> {
        self.collect(|entry| match entry {
            JournalEntry::Enabled(tag) => Some(*tag),
            _ => None,
        })
    }

    /// Tags passed to `disable`, in call order.
    pub fn disabled(&self) -> Vec<Tag> {
        self.collect(|entry| match entry {
            JournalEntry::Disabled(tag) => Some(*tag),
            _ => None,
        })
    }

    /// Layout notifications as `(tag, metrics)`, in call order.
    pub fn layouts(&self) -> Vec<(Tag, LayoutMetrics)> {
        self.collect(|entry| match entry {
            JournalEntry::Layout { tag, metrics, .. } => Some((*tag, *metrics)),
            _ => None,
        })
    }

    fn collect<T>(&self, pick: impl Fn(&JournalEntry) -> Option<T>) -> Vec<T> {
        self.entries.lock().iter().filter_map(pick).collect()
    }
}

/// Emitter that journals every call.
///
/// Lifecycle calls are recorded even when they are redundant, so tests can
/// count how often the engine toggles an emitter.
#[derive(Debug)]
pub struct RecordingEmitter {
    tag: Tag,
    journal: Arc<Journal>,
    enablement: Enablement,
    layout_capable: bool,
}

impl RecordingEmitter {
    pub fn new(tag: Tag, journal: Arc<Journal>, layout_capable: bool) -> Self {
        Self {
            tag,
            journal,
            enablement: Enablement::new(),
            layout_capable,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }
}

impl EventEmitter for RecordingEmitter {
    fn enable(&self) {
        self.enablement.enable();
        self.journal.record(JournalEntry::Enabled(self.tag));
    }

    fn disable(&self) {
        self.enablement.disable();
        self.journal.record(JournalEntry::Disabled(self.tag));
    }

    fn is_enabled(&self) -> bool {
        self.enablement.is_enabled()
    }

    fn layout_events(&self) -> Option<&dyn LayoutEventEmitter> {
        if self.layout_capable { Some(self) } else { None }
    }
}

impl LayoutEventEmitter for RecordingEmitter {
    fn on_layout(&self, metrics: &LayoutMetrics) {
        self.journal.record(JournalEntry::Layout {
            tag: self.tag,
            metrics: *metrics,
            enabled: self.enablement.is_enabled(),
        });
    }
}
