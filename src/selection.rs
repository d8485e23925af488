//! Shared selection state for the chart and table views.
//!
//! The store is owned by the page and lent to each view: `&SelectionStore`
//! while rendering, `&mut SelectionStore` while handling pointer input. Every
//! write goes through [`SelectionStore::set`], so both views always read the
//! same value on the next frame.

use tracing::trace;

use crate::models::RecordId;

/// How a click interacts with a following pointer-leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Enter and click select, leave always clears.
    ///
    /// A click is therefore undone by the next pointer-leave.
    #[default]
    Transient,
    /// A click pins the selection until the same record is clicked again,
    /// another record is clicked, or the selection is cleared explicitly.
    /// Hover is ignored while pinned.
    StickyClick,
}

/// Pointer interaction reported by a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointerEvent {
    Enter(RecordId),
    Leave,
    Click(RecordId),
}

/// Kind of raw pointer input delivered to a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Move,
    Click,
}

/// Raw pointer input in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pointer {
    pub kind: PointerKind,
    pub column: u16,
    pub row: u16,
}

impl Pointer {
    #[must_use]
    pub const fn moved(column: u16, row: u16) -> Self {
        Self {
            kind: PointerKind::Move,
            column,
            row,
        }
    }

    #[must_use]
    pub const fn clicked(column: u16, row: u16) -> Self {
        Self {
            kind: PointerKind::Click,
            column,
            row,
        }
    }
}

/// Remembers which record a view's pointer is over and turns pointer
/// positions into enter/leave events.
#[derive(Debug, Default)]
pub struct HoverTracker {
    current: Option<RecordId>,
}

impl HoverTracker {
    /// Record currently under the pointer.
    #[cfg(test)]
    #[must_use]
    pub fn current(&self) -> Option<&RecordId> {
        self.current.as_ref()
    }

    /// Feed one pointer input whose hit-test resolved to `target`.
    ///
    /// Moving off a record emits `Leave` before any `Enter` of the next one.
    /// A click on a record emits `Click` after the hover transition.
    pub fn track(&mut self, kind: PointerKind, target: Option<&RecordId>, store: &mut SelectionStore) {
        if self.current.as_ref() != target {
            if self.current.take().is_some() {
                store.apply(PointerEvent::Leave);
            }
            if let Some(id) = target {
                self.current = Some(id.clone());
                store.apply(PointerEvent::Enter(id.clone()));
            }
        }

        if kind == PointerKind::Click {
            if let Some(id) = target {
                store.apply(PointerEvent::Click(id.clone()));
            }
        }
    }
}

/// Holder of the currently highlighted record.
#[derive(Debug, Default)]
pub struct SelectionStore {
    selected: Option<RecordId>,
    pinned: bool,
    policy: SelectionPolicy,
    revision: u64,
}

impl SelectionStore {
    #[must_use]
    pub fn new(policy: SelectionPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Currently selected record, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&RecordId> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Whether a click has pinned the selection.
    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    #[must_use]
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Number of real changes so far.
    #[cfg(test)]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the selection.
    ///
    /// Returns `false` without touching the revision if `id` is already
    /// selected.
    pub fn set(&mut self, id: Option<RecordId>) -> bool {
        if self.selected == id {
            return false;
        }
        self.revision += 1;
        trace!(from = ?self.selected, to = ?id, revision = self.revision, "selection changed");
        self.selected = id;
        true
    }

    /// Clear the selection and any pin.
    pub fn clear(&mut self) {
        self.pinned = false;
        self.set(None);
    }

    /// Apply a view's pointer event according to the policy.
    pub fn apply(&mut self, event: PointerEvent) {
        match (self.policy, event) {
            (SelectionPolicy::Transient, PointerEvent::Enter(id) | PointerEvent::Click(id)) => {
                self.set(Some(id));
            }
            (SelectionPolicy::Transient, PointerEvent::Leave) => {
                self.set(None);
            }
            (SelectionPolicy::StickyClick, PointerEvent::Click(id)) => {
                if self.pinned && self.is_selected(&id) {
                    self.clear();
                } else {
                    self.pinned = true;
                    self.set(Some(id));
                }
            }
            (SelectionPolicy::StickyClick, _) if self.pinned => {}
            (SelectionPolicy::StickyClick, PointerEvent::Enter(id)) => {
                self.set(Some(id));
            }
            (SelectionPolicy::StickyClick, PointerEvent::Leave) => {
                self.set(None);
            }
        }
    }
}
