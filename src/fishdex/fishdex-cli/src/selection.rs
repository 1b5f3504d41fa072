//! Single-open-panel selection for the catalog list.
//!
//! At most one entry is expanded at a time. Expanding an entry closes the
//! previous one in the same step, and the observer hears about every entry
//! that becomes expanded (never about collapses).

use fishdex_catalog::Fish;

/// Anything that can appear in a selectable list.
pub trait Entry {
    fn name(&self) -> &str;
}

impl Entry for Fish {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Entry for &str {
    fn name(&self) -> &str {
        self
    }
}

impl Entry for String {
    fn name(&self) -> &str {
        self
    }
}

/// Callback notified when an entry becomes the expanded one.
pub trait SelectionObserver {
    fn on_expand(&mut self, name: &str);
}

impl<F> SelectionObserver for F
where
    F: FnMut(&str),
{
    fn on_expand(&mut self, name: &str) {
        self(name)
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoObserver;

impl SelectionObserver for NoObserver {
    fn on_expand(&mut self, _name: &str) {}
}

/// The outcome of a single [`SelectionController::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// `index` is now expanded; `previous` was open before and is now closed.
    Expanded {
        index: usize,
        previous: Option<usize>,
    },
    /// `index` was open and is now closed; nothing is expanded.
    Collapsed { index: usize },
}

impl Transition {
    /// The selection after this transition.
    pub fn selected(self) -> Option<usize> {
        match self {
            Transition::Expanded { index, .. } => Some(index),
            Transition::Collapsed { .. } => None,
        }
    }
}

/// Tracks which entry, if any, is expanded.
///
/// Each list owns its own controller. The list's entries are passed to
/// [`toggle`](Self::toggle) rather than stored, and the owner must call
/// [`reset`](Self::reset) whenever it replaces them.
#[derive(Debug)]
pub struct SelectionController<O = NoObserver> {
    selected: Option<usize>,
    observer: O,
}

impl Default for SelectionController<NoObserver> {
    fn default() -> Self {
        Self::new(NoObserver)
    }
}

impl<O: SelectionObserver> SelectionController<O> {
    /// A collapsed controller reporting to `observer`.
    pub fn new(observer: O) -> Self {
        Self {
            selected: None,
            observer,
        }
    }

    /// Expand `index`, or collapse it if it is already expanded.
    ///
    /// Expanding closes whatever was open before and notifies the observer
    /// with the name of `entries[index]`. Collapsing notifies nobody.
    ///
    /// # Panics
    ///
    /// If `index` is out of bounds for `entries`, or if the current
    /// selection does not fit in `entries` (the list was replaced without
    /// a [`reset`](Self::reset)).
    pub fn toggle<T: Entry>(&mut self, entries: &[T], index: usize) -> Transition {
        self.check_bounds("toggle", entries.len(), index);

        if self.selected == Some(index) {
            self.selected = None;
            return Transition::Collapsed { index };
        }

        let previous = self.selected.replace(index);
        self.observer.on_expand(entries[index].name());
        Transition::Expanded { index, previous }
    }

    /// Whether `index` is the expanded entry of `entries`.
    ///
    /// # Panics
    ///
    /// Under the same conditions as [`toggle`](Self::toggle).
    pub fn is_expanded<T: Entry>(&self, entries: &[T], index: usize) -> bool {
        self.check_bounds("is_expanded", entries.len(), index);
        self.selected == Some(index)
    }

    /// Collapse everything. Call this whenever the list's entries change.
    pub fn reset(&mut self) {
        self.selected = None;
    }

    /// The observer passed to [`new`](Self::new).
    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn check_bounds(&self, op: &str, len: usize, index: usize) {
        assert!(index < len, "{op} index {index} out of bounds for {len} entries");
        if let Some(selected) = self.selected {
            assert!(
                selected < len,
                "stale selection {selected} for {len} entries; reset() was not called after the list changed"
            );
        }
    }
}
