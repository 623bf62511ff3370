//! Configuration change propagation
//!
//! Single-threaded, synchronous observers. `Filter::set_param` notifies its
//! listeners in the same call stack, before returning; nothing is deferred.
//! Two guards keep that safe:
//!
//! - a per-filter `in_notify` flag, so a filter never re-enters its own
//!   changed handlers as a result of handling a notification it emitted;
//! - a shared guard flag per two-way binding, checked at the top of each
//!   propagation closure, so mirrored filters update each other exactly once
//!   per edit instead of echoing forever.

use std::cell::Cell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU32, Ordering};

use crate::filter::{Filter, FilterParams};

/// Stable identity of a filter instance, unique for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterId(u32);

static NEXT_FILTER_ID: AtomicU32 = AtomicU32::new(1);

impl FilterId {
    pub(crate) fn next() -> Self {
        FilterId(NEXT_FILTER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle for removing a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(FilterId, &FilterParams)>;

/// Listener list owned by each filter instance
#[derive(Default)]
pub(crate) struct ChangeListeners {
    callbacks: Vec<(u64, Callback)>,
    next: u64,
    in_notify: bool,
}

impl ChangeListeners {
    pub(crate) fn subscribe<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(FilterId, &FilterParams) + 'static,
    {
        let id = self.next;
        self.next += 1;
        self.callbacks.push((id, Box::new(callback)));
        ListenerId(id)
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) {
        self.callbacks.retain(|(i, _)| *i != id.0);
    }

    /// Invoke every listener. Re-entrant emits on the same instance are
    /// suppressed (the cycle-breaking rule), not queued.
    pub(crate) fn emit(&mut self, id: FilterId, params: &FilterParams) {
        if self.in_notify {
            return;
        }
        self.in_notify = true;
        let mut callbacks = std::mem::take(&mut self.callbacks);
        for (_, callback) in callbacks.iter_mut() {
            callback(id, params);
        }
        // Listeners registered while notifying survive, appended after the
        // existing set; they are not called for the event in flight.
        let added = std::mem::take(&mut self.callbacks);
        self.callbacks = callbacks;
        self.callbacks.extend(added);
        self.in_notify = false;
    }
}

impl std::fmt::Debug for ChangeListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeListeners")
            .field("count", &self.callbacks.len())
            .field("in_notify", &self.in_notify)
            .finish()
    }
}

/// Latched "needs redraw" signal for the rendering layer
///
/// Records which filter changed most recently and nothing else.
#[derive(Clone, Default)]
pub struct RedrawFlag(Rc<Cell<Option<FilterId>>>);

impl RedrawFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// A listener that latches this flag; connect it to any filter
    pub fn listener(&self) -> impl FnMut(FilterId, &FilterParams) + 'static {
        let cell = self.0.clone();
        move |id, _| cell.set(Some(id))
    }

    pub fn is_set(&self) -> bool {
        self.0.get().is_some()
    }

    /// Consume the latch, returning the last changed filter if any
    pub fn take(&self) -> Option<FilterId> {
        self.0.take()
    }
}

/// A live two-way parameter binding between two filters
///
/// Propagation continues until [`unbind`](Self::unbind) removes the
/// listeners or one of the filters is dropped.
pub struct ParamsBinding {
    a: Weak<std::cell::RefCell<Filter>>,
    b: Weak<std::cell::RefCell<Filter>>,
    listener_a: ListenerId,
    listener_b: ListenerId,
}

impl ParamsBinding {
    pub fn unbind(self) {
        if let Some(a) = self.a.upgrade() {
            a.borrow_mut().disconnect(self.listener_a);
        }
        if let Some(b) = self.b.upgrade() {
            b.borrow_mut().disconnect(self.listener_b);
        }
    }
}

/// Keep two same-kind filters' parameters in sync, both directions
///
/// Mirrors the edit-copy / live-config arrangement: editing either side
/// writes the full parameter set into the other. The shared guard is checked
/// at the top of each propagation closure, so the write into the peer does
/// not bounce back.
pub fn bind_params(
    a: &Rc<std::cell::RefCell<Filter>>,
    b: &Rc<std::cell::RefCell<Filter>>,
) -> ParamsBinding {
    let guard = Rc::new(Cell::new(false));

    let listener_a = {
        let guard = guard.clone();
        let peer = Rc::downgrade(b);
        a.borrow_mut().connect_changed(move |_, params| {
            if guard.get() {
                return;
            }
            let Some(peer) = peer.upgrade() else { return };
            guard.set(true);
            let result = peer.borrow_mut().set_params(params.clone());
            guard.set(false);
            if let Err(e) = result {
                tracing::debug!("binding propagation dropped: {e}");
            }
        })
    };

    let listener_b = {
        let guard = guard.clone();
        let peer = Rc::downgrade(a);
        b.borrow_mut().connect_changed(move |_, params| {
            if guard.get() {
                return;
            }
            let Some(peer) = peer.upgrade() else { return };
            guard.set(true);
            let result = peer.borrow_mut().set_params(params.clone());
            guard.set(false);
            if let Err(e) = result {
                tracing::debug!("binding propagation dropped: {e}");
            }
        })
    };

    ParamsBinding {
        a: Rc::downgrade(a),
        b: Rc::downgrade(b),
        listener_a,
        listener_b,
    }
}
