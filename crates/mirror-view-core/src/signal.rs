//! Signal/slot system for mirror-view.
//!
//! Models announce changes by emitting signals; views connect slots to them.
//! This is the channel through which a tree model pushes `refresh`,
//! `edit_element`, `expand_element` and `select_element` into a view.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The main signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//! - [`ConnectionGuard`] - RAII guard that disconnects when dropped
//!
//! # Direct and Queued Slots
//!
//! A slot connected with [`Signal::connect`] runs immediately inside
//! [`Signal::emit`]. A slot connected with [`Signal::connect_queued`] only
//! pushes the (mapped) arguments into a channel; the receiving side drains
//! the channel when it is ready. Views use queued connections so that a
//! controller callback running inside a view gesture can emit model events
//! without re-entering the view.
//!
//! Slots are invoked outside the connection lock, so a slot may connect or
//! disconnect other slots on the same signal.
//!
//! # Example
//!
//! ```
//! use mirror_view_core::Signal;
//!
//! let text_changed = Signal::<String>::new();
//!
//! let conn_id = text_changed.connect(|text| {
//!     println!("Text changed to: {}", text);
//! });
//!
//! text_changed.emit("Hello, World!".to_string());
//! text_changed.disconnect(conn_id);
//! ```

use std::sync::{Arc, Weak};

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::targets;

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;
type ConnectionTable<Args> = Mutex<SlotMap<ConnectionId, Slot<Args>>>;

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. Emission itself is synchronous on the
/// emitting thread.
pub struct Signal<Args> {
    /// All active connections.
    connections: Arc<ConnectionTable<Args>>,
}

impl<Args: Clone + Send + 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: Clone + Send + 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Arc::new(slot))
    }

    /// Connect a channel that receives `map(args)` on every emission.
    ///
    /// The receiver decides when to process the queued values. If the
    /// receiving side has been dropped the value is discarded.
    ///
    /// ```
    /// use mirror_view_core::Signal;
    ///
    /// let signal = Signal::<i32>::new();
    /// let (tx, rx) = crossbeam_channel::unbounded();
    /// signal.connect_queued(tx, |n| n * 2);
    ///
    /// signal.emit(21);
    /// assert_eq!(rx.try_recv().ok(), Some(42));
    /// ```
    pub fn connect_queued<T, F>(&self, sender: Sender<T>, map: F) -> ConnectionId
    where
        T: Send + 'static,
        F: Fn(&Args) -> T + Send + Sync + 'static,
    {
        self.connect(move |args| {
            if sender.send(map(args)).is_err() {
                tracing::trace!(target: targets::SIGNAL, "queued receiver gone, value dropped");
            }
        })
    }

    /// Wraps an existing connection in a guard.
    pub fn guard(&self, id: ConnectionId) -> ConnectionGuard<Args> {
        ConnectionGuard {
            connections: Arc::downgrade(&self.connections),
            id,
        }
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    #[tracing::instrument(skip_all, target = "mirror_view_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = self.connections.lock().values().cloned().collect();
        tracing::trace!(target: targets::SIGNAL, connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }
}

/// A connection guard that disconnects its slot when dropped.
///
/// Created via [`Signal::guard`].
///
/// ```
/// use mirror_view_core::Signal;
/// use std::sync::atomic::{AtomicI32, Ordering};
/// use std::sync::Arc;
///
/// let signal = Signal::<i32>::new();
/// let counter = Arc::new(AtomicI32::new(0));
/// {
///     let counter_clone = counter.clone();
///     let id = signal.connect(move |&n| {
///         counter_clone.fetch_add(n, Ordering::SeqCst);
///     });
///     let _guard = signal.guard(id);
///     signal.emit(42);
/// }
/// signal.emit(43);
/// assert_eq!(counter.load(Ordering::SeqCst), 42);
/// ```
pub struct ConnectionGuard<Args> {
    connections: Weak<ConnectionTable<Args>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The guarded connection.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(connections) = self.connections.upgrade() {
            connections.lock().remove(self.id);
        }
    }
}

impl<Args> std::fmt::Debug for ConnectionGuard<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionGuard").field("id", &self.id).finish()
    }
}

static_assertions::assert_impl_all!(Signal<()>: Send, Sync);
static_assertions::assert_impl_all!(ConnectionGuard<String>: Send, Sync);
