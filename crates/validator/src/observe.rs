//! Observation seams between a form and the host that owns its data
//!
//! The form reads field values through [`DataSource`] and, when it should
//! revalidate on change, registers one callback per field through
//! [`ChangeNotifier`]. It keeps nothing but the returned [`SubscriptionId`]s.
//!
//! [`ReactiveData`] is a ready-made host implementing both traits: a JSON
//! document that notifies subscribers whenever the value under their path
//! changes.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! use formrule_validator::foundation::{FieldPath, Value};
//! use formrule_validator::observe::{ChangeNotifier, ReactiveData};
//! use serde_json::json;
//!
//! let data = ReactiveData::new(json!({"user": {"name": "ann"}}));
//! let calls = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&calls);
//! data.observe(
//!     &"user.name".into(),
//!     Arc::new(move |_: &FieldPath, _: Option<&Value>| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     }),
//! );
//!
//! data.set("user.name", json!("bob")).unwrap();
//! data.set("user.name", json!("bob")).unwrap(); // unchanged, no call
//! data.set("user.age", json!(3)).unwrap(); // other field, no call
//! assert_eq!(calls.load(Ordering::SeqCst), 1);
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

use crate::foundation::{FieldPath, PathError, Value, data_get, data_set};

// ============================================================================
// TRAITS
// ============================================================================

/// Callback invoked with the field path and its new value (`None` when the
/// path no longer resolves).
pub type OnChange = Arc<dyn Fn(&FieldPath, Option<&Value>) + Send + Sync>;

/// Handle returned by [`ChangeNotifier::observe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a host-assigned id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw id value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Read access to the data a form validates.
pub trait DataSource: Send + Sync {
    /// Current value at `path`, `None` when it does not resolve.
    fn get(&self, path: &FieldPath) -> Option<Value>;
}

/// Change subscriptions supplied by the host.
///
/// Implementations must deliver notifications for one subscription serially
/// and only after the mutation that caused them is visible through the
/// matching [`DataSource`].
pub trait ChangeNotifier: Send + Sync {
    /// Calls `on_change` whenever the value at `path` changes.
    fn observe(&self, path: &FieldPath, on_change: OnChange) -> SubscriptionId;

    /// Stops a subscription. Unknown ids are ignored.
    fn unobserve(&self, id: SubscriptionId);
}

/// A fixed document. Nothing ever changes, so it is never observed.
impl DataSource for Value {
    fn get(&self, path: &FieldPath) -> Option<Value> {
        data_get(self, path.as_str()).cloned()
    }
}

// ============================================================================
// REACTIVE DATA
// ============================================================================

struct Subscription {
    id: SubscriptionId,
    path: FieldPath,
    last: Mutex<Option<Value>>,
    active: AtomicBool,
    on_change: OnChange,
}

/// A JSON document that notifies path subscribers after each mutation.
///
/// After every mutation each subscription whose resolved value differs from
/// the last one it saw is notified once. A mutation made from inside a
/// callback does not recurse: it is picked up by the dispatch loop that is
/// already running, so a subscriber never sees overlapping calls.
pub struct ReactiveData {
    data: RwLock<Value>,
    subscriptions: Mutex<Vec<Arc<Subscription>>>,
    next_id: AtomicU64,
    dispatching: AtomicBool,
    pending: AtomicBool,
}

impl ReactiveData {
    /// Wraps a document.
    #[must_use]
    pub fn new(data: Value) -> Self {
        Self {
            data: RwLock::new(data),
            subscriptions: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            dispatching: AtomicBool::new(false),
            pending: AtomicBool::new(false),
        }
    }

    /// Wraps a document in an `Arc`, ready to be shared with a form.
    #[must_use]
    pub fn shared(data: Value) -> Arc<Self> {
        Arc::new(Self::new(data))
    }

    /// Copy of the whole document.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        self.data.read().clone()
    }

    /// Writes a value at a dotted path, creating missing parent objects.
    pub fn set(&self, path: &str, value: Value) -> Result<(), PathError> {
        data_set(&mut *self.data.write(), path, value)?;
        self.dispatch();
        Ok(())
    }

    /// Swaps the whole document, returning the previous one.
    pub fn replace(&self, data: Value) -> Value {
        let previous = std::mem::replace(&mut *self.data.write(), data);
        self.dispatch();
        previous
    }

    /// Applies an arbitrary mutation to the document.
    ///
    /// `f` edits a copy and no lock is held while it runs, so it may read
    /// this store. The copy then replaces the document, overwriting any
    /// write made by another thread in the meantime.
    pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        let mut next = self.snapshot();
        let result = f(&mut next);
        *self.data.write() = next;
        self.dispatch();
        result
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.lock().len()
    }

    fn dispatch(&self) {
        self.pending.store(true, Ordering::SeqCst);

        loop {
            if self.dispatching.swap(true, Ordering::SeqCst) {
                // The running loop will see `pending`.
                return;
            }

            while self.pending.swap(false, Ordering::SeqCst) {
                self.dispatch_once();
            }

            self.dispatching.store(false, Ordering::SeqCst);
            if !self.pending.load(Ordering::SeqCst) {
                return;
            }
        }
    }

    fn dispatch_once(&self) {
        let subscriptions: Vec<Arc<Subscription>> = self.subscriptions.lock().clone();

        for sub in subscriptions {
            if !sub.active.load(Ordering::SeqCst) {
                continue;
            }

            let current = DataSource::get(self, &sub.path);
            let changed = {
                let mut last = sub.last.lock();
                if *last == current {
                    false
                } else {
                    last.clone_from(&current);
                    true
                }
            };

            if changed {
                tracing::trace!(subscription = %sub.id, path = %sub.path, "field value changed");
                (sub.on_change)(&sub.path, current.as_ref());
            }
        }
    }
}

impl DataSource for ReactiveData {
    fn get(&self, path: &FieldPath) -> Option<Value> {
        data_get(&self.data.read(), path.as_str()).cloned()
    }
}

impl ChangeNotifier for ReactiveData {
    fn observe(&self, path: &FieldPath, on_change: OnChange) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let subscription = Subscription {
            id,
            path: path.clone(),
            last: Mutex::new(DataSource::get(self, path)),
            active: AtomicBool::new(true),
            on_change,
        };

        self.subscriptions.lock().push(Arc::new(subscription));
        id
    }

    fn unobserve(&self, id: SubscriptionId) {
        self.subscriptions.lock().retain(|sub| {
            if sub.id == id {
                sub.active.store(false, Ordering::SeqCst);
                false
            } else {
                true
            }
        });
    }
}

impl fmt::Debug for ReactiveData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveData")
            .field("data", &*self.data.read())
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

impl Default for ReactiveData {
    fn default() -> Self {
        Self::new(Value::Object(serde_json::Map::new()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
