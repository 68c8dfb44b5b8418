/// Value lifecycle hooks of a list
use crate::value::ValueRef;
use std::{fmt, sync::Arc};

/// Produces an independent copy of a stored value, `None` if the copy failed.
pub type DupFn<T> = dyn Fn(&T) -> Option<T> + Send + Sync;
/// Frees a value whose node is being destroyed.
pub type ReleaseFn<T> = dyn Fn(T) + Send + Sync;
/// Compares a stored value with a search key.
pub type MatchFn<T> = dyn Fn(&T, &T) -> bool + Send + Sync;

/// The duplicate, release and match behavior configured on a list.
///
/// Every hook is optional. An absent hook falls back to handle semantics:
/// duplication shares the handle, release drops it, and matching compares
/// by reference identity ([`ValueRef`]).
///
/// Hooks are reference counted, so a duplicated list shares them with its
/// source.
///
/// # Thread bounds
///
/// Every hook must be `Send + Sync`, so a list of `Send + Sync` values can
/// be moved to or shared with another thread (behind a lock: the list
/// itself does no synchronization). Hooks capturing `Rc` or `RefCell`
/// state are refused:
///
/// ```compile_fail
/// use adlist::Hooks;
/// use std::{cell::Cell, rc::Rc};
///
/// let freed = Rc::new(Cell::new(0));
/// let hooks: Hooks<u64> = Hooks::new().with_release(move |_| freed.set(freed.get() + 1));
/// ```
///
/// Share such state through `Arc` with atomics or a `Mutex` instead:
///
/// ```
/// use adlist::Hooks;
/// use std::sync::{Arc, Mutex};
///
/// let freed = Arc::new(Mutex::new(Vec::new()));
/// let sink = freed.clone();
/// let hooks: Hooks<u64> = Hooks::new().with_release(move |v| {
///     if let Ok(mut freed) = sink.lock() {
///         freed.push(v);
///     }
/// });
/// assert!(hooks.release_fn().is_some());
/// ```
pub struct Hooks<T> {
    dup: Option<Arc<DupFn<T>>>,
    release: Option<Arc<ReleaseFn<T>>>,
    matches: Option<Arc<MatchFn<T>>>,
}

impl<T> Default for Hooks<T> {
    fn default() -> Self {
        Self {
            dup: None,
            release: None,
            matches: None,
        }
    }
}

impl<T> Clone for Hooks<T> {
    fn clone(&self) -> Self {
        Self {
            dup: self.dup.clone(),
            release: self.release.clone(),
            matches: self.matches.clone(),
        }
    }
}

impl<T> fmt::Debug for Hooks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("dup", &self.dup.is_some())
            .field("release", &self.release.is_some())
            .field("matches", &self.matches.is_some())
            .finish()
    }
}

impl<T> Hooks<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dup<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Option<T> + Send + Sync + 'static,
    {
        self.set_dup(f);
        self
    }

    pub fn with_release<F>(mut self, f: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.set_release(f);
        self
    }

    pub fn with_match<F>(mut self, f: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.set_match(f);
        self
    }

    pub fn set_dup<F>(&mut self, f: F)
    where
        F: Fn(&T) -> Option<T> + Send + Sync + 'static,
    {
        self.dup = Some(Arc::new(f));
    }

    pub fn set_release<F>(&mut self, f: F)
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.release = Some(Arc::new(f));
    }

    pub fn set_match<F>(&mut self, f: F)
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.matches = Some(Arc::new(f));
    }

    pub fn dup(&self) -> Option<&Arc<DupFn<T>>> {
        self.dup.as_ref()
    }

    pub fn release_fn(&self) -> Option<&Arc<ReleaseFn<T>>> {
        self.release.as_ref()
    }

    pub fn match_fn(&self) -> Option<&Arc<MatchFn<T>>> {
        self.matches.as_ref()
    }

    /// Disposes of a value whose node was destroyed.
    pub(crate) fn release(&self, value: T) {
        match &self.release {
            Some(release) => release(value),
            None => drop(value),
        }
    }
}

impl<T: ValueRef> Hooks<T> {
    pub(crate) fn duplicate(&self, value: &T) -> Option<T> {
        match &self.dup {
            Some(dup) => dup(value),
            None => Some(value.share()),
        }
    }

    pub(crate) fn matches(&self, value: &T, key: &T) -> bool {
        match &self.matches {
            Some(matches) => matches(value, key),
            None => value.same(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        rc::Rc,
        sync::atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn absent_hooks_fall_back_to_handles() {
        let hooks: Hooks<Rc<String>> = Hooks::new();
        let value = Rc::new("v".to_string());

        let copy = hooks.duplicate(&value).unwrap();
        assert!(Rc::ptr_eq(&value, &copy));
        assert_eq!(Rc::strong_count(&value), 2);

        assert!(hooks.matches(&value, &copy));
        assert!(!hooks.matches(&value, &Rc::new("v".to_string())));

        hooks.release(copy);
        assert_eq!(Rc::strong_count(&value), 1);
    }

    #[test]
    fn configured_hooks_are_used() {
        let released = Arc::new(AtomicUsize::new(0));
        let counter = released.clone();

        let hooks: Hooks<u64> = Hooks::new()
            .with_dup(|v| Some(v + 100))
            .with_release(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .with_match(|v, key| v % 10 == key % 10);

        assert_eq!(hooks.duplicate(&1), Some(101));
        assert!(hooks.matches(&13, &3));
        assert!(!hooks.matches(&13, &4));

        hooks.release(5);
        hooks.release(6);
        assert_eq!(released.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn clones_share_hooks() {
        let hooks: Hooks<u32> = Hooks::new().with_dup(|v| Some(*v));
        let shared = hooks.clone();

        assert!(Arc::ptr_eq(hooks.dup().unwrap(), shared.dup().unwrap()));
        assert!(shared.release_fn().is_none());
        assert_eq!(
            format!("{:?}", shared),
            "Hooks { dup: true, release: false, matches: false }"
        );
    }
}
