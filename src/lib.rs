//! A generic doubly linked list whose nodes live in an index-stable arena.
//!
//! Values are opaque handles. What happens to them when a list is duplicated,
//! when a node is destroyed, or when the list is searched is decided by the
//! caller through [`Hooks`]. Without hooks the list shares handles, drops them,
//! and compares them by reference identity (see [`ValueRef`]).
//!
//! ```
//! use adlist::prelude::*;
//! use std::rc::Rc;
//!
//! let (a, b, c): (Rc<str>, Rc<str>, Rc<str>) = ("A".into(), "B".into(), "C".into());
//!
//! let mut list = DoublyLinkedList::new();
//! list.add_tail(a.clone())?.add_tail(b.clone())?.add_tail(c.clone())?;
//!
//! list.rotate();
//! let order: Vec<&str> = list.iter().map(|v| &**v).collect();
//! assert_eq!(order, ["C", "A", "B"]);
//!
//! let last = list.index(-1).unwrap();
//! assert_eq!(list.search(&b), Some(last));
//!
//! list.delete_node(last);
//! assert_eq!(list.len(), 2);
//! # Ok::<(), adlist::Error>(())
//! ```

pub mod prelude {
    pub use super::{
        config::{Config, ConfigBuilder},
        ds::dll::{DoublyLinkedList, Placement},
        hooks::Hooks,
        iter::{Cursor, Direction},
        node::NodeId,
        value::ValueRef,
        AllocError, Error, Rejected,
    };

    pub type IResult<T> = Result<T, Error>;
}

mod atomic {
    pub use std::sync::atomic::{AtomicU32, Ordering::*};
}

mod config;
mod ds;
mod hooks;
mod iter;
mod node;
mod value;

pub use config::{Config, ConfigBuilder, ConfigInner};
pub use ds::dll::{DoublyLinkedList, Placement};
pub use hooks::{DupFn, Hooks, MatchFn, ReleaseFn};
pub use iter::{Cursor, Direction, IntoIter, Iter, NodeIds};
pub use node::NodeId;
pub use value::ValueRef;

use std::{collections::TryReserveError, fmt};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("allocation failed: {0}")]
    AllocationError(#[from] AllocError),
    #[error("node {0:?} is not linked in this list")]
    UnknownNode(NodeId),
}

/// Why node or value storage could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocError {
    #[error(transparent)]
    Reserve(#[from] TryReserveError),
    #[error("node limit of {0} reached")]
    Exhausted(usize),
    #[error("value duplication failed")]
    Duplicate,
}

/// A value the list refused to take, handed back with the reason.
///
/// Converts into [`Error`] (dropping the value) so `?` works inside
/// functions returning [`prelude::IResult`].
pub struct Rejected<T> {
    value: T,
    error: Error,
}

impl<T> Rejected<T> {
    pub(crate) fn new(value: T, error: Error) -> Self {
        Self { value, error }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }

    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Error) {
        (self.value, self.error)
    }
}

impl<T> fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish()
    }
}

impl<T> fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value rejected: {}", self.error)
    }
}

impl<T> std::error::Error for Rejected<T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<Rejected<T>> for Error {
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}

/// some common property check
#[allow(dead_code)]
mod compile_time_assertions {
    use crate::prelude::*;
    use std::sync::Arc;

    #[allow(unreachable_code)]
    fn assert_list_send_sync() {
        _assert_send_sync::<DoublyLinkedList<u64>>(unreachable!());
        _assert_send_sync::<DoublyLinkedList<Arc<str>>>(unreachable!());
        _assert_send_sync::<Hooks<Arc<str>>>(unreachable!());
        _assert_send_sync::<Config>(unreachable!());
        _assert_send::<Cursor>(unreachable!());
    }

    fn _assert_send<S: Send>(_: &S) {}

    fn _assert_send_sync<S: Send + Sync>(_: &S) {}
}
