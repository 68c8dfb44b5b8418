//! Reference semantics of opaque value handles.
//!
//! A list never looks inside its values. When no hooks are configured it
//! still has to duplicate and compare them, and it does so the way a list of
//! raw pointers would: by copying the reference and comparing addresses.

use std::{ptr::NonNull, rc::Rc, sync::Arc};

/// An opaque handle to a value living elsewhere.
///
/// # Example
///
/// ```
/// use adlist::ValueRef;
/// use std::rc::Rc;
///
/// let a: Rc<str> = "same".into();
/// let b: Rc<str> = "same".into();
///
/// assert!(a.same(&a.share()));
/// assert!(!a.same(&b)); // equal contents, different allocations
/// ```
pub trait ValueRef {
    /// Returns another handle to the same value.
    fn share(&self) -> Self;

    /// Returns `true` if both handles refer to the same value.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> ValueRef for Rc<T> {
    #[inline]
    fn share(&self) -> Self {
        Rc::clone(self)
    }

    #[inline]
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> ValueRef for Arc<T> {
    #[inline]
    fn share(&self) -> Self {
        Arc::clone(self)
    }

    #[inline]
    fn same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<'a, T: ?Sized> ValueRef for &'a T {
    #[inline]
    fn share(&self) -> Self {
        *self
    }

    #[inline]
    fn same(&self, other: &Self) -> bool {
        // address only, slice lengths and vtables are not identity
        let (a, b) = (*self as *const T, *other as *const T);
        std::ptr::eq(a as *const (), b as *const ())
    }
}

impl<T: ?Sized> ValueRef for NonNull<T> {
    #[inline]
    fn share(&self) -> Self {
        *self
    }

    #[inline]
    fn same(&self, other: &Self) -> bool {
        self.as_ptr() as *const () == other.as_ptr() as *const ()
    }
}

// integer handles (slot numbers, ids) are their own identity
macro_rules! impl_value_ref_for_handle {
    ($($ty:ty),*) => {
        $(
            impl ValueRef for $ty {
                #[inline]
                fn share(&self) -> Self {
                    *self
                }

                #[inline]
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

impl_value_ref_for_handle!(u8, u16, u32, u64, usize, i32, i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_identity() {
        let a = Arc::new(vec![1u8, 2, 3]);
        let b = Arc::new(vec![1u8, 2, 3]);

        assert!(a.same(&a.share()));
        assert!(!a.same(&b));
        assert_eq!(Arc::strong_count(&a), 1);
    }

    #[test]
    fn borrowed_identity() {
        let values = [7u32, 7u32];
        let first: &u32 = &values[0];
        let second: &u32 = &values[1];

        let shared = <&u32 as ValueRef>::share(&first);
        assert!(ValueRef::same(&first, &shared));
        assert!(!ValueRef::same(&first, &second));
    }

    #[test]
    fn wide_pointers_compare_by_address() {
        let bytes = [1u8, 2, 3];

        let whole = NonNull::from(&bytes[..]);
        let prefix = NonNull::from(&bytes[..2]);
        let tail = NonNull::from(&bytes[1..]);
        assert!(whole.same(&prefix));
        assert!(!whole.same(&tail));

        let whole: &[u8] = &bytes[..];
        let prefix: &[u8] = &bytes[..2];
        assert!(ValueRef::same(&whole, &prefix));
        assert!(!ValueRef::same(&whole, &&bytes[1..]));
    }

    #[test]
    fn integer_handles() {
        assert!(42u64.same(&42));
        assert!(!1usize.same(&2));
        assert_eq!(9i32.share(), 9);
    }
}
