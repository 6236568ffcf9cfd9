//! Single-threaded shared mutability.
//!
//! Every piece of state shared between an operator's observers (zip buffers,
//! subject observer lists, flattening bookkeeping) lives behind a [`MutRc`].
//! Borrows are always kept short: state is read or updated, the borrow is
//! dropped, and only then are downstream observers notified, so re-entrant
//! calls never hit an outstanding borrow.

use std::{
  cell::{Ref, RefCell, RefMut},
  rc::{Rc, Weak},
};

pub struct MutRc<T>(Rc<RefCell<T>>);

pub struct MutWeak<T>(Weak<RefCell<T>>);

impl<T> MutRc<T> {
  pub fn own(t: T) -> Self { Self(Rc::new(RefCell::new(t))) }

  #[inline]
  pub fn rc_deref(&self) -> Ref<'_, T> { self.0.borrow() }

  #[inline]
  pub fn rc_deref_mut(&self) -> RefMut<'_, T> { self.0.borrow_mut() }

  pub fn downgrade(&self) -> MutWeak<T> { MutWeak(Rc::downgrade(&self.0)) }

  pub fn ptr_eq(&self, other: &Self) -> bool { Rc::ptr_eq(&self.0, &other.0) }
}

impl<T> MutWeak<T> {
  pub fn upgrade(&self) -> Option<MutRc<T>> { self.0.upgrade().map(MutRc) }
}

impl<T> Clone for MutRc<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for MutWeak<T> {
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Default> Default for MutRc<T> {
  fn default() -> Self { Self::own(T::default()) }
}

impl<T> From<T> for MutRc<T> {
  fn from(t: T) -> Self { Self::own(t) }
}
