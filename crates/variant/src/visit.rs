//! Visitor dispatch.
//!
//! A visitor is a set of handlers, one [Visit] impl per alternative plus
//! [Visitor::empty]. [apply_visitor] hands the live value to the matching
//! handler, with the same access the caller has to the variant: `&Variant`
//! visits `&T`, `&mut Variant` visits `&mut T` and an owned `Variant` visits
//! `T`. A handler set missing an alternative does not compile.
//!
//! Handler sets are usually written with the [visitor](crate::visitor)
//! attribute:
//!
//! ```
//! use variant::{apply_visitor, visitor, Variant};
//!
//! #[derive(Default)]
//! struct Describe(Vec<&'static str>);
//!
//! #[visitor]
//! impl Describe {
//!     fn int(&mut self, _: &i32) {
//!         self.0.push("int")
//!     }
//!     fn string(&mut self, _: &String) {
//!         self.0.push("string")
//!     }
//!     fn nothing(&mut self) {
//!         self.0.push("empty")
//!     }
//! }
//!
//! let mut describe = Describe::default();
//! apply_visitor(&mut describe, &Variant::<(i32, String)>::default());
//! apply_visitor(&mut describe, &Variant::<(i32, String)>::new(3));
//! assert_eq!(describe.0, ["empty", "int"]);
//! ```
//!
//! Every alternative needs a handler:
//!
//! ```compile_fail
//! # use variant::{apply_visitor, visitor, Variant};
//! struct OnlyInts;
//!
//! #[visitor]
//! impl OnlyInts {
//!     fn int(&mut self, _: &i32) {}
//! }
//!
//! apply_visitor(&mut OnlyInts, &Variant::<(i32, String)>::new(1));
//! ```
//!
//! The attribute rejects handler sets it cannot turn into a visitor: two
//! empty handlers,
//!
//! ```compile_fail
//! # use variant::visitor;
//! struct Twice;
//!
//! #[visitor]
//! impl Twice {
//!     fn int(&mut self, _: &i32) {}
//!     fn nothing(&mut self) {}
//!     fn nothing_again(&mut self) {}
//! }
//! ```
//!
//! handlers with more than one argument,
//!
//! ```compile_fail
//! # use variant::visitor;
//! struct Pairs;
//!
//! #[visitor]
//! impl Pairs {
//!     fn int(&mut self, _: &i32, _: &i32) {}
//! }
//! ```
//!
//! and handlers disagreeing on their return type.
//!
//! ```compile_fail
//! # use variant::visitor;
//! struct Mixed;
//!
//! #[visitor]
//! impl Mixed {
//!     fn int(&mut self, _: &i32) -> usize {
//!         0
//!     }
//!     fn string(&mut self, _: &String) -> bool {
//!         true
//!     }
//! }
//! ```

use std::any::type_name;

use crate::{alternatives::AlternativeList, error::Result, Variant};

pub trait Visitor {
    type Output;

    /// Called when the variant is empty
    fn empty(&mut self) -> Self::Output {
        panic!("`{}` cannot visit an empty variant", type_name::<Self>())
    }
}

/// The handler for alternatives of type `T`
pub trait Visit<T>: Visitor {
    fn visit(&mut self, value: T) -> Self::Output;
}

/// ## Safety
/// `dispatch_ref` reads alternative `index` and nothing else.
pub unsafe trait DispatchRef<'a, V: Visitor>: AlternativeList {
    /// ## Safety
    /// `storage` holds a live alternative `index` borrowed for `'a`
    unsafe fn dispatch_ref(
        index: usize,
        storage: *const Self::Storage,
        visitor: &mut V,
    ) -> Result<V::Output>;
}

/// ## Safety
/// `dispatch_mut` only touches alternative `index` and leaves it live.
pub unsafe trait DispatchMut<'a, V: Visitor>: AlternativeList {
    /// ## Safety
    /// `storage` holds a live alternative `index` mutably borrowed for `'a`
    unsafe fn dispatch_mut(
        index: usize,
        storage: *mut Self::Storage,
        visitor: &mut V,
    ) -> Result<V::Output>;
}

/// ## Safety
/// `dispatch_owned` moves alternative `index` out of the storage.
pub unsafe trait DispatchOwned<V: Visitor>: AlternativeList {
    /// ## Safety
    /// `storage` holds a live alternative `index`, which belongs to the
    /// visitor afterwards
    unsafe fn dispatch_owned(
        index: usize,
        storage: *const Self::Storage,
        visitor: &mut V,
    ) -> Result<V::Output>;
}

/// Something [apply_visitor] accepts: `&Variant`, `&mut Variant` or `Variant`
pub trait Visitable<V: Visitor> {
    fn accept(self, visitor: &mut V) -> V::Output;
}

impl<'a, L, V> Visitable<V> for &'a Variant<L>
where
    L: DispatchRef<'a, V>,
    V: Visitor,
{
    fn accept(self, visitor: &mut V) -> V::Output {
        self.visit(visitor)
    }
}

impl<'a, L, V> Visitable<V> for &'a mut Variant<L>
where
    L: DispatchMut<'a, V>,
    V: Visitor,
{
    fn accept(self, visitor: &mut V) -> V::Output {
        self.visit_mut(visitor)
    }
}

impl<L, V> Visitable<V> for Variant<L>
where
    L: DispatchOwned<V>,
    V: Visitor,
{
    fn accept(self, visitor: &mut V) -> V::Output {
        self.into_visit(visitor)
    }
}

/// Applies `visitor` to whatever `target` holds.
pub fn apply_visitor<V, T>(visitor: &mut V, target: T) -> V::Output
where
    V: Visitor,
    T: Visitable<V>,
{
    target.accept(visitor)
}

#[cfg(test)]
mod test {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    /// handler set written by hand, counting what it saw
    #[derive(Default)]
    struct Sizes {
        total: usize,
    }

    impl Visitor for Sizes {
        type Output = usize;

        fn empty(&mut self) -> usize {
            0
        }
    }

    impl<'a> Visit<&'a u8> for Sizes {
        fn visit(&mut self, _: &'a u8) -> usize {
            self.total += 1;
            1
        }
    }

    impl<'a> Visit<&'a String> for Sizes {
        fn visit(&mut self, value: &'a String) -> usize {
            self.total += value.len();
            value.len()
        }
    }

    #[test]
    fn hand_written_handlers() {
        let mut sizes = Sizes::default();
        assert_eq!(apply_visitor(&mut sizes, &Variant::<(u8, String)>::new(3u8)), 1);
        assert_eq!(
            apply_visitor(&mut sizes, &Variant::<(u8, String)>::new("four".to_string())),
            4
        );
        assert_eq!(apply_visitor(&mut sizes, &Variant::<(u8, String)>::empty()), 0);
        assert_eq!(sizes.total, 5);
    }

    struct NoEmpty;

    impl Visitor for NoEmpty {
        type Output = ();
    }

    impl<'a> Visit<&'a u8> for NoEmpty {
        fn visit(&mut self, _: &'a u8) {}
    }

    #[test]
    fn missing_empty_handler_traps() {
        let empty = Variant::<(u8,)>::empty();
        let result = catch_unwind(AssertUnwindSafe(|| apply_visitor(&mut NoEmpty, &empty)));
        assert!(result.is_err());
        apply_visitor(&mut NoEmpty, &Variant::<(u8,)>::new(1u8));
    }
}
