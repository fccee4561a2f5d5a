//! Alternative lists.
//!
//! An alternative list is a tuple `(T0, ..., Tn-1)`. Everything [Variant]
//! needs to know about it is a per-index dispatch: which type lives at index
//! `i`, how to drop, clone, compare, hash or print it. Those dispatches are
//! generated for every tuple arity up to [MAX_ALTERNATIVES] in [tuples].
//!
//! The traits below deal in raw pointers to the shared storage. They are only
//! ever called by [Variant] with the index it currently holds.
//!
//! [Variant]: crate::Variant

use std::{
    fmt,
    hash::Hasher,
};

use utils::tag::Position;

use crate::error::Result;

mod tuples;

pub use tuples::*;

/// Largest supported number of alternatives
pub const MAX_ALTERNATIVES: usize = 12;

/// A closed, ordered list of types.
///
/// ## Safety
/// `Storage` must be large and aligned enough for every alternative and place
/// every alternative at offset `0`. Every per-index method must treat index
/// `i` as the `i`-th element of the list and reject anything `>= LEN`.
pub unsafe trait AlternativeList: Sized {
    /// Memory shared by all the alternatives
    type Storage;
    const LEN: usize;
    /// Size of the largest alternative
    const MAX_SIZE: usize;

    fn type_name_at(index: usize) -> Option<&'static str>;

    /// ## Safety
    /// `storage` holds a live alternative `index`, which is dead afterwards
    unsafe fn drop_at(index: usize, storage: *mut Self::Storage) -> Result<()>;
}

/// The alternative at position `N`.
///
/// ## Safety
/// `Output` is the `N`-th element of the list.
pub unsafe trait Select<const N: usize>: AlternativeList {
    type Output;
}

/// `T` is the alternative at position `P`.
///
/// When `T` appears several times in the list the position cannot be inferred,
/// which turns an ambiguous request into a compile error.
///
/// ## Safety
/// `T` is the `P::VALUE`-th element of the list.
pub unsafe trait Member<T, P: Position>: AlternativeList {
    const INDEX: usize = P::VALUE;
}

/// `Src` converts into the alternative at position `P`.
///
/// ## Safety
/// `Target` is the `P::VALUE`-th element of the list.
pub unsafe trait Convertible<Src, P: Position>: AlternativeList {
    type Target;
    const INDEX: usize = P::VALUE;

    fn convert(value: Src) -> Self::Target;
}

/// ## Safety
/// `clone_at` leaves a live alternative `index` in `dst` when it returns `Ok`
/// and nothing when it returns an error or panics.
pub unsafe trait CloneAlternatives: AlternativeList {
    /// ## Safety
    /// `src` holds a live alternative `index`, `dst` holds nothing
    unsafe fn clone_at(
        index: usize,
        src: *const Self::Storage,
        dst: *mut Self::Storage,
    ) -> Result<()>;
}

/// ## Safety
/// `take_at` moves alternative `index` into `dst` and leaves a default one in
/// `src` when it returns `Ok`.
pub unsafe trait DefaultAlternatives: AlternativeList {
    /// ## Safety
    /// `src` holds a live alternative `index`, `dst` holds nothing
    unsafe fn take_at(index: usize, src: *mut Self::Storage, dst: *mut Self::Storage)
        -> Result<()>;
}

pub trait DebugAlternatives: AlternativeList {
    /// ## Safety
    /// `storage` holds a live alternative `index`
    unsafe fn fmt_at(
        index: usize,
        storage: *const Self::Storage,
        f: &mut fmt::Formatter<'_>,
    ) -> Result<fmt::Result>;
}

pub trait PartialEqAlternatives: AlternativeList {
    /// ## Safety
    /// both `lhs` and `rhs` hold a live alternative `index`
    unsafe fn eq_at(
        index: usize,
        lhs: *const Self::Storage,
        rhs: *const Self::Storage,
    ) -> Result<bool>;
}

pub trait EqAlternatives: PartialEqAlternatives {}

pub trait HashAlternatives: AlternativeList {
    /// ## Safety
    /// `storage` holds a live alternative `index`
    unsafe fn hash_at<H: Hasher>(
        index: usize,
        storage: *const Self::Storage,
        state: &mut H,
    ) -> Result<()>;
}
