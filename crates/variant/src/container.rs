use std::{
    fmt::{self, Debug},
    hash::{Hash, Hasher},
    mem::{self, align_of, MaybeUninit},
};

use log::{error, trace};
use utils::{tag::Position, traits::NicerError};

use crate::{
    alternatives::{
        AlternativeList, CloneAlternatives, Convertible, DebugAlternatives, DefaultAlternatives,
        EqAlternatives, HashAlternatives, Member, PartialEqAlternatives, Select,
    },
    error::{Result, VariantError},
    visit::{DispatchMut, DispatchOwned, DispatchRef, Visitor},
};

/// A tagged union holding at most one value out of the alternative list `L`.
///
/// `L` is a tuple: `Variant<(i32, String)>` holds either an `i32`, a `String`
/// or nothing. The value lives inline, in storage sized and aligned for the
/// largest alternative.
///
/// ```
/// use variant::{Variant, VariantError};
///
/// let mut a = Variant::<(i32, String)>::new(3);
/// assert_eq!(a.get_at::<0>(), Ok(&3));
/// a.set_convert("Hello");
/// assert_eq!(a.get_at::<1>().map(String::as_str), Ok("Hello"));
/// assert!(matches!(a.get_at::<0>(), Err(VariantError::TypeMismatch { .. })));
/// ```
///
/// The alternative a value goes to is settled at compile time. A value that
/// fits several alternatives is rejected:
///
/// ```compile_fail
/// # use variant::Variant;
/// // `i32` converts into both `i64` and `f64`
/// let _ = Variant::<(i64, f64)>::convert(1i32);
/// ```
///
/// ```compile_fail
/// # use variant::Variant;
/// let _ = Variant::<(i32, i32)>::new(1i32);
/// ```
///
/// and so is a value that fits none:
///
/// ```compile_fail
/// # use variant::Variant;
/// let _ = Variant::<(i32, String)>::new(1.5f64);
/// ```
pub struct Variant<L: AlternativeList> {
    storage: MaybeUninit<L::Storage>,
    /// `None` when empty, the position of the live alternative otherwise
    discriminant: Option<usize>,
}

/// Traps on a corrupted discriminant. The per-index helpers only reject
/// indices outside of the list, which a [Variant] never holds.
fn invariant<T>(result: Result<T>) -> T {
    if let Err(err) = &result {
        error!("variant invariant violated: {err}");
    }
    result.expect_display(|| "corrupted variant")
}

impl<L: AlternativeList> Variant<L> {
    /// Number of alternatives
    pub const LEN: usize = L::LEN;

    pub const fn empty() -> Self {
        Self {
            storage: MaybeUninit::uninit(),
            discriminant: None,
        }
    }

    /// ## Safety
    /// `T` is the alternative at `index`
    unsafe fn emplace<T>(index: usize, value: T) -> Self {
        let mut this = Self::empty();
        this.storage.as_mut_ptr().cast::<T>().write(value);
        this.discriminant = Some(index);
        this
    }

    /// Holds `value`, whose type is exactly one of the alternatives
    pub fn new<T, P>(value: T) -> Self
    where
        L: Member<T, P>,
        P: Position,
    {
        unsafe { Self::emplace(<L as Member<T, P>>::INDEX, value) }
    }

    /// Holds `value` as the alternative at position `N`
    pub fn new_at<const N: usize>(value: <L as Select<N>>::Output) -> Self
    where
        L: Select<N>,
    {
        unsafe { Self::emplace(N, value) }
    }

    /// Holds `value` converted into the only alternative it converts into
    pub fn convert<U, P>(value: U) -> Self
    where
        L: Convertible<U, P>,
        P: Position,
    {
        let value = <L as Convertible<U, P>>::convert(value);
        unsafe { Self::emplace(<L as Convertible<U, P>>::INDEX, value) }
    }

    pub fn is_empty(&self) -> bool {
        self.discriminant.is_none()
    }

    /// Position of the live alternative
    pub fn index(&self) -> Option<usize> {
        self.discriminant
    }

    /// Name of the live alternative's type
    pub fn type_name(&self) -> Option<&'static str> {
        self.discriminant.and_then(L::type_name_at)
    }

    pub fn holds<T, P>(&self) -> bool
    where
        L: Member<T, P>,
        P: Position,
    {
        self.discriminant == Some(<L as Member<T, P>>::INDEX)
    }

    pub fn holds_at<const N: usize>(&self) -> bool
    where
        L: Select<N>,
    {
        self.discriminant == Some(N)
    }

    /// Drops the live value, if any, and leaves `self` empty
    pub fn clear(&mut self) {
        if let Some(index) = self.discriminant.take() {
            trace!("dropping alternative {index} ({:?})", L::type_name_at(index));
            invariant(unsafe { L::drop_at(index, self.storage.as_mut_ptr()) })
        }
    }

    pub fn swap(&mut self, other: &mut Self) {
        trace!("swapping {:?} and {:?}", self.discriminant, other.discriminant);
        mem::swap(self, other)
    }

    /// Moves everything out of `self`, leaving it empty
    pub fn take(&mut self) -> Self {
        trace!("taking {:?}", self.discriminant);
        mem::take(self)
    }

    /// Moves the live value out, leaving `self` on the *same* alternative with
    /// that alternative's default value.
    ///
    /// `self` is still not [empty](Self::is_empty) afterwards. Use
    /// [take](Self::take) to leave it empty instead.
    pub fn move_out(&mut self) -> Self
    where
        L: DefaultAlternatives,
    {
        let Some(index) = self.discriminant else {
            return Self::empty();
        };
        trace!("moving alternative {index} out");
        let mut moved = Self::empty();
        invariant(unsafe { L::take_at(index, self.storage.as_mut_ptr(), moved.storage.as_mut_ptr()) });
        moved.discriminant = Some(index);
        moved
    }

    /// `*self = source.move_out()`
    pub fn move_assign(&mut self, source: &mut Self)
    where
        L: DefaultAlternatives,
    {
        *self = source.move_out()
    }

    pub fn set<T, P>(&mut self, value: T)
    where
        L: Member<T, P>,
        P: Position,
    {
        *self = Self::new(value)
    }

    pub fn set_at<const N: usize>(&mut self, value: <L as Select<N>>::Output)
    where
        L: Select<N>,
    {
        *self = Self::new_at::<N>(value)
    }

    pub fn set_convert<U, P>(&mut self, value: U)
    where
        L: Convertible<U, P>,
        P: Position,
    {
        *self = Self::convert(value)
    }

    /// ## Safety
    /// `T` is the alternative at `index`
    unsafe fn slot<T>(&self, index: usize) -> Option<&T> {
        (self.discriminant == Some(index)).then(|| &*self.storage.as_ptr().cast::<T>())
    }

    /// ## Safety
    /// `T` is the alternative at `index`
    unsafe fn slot_mut<T>(&mut self, index: usize) -> Option<&mut T> {
        (self.discriminant == Some(index)).then(|| &mut *self.storage.as_mut_ptr().cast::<T>())
    }

    /// ## Safety
    /// `T` is the alternative at `index`
    unsafe fn into_slot<T>(mut self, index: usize) -> Result<T> {
        if self.discriminant == Some(index) {
            self.discriminant = None;
            Ok(self.storage.as_ptr().cast::<T>().read())
        } else {
            Err(VariantError::type_mismatch::<T>(self.type_name()))
        }
    }

    pub fn get_if<T, P>(&self) -> Option<&T>
    where
        L: Member<T, P>,
        P: Position,
    {
        unsafe { self.slot(<L as Member<T, P>>::INDEX) }
    }

    pub fn get_if_mut<T, P>(&mut self) -> Option<&mut T>
    where
        L: Member<T, P>,
        P: Position,
    {
        unsafe { self.slot_mut(<L as Member<T, P>>::INDEX) }
    }

    pub fn get<T, P>(&self) -> Result<&T>
    where
        L: Member<T, P>,
        P: Position,
    {
        let live = self.type_name();
        self.get_if::<T, P>()
            .ok_or_else(|| VariantError::type_mismatch::<T>(live))
    }

    pub fn get_mut<T, P>(&mut self) -> Result<&mut T>
    where
        L: Member<T, P>,
        P: Position,
    {
        let live = self.type_name();
        self.get_if_mut::<T, P>()
            .ok_or_else(|| VariantError::type_mismatch::<T>(live))
    }

    pub fn into_inner<T, P>(self) -> Result<T>
    where
        L: Member<T, P>,
        P: Position,
    {
        unsafe { self.into_slot(<L as Member<T, P>>::INDEX) }
    }

    pub fn get_if_at<const N: usize>(&self) -> Option<&<L as Select<N>>::Output>
    where
        L: Select<N>,
    {
        unsafe { self.slot(N) }
    }

    pub fn get_if_mut_at<const N: usize>(&mut self) -> Option<&mut <L as Select<N>>::Output>
    where
        L: Select<N>,
    {
        unsafe { self.slot_mut(N) }
    }

    pub fn get_at<const N: usize>(&self) -> Result<&<L as Select<N>>::Output>
    where
        L: Select<N>,
    {
        let live = self.type_name();
        self.get_if_at::<N>()
            .ok_or_else(|| VariantError::type_mismatch::<<L as Select<N>>::Output>(live))
    }

    pub fn get_mut_at<const N: usize>(&mut self) -> Result<&mut <L as Select<N>>::Output>
    where
        L: Select<N>,
    {
        let live = self.type_name();
        self.get_if_mut_at::<N>()
            .ok_or_else(|| VariantError::type_mismatch::<<L as Select<N>>::Output>(live))
    }

    pub fn into_inner_at<const N: usize>(self) -> Result<<L as Select<N>>::Output>
    where
        L: Select<N>,
    {
        unsafe { self.into_slot(N) }
    }

    pub fn visit<'a, V>(&'a self, visitor: &mut V) -> V::Output
    where
        V: Visitor,
        L: DispatchRef<'a, V>,
    {
        match self.discriminant {
            None => visitor.empty(),
            Some(index) => {
                invariant(unsafe { L::dispatch_ref(index, self.storage.as_ptr(), visitor) })
            }
        }
    }

    pub fn visit_mut<'a, V>(&'a mut self, visitor: &mut V) -> V::Output
    where
        V: Visitor,
        L: DispatchMut<'a, V>,
    {
        match self.discriminant {
            None => visitor.empty(),
            Some(index) => {
                invariant(unsafe { L::dispatch_mut(index, self.storage.as_mut_ptr(), visitor) })
            }
        }
    }

    pub fn into_visit<V>(mut self, visitor: &mut V) -> V::Output
    where
        V: Visitor,
        L: DispatchOwned<V>,
    {
        match self.discriminant.take() {
            None => visitor.empty(),
            Some(index) => {
                invariant(unsafe { L::dispatch_owned(index, self.storage.as_ptr(), visitor) })
            }
        }
    }

    #[cfg(feature = "serde")]
    pub(crate) fn storage_ptr(&self) -> *const L::Storage {
        self.storage.as_ptr()
    }

    /// Size of the largest alternative. The storage itself may be padded up
    /// to [storage_align](Self::storage_align).
    pub const fn storage_size() -> usize {
        L::MAX_SIZE
    }

    /// Alignment of the shared storage, the strictest among the alternatives
    pub const fn storage_align() -> usize {
        align_of::<L::Storage>()
    }
}

impl<L: AlternativeList> Drop for Variant<L> {
    fn drop(&mut self) {
        self.clear()
    }
}

impl<L: AlternativeList> Default for Variant<L> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<L: CloneAlternatives> Clone for Variant<L> {
    fn clone(&self) -> Self {
        let mut copy = Self::empty();
        if let Some(index) = self.discriminant {
            invariant(unsafe { L::clone_at(index, self.storage.as_ptr(), copy.storage.as_mut_ptr()) });
            copy.discriminant = Some(index);
        }
        copy
    }

    /// Copy-and-swap: if cloning `source` panics, `self` is left untouched
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy)
    }
}

impl<L: DebugAlternatives> Debug for Variant<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.discriminant {
            None => f.write_str("Variant(<empty>)"),
            Some(index) => {
                write!(f, "Variant({index}: ")?;
                invariant(unsafe { L::fmt_at(index, self.storage.as_ptr(), f) })?;
                f.write_str(")")
            }
        }
    }
}

impl<L: PartialEqAlternatives> PartialEq for Variant<L> {
    fn eq(&self, other: &Self) -> bool {
        match (self.discriminant, other.discriminant) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) if lhs == rhs => invariant(unsafe {
                L::eq_at(lhs, self.storage.as_ptr(), other.storage.as_ptr())
            }),
            _ => false,
        }
    }
}

impl<L: EqAlternatives> Eq for Variant<L> {}

impl<L: HashAlternatives> Hash for Variant<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.discriminant.hash(state);
        if let Some(index) = self.discriminant {
            invariant(unsafe { L::hash_at(index, self.storage.as_ptr(), state) })
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    type IntOrString = Variant<(i32, String)>;

    #[test]
    fn construction_picks_the_alternative() {
        assert_eq!(IntOrString::new(3).index(), Some(0));
        assert_eq!(IntOrString::new("a".to_string()).index(), Some(1));
        assert_eq!(IntOrString::convert("a").index(), Some(1));
        assert_eq!(IntOrString::new_at::<1>("a".into()).index(), Some(1));
        assert_eq!(IntOrString::empty().index(), None);
        assert_eq!(IntOrString::LEN, 2);
    }

    #[test]
    fn type_name_follows_the_discriminant() {
        let mut a = IntOrString::new(3);
        assert_eq!(a.type_name(), Some("i32"));
        a.clear();
        assert_eq!(a.type_name(), None);
    }

    #[test]
    fn holds() {
        let a = IntOrString::new(3);
        assert!(a.holds::<i32, _>());
        assert!(!a.holds::<String, _>());
        assert!(a.holds_at::<0>());
        assert!(!a.holds_at::<1>());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut a = IntOrString::convert("Hello");
        a.clear();
        a.clear();
        assert!(a.is_empty());
    }

    #[test]
    fn take_leaves_empty() {
        let mut a = IntOrString::new(4);
        let b = a.take();
        assert!(a.is_empty());
        assert_eq!(b.get::<i32, _>(), Ok(&4));
    }

    #[test]
    fn move_out_of_empty_is_empty() {
        let mut a = IntOrString::empty();
        assert!(a.move_out().is_empty());
        assert!(a.is_empty());
    }

    #[test]
    fn equality_and_hash() {
        let a = IntOrString::new(1);
        assert_eq!(a, IntOrString::new(1));
        assert_ne!(a, IntOrString::new(2));
        assert_ne!(a, IntOrString::empty());
        assert_eq!(IntOrString::empty(), IntOrString::empty());

        let set: HashSet<_> = [
            IntOrString::new(1),
            IntOrString::new(1),
            IntOrString::convert("1"),
            IntOrString::empty(),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn debug() {
        assert_eq!(format!("{:?}", IntOrString::new(3)), "Variant(0: 3)");
        assert_eq!(
            format!("{:?}", IntOrString::convert("Hello")),
            "Variant(1: \"Hello\")"
        );
        assert_eq!(format!("{:?}", IntOrString::empty()), "Variant(<empty>)");
    }
}
