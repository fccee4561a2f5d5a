//! Free-standing accessors.
//!
//! The `*_if*` forms return `None` when the requested alternative is not the
//! live one. The others return [TypeMismatch] instead.
//!
//! ```
//! use variant::{get, get_if_at, Variant};
//!
//! let v = Variant::<(i32, String)>::convert("Hello");
//! assert_eq!(get::<String, _>(&v).map(String::as_str), Ok("Hello"));
//! assert_eq!(get_if_at::<0, _>(&v), None);
//! ```
//!
//! Positions past the end of the list do not compile:
//!
//! ```compile_fail
//! # use variant::{get_at, Variant};
//! let v = Variant::<(i32, String)>::new(1);
//! let _ = get_at::<2, _>(&v);
//! ```
//!
//! [TypeMismatch]: crate::VariantError::TypeMismatch

use utils::tag::Position;

use crate::{
    alternatives::{Member, Select},
    error::Result,
    Variant,
};

pub fn get_if<T, P: Position>(variant: &Variant<impl Member<T, P>>) -> Option<&T> {
    variant.get_if::<T, P>()
}

pub fn get_if_mut<T, P: Position>(variant: &mut Variant<impl Member<T, P>>) -> Option<&mut T> {
    variant.get_if_mut::<T, P>()
}

pub fn get<T, P: Position>(variant: &Variant<impl Member<T, P>>) -> Result<&T> {
    variant.get::<T, P>()
}

pub fn get_mut<T, P: Position>(variant: &mut Variant<impl Member<T, P>>) -> Result<&mut T> {
    variant.get_mut::<T, P>()
}

pub fn into_inner<T, P: Position>(variant: Variant<impl Member<T, P>>) -> Result<T> {
    variant.into_inner::<T, P>()
}

pub fn get_if_at<const N: usize, L: Select<N>>(
    variant: &Variant<L>,
) -> Option<&<L as Select<N>>::Output> {
    variant.get_if_at::<N>()
}

pub fn get_if_mut_at<const N: usize, L: Select<N>>(
    variant: &mut Variant<L>,
) -> Option<&mut <L as Select<N>>::Output> {
    variant.get_if_mut_at::<N>()
}

pub fn get_at<const N: usize, L: Select<N>>(
    variant: &Variant<L>,
) -> Result<&<L as Select<N>>::Output> {
    variant.get_at::<N>()
}

pub fn get_mut_at<const N: usize, L: Select<N>>(
    variant: &mut Variant<L>,
) -> Result<&mut <L as Select<N>>::Output> {
    variant.get_mut_at::<N>()
}

pub fn into_inner_at<const N: usize, L: Select<N>>(
    variant: Variant<L>,
) -> Result<<L as Select<N>>::Output> {
    variant.into_inner_at::<N>()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::VariantError;

    type V = Variant<(i32, String)>;

    #[test]
    fn all_forms_agree() {
        let mut v = V::new(7);
        assert_eq!(get_if::<i32, _>(&v), Some(&7));
        assert_eq!(get_if_at::<0, _>(&v), Some(&7));
        assert_eq!(get::<i32, _>(&v), Ok(&7));
        assert_eq!(get_at::<0, _>(&v), Ok(&7));

        *get_mut::<i32, _>(&mut v).unwrap() += 1;
        *get_if_mut_at::<0, _>(&mut v).unwrap() += 1;
        assert_eq!(get_mut_at::<0, _>(&mut v), Ok(&mut 9));
        assert_eq!(get_if_mut::<i32, _>(&mut v), Some(&mut 9));

        assert_eq!(into_inner::<i32, _>(v.clone()), Ok(9));
        assert_eq!(into_inner_at::<0, _>(v), Ok(9));
    }

    #[test]
    fn wrong_alternative() {
        let mut v = V::new(7);
        assert_eq!(get_if::<String, _>(&v), None);
        assert_eq!(get_if_mut_at::<1, _>(&mut v), None);
        assert_eq!(
            get::<String, _>(&v),
            Err(VariantError::type_mismatch::<String>(Some("i32")))
        );
        assert!(matches!(
            into_inner_at::<1, _>(v),
            Err(VariantError::TypeMismatch { live: Some("i32"), .. })
        ));
    }

    #[test]
    fn empty_fails_every_form() {
        let mut v = V::empty();
        assert_eq!(get_if::<i32, _>(&v), None);
        assert_eq!(get_if_at::<1, _>(&v), None);
        assert_eq!(
            get_mut::<i32, _>(&mut v),
            Err(VariantError::type_mismatch::<i32>(None))
        );
        assert_eq!(
            into_inner::<String, _>(v),
            Err(VariantError::type_mismatch::<String>(None))
        );
    }
}
