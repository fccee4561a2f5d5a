use std::{
    any::type_name,
    fmt,
    hash::{Hash, Hasher},
    mem::{self, ManuallyDrop},
    ptr,
};

use utils::tag::{P0, P1, P10, P11, P2, P3, P4, P5, P6, P7, P8, P9};

use super::{
    AlternativeList, CloneAlternatives, Convertible, DebugAlternatives, DefaultAlternatives,
    EqAlternatives, HashAlternatives, Member, PartialEqAlternatives, Select,
};
use crate::{
    error::{Result, VariantError},
    visit::{DispatchMut, DispatchOwned, DispatchRef, Visit, Visitor},
};

#[cfg(feature = "serde")]
use crate::{
    serialization::{DeserializeAlternatives, SerializeAlternatives},
    Variant,
};

macro_rules! alternatives {
    // workaround for macro repetition limitations: the whole list travels as
    // a single tt so that it can be repeated once per position
    (@positions $all:tt; $($idx:tt => $t:ident @ $pos:ident),+) => {
        $(alternatives!(@position $all; $idx => $t @ $pos);)+
    };
    (@position [$($all:ident),+]; $idx:tt => $t:ident @ $pos:ident) => {
        unsafe impl<$($all),+> Select<$idx> for ($($all,)+) {
            type Output = $t;
        }

        unsafe impl<$($all),+> Member<$t, $pos> for ($($all,)+) {}

        unsafe impl<Src, $($all),+> Convertible<Src, $pos> for ($($all,)+)
        where
            Src: Into<$t>,
        {
            type Target = $t;

            fn convert(value: Src) -> $t {
                value.into()
            }
        }
    };
    ($len:tt; $($idx:tt => $t:ident @ $pos:ident),+) => {
        paste::paste! {
            /// Storage shared by the alternatives of a tuple
            #[repr(C)]
            #[allow(dead_code)]
            pub union [<Union $len>]<$($t),+> {
                $([<$t:lower>]: ManuallyDrop<$t>,)+
            }

            unsafe impl<$($t),+> AlternativeList for ($($t,)+) {
                type Storage = [<Union $len>]<$($t),+>;
                const LEN: usize = $len;
                const MAX_SIZE: usize = {
                    let mut max = 0;
                    $(if mem::size_of::<$t>() > max {
                        max = mem::size_of::<$t>();
                    })+
                    max
                };

                fn type_name_at(index: usize) -> Option<&'static str> {
                    match index {
                        $($idx => Some(type_name::<$t>()),)+
                        _ => None,
                    }
                }

                unsafe fn drop_at(index: usize, storage: *mut Self::Storage) -> Result<()> {
                    match index {
                        $($idx => ptr::drop_in_place(storage.cast::<$t>()),)+
                        _ => return Err(VariantError::rejected(index, $len)),
                    }
                    Ok(())
                }
            }
        }

        alternatives!(@positions [$($t),+]; $($idx => $t @ $pos),+);

        unsafe impl<$($t: Clone),+> CloneAlternatives for ($($t,)+) {
            unsafe fn clone_at(
                index: usize,
                src: *const Self::Storage,
                dst: *mut Self::Storage,
            ) -> Result<()> {
                match index {
                    $($idx => dst.cast::<$t>().write((*src.cast::<$t>()).clone()),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                }
                Ok(())
            }
        }

        unsafe impl<$($t: Default),+> DefaultAlternatives for ($($t,)+) {
            unsafe fn take_at(
                index: usize,
                src: *mut Self::Storage,
                dst: *mut Self::Storage,
            ) -> Result<()> {
                match index {
                    $($idx => dst.cast::<$t>().write(mem::take(&mut *src.cast::<$t>())),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                }
                Ok(())
            }
        }

        impl<$($t: fmt::Debug),+> DebugAlternatives for ($($t,)+) {
            unsafe fn fmt_at(
                index: usize,
                storage: *const Self::Storage,
                f: &mut fmt::Formatter<'_>,
            ) -> Result<fmt::Result> {
                Ok(match index {
                    $($idx => fmt::Debug::fmt(&*storage.cast::<$t>(), f),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                })
            }
        }

        impl<$($t: PartialEq),+> PartialEqAlternatives for ($($t,)+) {
            unsafe fn eq_at(
                index: usize,
                lhs: *const Self::Storage,
                rhs: *const Self::Storage,
            ) -> Result<bool> {
                Ok(match index {
                    $($idx => *lhs.cast::<$t>() == *rhs.cast::<$t>(),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                })
            }
        }

        impl<$($t: Eq),+> EqAlternatives for ($($t,)+) {}

        impl<$($t: Hash),+> HashAlternatives for ($($t,)+) {
            unsafe fn hash_at<St: Hasher>(
                index: usize,
                storage: *const Self::Storage,
                state: &mut St,
            ) -> Result<()> {
                match index {
                    $($idx => Hash::hash(&*storage.cast::<$t>(), state),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                }
                Ok(())
            }
        }

        unsafe impl<'a, V, $($t: 'a),+> DispatchRef<'a, V> for ($($t,)+)
        where
            V: Visitor $(+ Visit<&'a $t>)+,
        {
            unsafe fn dispatch_ref(
                index: usize,
                storage: *const Self::Storage,
                visitor: &mut V,
            ) -> Result<V::Output> {
                Ok(match index {
                    $($idx => <V as Visit<&'a $t>>::visit(visitor, &*storage.cast::<$t>()),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                })
            }
        }

        unsafe impl<'a, V, $($t: 'a),+> DispatchMut<'a, V> for ($($t,)+)
        where
            V: Visitor $(+ Visit<&'a mut $t>)+,
        {
            unsafe fn dispatch_mut(
                index: usize,
                storage: *mut Self::Storage,
                visitor: &mut V,
            ) -> Result<V::Output> {
                Ok(match index {
                    $($idx => <V as Visit<&'a mut $t>>::visit(visitor, &mut *storage.cast::<$t>()),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                })
            }
        }

        unsafe impl<V, $($t),+> DispatchOwned<V> for ($($t,)+)
        where
            V: Visitor $(+ Visit<$t>)+,
        {
            unsafe fn dispatch_owned(
                index: usize,
                storage: *const Self::Storage,
                visitor: &mut V,
            ) -> Result<V::Output> {
                Ok(match index {
                    $($idx => <V as Visit<$t>>::visit(visitor, storage.cast::<$t>().read()),)+
                    _ => return Err(VariantError::rejected(index, $len)),
                })
            }
        }

        #[cfg(feature = "serde")]
        impl<$($t: serde::Serialize),+> SerializeAlternatives for ($($t,)+) {
            unsafe fn serialize_at<Tup: serde::ser::SerializeTuple>(
                index: usize,
                storage: *const Self::Storage,
                tuple: &mut Tup,
            ) -> std::result::Result<(), Tup::Error> {
                match index {
                    $($idx => tuple.serialize_element(&*storage.cast::<$t>()),)+
                    _ => Err(serde::ser::Error::custom(VariantError::rejected(index, $len))),
                }
            }
        }

        #[cfg(feature = "serde")]
        impl<'de, $($t: serde::Deserialize<'de>),+> DeserializeAlternatives<'de> for ($($t,)+) {
            fn deserialize_at<Seq: serde::de::SeqAccess<'de>>(
                index: usize,
                seq: &mut Seq,
            ) -> std::result::Result<Variant<Self>, Seq::Error> {
                match index {
                    $($idx => {
                        let value: $t = seq
                            .next_element()?
                            .ok_or_else(|| serde::de::Error::invalid_length(1, &"an alternative"))?;
                        Ok(Variant::<Self>::new_at::<$idx>(value))
                    })+
                    _ => Err(serde::de::Error::custom(VariantError::rejected(index, $len))),
                }
            }
        }
    };
}

alternatives!(1; 0 => A @ P0);
alternatives!(2; 0 => A @ P0, 1 => B @ P1);
alternatives!(3; 0 => A @ P0, 1 => B @ P1, 2 => C @ P2);
alternatives!(4; 0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3);
alternatives!(5; 0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4);
alternatives!(6; 0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4, 5 => F @ P5);
alternatives!(7;
    0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4, 5 => F @ P5, 6 => G @ P6
);
alternatives!(8;
    0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4, 5 => F @ P5, 6 => G @ P6,
    7 => H @ P7
);
alternatives!(9;
    0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4, 5 => F @ P5, 6 => G @ P6,
    7 => H @ P7, 8 => I @ P8
);
alternatives!(10;
    0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4, 5 => F @ P5, 6 => G @ P6,
    7 => H @ P7, 8 => I @ P8, 9 => J @ P9
);
alternatives!(11;
    0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4, 5 => F @ P5, 6 => G @ P6,
    7 => H @ P7, 8 => I @ P8, 9 => J @ P9, 10 => K @ P10
);
alternatives!(12;
    0 => A @ P0, 1 => B @ P1, 2 => C @ P2, 3 => D @ P3, 4 => E @ P4, 5 => F @ P5, 6 => G @ P6,
    7 => H @ P7, 8 => I @ P8, 9 => J @ P9, 10 => K @ P10, 11 => L @ P11
);

#[cfg(test)]
mod test {
    use std::mem::{align_of, size_of};

    use super::*;

    #[test]
    fn storage_fits_the_worst_case() {
        type L = (u8, u64, [u8; 13]);
        type S = <L as AlternativeList>::Storage;
        assert_eq!(align_of::<S>(), align_of::<u64>());
        assert!(size_of::<S>() >= L::MAX_SIZE);
        assert_eq!(L::MAX_SIZE, 13);
        assert_eq!(L::LEN, 3);
    }

    #[test]
    fn positions() {
        type L = (i32, String, Vec<u8>);
        assert_eq!(<L as Member<i32, _>>::INDEX, 0);
        assert_eq!(<L as Member<String, _>>::INDEX, 1);
        assert_eq!(<L as Member<Vec<u8>, _>>::INDEX, 2);

        type M = (i32, String);
        assert_eq!(<M as Convertible<&str, _>>::INDEX, 1);
    }

    #[test]
    fn names() {
        type L = (i32, String);
        assert_eq!(L::type_name_at(0), Some("i32"));
        assert_eq!(L::type_name_at(1), Some(type_name::<String>()));
        assert_eq!(L::type_name_at(2), None);
    }

    #[test]
    fn out_of_range_helpers_are_rejected() {
        type L = (i32, String);
        let mut storage = mem::MaybeUninit::<<L as AlternativeList>::Storage>::uninit();
        let rejected = unsafe { L::drop_at(2, storage.as_mut_ptr()) };
        assert_eq!(rejected, Err(VariantError::rejected(2, 2)));

        let mut copy = mem::MaybeUninit::<<L as AlternativeList>::Storage>::uninit();
        let rejected = unsafe { L::clone_at(7, storage.as_ptr(), copy.as_mut_ptr()) };
        assert_eq!(rejected, Err(VariantError::rejected(7, 2)));
    }
}
