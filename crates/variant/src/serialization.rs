//! `serde` support.
//!
//! A variant is written as an option: nothing when empty, the pair
//! `(index, value)` otherwise. With `serde_json`, `Variant::<(i32, String)>`
//! holding `3` is `[0,3]` and an empty one is `null`.
//!
//! Only built with the `serde` feature, tests included.

use std::{fmt, marker::PhantomData};

use serde::{
    de::{self, SeqAccess, Visitor},
    ser::{SerializeTuple, Serializer},
    Deserialize, Deserializer, Serialize,
};

use crate::{alternatives::AlternativeList, Variant};

pub trait SerializeAlternatives: AlternativeList {
    /// Writes alternative `index` as the next element of `tuple`
    ///
    /// ## Safety
    /// `storage` holds a live alternative `index`
    unsafe fn serialize_at<Tup: SerializeTuple>(
        index: usize,
        storage: *const Self::Storage,
        tuple: &mut Tup,
    ) -> Result<(), Tup::Error>;
}

pub trait DeserializeAlternatives<'de>: AlternativeList {
    /// Reads alternative `index` from the next element of `seq`
    fn deserialize_at<Seq: SeqAccess<'de>>(
        index: usize,
        seq: &mut Seq,
    ) -> Result<Variant<Self>, Seq::Error>;
}

struct Live<'a, L: AlternativeList> {
    index: usize,
    variant: &'a Variant<L>,
}

impl<'a, L: SerializeAlternatives> Serialize for Live<'a, L> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&(self.index as u64))?;
        unsafe { L::serialize_at(self.index, self.variant.storage_ptr(), &mut tuple)? };
        tuple.end()
    }
}

impl<L: SerializeAlternatives> Serialize for Variant<L> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.index() {
            None => serializer.serialize_none(),
            Some(index) => serializer.serialize_some(&Live {
                index,
                variant: self,
            }),
        }
    }
}

struct VariantVisitor<L>(PhantomData<L>);

struct LiveVisitor<L>(PhantomData<L>);

impl<'de, L: DeserializeAlternatives<'de>> Visitor<'de> for VariantVisitor<L> {
    type Value = Variant<L>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "an optional variant of {} alternatives", L::LEN)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Variant::empty())
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        self.visit_none()
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_tuple(2, LiveVisitor(PhantomData))
    }
}

impl<'de, L: DeserializeAlternatives<'de>> Visitor<'de> for LiveVisitor<L> {
    type Value = Variant<L>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a pair of an alternative index and its value")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let index: u64 = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let index = usize::try_from(index).map_err(de::Error::custom)?;
        L::deserialize_at(index, &mut seq)
    }
}

impl<'de, L: DeserializeAlternatives<'de>> Deserialize<'de> for Variant<L> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(VariantVisitor(PhantomData))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    type V = Variant<(i32, String, Option<u8>)>;

    #[test]
    fn to_json() {
        assert_eq!(serde_json::to_string(&V::new(3)).unwrap(), "[0,3]");
        assert_eq!(serde_json::to_string(&V::convert("a")).unwrap(), r#"[1,"a"]"#);
        assert_eq!(serde_json::to_string(&V::new(Some(4u8))).unwrap(), "[2,4]");
        assert_eq!(serde_json::to_string(&V::empty()).unwrap(), "null");
    }

    #[test]
    fn from_json() {
        let v: V = serde_json::from_str(r#"[1,"Hello"]"#).unwrap();
        assert_eq!(v.get_at::<1>().map(String::as_str), Ok("Hello"));

        let v: V = serde_json::from_str("[2,null]").unwrap();
        assert_eq!(v.get_at::<2>(), Ok(&None));

        let v: V = serde_json::from_str("null").unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn rejects_bad_input() {
        let err = serde_json::from_str::<V>("[3,1]").unwrap_err();
        assert!(err.to_string().contains("unable to create alternative 3"));

        assert!(serde_json::from_str::<V>(r#"[0,"three"]"#).is_err());
        assert!(serde_json::from_str::<V>("[0]").is_err());
    }
}
