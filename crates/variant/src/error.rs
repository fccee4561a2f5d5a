use std::any::type_name;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, VariantError>;

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum VariantError {
    /// The requested alternative is not the live one (or nothing is live)
    #[error("bad variant access: requested `{requested}` but {}", describe_live(.live))]
    TypeMismatch {
        requested: &'static str,
        live: Option<&'static str>,
    },

    /// A per-alternative helper was handed an index outside of the list
    #[error("unable to create alternative {index} of a {len}-alternative variant")]
    ConstructionRejected { index: usize, len: usize },
}

fn describe_live(live: &Option<&'static str>) -> String {
    match live {
        Some(name) => format!("`{name}` is live"),
        None => "the variant is empty".to_string(),
    }
}

impl VariantError {
    pub fn type_mismatch<T>(live: Option<&'static str>) -> Self {
        Self::TypeMismatch {
            requested: type_name::<T>(),
            live,
        }
    }

    pub fn rejected(index: usize, len: usize) -> Self {
        Self::ConstructionRejected { index, len }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            VariantError::type_mismatch::<i32>(None).to_string(),
            "bad variant access: requested `i32` but the variant is empty"
        );
        assert_eq!(
            VariantError::type_mismatch::<u8>(Some("alloc::string::String")).to_string(),
            "bad variant access: requested `u8` but `alloc::string::String` is live"
        );
        assert_eq!(
            VariantError::rejected(4, 2).to_string(),
            "unable to create alternative 4 of a 2-alternative variant"
        );
    }
}
