pub mod tag;
pub mod test_utils;
pub mod traits;

#[doc(hidden)]
pub use paste;
