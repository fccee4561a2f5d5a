//! A type-safe tagged union over a closed list of alternative types.
//!
//! [Variant] holds at most one value of one of the types in a tuple, stored
//! inline. See [Variant] for construction and assignment, [access] for the
//! accessors and [visit] for visitor dispatch.
//!
//! The `serde` feature adds `Serialize`/`Deserialize` for [Variant]. Its tests
//! are compiled only with the feature on: `cargo test --features serde`.

// the `#[visitor]` attribute expands to `::variant::...` paths
extern crate self as variant;

pub mod access;
pub mod alternatives;
mod container;
mod error;
#[cfg(feature = "serde")]
pub mod serialization;
pub mod visit;

pub use access::{
    get, get_at, get_if, get_if_at, get_if_mut, get_if_mut_at, get_mut, get_mut_at, into_inner,
    into_inner_at,
};
pub use alternatives::{AlternativeList, Convertible, Member, Select, MAX_ALTERNATIVES};
pub use container::Variant;
pub use error::{Result, VariantError};
pub use variant_macros::visitor;
pub use visit::{apply_visitor, Visit, Visitable, Visitor};


#[cfg(test)]
pub(crate) fn init_logger() {
    use std::io::Write;

    let _ = env_logger::Builder::new()
        .format(|buf, record| {
            let str = record.args().to_string().replace("\n", "\n\t");
            writeln!(
                buf,
                "[{}] in {}:{}\n\t{}",
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                str
            )
        })
        .parse_default_env()
        .is_test(true)
        .try_init();
}
