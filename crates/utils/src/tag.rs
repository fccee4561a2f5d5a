//! Type-level positions.
//!
//! A position is a Peano number living in the type system. Traits that are
//! implemented once per element of a type list take a position as an extra
//! parameter, so that impls for different elements never overlap even when the
//! elements themselves are the same type. The compiler then picks the position
//! by inference, and refuses to when several positions fit.

use core::marker::PhantomData;

/// Position `0`
pub struct Here;

/// The position right after `P`
pub struct There<P>(PhantomData<P>);

pub trait Position {
    const VALUE: usize;
}

impl Position for Here {
    const VALUE: usize = 0;
}

impl<P: Position> Position for There<P> {
    const VALUE: usize = 1 + P::VALUE;
}

pub type P0 = Here;
pub type P1 = There<P0>;
pub type P2 = There<P1>;
pub type P3 = There<P2>;
pub type P4 = There<P3>;
pub type P5 = There<P4>;
pub type P6 = There<P5>;
pub type P7 = There<P6>;
pub type P8 = There<P7>;
pub type P9 = There<P8>;
pub type P10 = There<P9>;
pub type P11 = There<P10>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn values() {
        assert_eq!(P0::VALUE, 0);
        assert_eq!(P1::VALUE, 1);
        assert_eq!(P7::VALUE, 7);
        assert_eq!(P11::VALUE, 11);
    }
}
