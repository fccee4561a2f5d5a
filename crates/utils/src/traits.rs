use std::{error::Error, fmt::Display};

/// `unwrap`/`expect` that panic with the [Display] form of the error rather
/// than its [Debug](std::fmt::Debug) form
pub trait NicerError {
    type Out;
    fn unwrap_display(self) -> Self::Out;
    fn expect_display<F, D>(self, msg: F) -> Self::Out
    where
        F: FnOnce() -> D,
        D: Display;
}

impl<T, E> NicerError for Result<T, E>
where
    E: Error,
{
    type Out = T;

    fn unwrap_display(self) -> Self::Out {
        match self {
            Ok(o) => o,
            Err(err) => panic!("{err}"),
        }
    }

    fn expect_display<F, D>(self, msg: F) -> Self::Out
    where
        F: FnOnce() -> D,
        D: Display,
    {
        match self {
            Ok(o) => o,
            Err(err) => panic!("{}: {err}", msg()),
        }
    }
}

#[cfg(test)]
mod test {
    use std::fmt;

    use super::NicerError;

    #[derive(Debug)]
    struct Oops;

    impl fmt::Display for Oops {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("oops")
        }
    }

    impl std::error::Error for Oops {}

    #[test]
    fn ok_passes_through() {
        assert_eq!(Ok::<_, Oops>(3).unwrap_display(), 3);
        assert_eq!(Ok::<_, Oops>(4).expect_display(|| "never shown"), 4);
    }

    #[test]
    #[should_panic(expected = "context: oops")]
    fn expect_display_formats_both() {
        Err::<(), _>(Oops).expect_display(|| "context");
    }
}
