use std::{cell::Cell, rc::Rc};

/// makes sure traits are implemented
#[macro_export]
macro_rules! assert_trait {
    ($name:ident; $to_test:ty; $($trait:path),*) => {
        $crate::paste::paste! {
            #[cfg(test)]
            #[allow(dead_code, elided_lifetimes_in_paths)]
            fn [<_$name:snake>]() {
                fn is_implemented<T: ?Sized $(+ $trait)*>() {}
                is_implemented::<$to_test>();
            }
        }
    };
}

/// Shared counters behind a family of [Tracker]s
#[derive(Debug, Default, Clone)]
pub struct Counters {
    drops: Rc<Cell<usize>>,
    clones: Rc<Cell<usize>>,
}

impl Counters {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn tracker(&self, tag: i32) -> Tracker {
        Tracker {
            tag,
            counters: self.clone(),
            panic_on_clone: false,
        }
    }

    /// a [Tracker] whose [Clone] implementation panics
    pub fn panicking_tracker(&self, tag: i32) -> Tracker {
        let mut tracker = self.tracker(tag);
        tracker.panic_on_clone = true;
        tracker
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }
}

/// A value that reports its clones and drops to its [Counters]
#[derive(Debug)]
pub struct Tracker {
    pub tag: i32,
    counters: Counters,
    panic_on_clone: bool,
}

impl Clone for Tracker {
    fn clone(&self) -> Self {
        let clones = &self.counters.clones;
        clones.set(clones.get() + 1);
        if self.panic_on_clone {
            panic!("tracker {} refused to be cloned", self.tag)
        }
        Self {
            tag: self.tag,
            counters: self.counters.clone(),
            panic_on_clone: self.panic_on_clone,
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        let drops = &self.counters.drops;
        drops.set(drops.get() + 1);
    }
}

impl PartialEq for Tracker {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}
