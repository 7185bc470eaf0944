use std::fmt::{Debug, Display};

/**
 * All elements of the triangulation implement this trait. They are identified
 * by their index.
 */
pub trait Handle {
    /**
     * The index of the element.
     */
    fn index(&self) -> u32;
}

/**
 * Node handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NH {
    idx: u32,
}

/**
 * Triangle handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TH {
    idx: u32,
}

/**
 * Link handle.
 */
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LH {
    idx: u32,
}

macro_rules! impl_handle {
    ($handle:ident, $name:literal) => {
        impl Handle for $handle {
            fn index(&self) -> u32 {
                self.idx
            }
        }

        impl From<u32> for $handle {
            fn from(idx: u32) -> Self {
                $handle { idx }
            }
        }

        impl From<&u32> for $handle {
            fn from(idx: &u32) -> Self {
                $handle { idx: *idx }
            }
        }

        impl Display for $handle {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $name, self.idx)
            }
        }

        impl Debug for $handle {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", $name, self.idx)
            }
        }
    };
}

impl_handle!(NH, "NH");
impl_handle!(TH, "TH");
impl_handle!(LH, "LH");

/// Position of a slot in a store.
pub(crate) fn slot<H: Handle>(h: H) -> usize {
    h.index() as usize
}
