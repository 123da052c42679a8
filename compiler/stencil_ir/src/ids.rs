//! Registry handles.
//!
//! AST nodes do not own operator or tag definitions; they carry an index
//! into the registry that produced them. The registries live in `stencilc`
//! and stay immutable for the whole compilation, so an id is valid for as
//! long as the tree it appears in.

use std::fmt;

macro_rules! registry_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

registry_id!(
    /// Index into the operator registry.
    OperatorId
);
registry_id!(
    /// Index into the tag registry.
    TagId
);
registry_id!(
    /// Index into the function registry.
    FunctionId
);
