//! Arena indexes
//!
//! Every cross-node link (aggregate pointer, edge peer, DTO edge, governing
//! model, attached method) is one of these indexes into the owning graph's
//! node table.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub(crate) fn from_index(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

arena_id!(
    /// Index of a `DomainModelNode` in the model graph
    ModelId,
    "model"
);
arena_id!(
    /// Index of an `EnumerationNode` in the model graph
    EnumerationId,
    "enum"
);
arena_id!(
    /// Index of a `DtoNode` in the DTO graph
    DtoId,
    "dto"
);
arena_id!(
    /// Index of a `UseCaseNode` in the use-case plan
    UseCaseId,
    "use_case"
);
arena_id!(
    /// Index of a `QueryProviderMethod` in the method catalogue
    MethodId,
    "method"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_and_display() {
        let id = ModelId::from_index(7);
        assert_eq!(id.index(), 7);
        assert_eq!(id.to_string(), "model#7");
        assert!(DtoId::from_index(1) < DtoId::from_index(2));
    }
}
