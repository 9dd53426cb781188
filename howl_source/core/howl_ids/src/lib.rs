//! Typed handles into a reflection snapshot, plus the stable name hash
//! emitted into generated registration tables.
//! Handles are plain indices minted by the snapshot graph that owns them;
//! the graph is immutable for a run, so there is no slot reuse to guard.

use std::fmt;

/// Stable 64-bit name id (FNV-1a). The Howl runtime computes the same
/// function over member names at load time, so generated tables can
/// register methods by id without shipping the strings.
pub const fn name_id64(s: &str) -> u64 {
    let mut hash: u64 = 0xCBF2_9CE4_8422_2325;
    let bytes = s.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(0x0000_0100_0000_01B3);
        i += 1;
    }

    hash
}

/// Defines an index handle type (ClassId, StructId, ...). All handles are
/// a bare u32 index into the owning snapshot's entity table.
macro_rules! define_handle {
    ($type_name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $type_name(u32);

        impl $type_name {
            #[inline]
            pub const fn new(index: usize) -> Self {
                Self(index as u32)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($type_name), "({})"), self.0)
            }
        }

        impl fmt::Display for $type_name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

define_handle!(ClassId, "Reflected class handle. Index into the snapshot's class table.");
define_handle!(StructId, "Reflected struct handle. Index into the snapshot's struct table.");
define_handle!(EnumId, "Reflected enum handle. Index into the snapshot's enum table.");
define_handle!(
    FunctionId,
    "Reflected function handle. Index into the snapshot's function table."
);
define_handle!(
    PropertyId,
    "Reflected property handle. Index into the snapshot's property table."
);
