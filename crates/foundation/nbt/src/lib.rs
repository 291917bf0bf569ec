//! Named Binary Tag trees: an in-memory model, a quota-bounded big-endian binary codec,
//! a push-style streaming decoder, the SNBT text grammar with three printers, and a
//! generic value-construction adapter.

mod accounter;
mod repr; // Used by tag module
mod settings;
mod tag;
mod tag_type;

#[expect(
    unreachable_pub,
    reason = "nothing in raw is publicly reachable, no need for pub(crate) everywhere",
)]
mod raw;

pub mod io;
pub mod ops;
pub mod print;
pub mod snbt;
pub mod stream;

#[cfg(feature = "serde")]
pub mod serde;


pub use self::accounter::NbtAccounter;
pub use self::repr::*;
pub use self::settings::*;
pub use self::tag::*;
pub use self::tag_type::TagType;
