//! Small utilities without functionality specific to NBT,
//! for small Rust-specific tasks.

mod hex_digits;


pub use self::hex_digits::hex_chars_to_u32;
