//! Identifier generation: words, casing, keywords and per-table uniqueness.

mod allocator;
mod case;
mod keywords;
mod words;

pub use allocator::{
    same_name, Allocation, NameRegistry, Namespace, TableNames, DEFAULT_COLLISION_BOUND,
};
pub use case::{identifier_for, to_identifier};
pub use keywords::Language;
pub use words::{words, Words};
