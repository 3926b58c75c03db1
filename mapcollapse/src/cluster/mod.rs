//! The collapsing pipeline: precision ladder, grouping keys and the builder.

mod builder;
pub use builder::*;

mod precision;
