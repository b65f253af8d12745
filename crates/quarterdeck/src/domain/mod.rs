//! Domain logic above the storage engines.

pub mod routing;

pub use routing::{infer_context, Context, Specialist};
