//! Route handlers. Each returns an HTML fragment for HTMX to swap.

pub mod quiz;
pub mod render;
pub mod util;
