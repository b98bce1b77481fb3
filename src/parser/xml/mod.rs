//! Decoded Android layout XML

mod layout;

pub use layout::{infer_class_name, BuiltLayout, LayoutError, LayoutTreeBuilder};
