//! Semantic analysis over layout trees and compiled code

mod classifier;
pub mod resources;

pub use classifier::{infer_widget_type, WidgetClassifier};
pub use resources::{ResourceUsage, ResourceUsageScanner};
