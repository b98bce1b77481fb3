//! layoutseq - Widget token sequences from decoded Android layouts
//!
//! This library turns the layout XML of an apktool-decoded application into
//! bracketed sequences of widget categories, one per layout document.
//!
//! # Architecture
//!
//! The pipeline consists of:
//! 1. **Discovery** - Find layout documents and smali directories
//! 2. **Tree Building** - Parse layout XML into trees, expanding `<include>`
//! 3. **Classification** - Map each node onto a widget category using the class hierarchy
//! 4. **Serialization** - Emit pre-order `Type { children }` token sequences
//! 5. **Resource Usage** - Find the layouts passed to `setContentView` in smali code
//! 6. **Reporting** - Label rows by file name and write the token list

pub mod analysis;
pub mod bytecode;
pub mod config;
pub mod discovery;
pub mod hierarchy;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod tokens;
pub mod tree;

pub use analysis::{infer_widget_type, ResourceUsage, ResourceUsageScanner, WidgetClassifier};
pub use bytecode::BytecodeSource;
pub use config::Config;
pub use discovery::{FileFinder, LayoutFile};
pub use hierarchy::{ClassHierarchy, HierarchyTable};
pub use parser::{LayoutError, LayoutTreeBuilder, SmaliProgram};
pub use pipeline::{BatchProcessor, BatchStats, LayoutTokenizer};
pub use report::{FileLabeler, LayoutCategory, TokenListWriter, TokenRecord};
pub use tokens::Token;
pub use tree::{LayoutTreeNode, NodeId, NodeRegistry, WidgetType};
