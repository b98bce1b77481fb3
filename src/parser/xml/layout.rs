use crate::tree::{LayoutTreeNode, NodeId, NodeRegistry};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Reasons a whole layout document could not be built
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("failed to read layout {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed layout {}: {source}", path.display())]
    Xml {
        path: PathBuf,
        source: quick_xml::Error,
    },
    #[error("malformed layout {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
    #[error("include cycle through {}", path.display())]
    IncludeCycle { path: PathBuf },
}

/// Tree and node registry produced by one top-level build
#[derive(Debug, Default)]
pub struct BuiltLayout {
    pub root: Option<LayoutTreeNode>,
    pub registry: NodeRegistry,
}

/// Tags whose subtrees are not turned into nodes
const UNSUPPORTED_TAGS: &[&str] = &["view", "merge", "fragment"];

/// Builds layout trees from decoded layout XML, expanding `<include>` tags
pub struct LayoutTreeBuilder;

/// Per-build state: node id allocation and the documents currently being built
struct BuildContext {
    next_id: u32,
    active: Vec<PathBuf>,
}

impl BuildContext {
    fn new() -> Self {
        Self {
            next_id: 0,
            active: Vec::new(),
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }
}

enum Frame {
    Widget(LayoutTreeNode),
    Skipped,
}

enum Resolved {
    Widget(LayoutTreeNode),
    Included(Option<BuiltLayout>),
    Unsupported,
}

/// Open-element stack for one document
struct DocumentState {
    stack: Vec<Frame>,
    root: Option<LayoutTreeNode>,
    root_closed: bool,
    registry: NodeRegistry,
}

impl DocumentState {
    fn new() -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            root_closed: false,
            registry: NodeRegistry::new(),
        }
    }

    fn inside_skipped(&self) -> bool {
        matches!(self.stack.last(), Some(Frame::Skipped))
    }

    fn at_top_level(&self) -> bool {
        self.stack.is_empty()
    }

    /// Attach a finished subtree to the open parent, or make it the root
    fn attach(&mut self, node: Option<LayoutTreeNode>) {
        match self.stack.last_mut() {
            Some(Frame::Widget(parent)) => {
                if let Some(node) = node {
                    parent.add_child(node);
                }
            }
            Some(Frame::Skipped) => {}
            None => {
                self.root = node;
                self.root_closed = true;
            }
        }
    }

    fn finish_widget(&mut self, node: LayoutTreeNode) {
        self.registry.insert(node.id);
        self.attach(Some(node));
    }

    fn absorb_include(&mut self, included: Option<BuiltLayout>) {
        match included {
            Some(built) => {
                self.registry.merge(built.registry);
                self.attach(built.root);
            }
            None => self.attach(None),
        }
    }
}

impl LayoutTreeBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the layout tree for the document at `path`
    pub fn build(&self, path: &Path) -> Result<BuiltLayout, LayoutError> {
        let mut ctx = BuildContext::new();
        self.build_nested(path, &mut ctx)
    }

    /// Build from already-loaded contents; includes resolve relative to `path`
    pub fn build_from_str(&self, path: &Path, contents: &str) -> Result<BuiltLayout, LayoutError> {
        let mut ctx = BuildContext::new();
        ctx.active.push(active_key(path));
        self.build_document(path, contents, &mut ctx)
    }

    fn build_nested(&self, path: &Path, ctx: &mut BuildContext) -> Result<BuiltLayout, LayoutError> {
        let key = active_key(path);
        if ctx.active.contains(&key) {
            return Err(LayoutError::IncludeCycle {
                path: path.to_path_buf(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        ctx.active.push(key);
        let result = self.build_document(path, &contents, ctx);
        ctx.active.pop();
        result
    }

    fn build_document(
        &self,
        path: &Path,
        contents: &str,
        ctx: &mut BuildContext,
    ) -> Result<BuiltLayout, LayoutError> {
        let mut reader = Reader::from_str(contents);
        reader.trim_text(true);

        let mut state = DocumentState::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    self.check_single_root(path, &state)?;
                    if state.inside_skipped() {
                        state.stack.push(Frame::Skipped);
                    } else {
                        match self.resolve_element(path, e, ctx) {
                            Resolved::Widget(node) => state.stack.push(Frame::Widget(node)),
                            Resolved::Included(included) => {
                                state.absorb_include(included);
                                state.stack.push(Frame::Skipped);
                            }
                            Resolved::Unsupported => state.stack.push(Frame::Skipped),
                        }
                    }
                }
                Ok(Event::Empty(ref e)) => {
                    self.check_single_root(path, &state)?;
                    if !state.inside_skipped() {
                        match self.resolve_element(path, e, ctx) {
                            Resolved::Widget(node) => state.finish_widget(node),
                            Resolved::Included(included) => state.absorb_include(included),
                            Resolved::Unsupported => state.attach(None),
                        }
                    }
                }
                Ok(Event::End(_)) => match state.stack.pop() {
                    Some(Frame::Widget(node)) => state.finish_widget(node),
                    Some(Frame::Skipped) => {
                        if state.at_top_level() {
                            state.root_closed = true;
                        }
                    }
                    None => {
                        return Err(LayoutError::Malformed {
                            path: path.to_path_buf(),
                            reason: "closing tag without an open element".to_string(),
                        })
                    }
                },
                Ok(Event::Eof) => break,
                Err(source) => {
                    return Err(LayoutError::Xml {
                        path: path.to_path_buf(),
                        source,
                    })
                }
                _ => {}
            }
            buf.clear();
        }

        if !state.stack.is_empty() {
            return Err(LayoutError::Malformed {
                path: path.to_path_buf(),
                reason: format!("{} unclosed element(s) at end of document", state.stack.len()),
            });
        }
        if !state.root_closed {
            return Err(LayoutError::Malformed {
                path: path.to_path_buf(),
                reason: "no root element".to_string(),
            });
        }

        debug!(
            "Built layout {}: {} nodes",
            path.display(),
            state.registry.len()
        );

        Ok(BuiltLayout {
            root: state.root,
            registry: state.registry,
        })
    }

    fn check_single_root(&self, path: &Path, state: &DocumentState) -> Result<(), LayoutError> {
        if state.at_top_level() && state.root_closed {
            return Err(LayoutError::Malformed {
                path: path.to_path_buf(),
                reason: "more than one root element".to_string(),
            });
        }
        Ok(())
    }

    fn resolve_element(&self, path: &Path, e: &BytesStart, ctx: &mut BuildContext) -> Resolved {
        let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();

        if tag_name == "include" {
            return Resolved::Included(self.resolve_include(path, e, ctx));
        }

        if UNSUPPORTED_TAGS.contains(&tag_name.as_str()) {
            warn!(
                "Skipping unsupported <{}> subtree in {}",
                tag_name,
                path.display()
            );
            return Resolved::Unsupported;
        }

        let mut node = LayoutTreeNode::new(ctx.allocate(), infer_class_name(&tag_name));

        for attr in e.attributes().filter_map(|a| a.ok()) {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let (prefix, local) = split_key(&key);

            match local {
                "id" => {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match (prefix, value.strip_prefix("@id/")) {
                        (Some("android"), Some(name)) => node.view_id = Some(name.to_string()),
                        _ => warn!(
                            "Unrecognized id attribute {}=\"{}\" in {}",
                            key,
                            value,
                            path.display()
                        ),
                    }
                }
                "onClick" => node.clickable = true,
                _ => {}
            }
        }

        trace!("<{}> -> {}", tag_name, node.class_name);
        Resolved::Widget(node)
    }

    /// Build the document named by `layout="@layout/<name>"`, failing only this branch
    fn resolve_include(&self, path: &Path, e: &BytesStart, ctx: &mut BuildContext) -> Option<BuiltLayout> {
        let value = e
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == b"layout")
            .map(|a| String::from_utf8_lossy(&a.value).to_string());

        let Some(value) = value else {
            warn!("<include> without a layout attribute in {}", path.display());
            return None;
        };

        let Some(name) = value.strip_prefix("@layout/") else {
            warn!(
                "Unhandled <include> layout attribute \"{}\" in {}",
                value,
                path.display()
            );
            return None;
        };

        let target = path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(format!("{}.xml", name));

        match self.build_nested(&target, ctx) {
            Ok(built) => {
                debug!("<include> resolved to {}", target.display());
                Some(built)
            }
            Err(e) => {
                warn!("Dropping <include> branch in {}: {}", path.display(), e);
                None
            }
        }
    }
}

impl Default for LayoutTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a layout tag to the fully qualified class it instantiates
pub fn infer_class_name(tag: &str) -> String {
    if tag.contains('.') {
        return tag.to_string();
    }

    let package = match tag {
        "View" | "SurfaceView" | "TextureView" => "android.view",
        "WebView" => "android.webkit",
        "ActivityView" => "android.app",
        _ => "android.widget",
    };
    format!("{}.{}", package, tag)
}

fn split_key(key: &str) -> (Option<&str>, &str) {
    match key.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, key),
    }
}

fn active_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
