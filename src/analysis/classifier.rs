use crate::hierarchy::ClassHierarchy;
use crate::tree::{LayoutTreeNode, WidgetType};
use tracing::{debug, trace};

const WIDGET_NAMESPACE: &str = "android.widget.";
const BASE_VIEW: &str = "android.view.View";
const VIEW_GROUP: &str = "android.view.ViewGroup";

/// Containers that count as list/adapter views wherever they appear in a chain
const LIST_MARKERS: &[&str] = &[
    "android.widget.AdapterView",
    "androidx.recyclerview.widget.RecyclerView",
    "android.support.v7.widget.RecyclerView",
];

const TOOLBAR_MARKERS: &[&str] = &[
    "android.widget.Toolbar",
    "androidx.appcompat.widget.Toolbar",
    "android.support.v7.widget.Toolbar",
];

/// Assigns a [`WidgetType`] to every node of a layout tree
pub struct WidgetClassifier<'a> {
    hierarchy: &'a dyn ClassHierarchy,
}

impl<'a> WidgetClassifier<'a> {
    pub fn new(hierarchy: &'a dyn ClassHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Classify a whole tree, returning the classified copy.
    ///
    /// Toolbar nodes come back without children. Every node is classified
    /// from its class name, replacing any category it already carries.
    pub fn classify(&self, node: LayoutTreeNode) -> LayoutTreeNode {
        let ancestors = self.hierarchy.ancestor_chain(&node.class_name);
        let widget_type = infer_widget_type(&node.class_name, ancestors.as_deref(), node.children.len());

        let children = if widget_type == WidgetType::Toolbar {
            if node.has_children() {
                debug!(
                    "Pruning {} children of toolbar {}",
                    node.children.len(),
                    node.class_name
                );
            }
            Vec::new()
        } else {
            node.children.into_iter().map(|c| self.classify(c)).collect()
        };

        LayoutTreeNode {
            ancestors,
            widget_type: Some(widget_type),
            children,
            ..node
        }
    }
}

/// Category for a class given its (optional) ancestor chain and child count
pub fn infer_widget_type(class_name: &str, ancestors: Option<&[String]>, child_count: usize) -> WidgetType {
    let recognized = if is_recognized(class_name) {
        Some(class_name)
    } else {
        ancestors.and_then(|chain| chain.iter().map(String::as_str).find(|a| is_recognized(a)))
    };

    let Some(chain) = ancestors else {
        if child_count > 0 {
            trace!("{} unknown to hierarchy but has children", class_name);
            return WidgetType::Layout;
        }
        return recognized.map(map_recognized).unwrap_or(WidgetType::Unclassified);
    };

    if chain.iter().any(|a| a == VIEW_GROUP) {
        return WidgetType::Layout;
    }
    if chain.iter().any(|a| LIST_MARKERS.contains(&a.as_str())) {
        return WidgetType::List;
    }

    match recognized {
        Some(class) => map_recognized(class),
        None => {
            debug!("No framework widget ancestor for {} {:?}", class_name, chain);
            WidgetType::Unclassified
        }
    }
}

fn is_recognized(class_name: &str) -> bool {
    class_name.starts_with(WIDGET_NAMESPACE)
        || class_name == BASE_VIEW
        || LIST_MARKERS.contains(&class_name)
        || TOOLBAR_MARKERS.contains(&class_name)
}

fn map_recognized(class_name: &str) -> WidgetType {
    if TOOLBAR_MARKERS.contains(&class_name) {
        return WidgetType::Toolbar;
    }
    if LIST_MARKERS.contains(&class_name) {
        return WidgetType::List;
    }

    match class_name.strip_prefix(WIDGET_NAMESPACE).unwrap_or("") {
        "TextView" => WidgetType::TextView,
        "ImageView" => WidgetType::ImageView,
        "Button" | "ImageButton" | "CompoundButton" => WidgetType::Button,
        "EditText" | "AutoCompleteTextView" | "MultiAutoCompleteTextView" => WidgetType::EditText,
        "CheckBox" | "CheckedTextView" => WidgetType::CheckBox,
        "RadioButton" => WidgetType::RadioButton,
        "ToggleButton" | "Switch" => WidgetType::Switch,
        "ListView" | "GridView" | "ExpandableListView" | "AbsListView" => WidgetType::List,
        other => {
            trace!("{} has no dedicated category", other);
            WidgetType::Unclassified
        }
    }
}
