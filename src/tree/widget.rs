use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic category assigned to every layout node by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetType {
    Unclassified,
    Layout,
    TextView,
    ImageView,
    Button,
    EditText,
    CheckBox,
    RadioButton,
    Switch,
    List,
    Toolbar,
}

impl WidgetType {
    /// Every category, in declaration order
    pub const ALL: [WidgetType; 11] = [
        WidgetType::Unclassified,
        WidgetType::Layout,
        WidgetType::TextView,
        WidgetType::ImageView,
        WidgetType::Button,
        WidgetType::EditText,
        WidgetType::CheckBox,
        WidgetType::RadioButton,
        WidgetType::Switch,
        WidgetType::List,
        WidgetType::Toolbar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::Unclassified => "Unclassified",
            WidgetType::Layout => "Layout",
            WidgetType::TextView => "TextView",
            WidgetType::ImageView => "ImageView",
            WidgetType::Button => "Button",
            WidgetType::EditText => "EditText",
            WidgetType::CheckBox => "CheckBox",
            WidgetType::RadioButton => "RadioButton",
            WidgetType::Switch => "Switch",
            WidgetType::List => "List",
            WidgetType::Toolbar => "Toolbar",
        }
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetType::ALL
            .iter()
            .copied()
            .find(|w| w.as_str() == s)
            .ok_or_else(|| format!("unknown widget type: {}", s))
    }
}
