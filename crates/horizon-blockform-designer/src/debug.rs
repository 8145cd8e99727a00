//! Text dumps of a mock tree.
//!
//! ```
//! use std::sync::Arc;
//! use horizon_blockform_core::{BlockformConfig, ComponentCatalog, ComponentType};
//! use horizon_blockform_designer::debug::{MockTreeDebug, TreeFormatOptions, TreeStyle};
//! use horizon_blockform_designer::{AcceptanceTable, DragSource, MockTree};
//!
//! let mut tree = MockTree::new(
//!     Arc::new(ComponentCatalog::standard()),
//!     Arc::new(AcceptanceTable::standard()),
//!     &BlockformConfig::default(),
//! ).unwrap();
//! let menu = tree.drop_source(tree.root(), DragSource::Palette(ComponentType::MENU), None).unwrap();
//! tree.drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None).unwrap();
//!
//! let debug = MockTreeDebug::with_options(TreeFormatOptions::default().style(TreeStyle::Ascii));
//! assert_eq!(
//!     debug.format(&tree),
//!     "Screen1 (Form)\n`-- Menu1 (Menu) [closed]\n    `-- MenuItem1 (MenuItem)\n"
//! );
//! ```

use horizon_blockform_core::ComponentId;

use crate::tree::MockTree;

/// Connector glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// `|--` and `` `-- ``.
    Ascii,
    /// Box-drawing characters.
    #[default]
    Unicode,
}

impl TreeStyle {
    fn glyphs(self) -> (&'static str, &'static str, &'static str) {
        match self {
            Self::Ascii => ("|   ", "|-- ", "`-- "),
            Self::Unicode => ("\u{2502}   ", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
        }
    }
}

/// What a dump includes.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Connector glyphs.
    pub style: TreeStyle,
    /// Show node identities.
    pub show_ids: bool,
    /// Show component types.
    pub show_types: bool,
    /// List explicitly written properties under each node.
    pub show_properties: bool,
    /// Stop below this depth (`None` for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: false,
            show_types: true,
            show_properties: false,
            max_depth: None,
        }
    }
}

impl TreeFormatOptions {
    /// Set the connector style.
    pub fn style(mut self, style: TreeStyle) -> Self {
        self.style = style;
        self
    }

    /// Set whether identities are shown.
    pub fn show_ids(mut self, show: bool) -> Self {
        self.show_ids = show;
        self
    }

    /// Set whether types are shown.
    pub fn show_types(mut self, show: bool) -> Self {
        self.show_types = show;
        self
    }

    /// Set whether written properties are listed.
    pub fn show_properties(mut self, show: bool) -> Self {
        self.show_properties = show;
        self
    }

    /// Limit the dump depth.
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }
}

/// Renders a [`MockTree`] as indented text.
#[derive(Debug, Clone, Default)]
pub struct MockTreeDebug {
    options: TreeFormatOptions,
}

impl MockTreeDebug {
    /// Create a visualizer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Dump the attached tree from its root.
    pub fn format(&self, tree: &MockTree) -> String {
        self.format_subtree(tree, tree.root())
    }

    /// Dump the subtree under `id`. Unknown nodes produce an empty string.
    pub fn format_subtree(&self, tree: &MockTree, id: ComponentId) -> String {
        let mut output = String::new();
        let mut rails = Vec::new();
        self.format_node(tree, id, &mut rails, true, &mut output);
        output
    }

    /// `rails[i]` is whether the ancestor at depth `i + 1` has later siblings.
    fn format_node(
        &self,
        tree: &MockTree,
        id: ComponentId,
        rails: &mut Vec<bool>,
        is_last: bool,
        output: &mut String,
    ) {
        let Some(name) = tree.name(id) else {
            return;
        };
        let depth = rails.len();
        let (rail, tee, corner) = self.options.style.glyphs();

        let indent: String = rails
            .iter()
            .skip(1)
            .map(|&open| if open { rail } else { "    " })
            .collect();
        output.push_str(&indent);
        if depth > 0 {
            output.push_str(if is_last { corner } else { tee });
        }
        output.push_str(name);

        if self.options.show_ids {
            output.push_str(&format!(" [{id}]"));
        }
        if self.options.show_types {
            if let Some(ty) = tree.component_type(id) {
                output.push_str(&format!(" ({ty})"));
            }
        }
        if let Ok(open) = tree.is_open(id) {
            output.push_str(if open { " [open]" } else { " [closed]" });
        }
        output.push('\n');

        let children = tree.children(id).unwrap_or_default();
        rails.push(!is_last);

        if self.options.show_properties {
            if let Ok(store) = tree.properties(id) {
                let prefix: String = rails
                    .iter()
                    .skip(1)
                    .map(|&open| if open { rail } else { "    " })
                    .collect();
                let bar = if children.is_empty() { "    " } else { rail };
                for (property, value) in store.written() {
                    output.push_str(&format!("{prefix}{bar}.{property} = {value}\n"));
                }
            }
        }

        let within_depth = self.options.max_depth.is_none_or(|max| depth < max);
        if within_depth {
            let count = children.len();
            for (i, &child) in children.iter().enumerate() {
                self.format_node(tree, child, rails, i + 1 == count, output);
            }
        }
        rails.pop();
    }
}
