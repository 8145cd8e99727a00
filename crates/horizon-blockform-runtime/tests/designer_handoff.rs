//! A screen built in the designer, then hosted on the device.

use std::sync::Arc;

use horizon_blockform_core::{
    AssetLoadError, BlockformConfig, ComponentCatalog, ComponentId, ComponentType, PropertyDescriptor,
    PropertyValue, WidgetApplicationError,
};
use horizon_blockform_designer::{AcceptanceTable, DragSource, MockTree};
use horizon_blockform_runtime::{
    Asset, DispatchResult, EventDispatcher, Form, PlatformWidget, WidgetFactory, WidgetRequest,
};
use parking_lot::Mutex;

struct Entry;

impl PlatformWidget for Entry {
    fn apply_property(&mut self, _: &PropertyDescriptor, _: &PropertyValue) -> Result<(), WidgetApplicationError> {
        Ok(())
    }
}

/// Records `(component, primary text)` for every widget created.
#[derive(Default)]
struct MenuHost(Mutex<Vec<(ComponentId, Option<String>)>>);

impl WidgetFactory for MenuHost {
    fn create(&self, request: WidgetRequest<'_>) -> Result<Box<dyn PlatformWidget>, WidgetApplicationError> {
        let text = request.primary.and_then(|(_, value)| value.as_str().map(str::to_owned));
        self.0.lock().push((request.component, text));
        Ok(Box::new(Entry))
    }
}

fn no_assets(path: &str) -> Result<Asset, AssetLoadError> {
    Err(AssetLoadError::NotFound { path: path.to_string() })
}

/// Host every designer node under the identity it had in the tree.
fn host(tree: &MockTree, form: &mut Form) {
    for id in tree.preorder() {
        if id == tree.root() {
            continue;
        }
        let parent = tree.parent(id).unwrap().filter(|&parent| parent != tree.root());
        form.add_component_with_id(id, tree.component_type(id).unwrap(), parent)
            .unwrap();
        for (name, value) in tree.properties(id).unwrap().written() {
            form.set_property(id, name, value.clone()).unwrap();
        }
    }
}

#[test]
fn test_designed_menu_runs_on_device() {
    let catalog = Arc::new(ComponentCatalog::standard());
    let config = BlockformConfig::default();
    let mut tree = MockTree::new(catalog.clone(), Arc::new(AcceptanceTable::standard()), &config).unwrap();

    let menu = tree
        .drop_source(tree.root(), DragSource::Palette(ComponentType::MENU), None)
        .unwrap();
    let save = tree
        .drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None)
        .unwrap();
    let quit = tree
        .drop_source(menu, DragSource::Palette(ComponentType::MENU_ITEM), None)
        .unwrap();
    tree.set_property(save, "Text", "Save".into()).unwrap();
    tree.set_property(save, "Enabled", false.into()).unwrap();
    tree.set_property(quit, "Text", "Quit".into()).unwrap();

    let dispatcher = EventDispatcher::shared(&config);
    let mut form = Form::new(catalog, dispatcher.clone(), Arc::new(no_assets), &config);
    host(&tree, &mut form);
    assert_eq!(form.len(), 3);
    assert_eq!(dispatcher.dispatch_owner(save), Some(form.id()));

    let factory = MenuHost::default();
    let report = form.on_host_ready(&factory).unwrap();
    assert_eq!(report.materialized, 3);
    assert_eq!(
        *factory.0.lock(),
        [
            (menu, None),
            (save, Some("Save".to_string())),
            (quit, Some("Quit".to_string())),
        ]
    );

    let quits = Arc::new(Mutex::new(0));
    let counter = quits.clone();
    dispatcher.register(quit, "Click", move |_| {
        *counter.lock() += 1;
        Ok(())
    });
    let item = form.menu_item(quit).unwrap();
    assert!(item.enabled());
    assert_eq!(item.click(), Ok(DispatchResult::Delivered { invoked: 1, failed: 0 }));
    assert_eq!(*quits.lock(), 1);
    assert!(!form.menu_item(save).unwrap().enabled());
}
