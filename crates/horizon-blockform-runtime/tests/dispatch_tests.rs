//! Tests for event dispatch through the shared dispatcher and hosting forms.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use horizon_blockform_core::{
    AssetLoadError, BlockformConfig, ComponentCatalog, ComponentId, ComponentType, PropertyDescriptor,
    PropertyValue, WidgetApplicationError,
};
use horizon_blockform_runtime::{
    Asset, DispatchError, DispatchResult, EventDispatcher, EventHook, Form, PlatformWidget,
    WidgetFactory, WidgetRequest,
};
use parking_lot::Mutex;

fn no_assets(path: &str) -> Result<Asset, AssetLoadError> {
    Err(AssetLoadError::NotFound { path: path.to_string() })
}

fn hosted_form(dispatcher: Arc<EventDispatcher>) -> Form {
    Form::new(
        Arc::new(ComponentCatalog::standard()),
        dispatcher,
        Arc::new(no_assets),
        &BlockformConfig::default(),
    )
}

#[test]
fn test_two_handlers_each_run_once_in_order() {
    let dispatcher = EventDispatcher::default();
    let component = ComponentId::from_raw(42);
    let log = Arc::new(Mutex::new(Vec::new()));

    for name in ["first", "second"] {
        let log = log.clone();
        dispatcher.register(component, "Click", move |_| {
            log.lock().push(name);
            Ok(())
        });
    }

    let result = dispatcher.dispatch(component, "Click", &[]);
    assert_eq!(result, DispatchResult::Delivered { invoked: 2, failed: 0 });
    assert_eq!(*log.lock(), ["first", "second"]);
}

#[test]
fn test_failing_handler_does_not_stop_the_rest() {
    let dispatcher = EventDispatcher::default();
    let component = ComponentId::next();
    let reached = Arc::new(AtomicUsize::new(0));

    dispatcher.register(component, "Click", |_| Err("no network".into()));
    dispatcher.register(component, "Click", |_| panic!("handler bug"));
    let counter = reached.clone();
    dispatcher.register(component, "Click", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    assert_eq!(
        dispatcher.dispatch(component, "Click", &[]),
        DispatchResult::Delivered { invoked: 3, failed: 2 }
    );
    assert_eq!(reached.load(Ordering::SeqCst), 1);

    // A panicking handler leaves the dispatcher usable.
    assert_eq!(
        dispatcher.dispatch(component, "Click", &[]),
        DispatchResult::Delivered { invoked: 3, failed: 2 }
    );
    assert_eq!(reached.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unhandled_event_is_a_no_op() {
    let dispatcher = EventDispatcher::default();
    let component = ComponentId::next();
    dispatcher.register(component, "Click", |_| Ok(()));

    assert_eq!(dispatcher.dispatch(component, "LongClick", &[]), DispatchResult::Unhandled);
    assert_eq!(dispatcher.dispatch(ComponentId::next(), "Click", &[]), DispatchResult::Unhandled);
}

#[test]
fn test_dispatch_from_many_threads() {
    let dispatcher = Arc::new(EventDispatcher::default());
    let component = ComponentId::next();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    dispatcher.register(component, "Click", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            thread::spawn(move || {
                for _ in 0..25 {
                    dispatcher.dispatch(component, "Click", &[]);
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(count.load(Ordering::SeqCst), 100);
}

#[test]
fn test_nested_component_resolves_to_its_form() {
    let dispatcher = Arc::new(EventDispatcher::default());
    let mut form = hosted_form(dispatcher.clone());
    let arrangement = form.add_component(ComponentType::VERTICAL_ARRANGEMENT, None).unwrap();
    let button = form.add_component(ComponentType::BUTTON, Some(arrangement)).unwrap();

    assert_eq!(dispatcher.dispatch_owner(button), Some(form.id()));
    assert_eq!(dispatcher.dispatch_owner(arrangement), Some(form.id()));
    assert_eq!(dispatcher.dispatch_owner(ComponentId::next()), None);
}

#[test]
fn test_widget_hook_reaches_handlers_until_teardown() {
    struct Inert;
    impl PlatformWidget for Inert {
        fn apply_property(&mut self, _: &PropertyDescriptor, _: &PropertyValue) -> Result<(), WidgetApplicationError> {
            Ok(())
        }
    }

    struct HookCapture(Mutex<Vec<EventHook>>);
    impl WidgetFactory for HookCapture {
        fn create(&self, request: WidgetRequest<'_>) -> Result<Box<dyn PlatformWidget>, WidgetApplicationError> {
            self.0.lock().push(request.hook);
            Ok(Box::new(Inert))
        }
    }

    let dispatcher = Arc::new(EventDispatcher::default());
    let mut form = hosted_form(dispatcher.clone());
    let menu = form.add_component(ComponentType::MENU, None).unwrap();
    let item = form.add_component(ComponentType::MENU_ITEM, Some(menu)).unwrap();

    let factory = HookCapture(Mutex::new(Vec::new()));
    form.on_host_ready(&factory).unwrap();

    let clicks = Arc::new(AtomicUsize::new(0));
    let counter = clicks.clone();
    dispatcher.register(item, "Click", move |ctx| {
        assert!(ctx.args.is_empty());
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    let hook = factory
        .0
        .lock()
        .iter()
        .find(|hook| hook.component() == item)
        .cloned()
        .unwrap();
    assert!(hook.fire("Click", &[]).was_delivered());

    form.teardown();
    assert_eq!(hook.fire("Click", &[]), DispatchResult::Refused);
    assert_eq!(clicks.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fire_event_checks_the_declaration() {
    let dispatcher = Arc::new(EventDispatcher::default());
    let mut form = hosted_form(dispatcher.clone());
    let button = form.add_component(ComponentType::BUTTON, None).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    dispatcher.register(form.id(), "OtherScreenClosed", move |ctx| {
        sink.lock().extend(ctx.args.iter().cloned());
        Ok(())
    });

    let args = [PropertyValue::from("Settings"), PropertyValue::from("ok")];
    assert_eq!(
        form.fire_event(form.id(), "OtherScreenClosed", &args),
        Ok(DispatchResult::Delivered { invoked: 1, failed: 0 })
    );
    assert_eq!(*seen.lock(), args);

    assert!(matches!(
        form.fire_event(button, "Swipe", &[]),
        Err(DispatchError::UnknownEvent { .. })
    ));
    assert_eq!(
        form.fire_event(form.id(), "OtherScreenClosed", &args[..1]),
        Err(DispatchError::ArgumentCount {
            event: "OtherScreenClosed",
            expected: 2,
            got: 1
        })
    );
    assert_eq!(form.fire_event(button, "LongClick", &[]), Ok(DispatchResult::Unhandled));
}

#[test]
fn test_dropping_a_form_releases_its_handlers() {
    let dispatcher = Arc::new(EventDispatcher::default());
    let button = {
        let mut form = hosted_form(dispatcher.clone());
        let button = form.add_component(ComponentType::BUTTON, None).unwrap();
        dispatcher.register(button, "Click", |_| Ok(()));
        assert_eq!(dispatcher.handler_count(button, "Click"), 1);
        button
    };

    assert_eq!(dispatcher.handler_count(button, "Click"), 0);
    assert_eq!(dispatcher.dispatch_owner(button), None);
}
