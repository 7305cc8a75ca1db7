use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use rod_common::{BridgeError, Position, ResourceId, ResourceKind, Size};
use rod_config::EventLoopConfig;

use super::Rod;
use crate::abi::headless::{AbiCall, HeadlessEngine};
use crate::options::{SizeBound, TrayOptions, WebViewOptions, WindowOptions};
use crate::resources::{Lifecycle, Resource};

fn setup() -> (Rc<HeadlessEngine>, Rod) {
    let engine = Rc::new(HeadlessEngine::new());
    let rod = Rod::new(engine.clone()).unwrap();
    (engine, rod)
}

fn destroy_order(calls: &[AbiCall]) -> Vec<&'static str> {
    calls
        .iter()
        .filter_map(|call| match call {
            AbiCall::WebViewDestroy(_) => Some("webview"),
            AbiCall::WindowDestroy(_) => Some("window"),
            AbiCall::TrayDestroy(_) => Some("tray"),
            AbiCall::WebContextDestroy(_) => Some("webcontext"),
            AbiCall::EventLoopDestroy(_) => Some("event_loop"),
            _ => None,
        })
        .collect()
}

// ids

#[test]
fn ids_are_sequential_and_never_reused() {
    let (_engine, rod) = setup();

    let first = rod.create_window(&WindowOptions::default()).unwrap();
    let tray = rod.create_tray(&TrayOptions::default()).unwrap();
    first.destroy();
    tray.destroy();
    let webview = rod.create_webview(&WebViewOptions::default()).unwrap();
    let second = rod.create_window(&WindowOptions::default()).unwrap();

    assert_eq!(first.id(), ResourceId(1));
    assert_eq!(tray.id(), ResourceId(2));
    assert_eq!(webview.id(), ResourceId(3));
    assert_eq!(second.id(), ResourceId(4));
}

#[test]
fn id_is_passed_to_native_create() {
    let (engine, rod) = setup();
    rod.create_window(&WindowOptions::titled("T")).unwrap();
    rod.create_tray(&TrayOptions::default()).unwrap();

    let calls = engine.calls();
    assert!(calls.iter().any(|call| matches!(
        call,
        AbiCall::WindowCreate { id: ResourceId(1), options } if options == r#"{"title":"T"}"#
    )));
    assert!(calls
        .iter()
        .any(|call| matches!(call, AbiCall::TrayCreate { id: ResourceId(2), .. })));
}

#[test]
fn web_contexts_do_not_use_resource_ids() {
    let (_engine, rod) = setup();

    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let context = rod.create_web_context("/tmp/rod-profile").unwrap();
    let tray = rod.create_tray(&TrayOptions::default()).unwrap();

    assert_eq!(window.id(), ResourceId(1));
    assert_eq!(tray.id(), ResourceId(2));
    assert_eq!(context.id(), ResourceId(1));
}

#[test]
fn ids_stop_at_engine_width() {
    let (engine, rod) = setup();
    let mut last = None;
    for _ in 0..u16::MAX {
        let tray = rod.create_tray(&TrayOptions::default()).unwrap();
        last = Some(tray.id());
        tray.destroy();
    }
    assert_eq!(last, Some(ResourceId(u16::MAX)));
    engine.clear_calls();

    assert_eq!(
        rod.create_window(&WindowOptions::default()).unwrap_err(),
        BridgeError::IdsExhausted
    );
    assert_eq!(
        rod.create_tray(&TrayOptions::default()).unwrap_err(),
        BridgeError::IdsExhausted
    );
    assert!(engine.calls().is_empty());
    assert_eq!(rod.tray_count(), 0);
}

#[test]
fn destroyed_window_leaves_lookup() {
    let (_engine, rod) = setup();
    let kept = rod.create_window(&WindowOptions::default()).unwrap();
    let gone = rod.create_window(&WindowOptions::default()).unwrap();

    gone.destroy();

    assert!(rod.window(gone.id()).is_none());
    assert_eq!(rod.window(kept.id()).map(|w| w.id()), Some(kept.id()));
    assert_eq!(rod.window_count(), 1);
}

#[test]
fn failed_create_consumes_id_and_registers_nothing() {
    let (engine, rod) = setup();
    engine.fail_next_create(ResourceKind::Window);

    let err = rod.create_window(&WindowOptions::default()).unwrap_err();
    assert_eq!(
        err,
        BridgeError::ResourceCreation {
            kind: ResourceKind::Window
        }
    );
    assert_eq!(rod.window_count(), 0);
    assert!(rod.window(ResourceId(1)).is_none());

    let window = rod.create_window(&WindowOptions::default()).unwrap();
    assert_eq!(window.id(), ResourceId(2));
}

#[test]
fn failed_webview_surface_registers_nothing() {
    let (engine, rod) = setup();
    engine.fail_next_create(ResourceKind::WebView);

    let err = rod.create_webview(&WebViewOptions::default()).unwrap_err();
    assert_eq!(
        err,
        BridgeError::ResourceCreation {
            kind: ResourceKind::WebView
        }
    );
    assert_eq!(rod.window_count(), 0);
    // Only the event loop is left.
    assert_eq!(engine.live_handles(), 1);
}

#[test]
fn failed_event_loop_is_initialization_error() {
    let engine = Rc::new(HeadlessEngine::new());
    engine.fail_next_create(ResourceKind::EventLoop);
    let result = Rod::with_config(engine, &EventLoopConfig::default());
    assert!(matches!(result, Err(BridgeError::Initialization)));
}

// event routing

#[test]
fn resize_event_updates_window_without_host_calls() {
    let (engine, rod) = setup();
    let window = rod
        .create_window(&WindowOptions::titled("T").with_size(400, 300))
        .unwrap();
    let resized = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&resized);
    window.on_resized(move |size| sink.borrow_mut().push(size));

    assert_eq!(window.size().unwrap(), Size::new(400, 300));
    engine.emit_resized(window.id(), Size::new(500, 350));
    rod.poll();

    assert_eq!(*resized.borrow(), vec![Size::new(500, 350)]);
    assert_eq!(window.last_known_size(), Some(Size::new(500, 350)));
    assert_eq!(window.size().unwrap(), Size::new(500, 350));
}

#[test]
fn move_and_focus_events_reach_only_their_window() {
    let (engine, rod) = setup();
    let a = rod.create_window(&WindowOptions::default()).unwrap();
    let b = rod.create_window(&WindowOptions::default()).unwrap();

    engine.emit_moved(b.id(), Position::new(-1280, 0));
    engine.emit_focused(b.id(), true);
    rod.poll();

    assert_eq!(a.last_known_position(), None);
    assert_eq!(a.last_known_focus(), None);
    assert_eq!(b.last_known_position(), Some(Position::new(-1280, 0)));
    assert_eq!(b.last_known_focus(), Some(true));
}

#[test]
fn tray_click_fires_exactly_once_per_event() {
    let (engine, rod) = setup();
    let tray = rod.create_tray(&TrayOptions::default()).unwrap();
    let clicks = Rc::new(Cell::new(0));
    let counter = Rc::clone(&clicks);
    tray.on_click(move || counter.set(counter.get() + 1));

    engine.emit_tray_clicked(tray.id());
    rod.poll();
    assert_eq!(clicks.get(), 1);

    engine.emit_tray_clicked(tray.id());
    engine.emit_tray_clicked(tray.id());
    rod.poll();
    assert_eq!(clicks.get(), 3);
}

#[test]
fn tray_id_does_not_route_window_events() {
    let (engine, rod) = setup();
    let tray = rod.create_tray(&TrayOptions::default()).unwrap();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let hits = Rc::new(Cell::new(0));

    let counter = Rc::clone(&hits);
    tray.on_click(move || counter.set(counter.get() + 1));
    let counter = Rc::clone(&hits);
    window.on_close_requested(move || counter.set(counter.get() + 1));

    // Tray id used for a window event, window id used for a tray event.
    engine.emit_close_requested(tray.id());
    engine.emit_tray_clicked(window.id());
    assert_eq!(rod.poll(), 2);
    assert_eq!(hits.get(), 0);
}

#[test]
fn unknown_id_is_a_no_op() {
    let (engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    window.on_resized(move |_| counter.set(counter.get() + 1));

    engine.emit_resized(ResourceId(99), Size::new(1, 1));
    engine.emit_tray_clicked(ResourceId(99));
    assert_eq!(rod.poll(), 2);

    assert_eq!(hits.get(), 0);
    assert!(engine.violations().is_empty());
}

#[test]
fn events_for_destroyed_window_are_dropped() {
    let (engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let id = window.id();
    window.destroy();

    engine.emit_resized(id, Size::new(10, 10));
    rod.poll();
    assert_eq!(window.last_known_size(), None);
    assert!(rod.window(id).is_none());
}

#[test]
fn malformed_and_unknown_frames_are_skipped() {
    let (engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    window.on_focused(move |_| counter.set(counter.get() + 1));

    engine.push_raw_event(b"window_focused", b"not json");
    engine.push_raw_event(b"window_focused", br#"{"id":1}"#);
    engine.push_raw_event(b"window_minimized", br#"{"id":1}"#);
    engine.emit_focused(window.id(), true);

    assert_eq!(rod.poll(), 1);
    assert_eq!(hits.get(), 1);
}

#[test]
fn close_request_can_destroy_from_listener() {
    let (engine, rod) = setup();
    let webview = rod.create_webview(&WebViewOptions::default()).unwrap();
    let target = webview.clone();
    webview
        .window()
        .on_close_requested(move || target.destroy());

    engine.emit_close_requested(webview.id());
    engine.emit_resized(webview.id(), Size::new(1, 1));
    rod.poll();

    assert!(webview.window().is_destroyed());
    assert_eq!(rod.window_count(), 0);
    assert_eq!(webview.window().last_known_size(), None);
    assert!(engine.violations().is_empty());
}

// lifecycle

#[test]
fn webview_surface_is_freed_before_window() {
    let (engine, rod) = setup();
    let webview = rod.create_webview(&WebViewOptions::default()).unwrap();
    engine.clear_calls();

    webview.destroy();

    assert_eq!(destroy_order(&engine.calls()), vec!["webview", "window"]);
    assert!(engine.violations().is_empty());
}

#[test]
fn destroy_twice_equals_destroy_once() {
    let (engine, rod) = setup();
    let webview = rod.create_webview(&WebViewOptions::default()).unwrap();
    let tray = rod.create_tray(&TrayOptions::default()).unwrap();
    let fired = Rc::new(Cell::new(0));
    let counter = Rc::clone(&fired);
    webview.window().on_destroyed(move || counter.set(counter.get() + 1));
    engine.clear_calls();

    webview.destroy();
    tray.destroy();
    let once = engine.calls();
    webview.destroy();
    tray.destroy();

    assert_eq!(engine.calls(), once);
    assert_eq!(fired.get(), 1);
    assert!(engine.violations().is_empty());
    assert_eq!(rod.window_count(), 0);
    assert_eq!(rod.tray_count(), 0);
}

#[test]
fn destroy_listener_can_read_final_state() {
    let (_engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::titled("Final")).unwrap();
    let seen = Rc::new(RefCell::new(None));

    let sink = Rc::clone(&seen);
    let target = window.clone();
    window.on_destroyed(move || {
        *sink.borrow_mut() = Some((target.title(), target.lifecycle()));
    });
    window.destroy();

    assert_eq!(
        *seen.borrow(),
        Some((Ok("Final".to_string()), Lifecycle::Destroying))
    );
    assert_eq!(window.lifecycle(), Lifecycle::Destroyed);
}

#[test]
fn nested_destroy_in_destroy_listener_is_no_op() {
    let (engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let target = window.clone();
    window.on_destroyed(move || target.destroy());

    window.destroy();

    let frees = engine
        .calls()
        .iter()
        .filter(|call| matches!(call, AbiCall::WindowDestroy(_)))
        .count();
    assert_eq!(frees, 1);
    assert!(engine.violations().is_empty());
}

#[test]
fn getter_after_destroy_is_an_error_not_a_crash() {
    let (engine, rod) = setup();
    let webview = rod.create_webview(&WebViewOptions::default()).unwrap();
    webview.destroy();

    assert!(matches!(
        webview.window().size(),
        Err(BridgeError::Destroyed {
            kind: ResourceKind::WebView,
            ..
        })
    ));
    assert!(webview.reload().is_err());
    assert!(engine.violations().is_empty());
}

#[test]
fn lookup_by_id() {
    let (_engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let webview = rod.create_webview(&WebViewOptions::default()).unwrap();
    let tray = rod.create_tray(&TrayOptions::default()).unwrap();

    assert_eq!(rod.window(window.id()).map(|w| w.id()), Some(window.id()));
    assert!(rod.webview(window.id()).is_none());
    assert_eq!(rod.webview(webview.id()).map(|w| w.id()), Some(webview.id()));
    assert_eq!(rod.tray(tray.id()).map(|t| t.id()), Some(tray.id()));
    assert!(rod.tray(window.id()).is_none());
    assert_eq!(rod.window_count(), 2);
    assert_eq!(rod.tray_count(), 1);
}

#[test]
fn cleared_minimum_size_sends_empty_sentinel() {
    let (engine, rod) = setup();
    let options: WindowOptions =
        serde_json::from_str(r#"{"minimumSize":null,"maximumSize":{"width":9,"height":9}}"#)
            .unwrap();
    assert_eq!(options.minimum_size, Some(SizeBound::Clear));

    rod.create_window(&options).unwrap();

    let created = engine.calls().into_iter().find_map(|call| match call {
        AbiCall::WindowCreate { options, .. } => Some(options),
        _ => None,
    });
    assert_eq!(
        created.as_deref(),
        Some(r#"{"minimum_size":"","maximum_size":{"width":9,"height":9}}"#)
    );
}

// web contexts

#[test]
fn webview_in_context_keeps_context_until_gone() {
    let (engine, rod) = setup();
    let context = rod.create_web_context("/tmp/rod-profile").unwrap();
    let webview = rod
        .create_webview_in_context(&WebViewOptions::default(), &context)
        .unwrap();

    context.destroy();
    assert_eq!(context.lifecycle(), Lifecycle::Destroying);
    assert!(matches!(
        rod.create_webview_in_context(&WebViewOptions::default(), &context),
        Err(BridgeError::Destroyed {
            kind: ResourceKind::WebContext,
            ..
        })
    ));

    webview.destroy();
    assert_eq!(context.lifecycle(), Lifecycle::Destroyed);
    assert!(engine.violations().is_empty());
}

// facade teardown

#[test]
fn facade_destroy_order_and_idempotence() {
    let (engine, rod) = setup();
    let context = rod.create_web_context("/tmp/rod-profile").unwrap();
    let _tray = rod.create_tray(&TrayOptions::default()).unwrap();
    let _webview = rod
        .create_webview_in_context(&WebViewOptions::default(), &context)
        .unwrap();
    let _window = rod.create_window(&WindowOptions::default()).unwrap();
    engine.clear_calls();

    rod.destroy();
    rod.destroy();

    assert_eq!(
        destroy_order(&engine.calls()),
        vec!["webview", "window", "window", "tray", "webcontext", "event_loop"]
    );
    assert_eq!(engine.live_handles(), 0);
    assert!(engine.violations().is_empty());
    assert!(rod.is_destroyed());
}

#[test]
fn creation_after_destroy_fails() {
    let (engine, rod) = setup();
    rod.destroy();
    engine.clear_calls();

    assert_eq!(
        rod.create_window(&WindowOptions::default()).unwrap_err(),
        BridgeError::EventLoopNotRunning
    );
    assert_eq!(
        rod.create_tray(&TrayOptions::default()).unwrap_err(),
        BridgeError::EventLoopNotRunning
    );
    assert!(rod.create_web_context("/tmp/x").is_err());
    assert!(engine.calls().is_empty());
}

#[test]
fn drop_tears_everything_down() {
    let (engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    rod.create_tray(&TrayOptions::default()).unwrap();

    drop(rod);

    assert!(window.is_destroyed());
    assert_eq!(engine.live_handles(), 0);
    assert!(engine.violations().is_empty());
}

#[test]
fn resource_trait_covers_every_kind() {
    let (_engine, rod) = setup();
    let window = rod.create_window(&WindowOptions::default()).unwrap();
    let webview = rod.create_webview(&WebViewOptions::default()).unwrap();
    let tray = rod.create_tray(&TrayOptions::default()).unwrap();
    let context = rod.create_web_context("/tmp/rod-profile").unwrap();

    let resources: Vec<&dyn Resource> = vec![
        &window as &dyn Resource,
        &webview as &dyn Resource,
        &tray as &dyn Resource,
        &context as &dyn Resource,
    ];
    let kinds: Vec<_> = resources.iter().map(|r| r.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ResourceKind::Window,
            ResourceKind::WebView,
            ResourceKind::Tray,
            ResourceKind::WebContext
        ]
    );

    for resource in &resources {
        Resource::destroy(*resource);
    }
    assert!(resources.iter().all(|r| r.is_destroyed()));
}

// timer

#[tokio::test]
async fn timer_delivers_events_between_awaits() {
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let engine = Rc::new(HeadlessEngine::new());
            let config = EventLoopConfig {
                poll_interval_ms: 2,
            };
            let rod = Rod::with_config(engine.clone(), &config).unwrap();
            let tray = rod.create_tray(&TrayOptions::default()).unwrap();
            let clicks = Rc::new(Cell::new(0));
            let counter = Rc::clone(&clicks);
            tray.on_click(move || counter.set(counter.get() + 1));

            rod.start().unwrap();
            engine.emit_tray_clicked(tray.id());
            tokio::time::sleep(Duration::from_millis(40)).await;
            assert_eq!(clicks.get(), 1);

            rod.destroy();
            assert!(!rod.event_loop().is_running());
            let polls_after = engine
                .calls()
                .iter()
                .filter(|call| matches!(call, AbiCall::EventLoopPoll(_)))
                .count();
            tokio::time::sleep(Duration::from_millis(20)).await;
            let polls_later = engine
                .calls()
                .iter()
                .filter(|call| matches!(call, AbiCall::EventLoopPoll(_)))
                .count();
            assert_eq!(polls_after, polls_later);
            assert!(engine.violations().is_empty());
        })
        .await;
}
