use emitkit_core::{args, Args, CapacityWarning, EmitterConfig, EventEmitter, HandlerResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Log = Arc<Mutex<Vec<&'static str>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn recorder(
    log: &Log,
    tag: &'static str,
) -> impl Fn(&Args) -> HandlerResult + Send + Sync + 'static {
    let log = log.clone();
    move |_| {
        log.lock().push(tag);
        Ok(())
    }
}

fn warning_collector() -> (
    Arc<Mutex<Vec<CapacityWarning>>>,
    impl Fn(&CapacityWarning) + Send + Sync + 'static,
) {
    let warnings = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let warnings = warnings.clone();
        move |w: &CapacityWarning| warnings.lock().push(w.clone())
    };
    (warnings, sink)
}

#[test]
fn test_dispatch_follows_registration_order() {
    let emitter = EventEmitter::new();
    let calls = log();
    emitter.on("x", recorder(&calls, "first"));
    emitter.once("x", recorder(&calls, "second"));
    emitter.on("x", recorder(&calls, "third"));
    emitter.once("x", recorder(&calls, "fourth"));

    assert_eq!(emitter.emit("x", &[]).expect("emit"), 4);
    assert_eq!(*calls.lock(), vec!["first", "second", "third", "fourth"]);
}

#[test]
fn test_two_once_listeners_both_fire_once() {
    let emitter = EventEmitter::new();
    let calls = log();
    emitter.once("z", recorder(&calls, "a"));
    emitter.once("z", recorder(&calls, "b"));

    assert_eq!(emitter.emit("z", &[]).expect("emit"), 2);
    assert_eq!(emitter.listener_count("z"), 0);
    assert_eq!(emitter.emit("z", &[]).expect("emit"), 0);
    assert_eq!(*calls.lock(), vec!["a", "b"]);
}

#[test]
fn test_same_handler_registered_twice_as_once() {
    let emitter = EventEmitter::new();
    let count = Arc::new(AtomicUsize::new(0));
    let handler = {
        let count = count.clone();
        move |_: &Args| -> HandlerResult {
            count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    };
    emitter.once("z", handler.clone());
    emitter.on("z", handler);

    emitter.emit("z", &[]).expect("emit");
    emitter.emit("z", &[]).expect("emit");
    assert_eq!(count.load(Ordering::SeqCst), 3);
    assert_eq!(emitter.listener_count("z"), 1);
}

#[test]
fn test_once_does_not_discard_persistent_siblings() {
    let emitter = EventEmitter::new();
    let calls = log();
    emitter.on("x", recorder(&calls, "on"));
    emitter.once("x", recorder(&calls, "once"));

    assert_eq!(emitter.emit("x", &[]).expect("emit"), 2);
    assert_eq!(emitter.emit("x", &[]).expect("emit"), 1);
    assert_eq!(*calls.lock(), vec!["on", "once", "on"]);
}

#[test]
fn test_off_removes_exactly_one_listener() {
    let emitter = EventEmitter::new();
    let calls = log();
    emitter.on("x", recorder(&calls, "keep"));
    let gone = emitter.on("x", recorder(&calls, "gone"));
    emitter.on("x", recorder(&calls, "keep"));

    assert!(emitter.off(&gone));
    assert_eq!(emitter.listener_count("x"), 2);

    emitter.emit("x", &[]).expect("emit");
    assert_eq!(*calls.lock(), vec!["keep", "keep"]);
}

#[test]
fn test_off_is_idempotent() {
    let emitter = EventEmitter::new();
    let sub = emitter.on("x", |_| Ok(()));
    assert!(emitter.off(&sub));
    assert!(!emitter.off(&sub));

    let fired = emitter.once("y", |_| Ok(()));
    emitter.emit("y", &[]).expect("emit");
    assert!(!emitter.off(&fired));
    assert!(!emitter.contains(&fired));
}

#[test]
fn test_handle_from_other_emitter_is_ignored() {
    let a = EventEmitter::new();
    let b = EventEmitter::new();
    let sub = a.on("x", |_| Ok(()));
    b.on("x", |_| Ok(()));

    assert!(!b.off(&sub));
    assert_eq!(a.listener_count("x"), 1);
    assert_eq!(b.listener_count("x"), 1);
}

#[test]
fn test_emit_without_listeners_returns_zero() {
    let emitter = EventEmitter::new();
    assert_eq!(emitter.emit("nothing", &args!["ignored"]).expect("emit"), 0);
    assert_eq!(emitter.listener_count("nothing"), 0);
}

#[test]
fn test_warning_once_per_threshold_crossing() {
    let (warnings, sink) = warning_collector();
    let emitter =
        EventEmitter::with_config(EmitterConfig::with_max_listeners(2)).with_warning_sink(sink);

    emitter.on("x", |_| Ok(()));
    emitter.on("x", |_| Ok(()));
    assert!(warnings.lock().is_empty());

    let third = emitter.on("x", |_| Ok(()));
    emitter.on("x", |_| Ok(()));
    assert_eq!(warnings.lock().len(), 1);
    {
        let warnings = warnings.lock();
        assert_eq!(warnings[0].event, "x");
        assert_eq!(warnings[0].count, 3);
        assert_eq!(warnings[0].limit, 2);
        assert_eq!(warnings[0].subscription, third);
    }

    // Registration and dispatch are unaffected
    assert_eq!(emitter.listener_count("x"), 4);
    assert_eq!(emitter.emit("x", &[]).expect("emit"), 4);

    // Other names are tracked separately
    emitter.on("y", |_| Ok(()));
    assert_eq!(warnings.lock().len(), 1);
}

#[test]
fn test_warning_again_after_dropping_back_under_limit() {
    let (warnings, sink) = warning_collector();
    let emitter =
        EventEmitter::with_config(EmitterConfig::with_max_listeners(1)).with_warning_sink(sink);

    emitter.on("x", |_| Ok(()));
    let extra = emitter.on("x", |_| Ok(()));
    assert_eq!(warnings.lock().len(), 1);

    emitter.off(&extra);
    emitter.on("x", |_| Ok(()));
    assert_eq!(warnings.lock().len(), 2);
}

#[test]
fn test_set_max_listeners_at_runtime() {
    let (warnings, sink) = warning_collector();
    let emitter = EventEmitter::new().with_warning_sink(sink);
    emitter.set_max_listeners(2);
    assert_eq!(emitter.max_listeners(), 2);

    for _ in 0..3 {
        emitter.on("abc", |_| Ok(()));
    }
    assert_eq!(warnings.lock().len(), 1);

    emitter.set_max_listeners(0);
    for _ in 0..20 {
        emitter.on("abc", |_| Ok(()));
    }
    assert_eq!(warnings.lock().len(), 1);
    assert_eq!(emitter.listener_count("abc"), 23);
}

#[test]
fn test_raising_limit_rearms_warning() {
    let (warnings, sink) = warning_collector();
    let emitter =
        EventEmitter::with_config(EmitterConfig::with_max_listeners(1)).with_warning_sink(sink);

    emitter.on("x", |_| Ok(()));
    emitter.on("x", |_| Ok(()));
    assert_eq!(warnings.lock().len(), 1);

    // Back within the limit, then lowered again without a registration
    emitter.set_max_listeners(5);
    emitter.set_max_listeners(1);
    assert_eq!(warnings.lock().len(), 1);

    emitter.on("x", |_| Ok(()));
    assert_eq!(warnings.lock().len(), 2);
    assert_eq!(warnings.lock()[1].count, 3);
}

#[test]
fn test_failing_once_listener_stays_removed() {
    let emitter = EventEmitter::new();
    let calls = log();
    emitter.once("x", |_| anyhow::bail!("once failed"));
    emitter.on("x", recorder(&calls, "on"));

    let err = emitter.emit("x", &[]).expect_err("first handler fails");
    assert_eq!(err.invoked(), 1);
    assert_eq!(emitter.listener_count("x"), 1);

    assert_eq!(emitter.emit("x", &[]).expect("emit"), 1);
    assert_eq!(*calls.lock(), vec!["on"]);
}

#[test]
fn test_once_listener_warns_like_on() {
    let (warnings, sink) = warning_collector();
    let emitter =
        EventEmitter::with_config(EmitterConfig::with_max_listeners(1)).with_warning_sink(sink);
    emitter.once("z", |_| Ok(()));
    emitter.once("z", |_| Ok(()));
    assert_eq!(warnings.lock().len(), 1);
}

#[test]
fn test_event_names_and_totals() {
    let emitter = EventEmitter::new();
    emitter.on("y", |_| Ok(()));
    emitter.on("abc", |_| Ok(()));
    emitter.on("x", |_| Ok(()));
    emitter.on("x", |_| Ok(()));
    emitter.once("z", |_| Ok(()));

    assert_eq!(emitter.event_names(), vec!["abc", "x", "y", "z"]);
    assert_eq!(emitter.total_listener_count(), 5);

    emitter.emit("z", &[]).expect("emit");
    assert_eq!(emitter.event_names(), vec!["abc", "x", "y"]);
    assert_eq!(emitter.total_listener_count(), 4);
}
