//! Replays the classic emitter walkthrough: a listener limit of 2, plain and
//! one-shot listeners, variadic arguments, and the warning raised when one
//! event name collects too many listeners.

use emitkit::{args, init_logging, EmitterConfig, EventEmitter, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logging()?;
    tracing::info!("emitkit {} (built {})", VERSION, BUILD_DATE);

    let emitter = EventEmitter::with_config(EmitterConfig::with_max_listeners(2));

    emitter.on("abc", |_| {
        tracing::info!("abc event fired");
        Ok(())
    });
    emitter.on("x", |_| {
        tracing::info!("x event fired 1");
        Ok(())
    });
    emitter.on("x", |_| {
        tracing::info!("x event fired 2");
        Ok(())
    });
    emitter.on("y", |_| {
        tracing::info!("y event fired");
        Ok(())
    });
    emitter.once("z", |_| {
        tracing::info!("z event fired");
        Ok(())
    });
    emitter.on("a", |args| {
        let [a, b, c] = [0usize, 1, 2].map(|i| args.get(i).cloned().unwrap_or_default());
        tracing::info!(%a, %b, %c, "a event fired");
        Ok(())
    });

    for name in ["abc", "x", "y"] {
        emitter.emit(name, &[])?;
    }
    emitter.emit("a", &args![1, 2, 3])?;

    // Only the first dispatch reaches the one-shot listener
    for _ in 0..3 {
        let invoked = emitter.emit("z", &[])?;
        tracing::info!(invoked, "Emitted z");
    }

    // A third listener on "x" goes over the limit: reported, not rejected
    emitter.on("x", |_| {
        tracing::info!("x event fired 3");
        Ok(())
    });
    let invoked = emitter.emit("x", &[])?;
    tracing::info!(invoked, "Emitted x");

    tracing::info!(
        events = ?emitter.event_names(),
        listeners = emitter.total_listener_count(),
        "Registry state"
    );

    Ok(())
}
