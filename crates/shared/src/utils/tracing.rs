use std::sync::Once;

use time::format_description::well_known::Iso8601;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::Pretty, time::UtcTime},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    Layer,
};
use tracing_web::{performance_layer, MakeWebConsoleWriter};
use wasm_bindgen::JsValue;

/// Events at `max_level` and above go to the worker's console. Spans are
/// timed on the performance timeline regardless of level.
pub fn configure_tracing(max_level: LevelFilter) -> Result<(), TryInitError> {
    let console = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_timer(UtcTime::new(Iso8601::DEFAULT))
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(max_level);
    let timeline = performance_layer().with_details_from_fields(Pretty::default());

    tracing_subscriber::registry().with(console).with(timeline).try_init()
}

/// Every event handler calls this, only the first call installs a subscriber
pub fn configure_tracing_once() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        let level = if cfg!(debug_assertions) { LevelFilter::DEBUG } else { LevelFilter::INFO };
        if let Err(e) = configure_tracing(level) {
            web_sys::console::error_1(&JsValue::from(format!("Tracing not configured: {e}")));
        }
    });
}
