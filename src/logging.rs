//! Logging: tracing events forwarded to the browser console
//!
//! The completion engine logs through `tracing` and never touches the console
//! directly, so it runs unchanged in native tests. On the JS side `initLogging`
//! installs a subscriber whose `ConsoleLayer` maps levels onto
//! `console.error / warn / log / debug`.

use std::fmt::Write as _;

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use wasm_bindgen::prelude::*;

/// Collects the message and structured fields of one event
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields.push((field.name(), format!("{:?}", value)));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }
}

/// `[target] message key=value ...`
fn format_line(target: &str, message: &str, fields: &[(&'static str, String)]) -> String {
    let mut line = format!("[{}] {}", target, message);
    for (name, value) in fields {
        let _ = write!(line, " {}={}", name, value);
    }
    line
}

/// `"warn"`, `"DEBUG"`, ... -> level filter. Unknown names fall back to INFO.
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "warn" | "warning" => LevelFilter::WARN,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    }
}

/// A [`tracing_subscriber::Layer`] that writes events to the browser console
pub struct ConsoleLayer;

impl<S> tracing_subscriber::Layer<S> for ConsoleLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        let message = if visitor.message.is_empty() {
            metadata.name()
        } else {
            visitor.message.as_str()
        };
        let line = JsValue::from_str(&format_line(metadata.target(), message, &visitor.fields));

        match *metadata.level() {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::log_1(&line),
            Level::DEBUG | Level::TRACE => web_sys::console::debug_1(&line),
        }
    }
}

/// Install the console subscriber. Returns `false` if one was already set.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) -> bool {
    let subscriber = tracing_subscriber::registry()
        .with(parse_level(level))
        .with(ConsoleLayer);
    tracing::subscriber::set_global_default(subscriber).is_ok()
}
