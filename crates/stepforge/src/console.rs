//! Console output for solver events.
//!
//! Provides a `tracing` layer that prints the solver's lifecycle events as
//! one line each.

use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::OnceLock;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

/// Directive used when `RUST_LOG` is not set.
pub const DEFAULT_DIRECTIVE: &str = "stepforge=info";

/// Initializes console logging.
///
/// Safe to call multiple times - only the first call has effect. Honors
/// `RUST_LOG`, falling back to [`DEFAULT_DIRECTIVE`]. Does nothing if another
/// global subscriber is already installed.
pub fn init_console_logging() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SolverConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats solver events.
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("stepforge") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let line = format_event(metadata.level().as_str(), &visitor);
        let _ = writeln!(io::stdout().lock(), "{}", line);
    }
}

#[derive(Default)]
struct EventVisitor {
    message: String,
    event: Option<String>,
    fields: Vec<(&'static str, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_str(field, &format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "event" => self.event = Some(value.trim_matches('"').to_string()),
            name => self.fields.push((name, value.trim_matches('"').to_string())),
        }
    }
}

fn format_event(level: &str, visitor: &EventVisitor) -> String {
    let mut line = format!("{:>5} ", level);
    if let Some(event) = &visitor.event {
        let _ = write!(line, "[{}] ", event);
    }
    line.push_str(&visitor.message);
    for (name, value) in &visitor.fields {
        let _ = write!(line, " {}=({})", name, value);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_event_lists_fields_in_order() {
        let visitor = EventVisitor {
            message: "Local search phase ended".to_string(),
            event: Some("phase_end".to_string()),
            fields: vec![("phase_index", "0".to_string()), ("steps", "12".to_string())],
        };

        assert_eq!(
            format_event("INFO", &visitor),
            " INFO [phase_end] Local search phase ended phase_index=(0) steps=(12)"
        );
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_console_logging();
        init_console_logging();
        tracing::info!(event = "test", "Console logging initialised");
    }
}
