//! Rolling Logger
//!
//! Keeps the most recent log lines in a circular buffer so the UI can show
//! them. `log` records are bridged into `tracing` by the subscriber.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex, OnceLock};

use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

static BUFFER: OnceLock<LogBuffer> = OnceLock::new();

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// One formatted log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub level: Level,
    pub text: String,
}

/// Shared ring buffer of formatted lines, oldest first
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<LogLine>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, line: LogLine) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    pub fn lines(&self) -> Vec<LogLine> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

/// Tracing layer writing into a `LogBuffer`
pub struct BufferLayer {
    buffer: LogBuffer,
    app_name: String,
    min_level: Level,
}

impl BufferLayer {
    pub fn new(buffer: LogBuffer, app_name: &str) -> Self {
        Self {
            buffer,
            app_name: app_name.to_string(),
            min_level: Level::DEBUG,
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }
}

/// Collects the message and `key=value` fields of an event
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else if !field.name().starts_with("log.") {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for BufferLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        // Level ordering: TRACE > DEBUG > ... > ERROR
        if level > self.min_level {
            return;
        }
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let text = format!(
            "[{}] [{}] {:<5} {}{}",
            chrono::Local::now().format("%H:%M:%S%.3f"),
            self.app_name,
            level,
            visitor.message,
            visitor.fields
        );
        self.buffer.push(LogLine { level, text });
    }
}

/// Install the global subscriber and return the shared buffer
pub fn init_logger(capacity: usize, app_name: &str) -> Result<LogBuffer, LoggerError> {
    if BUFFER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }
    let buffer = LogBuffer::new(capacity);
    tracing_subscriber::registry()
        .with(BufferLayer::new(buffer.clone(), app_name))
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    BUFFER.set(buffer.clone()).map_err(|_| LoggerError::AlreadyInitialized)?;
    Ok(buffer)
}

/// The buffer installed by `init_logger`
pub fn buffer() -> Option<&'static LogBuffer> {
    BUFFER.get()
}

pub fn info(msg: &str) -> Result<(), LoggerError> {
    BUFFER.get().ok_or(LoggerError::NotInitialized)?;
    log::info!("{}", msg);
    Ok(())
}

pub fn error(msg: &str) -> Result<(), LoggerError> {
    BUFFER.get().ok_or(LoggerError::NotInitialized)?;
    log::error!("{}", msg);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_rolls_over() {
        let buffer = LogBuffer::new(2);
        for i in 0..3 {
            buffer.push(LogLine {
                level: Level::INFO,
                text: i.to_string(),
            });
        }
        let texts: Vec<String> = buffer.lines().into_iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_layer_formats_message_and_fields() {
        let buffer = LogBuffer::new(8);
        let subscriber = tracing_subscriber::registry().with(BufferLayer::new(buffer.clone(), "Test"));

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(item = "x_1", "item placed");
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, Level::INFO);
        assert!(lines[0].text.contains("[Test]"));
        assert!(lines[0].text.contains("item placed item=x_1"));
    }

    #[test]
    fn test_min_level_filters() {
        let buffer = LogBuffer::new(8);
        let layer = BufferLayer::new(buffer.clone(), "Test").with_min_level(Level::WARN);
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("noise");
            tracing::warn!("kept");
        });

        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_helpers_require_init() {
        if buffer().is_none() {
            assert!(matches!(info("x"), Err(LoggerError::NotInitialized)));
        }
    }

    #[test]
    fn test_clear_and_error_messages() {
        let buffer = LogBuffer::new(4);
        buffer.push(LogLine {
            level: Level::WARN,
            text: "x".to_string(),
        });
        buffer.clear();
        assert!(buffer.is_empty());

        assert_eq!(LoggerError::Install("busy".into()).to_string(), "failed to install subscriber: busy");
        assert_eq!(LoggerError::NotInitialized.to_string(), "logger not initialized");
    }
}
