/// User-facing error presentation: a short title plus a message.
pub trait ErrorSink: Send + Sync {
    fn show_error(&self, title: &str, message: &str);
}

/// Prints errors on stderr, the CLI's only presentation surface.
pub struct StderrSink;

impl ErrorSink for StderrSink {
    fn show_error(&self, title: &str, message: &str) {
        eprintln!("[{title}] {message}");
    }
}

#[derive(Debug, Clone, Default)]
pub struct ErrorReport<'a> {
    pub message: &'a str,
    pub log_message: Option<&'a str>,
    pub component: Option<&'a str>,
    pub method: Option<&'a str>,
}

impl<'a> ErrorReport<'a> {
    pub fn new(message: &'a str) -> Self {
        Self {
            message,
            ..Default::default()
        }
    }

    pub fn logged_from(mut self, component: &'a str, method: &'a str) -> Self {
        self.component = Some(component);
        self.method = Some(method);
        self
    }
}

/// Shows the error to the user, and writes a log record when the origin is known.
pub fn report(sink: &dyn ErrorSink, title: &str, report: ErrorReport<'_>) {
    if let Some(component) = report.component {
        log::error!(
            target: "scenedeck::diagnostics",
            "{}::{}: {}",
            component,
            report.method.unwrap_or("?"),
            report.log_message.unwrap_or(report.message)
        );
    }
    sink.show_error(title, report.message);
}

/// Keeps every shown error so tests can inspect them.
#[cfg(test)]
#[derive(Default)]
pub struct CollectingSink {
    shown: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl CollectingSink {
    pub fn shown(&self) -> Vec<(String, String)> {
        self.shown.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
impl ErrorSink for CollectingSink {
    fn show_error(&self, title: &str, message: &str) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push((title.to_string(), message.to_string()));
        }
    }
}
