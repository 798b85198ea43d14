use crate::error::QueryError;
use crate::types::Node;

/// Hooks fired synchronously by the session. Every method defaults to a no-op.
pub trait SessionObserver {
    fn on_select(&self, _node: &Node) {}
    fn on_expand(&self, _node: &Node) {}
    fn on_collapse(&self, _node: &Node) {}
    fn on_copy(&self, _text: &str) {}
    fn on_filter(&self, _text: &str) {}
    fn on_error(&self, _error: &QueryError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Forwards query errors and copies to `tracing`; the TUI has nowhere else
/// to put them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl SessionObserver for LogObserver {
    fn on_copy(&self, text: &str) {
        tracing::debug!(bytes = text.len(), "copied to clipboard");
    }

    fn on_filter(&self, text: &str) {
        tracing::debug!(input = text, "input committed");
    }

    fn on_error(&self, error: &QueryError) {
        tracing::warn!(%error, "query failed");
    }
}

impl<T: SessionObserver + ?Sized> SessionObserver for std::sync::Arc<T> {
    fn on_select(&self, node: &Node) {
        (**self).on_select(node)
    }
    fn on_expand(&self, node: &Node) {
        (**self).on_expand(node)
    }
    fn on_collapse(&self, node: &Node) {
        (**self).on_collapse(node)
    }
    fn on_copy(&self, text: &str) {
        (**self).on_copy(text)
    }
    fn on_filter(&self, text: &str) {
        (**self).on_filter(text)
    }
    fn on_error(&self, error: &QueryError) {
        (**self).on_error(error)
    }
}
