//! Lifecycle of one asynchronous fetch as seen by presentation.

use crate::error::ErrorInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Ready { data: T },
    Error { cause: ErrorInfo },
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, ErrorInfo>) -> Self {
        match result {
            Ok(data) => ViewState::Ready { data },
            Err(cause) => ViewState::Error { cause },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    /// `Ready` and `Error` end a fetch.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready { data } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            ViewState::Error { cause } => Some(cause),
            _ => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready { data } => ViewState::Ready { data: f(data) },
            ViewState::Error { cause } => ViewState::Error { cause },
        }
    }
}
