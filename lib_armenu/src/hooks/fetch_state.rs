use crate::retrieve::errors::MenuError;

/// What a hook currently holds.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing requested yet.
    Idle,
    Loading,
    Ready(T),
    Failed(MenuError),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Idle
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&MenuError> {
        match self {
            FetchState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// A failure that the UI renders as an empty "not found" state rather
    /// than an error with a retry button.
    pub fn is_not_found(&self) -> bool {
        self.error().is_some_and(MenuError::is_not_found)
    }

    pub fn into_result(self) -> Option<Result<T, MenuError>> {
        match self {
            FetchState::Ready(data) => Some(Ok(data)),
            FetchState::Failed(e) => Some(Err(e)),
            FetchState::Idle | FetchState::Loading => None,
        }
    }
}
