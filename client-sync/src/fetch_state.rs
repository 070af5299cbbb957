/// Where a piece of remote data is in its lifecycle.
///
/// `Empty` means the server answered with nothing; a failed request is an
/// `Error`, never `Empty`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    NotFetched,
    Loading,
    Loaded(T),
    Empty,
    Error(String),
}

impl<T> FetchState<T> {
    /// The loaded value, if there is one.
    pub fn as_ref(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// True once the server has answered successfully, with or without
    /// data.
    pub fn is_fetched(&self) -> bool {
        matches!(self, FetchState::Loaded(_) | FetchState::Empty)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchState<U> {
        match self {
            FetchState::NotFetched => FetchState::NotFetched,
            FetchState::Loading => FetchState::Loading,
            FetchState::Loaded(value) => FetchState::Loaded(f(value)),
            FetchState::Empty => FetchState::Empty,
            FetchState::Error(e) => FetchState::Error(e),
        }
    }
}

impl<T> FetchState<Vec<T>> {
    /// `Loaded` for a non-empty list, `Empty` otherwise.
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            FetchState::Empty
        } else {
            FetchState::Loaded(items)
        }
    }
}

impl<T> From<Result<T, String>> for FetchState<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(value) => FetchState::Loaded(value),
            Err(e) => FetchState::Error(e),
        }
    }
}
