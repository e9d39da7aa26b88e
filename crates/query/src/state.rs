use crate::Error;

/// Observable state of a read.
#[derive(Clone, Debug, PartialEq)]
pub enum QueryState<T> {
    /// The read cannot be issued: no actor connection, or a required
    /// parameter is missing.
    Disabled,

    /// Not resolved yet.
    Pending,

    /// The last attempt failed.
    Error(Error),

    /// Data is available.
    Success(T),
}

impl<T> QueryState<T> {
    /// Whether the read is disabled or still pending.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Disabled | Self::Pending)
    }

    /// The data, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Consumes the state, returning the data if any.
    #[must_use]
    pub fn into_data(self) -> Option<T> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    /// Maps the data, keeping every other state.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
        match self {
            Self::Disabled => QueryState::Disabled,
            Self::Pending => QueryState::Pending,
            Self::Error(error) => QueryState::Error(error),
            Self::Success(data) => QueryState::Success(f(data)),
        }
    }
}

impl<T: Default> QueryState<T> {
    /// The data, or its default while loading or failed. Dashboards render
    /// empty lists rather than blocking on a read.
    #[must_use]
    pub fn unwrap_or_default(self) -> T {
        self.into_data().unwrap_or_default()
    }
}
