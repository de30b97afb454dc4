// Expected negative results
//
// Not-found and already-exists answers are data the caller branches on,
// not failures. Everything else goes through `Error`.

/// Result of a route call that reached a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum Outcome<T> {
    /// The API accepted the call.
    Success(T),
    /// HTTP 404: the target does not exist or is not visible to the user.
    NotFound,
    /// HTTP 409: the API refused the write, with the server's message.
    Conflict(String),
    /// The session's name index already holds an entity with this name.
    /// No request was sent.
    AlreadyExists { name: String, id: String },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The success value, dropping negative verdicts.
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::NotFound => Outcome::NotFound,
            Self::Conflict(message) => Outcome::Conflict(message),
            Self::AlreadyExists { name, id } => Outcome::AlreadyExists { name, id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_preserves_negative_variants() {
        let conflict: Outcome<u8> = Outcome::Conflict("dup".into());
        assert_eq!(conflict.map(u16::from), Outcome::Conflict("dup".into()));

        let exists: Outcome<u8> = Outcome::AlreadyExists {
            name: "a".into(),
            id: "b".into(),
        };
        assert!(!exists.is_success());
        assert!(exists.success().is_none());
    }

    #[test]
    fn success_unwraps_value() {
        let out = Outcome::Success(3).map(|v| v * 2);
        assert_eq!(out.as_success(), Some(&6));
        assert_eq!(out.success(), Some(6));
    }
}
