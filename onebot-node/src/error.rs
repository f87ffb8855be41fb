use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while turning node parameters into OneBot API calls.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown resource `{0}`")]
    UnknownResource(String),

    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("operation `{operation}` does not belong to resource `{resource}`")]
    OperationMismatch { resource: String, operation: String },

    #[error("missing parameter `{name}` for item {item}")]
    MissingParameter { name: &'static str, item: usize },

    #[error("parameter `{name}` for item {item} {reason}")]
    InvalidParameter {
        name: &'static str,
        item: usize,
        reason: String,
    },

    #[error("unknown options method `{0}`")]
    UnknownOptionsMethod(String),

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OneBot server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode OneBot response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A 2xx response whose payload reports a failure. Only raised where the
    /// node itself needs `data` (login lookup, option lists).
    #[error("OneBot action `{action}` failed: status={status}, retcode={retcode}")]
    Api {
        action: String,
        status: String,
        retcode: i64,
    },

    #[error("item {index}: {source}")]
    Item {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Attribute this error to an input item.
    pub fn at_item(self, index: usize) -> Self {
        match self {
            Error::Item { .. } => self,
            other => Error::Item {
                index,
                source: Box::new(other),
            },
        }
    }

    /// Index of the input item this error is attributed to, if any.
    pub fn item_index(&self) -> Option<usize> {
        match self {
            Error::Item { index, .. } => Some(*index),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_attribution_is_not_nested() {
        let err = Error::UnknownOperation("send_like".into())
            .at_item(2)
            .at_item(5);

        assert_eq!(err.item_index(), Some(2));
        assert_eq!(err.to_string(), "item 2: unknown operation `send_like`");
    }

    #[test]
    fn status_error_keeps_body() {
        let err = Error::Status {
            status: 404,
            body: "not found".into(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("not found"));
        assert_eq!(err.item_index(), None);
    }
}
