use thiserror::Error;

/// Fatal problems with the export document. Unresolved references are not
/// errors; the mapper drops those and counts them instead.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("malformed Trello export: {0}")]
    Json(#[from] serde_json::Error),

    #[error("card {card}: invalid {field} timestamp {value:?}")]
    InvalidTimestamp {
        card: String,
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("action #{index} ({action_type}) is missing data.{field}")]
    MissingActionField {
        index: usize,
        action_type: String,
        field: &'static str,
    },
}
