//! Client error taxonomy.

use thiserror::Error;

/// Errors surfaced by the SDK. Nothing is retried; nothing is swallowed.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The network layer failed to deliver a request or decode a response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server reported an error for a mutation.
    #[error("{0}")]
    Mutation(String),

    /// The server reported success but returned no payload.
    #[error("{0}")]
    EmptyResult(&'static str),

    /// A generation-scoped call was made without a generation id.
    #[error("Generation ID is required")]
    MissingGenerationId,

    /// The activation endpoint rejected the code.
    #[error("{0}")]
    Activation(String),

    /// The auth provider failed to establish a session.
    #[error("Session error: {0}")]
    Session(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ClientError::Mutation("slug already exists".into()).to_string(),
            "slug already exists"
        );
        assert_eq!(
            ClientError::EmptyResult("Failed to create tag").to_string(),
            "Failed to create tag"
        );
        assert_eq!(
            ClientError::MissingGenerationId.to_string(),
            "Generation ID is required"
        );
    }
}
