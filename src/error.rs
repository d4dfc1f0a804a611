use thiserror::Error;

/// Fatal failures of a `get` or `delete` invocation.
///
/// Per-item delete failures are not represented here: they are counted in
/// [`crate::mutate::MutationOutcome`] and reported without aborting the batch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("resource type must be specified")]
    MissingResourceType,

    #[error("too many arguments")]
    TooManyArguments,

    #[error("invalid pattern {pattern:?}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown resource {resource:?}")]
    UnknownResourceType {
        resource: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to load Kubernetes configuration")]
    Configuration(#[source] anyhow::Error),

    #[error("failed to list {resource}")]
    Listing {
        resource: String,
        #[source]
        source: kube::Error,
    },

    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn argument_errors_use_plain_messages() {
        assert_eq!(
            Error::MissingResourceType.to_string(),
            "resource type must be specified"
        );
        assert_eq!(Error::TooManyArguments.to_string(), "too many arguments");
    }

    #[test]
    fn unknown_resource_keeps_cause_in_chain() {
        let err = Error::UnknownResourceType {
            resource: String::from("widgets"),
            source: anyhow::anyhow!("the server doesn't have a resource type \"widgets\""),
        };
        let rendered = format!("{:#}", anyhow::Error::from(err));
        assert_eq!(
            rendered,
            "unknown resource \"widgets\": the server doesn't have a resource type \"widgets\""
        );
    }
}
