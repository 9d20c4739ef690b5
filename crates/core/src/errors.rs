use thiserror::Error;

use crate::sequence::SequenceError;

pub const ERROR_REPLY_PREFIX: &str = "Something went wrong on our side...";

/// Malformed interactions. These are answered in-channel and never stop the process.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InteractionError {
    #[error("option list length is {0} not 1")]
    ArgumentCount(usize),
    #[error("expected an integer option but got {0}")]
    ArgumentType(String),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl InteractionError {
    pub fn user_message(&self) -> String {
        format!("{ERROR_REPLY_PREFIX} ({self})")
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{InteractionError, ERROR_REPLY_PREFIX};
    use crate::registry::ParameterKind;
    use crate::sequence::SequenceError;

    #[test]
    fn argument_count_message_carries_observed_length() {
        let message = InteractionError::ArgumentCount(2).user_message();

        assert!(message.starts_with(ERROR_REPLY_PREFIX));
        assert!(message.contains("option list length is 2 not 1"));
    }

    #[test]
    fn argument_type_message_names_the_offending_type() {
        let message =
            InteractionError::ArgumentType(ParameterKind::String.to_string()).user_message();
        assert!(message.contains("String"));
    }

    #[test]
    fn sequence_errors_surface_their_bounds() {
        let message = InteractionError::from(SequenceError::OutOfRange {
            value: 1,
            min: 2,
            max: 100,
        })
        .user_message();

        assert!(message.contains("count 1 is outside the supported range 2..=100"));
    }
}
