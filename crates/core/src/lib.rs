pub mod config;
pub mod errors;
pub mod registry;
pub mod sequence;

pub use errors::InteractionError;
pub use registry::{
    command_definitions, CommandDefinition, CommandName, ParameterKind, ParameterSpec,
};
pub use sequence::{random_sequence, SequenceError, SequenceRequest};
