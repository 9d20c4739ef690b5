//! Declarative command surface registered with the chat platform.
//!
//! Every command the bot exposes is a [`CommandName`] variant. `as_str` and
//! `definition` match exhaustively, so a variant cannot exist without a wire name and
//! a definition. Dispatchers key their handlers by the same enum.

use std::fmt;
use std::str::FromStr;

pub const SEQUENCE_MIN: i64 = 2;
pub const SEQUENCE_MAX: i64 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandName {
    RandomSequence,
}

impl CommandName {
    pub const ALL: &'static [CommandName] = &[CommandName::RandomSequence];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RandomSequence => "random-sequence",
        }
    }

    pub fn definition(self) -> CommandDefinition {
        match self {
            Self::RandomSequence => CommandDefinition {
                name: self,
                description: "Random sequence of integers from 1 to the number you select"
                    .to_owned(),
                parameters: vec![ParameterSpec {
                    kind: ParameterKind::Integer,
                    name: "count".to_owned(),
                    description: format!(
                        "The number of random numbers to generate a sequence of \
                         ({SEQUENCE_MIN}-{SEQUENCE_MAX})"
                    ),
                    required: true,
                    min_value: Some(SEQUENCE_MIN),
                    max_value: Some(SEQUENCE_MAX),
                }],
            },
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

impl FromStr for CommandName {
    type Err = UnknownCommand;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == value)
            .ok_or_else(|| UnknownCommand(value.to_owned()))
    }
}

/// Option types understood by the platform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    SubCommand,
    SubCommandGroup,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
}

impl ParameterKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SubCommand => "SubCommand",
            Self::SubCommandGroup => "SubCommandGroup",
            Self::String => "String",
            Self::Integer => "Integer",
            Self::Boolean => "Boolean",
            Self::User => "User",
            Self::Channel => "Channel",
            Self::Role => "Role",
            Self::Mentionable => "Mentionable",
            Self::Number => "Number",
            Self::Attachment => "Attachment",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSpec {
    pub kind: ParameterKind,
    pub name: String,
    pub description: String,
    pub required: bool,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandDefinition {
    pub name: CommandName,
    pub description: String,
    pub parameters: Vec<ParameterSpec>,
}

pub fn command_definitions() -> Vec<CommandDefinition> {
    CommandName::ALL.iter().map(|name| name.definition()).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{command_definitions, CommandName, ParameterKind, SEQUENCE_MAX, SEQUENCE_MIN};

    #[test]
    fn registry_exposes_single_random_sequence_command() {
        let definitions = command_definitions();

        assert_eq!(definitions.len(), 1);
        let definition = &definitions[0];
        assert_eq!(definition.name.as_str(), "random-sequence");
        assert_eq!(definition.parameters.len(), 1);

        let count = &definition.parameters[0];
        assert_eq!(count.kind, ParameterKind::Integer);
        assert_eq!(count.name, "count");
        assert!(count.required);
        assert_eq!(count.min_value, Some(SEQUENCE_MIN));
        assert_eq!(count.max_value, Some(SEQUENCE_MAX));
    }

    #[test]
    fn command_names_are_unique() {
        let names: HashSet<_> = CommandName::ALL.iter().map(|name| name.as_str()).collect();
        assert_eq!(names.len(), CommandName::ALL.len());
    }

    #[test]
    fn command_names_round_trip_through_strings() {
        for name in CommandName::ALL {
            assert_eq!(name.as_str().parse::<CommandName>(), Ok(*name));
        }
        assert!("slynickel".parse::<CommandName>().is_err());
    }
}
