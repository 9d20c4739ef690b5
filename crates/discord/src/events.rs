use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use seqbot_core::{CommandName, ParameterKind};

use crate::commands::RandomSequenceHandler;

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionEvent {
    pub interaction_id: String,
    pub command_name: String,
    pub arguments: Vec<CommandArgument>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CommandArgument {
    pub name: String,
    pub value: ArgumentValue,
}

impl CommandArgument {
    pub fn new(name: impl Into<String>, value: ArgumentValue) -> Self {
        Self { name: name.into(), value }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentValue {
    SubCommand(Vec<CommandArgument>),
    SubCommandGroup(Vec<CommandArgument>),
    String(String),
    Integer(i64),
    Boolean(bool),
    User(u64),
    Channel(u64),
    Role(u64),
    Mentionable(u64),
    Number(f64),
    Attachment(u64),
    Unknown(String),
}

impl ArgumentValue {
    pub fn kind(&self) -> Option<ParameterKind> {
        let kind = match self {
            Self::SubCommand(_) => ParameterKind::SubCommand,
            Self::SubCommandGroup(_) => ParameterKind::SubCommandGroup,
            Self::String(_) => ParameterKind::String,
            Self::Integer(_) => ParameterKind::Integer,
            Self::Boolean(_) => ParameterKind::Boolean,
            Self::User(_) => ParameterKind::User,
            Self::Channel(_) => ParameterKind::Channel,
            Self::Role(_) => ParameterKind::Role,
            Self::Mentionable(_) => ParameterKind::Mentionable,
            Self::Number(_) => ParameterKind::Number,
            Self::Attachment(_) => ParameterKind::Attachment,
            Self::Unknown(_) => return None,
        };
        Some(kind)
    }

    pub fn type_name(&self) -> String {
        if let Self::Unknown(raw) = self {
            return format!("Unknown({raw})");
        }
        self.kind().map(|kind| kind.to_string()).unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self { content: content.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventContext {
    pub correlation_id: String,
}

impl EventContext {
    pub fn for_event(event: &InteractionEvent) -> Self {
        Self { correlation_id: event.interaction_id.clone() }
    }
}

impl Default for EventContext {
    fn default() -> Self {
        Self { correlation_id: "unknown-correlation-id".to_owned() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandlerResult {
    Responded(Reply),
    Ignored,
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    fn command(&self) -> CommandName;
    async fn handle(&self, event: &InteractionEvent, ctx: &EventContext) -> HandlerResult;
}

/// Routes interaction events to handlers by command name. Names without a handler
/// are ignored rather than treated as errors.
#[derive(Default)]
pub struct CommandDispatcher {
    handlers: HashMap<CommandName, Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<H>(&mut self, handler: H)
    where
        H: CommandHandler + 'static,
    {
        self.handlers.insert(handler.command(), Arc::new(handler));
    }

    pub async fn dispatch(&self, event: &InteractionEvent, ctx: &EventContext) -> HandlerResult {
        let Ok(command) = event.command_name.parse::<CommandName>() else {
            return HandlerResult::Ignored;
        };
        let Some(handler) = self.handlers.get(&command) else {
            return HandlerResult::Ignored;
        };

        handler.handle(event, ctx).await
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Registry commands that have no handler attached.
    pub fn unhandled_commands(&self) -> Vec<CommandName> {
        CommandName::ALL
            .iter()
            .copied()
            .filter(|command| !self.handlers.contains_key(command))
            .collect()
    }
}

pub fn default_dispatcher() -> CommandDispatcher {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register(RandomSequenceHandler);
    dispatcher
}

#[cfg(test)]
mod tests {
    use super::{
        default_dispatcher, ArgumentValue, CommandArgument, CommandDispatcher, EventContext,
        HandlerResult, InteractionEvent,
    };

    fn event(command_name: &str, arguments: Vec<CommandArgument>) -> InteractionEvent {
        InteractionEvent {
            interaction_id: "int-1".to_owned(),
            command_name: command_name.to_owned(),
            arguments,
        }
    }

    #[tokio::test]
    async fn dispatcher_routes_random_sequence() {
        let dispatcher = default_dispatcher();
        let event = event(
            "random-sequence",
            vec![CommandArgument::new("count", ArgumentValue::Integer(5))],
        );

        let result = dispatcher.dispatch(&event, &EventContext::for_event(&event)).await;

        assert!(matches!(result, HandlerResult::Responded(_)));
    }

    #[tokio::test]
    async fn dispatcher_ignores_unknown_command_names() {
        let dispatcher = default_dispatcher();
        let event = event("slynickel", vec![]);

        let result = dispatcher.dispatch(&event, &EventContext::default()).await;

        assert_eq!(result, HandlerResult::Ignored);
    }

    #[tokio::test]
    async fn dispatcher_returns_ignored_when_no_handler_registered() {
        let dispatcher = CommandDispatcher::new();
        let event = event(
            "random-sequence",
            vec![CommandArgument::new("count", ArgumentValue::Integer(3))],
        );

        let result = dispatcher.dispatch(&event, &EventContext::default()).await;

        assert_eq!(result, HandlerResult::Ignored);
        assert_eq!(dispatcher.unhandled_commands().len(), 1);
    }

    #[test]
    fn default_dispatcher_covers_every_registered_command() {
        let dispatcher = default_dispatcher();

        assert_eq!(dispatcher.handler_count(), 1);
        assert!(dispatcher.unhandled_commands().is_empty());
    }

    #[test]
    fn argument_type_names_match_platform_vocabulary() {
        assert_eq!(ArgumentValue::String("x".to_owned()).type_name(), "String");
        assert_eq!(ArgumentValue::Channel(1).type_name(), "Channel");
        assert_eq!(
            ArgumentValue::Unknown("Autocomplete".to_owned()).type_name(),
            "Unknown(Autocomplete)"
        );
    }
}
