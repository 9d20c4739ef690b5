use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serenity::all::{
    ApplicationId, Client, Command, CommandDataOption, CommandDataOptionValue, CommandId,
    CommandInteraction, CommandOptionType, Context, CreateCommand, CreateCommandOption,
    CreateInteractionResponse, CreateInteractionResponseMessage, EventHandler, GatewayIntents,
    GuildId, Http, Interaction, Ready, ShardManager,
};
use seqbot_core::{CommandDefinition, ParameterKind, ParameterSpec};
use tokio::{
    sync::{oneshot, Mutex},
    task::JoinHandle,
};
use tracing::{debug, error, info, warn};

use crate::{
    events::{
        ArgumentValue, CommandArgument, CommandDispatcher, EventContext, HandlerResult,
        InteractionEvent,
    },
    gateway::{BotIdentity, CommandGateway, GatewayError, RegisteredCommand, RegistrationScope},
};

type ReadySlot = Arc<StdMutex<Option<oneshot::Sender<Result<ReadyInfo, String>>>>>;

struct ReadyInfo {
    identity: BotIdentity,
    application_id: ApplicationId,
}

struct Connection {
    http: Arc<Http>,
    shard_manager: Arc<ShardManager>,
    runner: JoinHandle<()>,
}

/// Gateway backed by a `serenity` client. Websocket handling, heartbeats, rate limits and
/// reconnects stay inside serenity.
pub struct SerenityGateway {
    token: SecretString,
    intents: GatewayIntents,
    dispatcher: Arc<CommandDispatcher>,
    connection: Mutex<Option<Connection>>,
}

impl SerenityGateway {
    pub fn new(token: SecretString, dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            token,
            intents: GatewayIntents::GUILDS,
            dispatcher,
            connection: Mutex::new(None),
        }
    }

    async fn http(&self) -> Option<Arc<Http>> {
        self.connection.lock().await.as_ref().map(|connection| connection.http.clone())
    }
}

#[async_trait]
impl CommandGateway for SerenityGateway {
    async fn connect(&self) -> Result<BotIdentity, GatewayError> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let ready_slot: ReadySlot = Arc::new(StdMutex::new(Some(ready_tx)));
        let relay =
            InteractionRelay { dispatcher: self.dispatcher.clone(), ready: ready_slot.clone() };

        let mut client = Client::builder(self.token.expose_secret(), self.intents)
            .event_handler(relay)
            .await
            .map_err(|error| GatewayError::Connect(error.to_string()))?;

        let http = client.http.clone();
        let shard_manager = client.shard_manager.clone();
        let runner = tokio::spawn(async move {
            if let Err(error) = client.start().await {
                error!(
                    event_name = "system.gateway.client_stopped",
                    error = %error,
                    "gateway client stopped"
                );
                signal_ready(&ready_slot, Err(error.to_string()));
            }
        });

        let ready = match ready_rx.await {
            Ok(Ok(ready)) => ready,
            Ok(Err(reason)) => return Err(GatewayError::Connect(reason)),
            Err(_) => {
                return Err(GatewayError::Connect("gateway closed before becoming ready".to_owned()))
            }
        };
        http.set_application_id(ready.application_id);

        *self.connection.lock().await = Some(Connection { http, shard_manager, runner });
        Ok(ready.identity)
    }

    async fn register_command(
        &self,
        scope: RegistrationScope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand, GatewayError> {
        let register_error =
            |reason: String| GatewayError::Register { command: definition.name, reason };
        let http =
            self.http().await.ok_or_else(|| register_error("gateway is not connected".to_owned()))?;

        let builder = create_command(definition);
        let created = match scope {
            RegistrationScope::Global => Command::create_global_command(&http, builder).await,
            RegistrationScope::Guild(id) => GuildId::new(id).create_command(&http, builder).await,
        }
        .map_err(|error| register_error(error.to_string()))?;

        Ok(RegisteredCommand { id: created.id.get(), name: definition.name })
    }

    async fn deregister_command(
        &self,
        scope: RegistrationScope,
        command: &RegisteredCommand,
    ) -> Result<(), GatewayError> {
        let deregister_error =
            |reason: String| GatewayError::Deregister { command: command.name, reason };
        let http = self
            .http()
            .await
            .ok_or_else(|| deregister_error("gateway is not connected".to_owned()))?;

        let command_id = CommandId::new(command.id);
        match scope {
            RegistrationScope::Global => Command::delete_global_command(&http, command_id).await,
            RegistrationScope::Guild(id) => {
                GuildId::new(id).delete_command(&http, command_id).await
            }
        }
        .map_err(|error| deregister_error(error.to_string()))
    }

    async fn disconnect(&self) -> Result<(), GatewayError> {
        let Some(connection) = self.connection.lock().await.take() else {
            return Ok(());
        };

        connection.shard_manager.shutdown_all().await;
        connection.runner.await.map_err(|error| GatewayError::Disconnect(error.to_string()))
    }
}

struct InteractionRelay {
    dispatcher: Arc<CommandDispatcher>,
    ready: ReadySlot,
}

#[async_trait]
impl EventHandler for InteractionRelay {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            event_name = "system.gateway.ready",
            username = %ready.user.name,
            "logged in as: {}",
            ready.user.tag()
        );
        signal_ready(
            &self.ready,
            Ok(ReadyInfo {
                identity: BotIdentity {
                    user_id: ready.user.id.get(),
                    username: ready.user.name.clone(),
                },
                application_id: ready.application.id,
            }),
        );
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        let event = interaction_event(&command);
        let context = EventContext::for_event(&event);
        let HandlerResult::Responded(reply) = self.dispatcher.dispatch(&event, &context).await
        else {
            debug!(
                event_name = "interaction.ignored",
                correlation_id = %context.correlation_id,
                command = %event.command_name,
                "no handler for command"
            );
            return;
        };

        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(reply.content),
        );
        if let Err(error) = command.create_response(&ctx.http, response).await {
            warn!(
                event_name = "interaction.reply_failed",
                correlation_id = %context.correlation_id,
                error = %error,
                "failed to send interaction reply"
            );
        }
    }
}

fn signal_ready(slot: &ReadySlot, outcome: Result<ReadyInfo, String>) {
    let sender = slot.lock().ok().and_then(|mut sender| sender.take());
    if let Some(sender) = sender {
        let _ = sender.send(outcome);
    }
}

pub fn create_command(definition: &CommandDefinition) -> CreateCommand {
    definition.parameters.iter().fold(
        CreateCommand::new(definition.name.as_str()).description(&definition.description),
        |command, parameter| command.add_option(create_option(parameter)),
    )
}

fn create_option(parameter: &ParameterSpec) -> CreateCommandOption {
    let kind = option_type(parameter.kind);
    let mut option = CreateCommandOption::new(kind, &parameter.name, &parameter.description)
        .required(parameter.required);

    // serenity only takes unsigned integer bounds; negatives go through the number setter.
    if let Some(min) = parameter.min_value {
        option = match u64::try_from(min) {
            Ok(min) => option.min_int_value(min),
            Err(_) => option.min_number_value(min as f64),
        };
    }
    if let Some(max) = parameter.max_value {
        option = match u64::try_from(max) {
            Ok(max) => option.max_int_value(max),
            Err(_) => option.max_number_value(max as f64),
        };
    }

    option
}

fn option_type(kind: ParameterKind) -> CommandOptionType {
    match kind {
        ParameterKind::SubCommand => CommandOptionType::SubCommand,
        ParameterKind::SubCommandGroup => CommandOptionType::SubCommandGroup,
        ParameterKind::String => CommandOptionType::String,
        ParameterKind::Integer => CommandOptionType::Integer,
        ParameterKind::Boolean => CommandOptionType::Boolean,
        ParameterKind::User => CommandOptionType::User,
        ParameterKind::Channel => CommandOptionType::Channel,
        ParameterKind::Role => CommandOptionType::Role,
        ParameterKind::Mentionable => CommandOptionType::Mentionable,
        ParameterKind::Number => CommandOptionType::Number,
        ParameterKind::Attachment => CommandOptionType::Attachment,
    }
}

fn interaction_event(command: &CommandInteraction) -> InteractionEvent {
    InteractionEvent {
        interaction_id: command.id.to_string(),
        command_name: command.data.name.clone(),
        arguments: command.data.options.iter().map(command_argument).collect(),
    }
}

fn command_argument(option: &CommandDataOption) -> CommandArgument {
    CommandArgument::new(option.name.clone(), argument_value(&option.value))
}

fn argument_value(value: &CommandDataOptionValue) -> ArgumentValue {
    match value {
        CommandDataOptionValue::SubCommand(options) => {
            ArgumentValue::SubCommand(options.iter().map(command_argument).collect())
        }
        CommandDataOptionValue::SubCommandGroup(options) => {
            ArgumentValue::SubCommandGroup(options.iter().map(command_argument).collect())
        }
        CommandDataOptionValue::String(value) => ArgumentValue::String(value.clone()),
        CommandDataOptionValue::Integer(value) => ArgumentValue::Integer(*value),
        CommandDataOptionValue::Boolean(value) => ArgumentValue::Boolean(*value),
        CommandDataOptionValue::User(id) => ArgumentValue::User(id.get()),
        CommandDataOptionValue::Channel(id) => ArgumentValue::Channel(id.get()),
        CommandDataOptionValue::Role(id) => ArgumentValue::Role(id.get()),
        CommandDataOptionValue::Mentionable(id) => ArgumentValue::Mentionable(id.get()),
        CommandDataOptionValue::Number(value) => ArgumentValue::Number(*value),
        CommandDataOptionValue::Attachment(id) => ArgumentValue::Attachment(id.get()),
        other => ArgumentValue::Unknown(format!("{:?}", other.kind())),
    }
}

#[cfg(test)]
mod tests {
    use seqbot_core::{command_definitions, CommandName};
    use serenity::all::{CommandDataOptionValue, UserId};

    use super::{argument_value, create_command};
    use crate::events::ArgumentValue;

    #[test]
    fn command_builder_carries_name_and_bounded_integer_option() {
        let definition = CommandName::RandomSequence.definition();
        let payload = serde_json::to_value(create_command(&definition)).expect("serializable");

        assert_eq!(payload["name"], "random-sequence");
        let option = &payload["options"][0];
        assert_eq!(option["name"], "count");
        assert_eq!(option["required"], true);
        assert_eq!(option["min_value"], 2);
        assert_eq!(option["max_value"], 100);
    }

    #[test]
    fn every_registry_entry_builds() {
        for definition in command_definitions() {
            let payload = serde_json::to_value(create_command(&definition)).expect("serializable");
            assert_eq!(payload["name"], definition.name.as_str());
        }
    }

    #[test]
    fn option_values_keep_their_platform_type() {
        assert_eq!(
            argument_value(&CommandDataOptionValue::Integer(12)),
            ArgumentValue::Integer(12)
        );
        assert_eq!(
            argument_value(&CommandDataOptionValue::String("twelve".to_owned())),
            ArgumentValue::String("twelve".to_owned())
        );
        assert_eq!(
            argument_value(&CommandDataOptionValue::User(UserId::new(99))),
            ArgumentValue::User(99)
        );
    }
}
