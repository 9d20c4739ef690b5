use async_trait::async_trait;
use seqbot_core::{CommandDefinition, CommandName};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("gateway failed to connect: {0}")]
    Connect(String),
    #[error("cannot create '{command}' command: {reason}")]
    Register { command: CommandName, reason: String },
    #[error("cannot delete '{command}' command: {reason}")]
    Deregister { command: CommandName, reason: String },
    #[error("gateway disconnect failed: {0}")]
    Disconnect(String),
}

/// Where command definitions are visible.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationScope {
    Global,
    Guild(u64),
}

impl RegistrationScope {
    pub fn from_guild_id(guild_id: Option<u64>) -> Self {
        guild_id.map_or(Self::Global, Self::Guild)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Global => "global".to_owned(),
            Self::Guild(id) => format!("guild:{id}"),
        }
    }
}

/// Handle returned by the platform for a created command; only used to delete it again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredCommand {
    pub id: u64,
    pub name: CommandName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotIdentity {
    pub user_id: u64,
    pub username: String,
}

#[async_trait]
pub trait CommandGateway: Send + Sync {
    async fn connect(&self) -> Result<BotIdentity, GatewayError>;
    async fn register_command(
        &self,
        scope: RegistrationScope,
        definition: &CommandDefinition,
    ) -> Result<RegisteredCommand, GatewayError>;
    async fn deregister_command(
        &self,
        scope: RegistrationScope,
        command: &RegisteredCommand,
    ) -> Result<(), GatewayError>;
    async fn disconnect(&self) -> Result<(), GatewayError>;
}
