use std::sync::Arc;

use seqbot_core::{command_definitions, config::AppConfig};
use seqbot_discord::{
    client::SerenityGateway,
    events::{default_dispatcher, CommandDispatcher},
    gateway::{CommandGateway, RegistrationScope},
    session::{SessionManager, SessionSettings},
};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub session: SessionManager,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("registered commands have no handler: {0}")]
    UnhandledCommands(String),
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let dispatcher = Arc::new(checked_dispatcher(default_dispatcher())?);
    let gateway = Arc::new(SerenityGateway::new(config.discord.token.clone(), dispatcher));
    let session = session_for(&config, gateway);

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        scope = %session.settings().scope.label(),
        remove_commands = session.settings().remove_commands,
        "application bootstrap complete"
    );
    Ok(Application { config, session })
}

pub fn session_for(config: &AppConfig, gateway: Arc<dyn CommandGateway>) -> SessionManager {
    let settings = SessionSettings {
        scope: RegistrationScope::from_guild_id(config.discord.guild_id),
        remove_commands: config.discord.remove_commands,
        registration_policy: config.discord.registration_policy,
    };
    SessionManager::new(gateway, command_definitions(), settings)
}

fn checked_dispatcher(dispatcher: CommandDispatcher) -> Result<CommandDispatcher, BootstrapError> {
    let unhandled = dispatcher.unhandled_commands();
    if unhandled.is_empty() {
        return Ok(dispatcher);
    }

    let names = unhandled.iter().map(|name| name.as_str()).collect::<Vec<_>>();
    Err(BootstrapError::UnhandledCommands(names.join(", ")))
}

#[cfg(test)]
mod tests {
    use seqbot_core::config::{AppConfig, ConfigOverrides, LoadOptions, RegistrationPolicy};
    use seqbot_discord::{events::CommandDispatcher, gateway::RegistrationScope};

    use super::{bootstrap_with_config, checked_dispatcher, BootstrapError};

    fn config(guild: Option<&str>, remove_commands: Option<bool>) -> AppConfig {
        AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                discord_token: Some("X".to_string()),
                discord_guild_id: guild.map(str::to_string),
                remove_commands,
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("config with a token should load")
    }

    #[test]
    fn bootstrap_registers_globally_with_cleanup_by_default() {
        let app = bootstrap_with_config(config(Some(""), None)).expect("bootstrap");
        let settings = app.session.settings();

        assert_eq!(settings.scope, RegistrationScope::Global);
        assert!(settings.remove_commands);
        assert_eq!(settings.registration_policy, RegistrationPolicy::FailFast);
    }

    #[test]
    fn bootstrap_scopes_commands_to_configured_guild() {
        let app = bootstrap_with_config(config(Some("4242"), Some(false))).expect("bootstrap");
        let settings = app.session.settings();

        assert_eq!(settings.scope, RegistrationScope::Guild(4242));
        assert!(!settings.remove_commands);
    }

    #[test]
    fn dispatcher_missing_handlers_fails_fast() {
        let result = checked_dispatcher(CommandDispatcher::new());

        assert!(matches!(
            result,
            Err(BootstrapError::UnhandledCommands(ref names)) if names.contains("random-sequence")
        ));
    }
}
