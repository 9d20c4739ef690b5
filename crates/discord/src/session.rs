use std::{future::Future, sync::Arc};

use seqbot_core::{config::RegistrationPolicy, CommandDefinition};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::gateway::{CommandGateway, GatewayError, RegisteredCommand, RegistrationScope};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Disconnected,
    Connecting,
    Registering,
    Ready,
    Deregistering,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot open the session: {0}")]
    Connect(#[source] GatewayError),
    #[error(transparent)]
    Registration(GatewayError),
    #[error(transparent)]
    Deregistration(GatewayError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    pub scope: RegistrationScope,
    pub remove_commands: bool,
    pub registration_policy: RegistrationPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            scope: RegistrationScope::Global,
            remove_commands: true,
            registration_policy: RegistrationPolicy::FailFast,
        }
    }
}

/// Drives one bot session: connect, register every definition, wait for shutdown,
/// optionally delete the registered commands, then disconnect.
pub struct SessionManager {
    gateway: Arc<dyn CommandGateway>,
    definitions: Vec<CommandDefinition>,
    settings: SessionSettings,
    state: SessionState,
}

impl SessionManager {
    pub fn new(
        gateway: Arc<dyn CommandGateway>,
        definitions: Vec<CommandDefinition>,
        settings: SessionSettings,
    ) -> Self {
        Self { gateway, definitions, settings, state: SessionState::Disconnected }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub async fn run<F>(&mut self, shutdown: F) -> Result<(), SessionError>
    where
        F: Future<Output = ()>,
    {
        self.transition(SessionState::Connecting);
        let identity = match self.gateway.connect().await {
            Ok(identity) => identity,
            Err(error) => {
                self.transition(SessionState::Disconnected);
                return Err(SessionError::Connect(error));
            }
        };
        info!(
            event_name = "system.session.connected",
            username = %identity.username,
            user_id = identity.user_id,
            "logged in as {}",
            identity.username
        );

        let outcome = self.serve(shutdown).await;
        self.close().await;
        outcome
    }

    async fn serve<F>(&mut self, shutdown: F) -> Result<(), SessionError>
    where
        F: Future<Output = ()>,
    {
        self.transition(SessionState::Registering);
        let registered = self.register_all().await?;

        if self.settings.remove_commands {
            info!(
                event_name = "system.session.cleanup_enabled",
                "remove_commands is set, commands will be unregistered on exit"
            );
        }

        self.transition(SessionState::Ready);
        info!(event_name = "system.session.ready", "press Ctrl+C to exit");
        shutdown.await;
        info!(event_name = "system.session.shutdown_requested", "shutdown signal received");

        if self.settings.remove_commands {
            self.transition(SessionState::Deregistering);
            self.deregister_all(&registered).await?;
        }

        Ok(())
    }

    async fn register_all(&self) -> Result<Vec<RegisteredCommand>, SessionError> {
        let scope = self.settings.scope;
        info!(
            event_name = "system.session.registering",
            scope = %scope.label(),
            commands = self.definitions.len(),
            "adding commands"
        );

        let mut registered = Vec::with_capacity(self.definitions.len());
        for definition in &self.definitions {
            match self.gateway.register_command(scope, definition).await {
                Ok(command) => {
                    info!(
                        event_name = "system.session.command_registered",
                        command = %command.name,
                        command_id = command.id,
                        scope = %scope.label(),
                        "created command '{}'",
                        command.name
                    );
                    registered.push(command);
                }
                Err(error) => self.tolerate(error, SessionError::Registration)?,
            }
        }

        Ok(registered)
    }

    async fn deregister_all(&self, registered: &[RegisteredCommand]) -> Result<(), SessionError> {
        let scope = self.settings.scope;
        for command in registered {
            match self.gateway.deregister_command(scope, command).await {
                Ok(()) => info!(
                    event_name = "system.session.command_deregistered",
                    command = %command.name,
                    command_id = command.id,
                    "deleted command '{}'",
                    command.name
                ),
                Err(error) => self.tolerate(error, SessionError::Deregistration)?,
            }
        }

        Ok(())
    }

    fn tolerate(
        &self,
        error: GatewayError,
        fatal: fn(GatewayError) -> SessionError,
    ) -> Result<(), SessionError> {
        match self.settings.registration_policy {
            RegistrationPolicy::FailFast => {
                error!(
                    event_name = "system.session.command_failed",
                    error = %error,
                    "fatal command error"
                );
                Err(fatal(error))
            }
            RegistrationPolicy::BestEffort => {
                warn!(
                    event_name = "system.session.command_failed",
                    error = %error,
                    "command error ignored by best_effort policy"
                );
                Ok(())
            }
        }
    }

    async fn close(&mut self) {
        if let Err(error) = self.gateway.disconnect().await {
            warn!(
                event_name = "system.session.disconnect_failed",
                error = %error,
                "disconnect failed"
            );
        }
        self.transition(SessionState::Disconnected);
        info!(event_name = "system.session.disconnected", "gracefully shutting down");
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state transition");
        self.state = next;
    }
}
