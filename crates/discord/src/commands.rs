use async_trait::async_trait;
use seqbot_core::{
    random_sequence,
    sequence::{render_log_line, render_reply},
    CommandName, InteractionError, SequenceRequest,
};
use tracing::{info, warn};

use crate::events::{
    ArgumentValue, CommandHandler, EventContext, HandlerResult, InteractionEvent, Reply,
};

/// `/random-sequence count:<n>`: replies with a shuffled `1..=n`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomSequenceHandler;

impl RandomSequenceHandler {
    pub fn generate(&self, event: &InteractionEvent) -> Result<Vec<u32>, InteractionError> {
        let [argument] = event.arguments.as_slice() else {
            return Err(InteractionError::ArgumentCount(event.arguments.len()));
        };
        let ArgumentValue::Integer(value) = argument.value else {
            return Err(InteractionError::ArgumentType(argument.value.type_name()));
        };

        let request = SequenceRequest::new(value)?;
        Ok(random_sequence(request, &mut rand::thread_rng()))
    }
}

#[async_trait]
impl CommandHandler for RandomSequenceHandler {
    fn command(&self) -> CommandName {
        CommandName::RandomSequence
    }

    async fn handle(&self, event: &InteractionEvent, ctx: &EventContext) -> HandlerResult {
        let reply = match self.generate(event) {
            Ok(values) => {
                info!(
                    event_name = "interaction.random_sequence.generated",
                    correlation_id = %ctx.correlation_id,
                    count = values.len(),
                    sequence = %render_log_line(&values),
                    "generated random sequence"
                );
                Reply::text(render_reply(&values))
            }
            Err(error) => {
                warn!(
                    event_name = "interaction.random_sequence.rejected",
                    correlation_id = %ctx.correlation_id,
                    error = %error,
                    "malformed random-sequence interaction"
                );
                Reply::text(error.user_message())
            }
        };

        HandlerResult::Responded(reply)
    }
}
