use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    ApplicationError, SynthesizeSpeechRequest, SynthesizeSpeechResponse, SynthesizeSpeechUseCase,
};

#[derive(Debug, Clone)]
pub struct SynthesizeSpeechCommand {
    id: Uuid,
    pub request: SynthesizeSpeechRequest,
}

impl SynthesizeSpeechCommand {
    pub fn new(request: SynthesizeSpeechRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
        }
    }

    pub fn command_type(&self) -> &'static str {
        "synthesize_speech"
    }

    pub fn command_id(&self) -> Uuid {
        self.id
    }

    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.request
            .validate()
            .map_err(|err| ApplicationError::Validation(err.to_string()))
    }
}

pub struct SynthesizeSpeechCommandHandler {
    usecase: Arc<dyn SynthesizeSpeechUseCase>,
}

impl SynthesizeSpeechCommandHandler {
    pub fn new(usecase: Arc<dyn SynthesizeSpeechUseCase>) -> Self {
        Self { usecase }
    }

    pub async fn handle(
        &self,
        command: SynthesizeSpeechCommand,
    ) -> Result<SynthesizeSpeechResponse, ApplicationError> {
        command.validate()?;
        tracing::debug!(
            command_type = command.command_type(),
            command_id = %command.command_id(),
            "dispatching command"
        );
        self.usecase.synthesize(command.request).await
    }
}
