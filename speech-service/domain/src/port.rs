use async_trait::async_trait;

use crate::{DomainError, SpeechRequest, SynthesizedSpeech};

#[async_trait]
pub trait SpeechSynthesisPort: Send + Sync {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SynthesizedSpeech, DomainError>;
}
