mod synthesize_speech;

pub use synthesize_speech::{SpeechDefaults, SynthesizeSpeechUseCase, SynthesizeSpeechUseCaseImpl};
