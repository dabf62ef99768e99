mod synthesize_speech;

pub use synthesize_speech::{SynthesizeSpeechRequest, SynthesizeSpeechResponse};
