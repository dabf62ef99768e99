mod health;
mod tts;

pub use health::health_check;
pub use tts::synthesize_speech;
