pub mod agent;
pub mod generator;
pub mod groq;
pub mod mock;

pub use agent::{AgentCall, AgentSettings};
pub use generator::{GenerationRequest, TextGenerator};
pub use groq::GroqClient;
pub use mock::MockGenerator;
