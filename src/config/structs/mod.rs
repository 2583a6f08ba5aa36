mod app;
mod learn;
mod llm;
mod network;
mod server;

pub use app::AppConfig;
pub use learn::LearnConfig;
pub use llm::{DEFAULT_PROVIDER_NAME, LLMConfig, ProviderConfig};
pub use network::NetworkConfig;
pub use server::{GitHubConfig, ServerConfig};
