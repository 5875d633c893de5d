pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct Config {
        /// Base URL of the todo store API
        #[serde(default = "default_api_url")]
        pub api_url: String,
        #[serde(default = "default_port")]
        pub port: u16,
        /// Directory served under `/static`
        #[serde(default = "default_static_dir")]
        pub static_dir: String,
        #[serde(default = "default_api_timeout_secs")]
        pub api_timeout_secs: u64,
    }

    impl Config {
        /// Loads configuration from environment variables.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: Config = settings.try_deserialize()?;
            Ok(config)
        }
    }

    fn default_api_url() -> String {
        "http://localhost:8080".to_string()
    }

    fn default_port() -> u16 {
        3001
    }

    fn default_static_dir() -> String {
        "static".to_string()
    }

    fn default_api_timeout_secs() -> u64 {
        10
    }
}
pub mod client;
pub mod todo;
pub mod web;
