use anyhow::{Error, Result, anyhow};
use dotenvy::dotenv;
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_callmebot_api_url")]
    pub callmebot_api_url: String,

    #[serde(default = "default_send_max_retries")]
    pub send_max_retries: u32,

    #[serde(default = "default_server_port")]
    pub server_port: u16,
}

impl Config {
    pub fn load() -> Result<Self, Error> {
        dotenv().ok();

        let config = envy::from_env::<Self>()
            .map_err(|_| anyhow!("Invalid or missing environmental variable"))?;
        Ok(config)
    }
}

fn default_callmebot_api_url() -> String {
    "https://api.callmebot.com/whatsapp.php".to_string()
}

fn default_send_max_retries() -> u32 {
    2
}

fn default_server_port() -> u16 {
    8080
}
