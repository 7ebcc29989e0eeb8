use std::path::PathBuf;
use clap::Parser;
use log::LevelFilter;
use crate::cli::Command;

const DEFAULT_STORE_DIR: &str = ".hobbytag";
const DEFAULT_STORE_FILE: &str = "profiles.json";

#[derive(Parser, Debug)]
#[command(name = "hobbytag", version, about = "Hobby tags and privacy toggles for alumni profiles")]
pub struct FlatConfig {
    #[arg(long, global = true, env = "HOBBYTAG_STORE", help = "Path to the profile store file")]
    store: Option<PathBuf>,

    #[arg(long, global = true, env = "HOBBYTAG_LOG", default_value = "info", help = "Log level")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug)]
pub struct AppConfig {
    pub store: StoreConfiguration,
    pub log: LogConfiguration,
}

#[derive(Debug)]
pub struct StoreConfiguration {
    pub path: PathBuf, // HOBBYTAG_STORE
}

#[derive(Debug)]
pub struct LogConfiguration {
    pub level: LevelFilter, // HOBBYTAG_LOG
}

impl AppConfig {
    pub fn parse() -> anyhow::Result<(AppConfig, Command)> {
        let flat = FlatConfig::parse();
        let command = flat.command.clone();
        let config = AppConfig::try_from(flat)?;
        Ok((config, command))
    }
}

impl TryFrom<FlatConfig> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(value: FlatConfig) -> Result<Self, Self::Error> {
        let path = match value.store {
            Some(path) => path,
            None => default_store_path()?,
        };
        Ok(AppConfig {
            store: StoreConfiguration { path },
            log: LogConfiguration { level: value.log_level },
        })
    }
}

pub fn default_store_path() -> anyhow::Result<PathBuf> {
    let Some(home_dir) = home::home_dir() else {
        anyhow::bail!("cannot determine home directory, pass --store explicitly");
    };
    Ok(home_dir.join(DEFAULT_STORE_DIR).join(DEFAULT_STORE_FILE))
}
