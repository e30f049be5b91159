use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use whisker_bot::application::errors::{BotError, ConfigError};
use whisker_bot::application::messaging::MessageParser;
use whisker_bot::application::services::MessageHistory;
use whisker_bot::domain::traits::{Transport, VariableStore};
use whisker_bot::infrastructure::adapters::console::ConsoleAdapter;
use whisker_bot::infrastructure::config::Config;
use whisker_bot::infrastructure::database::SqliteVariableStore;
use whisker_bot::infrastructure::storage::{ChannelRoster, MemoryVariableStore};
use whisker_bot::plugins::{PluginRegistry, ResponderPlugin};
use whisker_bot::{Bot, Message, User};

#[derive(Parser)]
#[command(name = "whisker-bot")]
#[command(about = "A small plugin-driven chat bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot on the console
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
    /// Store one more value for a variable
    AddVariable {
        name: String,
        value: String,
    },
    /// Forget a variable and all of its values
    RemoveVariable {
        name: String,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => run_bot(&cli.config),
        Commands::Version => {
            println!("whisker-bot v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::InitConfig => init_config(),
        Commands::AddVariable { name, value } => add_variable(&cli.config, &name, &value),
        Commands::RemoveVariable { name } => remove_variable(&cli.config, &name),
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn load_config(config_path: &str) -> Config {
    if std::path::Path::new(config_path).exists() {
        Config::load(config_path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config: {}, using defaults", e);
            Config::load_env()
        })
    } else {
        Config::load_env()
    }
}

fn open_variables(config: &Config) -> Result<Arc<dyn VariableStore>, BotError> {
    match &config.variables.database {
        Some(path) => {
            let store = SqliteVariableStore::new(path).map_err(|e| {
                BotError::Storage(e.into())
            })?;
            tracing::info!("Variables stored in {}", path.display());
            Ok(Arc::new(store))
        }
        None => {
            tracing::info!("No variable database configured, keeping variables in memory");
            Ok(Arc::new(MemoryVariableStore::new()))
        }
    }
}

fn run_bot(config_path: &str) -> Result<(), BotError> {
    let config = load_config(config_path);
    config.validate()?;

    if !config.adapters.console.enabled {
        return Err(BotError::Config(ConfigError::InvalidValue(
            "adapters.console.enabled is false and no other adapter is available".to_string(),
        )));
    }

    tracing::info!("Starting whisker-bot as {}", config.bot.nick);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| BotError::Internal(format!("Failed to start runtime: {}", e)))?;
    rt.block_on(run_console_bot(config))
}

async fn run_console_bot(config: Config) -> Result<(), BotError> {
    let variables = open_variables(&config)?;
    let roster = ChannelRoster::new();
    let console = ConsoleAdapter::new().with_nick(&config.bot.nick);

    let mut plugins = PluginRegistry::new();
    plugins.register(ResponderPlugin::new(config.responder.rules.clone()))?;
    tracing::info!("Plugin chain: {}", plugins.names().join(", "));

    let me = User::new(&config.bot.nick).with_host("localhost");
    let bot = Arc::new(
        Bot::new(
            me.clone(),
            Arc::new(console.clone()),
            variables,
            Arc::new(roster.clone()),
            MessageHistory::spawn(config.history.capacity),
        )
        .with_plugins(plugins)
        .with_source_url(&config.bot.source_url)
        .with_max_expansions(config.variables.max_expansions),
    );

    console.start().await?;

    let channel = config.adapters.console.channel.clone();
    let you = User::new(&config.adapters.console.user).with_host("localhost");
    roster.join(&channel, me).await;
    roster.join(&channel, you.clone()).await;

    let parser = MessageParser::new(&config.bot.prefix, &config.bot.nick);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    tracing::info!("Talking in {} as {}; /join, /part and /quit are available", channel, you);

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|e| BotError::Internal(format!("Failed to read stdin: {}", e)))?
    {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut words = line.split_whitespace();
        match (words.next(), words.next()) {
            (Some("/quit"), _) => break,
            (Some("/join"), Some(nick)) => {
                roster.join(&channel, User::new(nick)).await;
                let event = Message::new(User::new(nick), &channel, "join");
                dispatch_event(&bot, event);
            }
            (Some("/part"), Some(nick)) => {
                roster.part(&channel, nick).await;
                let event = Message::new(User::new(nick), &channel, "part");
                dispatch_event(&bot, event);
            }
            _ => {
                let msg = parser.parse(you.clone(), &channel, line);
                let bot = bot.clone();
                tokio::spawn(async move {
                    bot.message_received(msg).await;
                });
            }
        }
    }

    tracing::info!("Console closed, shutting down");
    Ok(())
}

fn dispatch_event(bot: &Arc<Bot>, event: Message) {
    let bot = bot.clone();
    tokio::spawn(async move {
        bot.event_received(event).await;
    });
}

fn open_variable_db(config_path: &str) -> Result<SqliteVariableStore, BotError> {
    let config = load_config(config_path);
    let Some(path) = &config.variables.database else {
        return Err(BotError::NotFound(
            "variables.database is not configured".to_string(),
        ));
    };

    SqliteVariableStore::new(path).map_err(|e| BotError::Storage(e.into()))
}

fn add_variable(config_path: &str, name: &str, value: &str) -> Result<(), BotError> {
    let name = name.trim_start_matches('$');
    let store = open_variable_db(config_path)?;
    store.add_value(name, value)?;
    println!("Added a value for ${}", name);
    Ok(())
}

fn remove_variable(config_path: &str, name: &str) -> Result<(), BotError> {
    let name = name.trim_start_matches('$');
    let store = open_variable_db(config_path)?;
    if store.remove_variable(name)? {
        println!("Removed ${}", name);
    } else {
        println!("${} was not stored", name);
    }
    Ok(())
}

fn init_config() -> Result<(), BotError> {
    let yaml = Config::default().to_yaml()?;
    println!("{}", yaml);
    println!("\nSave this to config.yaml and adjust as needed.");
    Ok(())
}
