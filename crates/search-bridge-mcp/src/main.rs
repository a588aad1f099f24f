//! search-bridge entry point.

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use search_bridge::{DuckDuckGoProvider, SearchProvider, MAX_RESULTS};
use search_bridge_mcp::{build_bridge, BridgeConfig, ConfigOverrides, McpSearchProvider};

#[derive(Parser)]
#[command(
    name = "search-bridge",
    about = "HTTP search bridge: DuckDuckGo first, MCP search tool as fallback",
    version
)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct Settings {
    /// Listen address (host:port). Also reads SEARCH_BRIDGE_ADDR.
    #[arg(long, global = true)]
    addr: Option<String>,

    /// Tool server executable. Also reads SEARCH_BRIDGE_TOOL_COMMAND.
    #[arg(long, global = true)]
    tool_command: Option<String>,

    /// Tool server arguments, whitespace separated. Also reads SEARCH_BRIDGE_TOOL_ARGS.
    #[arg(long, global = true, allow_hyphen_values = true)]
    tool_args: Option<String>,

    /// Strict safe search for DuckDuckGo. Also reads SEARCH_BRIDGE_SAFE_SEARCH.
    #[arg(long, global = true)]
    safe_search: Option<bool>,
}

impl From<Settings> for ConfigOverrides {
    fn from(s: Settings) -> Self {
        ConfigOverrides {
            addr: s.addr,
            tool_command: s.tool_command,
            tool_args: s.tool_args,
            safe_search: s.safe_search,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP bridge (default).
    Serve,

    /// Launch the tool server and print its tools as JSON.
    ListTools,

    /// Call the tool server's search tool once and print the raw result.
    ProbeTool {
        #[arg(default_value = "AI events 2026")]
        query: String,
    },

    /// Query DuckDuckGo only and print the records.
    ProbePrimary {
        #[arg(default_value = "AI")]
        query: String,

        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Run one query through the full fallback and print the records.
    Search { query: String },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   search-bridge completions bash > ~/.local/share/bash-completion/completions/search-bridge
    ///   search-bridge completions zsh > ~/.zfunc/_search-bridge
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = BridgeConfig::resolve(cli.settings.into());

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let bridge = build_bridge(&config)?;
            tracing::info!("Fallback tool server: {}", bridge.secondary().name());
            search_bridge_mcp::http::serve(&config.addr, bridge).await?;
        }

        Commands::ListTools => {
            let provider = McpSearchProvider::from_config(&config);
            tracing::info!("Listing tools of: {}", provider.command_line());
            let tools = provider.list_tools().await?;
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }

        Commands::ProbeTool { query } => {
            let provider = McpSearchProvider::from_config(&config);
            let result = provider.probe(&query, MAX_RESULTS).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::ProbePrimary { query, limit } => {
            let provider = DuckDuckGoProvider::new(config.safe_search)?;
            let records = provider.search(&query, limit).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Commands::Search { query } => {
            let bridge = build_bridge(&config)?;
            let outcome = bridge.search_traced(&query).await;
            tracing::info!("Answered by the {} tier", outcome.tier);
            println!("{}", serde_json::to_string_pretty(&outcome.records)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "search-bridge", &mut std::io::stdout());
        }
    }

    Ok(())
}
