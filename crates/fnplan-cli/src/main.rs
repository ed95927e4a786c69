use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "fnplan",
    about = "fnplan — resolve serverless function deployment configs",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a deployment config into a provisioning descriptor.
    ///
    /// Convention-based entries are looked up relative to --root. Named
    /// log destinations stay deferred unless --parameters is given, in
    /// which case every named lookup must be present in that file.
    Resolve {
        /// Path to the deployment config (TOML)
        #[arg(short, long)]
        config: String,
        /// Function id, used for entry discovery and resource naming
        #[arg(short, long)]
        id: String,
        /// Project root for entry discovery
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Parameter values (flat TOML table) for named lookups
        #[arg(short, long)]
        parameters: Option<String>,
        /// Output format: json or text
        #[arg(short, long, default_value = "json")]
        format: String,
    },
    /// Print a sample deployment config
    Scaffold {
        #[arg(short, long, default_value = "dev")]
        stage: String,
        /// Event type: http, sqs, sns, s3, dynamodb, eventbridge, schedule
        #[arg(short, long, default_value = "http")]
        event_type: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fnplan=info".parse()?)
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Resolve { config, id, root, parameters, format } => {
            commands::resolve::resolve(&config, &id, &root, parameters.as_deref(), &format)
        }
        Commands::Scaffold { stage, event_type } => {
            commands::scaffold::scaffold(&stage, &event_type)
        }
    }
}
