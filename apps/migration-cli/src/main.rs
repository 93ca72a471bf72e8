use clap::{Parser, ValueEnum};
use migration::{migrate, Database, MigrationCommand};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(cmd: Command) -> Self {
        match cmd {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

/// Run schema migrations against the auth database.
#[derive(Debug, Parser)]
#[command(name = "migration")]
struct Cli {
    #[arg(value_enum)]
    command: Command,

    /// Database URL; falls back to the DATABASE_URL environment variable.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let url = match cli.database_url.or_else(|| std::env::var("DATABASE_URL").ok()) {
        Some(url) => url,
        None => {
            eprintln!("DATABASE_URL must be set (or pass --database-url)");
            std::process::exit(1);
        }
    };

    let db = Database::connect(&url).await?;
    migrate(&db, cli.command.into()).await?;

    Ok(())
}
