use clap::{Parser, Subcommand};

mod migrate;
mod promo_event;

#[derive(Debug, Parser)]
#[command(name = "freshmart-app", about = "FreshMart CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate(migrate::MigrateArgs),
    PromoEvent(promo_event::PromoEventCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Migrate(args) => migrate::run(args).await,
            Commands::PromoEvent(command) => promo_event::run(command).await,
        }
    }
}
