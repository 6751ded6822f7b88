use clap::{Args, Subcommand};

mod create;

#[derive(Debug, Args)]
pub(crate) struct PromoEventCommand {
    #[command(subcommand)]
    command: PromoEventSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoEventSubcommand {
    /// Create a promo event, e.g. the `WELCOME` campaign
    Create(create::CreatePromoEventArgs),
}

pub(crate) async fn run(command: PromoEventCommand) -> Result<(), String> {
    match command.command {
        PromoEventSubcommand::Create(args) => create::run(args).await,
    }
}
