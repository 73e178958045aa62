use clap::{Parser, Subcommand};

mod cmd;
mod ico;
mod tax;

#[derive(Parser, Debug)]
#[command(name = "dpfo", version, about = "Slovak income tax calculator for the self-employed (DPFO type B)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Calculate a complete itemized tax return
    Calculate(cmd::calculate::CalculateCommand),
    /// VAT breakdown and registration threshold check
    Vat(cmd::vat::VatCommand),
    /// Verify an IČO against the business registry
    VerifyIco(cmd::verify_ico::VerifyIcoCommand),
    /// Print the JSON Schema for the calculation input
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Command::Calculate(cmd) => cmd.exec(),
        Command::Vat(cmd) => cmd.exec(),
        Command::VerifyIco(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
