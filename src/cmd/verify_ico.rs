//! Verify-ico command - check a business identifier against the registry

use crate::ico::{IcoClient, IcoClientConfig, IcoRecord};
use clap::Args;

#[derive(Args, Debug)]
pub struct VerifyIcoCommand {
    /// IČO to verify (8 digits, separators allowed)
    ico: String,

    /// Also try the commercial secondary source on registry failure
    #[arg(long)]
    secondary: bool,

    /// Override the registry base URL
    #[arg(long)]
    registry_url: Option<String>,

    /// Secondary source base URL
    #[arg(long, requires = "secondary_api_key")]
    secondary_url: Option<String>,

    /// Secondary source API key
    #[arg(long)]
    secondary_api_key: Option<String>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

impl VerifyIcoCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut config = IcoClientConfig::default();
        if let Some(url) = &self.registry_url {
            config.registry_url = url.clone();
        }
        config.secondary_url = self.secondary_url.clone();
        config.secondary_api_key = self.secondary_api_key.clone();

        let client = IcoClient::new(config);
        let record = client.verify(&self.ico, self.secondary);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            print_record(&record);
        }
        Ok(())
    }
}

fn print_record(record: &IcoRecord) {
    println!();
    if !record.valid {
        println!("IČO {}: INVALID", record.ico);
        if let Some(error) = record.error {
            println!("  {}", error);
        }
        println!();
        return;
    }

    println!(
        "IČO {}: valid (source: {})",
        record.ico,
        record.source.as_deref().unwrap_or("unknown")
    );
    if let Some(name) = &record.company_name {
        println!("  Name: {name}");
    }
    if let Some(address) = &record.address {
        println!("  Address: {address}");
    }
    if let Some(legal_form) = &record.legal_form {
        println!("  Legal form: {legal_form}");
    }
    if let Some(dic) = &record.dic {
        println!("  DIČ: {dic}");
    }
    if let Some(ic_dph) = &record.ic_dph {
        println!("  IČ DPH: {ic_dph}");
    }
    if let Some(status) = &record.status {
        println!("  Status: {status}");
    }
    if let Some(registered) = &record.registered {
        println!("  Registered: {registered}");
    }
    println!();
}
