//! Schema command - print the JSON Schema for the calculation input

use crate::tax::TaxReturnInput;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let schema = schema_for!(TaxReturnInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }
}
