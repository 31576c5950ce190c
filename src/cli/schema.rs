use crate::cli::SchemaArgs;
use crate::config::Config;
use crate::parser::classification_schema;
use schemars::schema_for;

pub fn execute(args: SchemaArgs) -> anyhow::Result<()> {
    let json = if args.response {
        serde_json::to_string_pretty(&classification_schema())?
    } else {
        serde_json::to_string_pretty(&schema_for!(Config))?
    };
    println!("{}", json);
    Ok(())
}
