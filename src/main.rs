//! Command-line front end: compile an XSD file and print the schema model.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use xsd_frontend::reader;

#[derive(Parser)]
#[command(name = "xsd-frontend", version, about = "Compile an XSD file into a schema model")]
struct Args {
    /// Path to the XSD schema file
    schema: PathBuf,

    /// Dump the full schema model as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let schema = match reader::parse_file(&args.schema) {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("{}: {}", args.schema.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&schema) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("failed to serialize schema: {}", e);
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    if let Some(ns) = &schema.target_namespace {
        println!("target namespace: {}", ns);
    }
    println!(
        "elements: {}, types: {}, attributes: {}, attribute groups: {}, groups: {}",
        schema.elements().len(),
        schema.types().len(),
        schema.attributes().len(),
        schema.attribute_groups().len(),
        schema.groups().len(),
    );
    for name in schema.elements().keys() {
        println!("element {}", name);
    }
    for name in schema.types().keys() {
        println!("type {}", name);
    }

    ExitCode::SUCCESS
}
