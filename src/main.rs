//! Jira MCP Snowflake deployment manifest CLI
//!
//! Usage:
//!   jira-mcp-deploy [OPTIONS]
//!
//! Options:
//!   -p, --param <NAME=VALUE>   Override a template parameter (repeatable)
//!   -f, --params-file <FILE>   Parameter overrides file (TOML format)
//!   -o, --output <FILE>        Write the YAML stream to a file
//!       --list-params          Show the parameter reference
//!   -h, --help                 Print help

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use jira_mcp_deploy::{expand_yaml, params, Overrides};

#[derive(Parser)]
#[command(name = "jira-mcp-deploy")]
#[command(about = "Expand the Jira MCP Snowflake deployment manifests")]
struct Cli {
    /// Override a template parameter as NAME=VALUE (repeatable)
    #[arg(short, long = "param", value_name = "NAME=VALUE")]
    param: Vec<String>,

    /// Parameter overrides file (TOML format, [parameters] table)
    #[arg(short = 'f', long, value_name = "FILE")]
    params_file: Option<PathBuf>,

    /// Write the YAML stream to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Show the parameter reference
    #[arg(long)]
    list_params: bool,
}

fn main() {
    let cli = Cli::parse();

    // Handle documentation flags first
    if cli.list_params {
        print_params();
        return;
    }

    // Load file overrides, then let -p flags win over them
    let mut overrides = match &cli.params_file {
        Some(path) => match Overrides::from_file(path) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Error loading parameter file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Overrides::new(),
    };

    for arg in &cli.param {
        match arg.split_once('=') {
            Some((name, value)) => overrides.insert(name, value),
            None => {
                eprintln!("Error: parameter override '{}' is not NAME=VALUE", arg);
                std::process::exit(1);
            }
        }
    }

    let yaml = match expand_yaml(&overrides) {
        Ok(yaml) => yaml,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, yaml) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", yaml),
    }
}

fn print_params() {
    println!("TEMPLATE PARAMETERS");
    println!("===================");
    println!();
    for param in params::DECLARED {
        println!("{}", param.name);
        println!("    {}", param.description);
        println!("    kind: {}, default: {}", param.kind.label(), param.default);
        println!();
    }
    println!("Override with -p NAME=VALUE or a TOML file:");
    println!();
    println!("    [parameters]");
    println!("    IMAGE_TAG = \"v1.4.0\"");
}
