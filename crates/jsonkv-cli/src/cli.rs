use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "jsonkv",
    about = "JSONKV — typed values in string-only flat stores",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Flat store file (a JSON object of string to string)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true, env = "JSONKV_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show every entry decoded
    Show,
    /// Show one decoded value
    Get(GetArgs),
    /// Store a value and save the file
    Set(SetArgs),
    /// Remove a key and save the file
    Remove(RemoveArgs),
    /// Check every entry is valid JSON
    Validate(ValidateArgs),
    /// Print the stored form of a value
    Encode(EncodeArgs),
    /// Print the value held in stored text
    Decode(DecodeArgs),
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
    /// Printed when the key is absent instead of failing
    #[arg(long)]
    pub default: Option<String>,
}

#[derive(Args)]
pub struct SetArgs {
    pub key: String,
    /// JSON text of the value
    pub value: String,
    /// Store VALUE as a plain string instead of parsing it as JSON
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct RemoveArgs {
    pub key: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Report every invalid entry instead of stopping at the first
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct EncodeArgs {
    /// JSON text of the value
    pub value: String,
    /// Treat VALUE as a plain string
    #[arg(long)]
    pub raw: bool,
}

#[derive(Args)]
pub struct DecodeArgs {
    pub text: String,
}
