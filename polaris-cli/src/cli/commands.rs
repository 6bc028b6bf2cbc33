// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "polaris")]
#[command(about = "Browse Polaris catalogs and vend table credentials", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (overrides the default of warn)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange client credentials for a bearer token
    Token {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// List catalogs visible to the principal
    Catalogs {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List schemas of a catalog
    Schemas {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Remote catalog name
        #[arg(short, long)]
        catalog: String,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List tables of a schema with their columns
    Tables {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[arg(short, long)]
        catalog: String,

        #[arg(short, long)]
        schema: String,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Vend storage credentials for one table
    Credentials {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[arg(short, long)]
        catalog: String,

        #[arg(short, long)]
        schema: String,

        #[arg(short, long)]
        table: String,

        /// Vend for an insert instead of a scan
        #[arg(long)]
        write: bool,

        /// Print secrets instead of redacting them
        #[arg(long)]
        show_secrets: bool,
    },

    /// Show version information
    Version,
}

/// How to reach and authenticate against the catalog service
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Base URL of the catalog service
    #[arg(short, long)]
    pub endpoint: String,

    /// OAuth client id
    #[arg(long)]
    pub client_id: Option<String>,

    /// OAuth client secret (prompted when a client id is given without it)
    #[arg(long)]
    pub client_secret: Option<String>,

    /// Pre-issued bearer token; skips the exchange
    #[arg(long)]
    pub token: Option<String>,

    /// Region of the object storage holding table data
    #[arg(long)]
    pub aws_region: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credentials_command() {
        let cli = Cli::try_parse_from([
            "polaris",
            "-v",
            "credentials",
            "--endpoint",
            "https://cat.example",
            "--token",
            "t",
            "-c",
            "main",
            "-s",
            "sales",
            "-t",
            "orders",
            "--write",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Credentials {
                connection,
                catalog,
                table,
                write,
                show_secrets,
                ..
            } => {
                assert_eq!(connection.token.as_deref(), Some("t"));
                assert_eq!(catalog, "main");
                assert_eq!(table, "orders");
                assert!(write);
                assert!(!show_secrets);
            }
            _ => panic!("expected credentials command"),
        }
    }

    #[test]
    fn test_log_level_and_format() {
        let cli = Cli::try_parse_from([
            "polaris",
            "--log-level",
            "trace",
            "schemas",
            "-e",
            "https://cat.example",
            "-c",
            "main",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.log_level, Some(LogLevel::Trace));
        match cli.command {
            Commands::Schemas { format, .. } => assert_eq!(format, OutputFormat::Json),
            _ => panic!("expected schemas command"),
        }
    }
}
