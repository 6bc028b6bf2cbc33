// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Polaris CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // RUST_LOG can still raise it
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "Polaris Catalog".bold().green(), polaris::VERSION);
            println!("Metadata cache and credential vending for Polaris REST catalogs");
            Ok(())
        }

        Commands::Token { connection } => cli::handle_token(connection),

        Commands::Catalogs { connection, format } => cli::handle_catalogs(connection, format),

        Commands::Schemas {
            connection,
            catalog,
            format,
        } => cli::handle_schemas(connection, catalog, format),

        Commands::Tables {
            connection,
            catalog,
            schema,
            format,
        } => cli::handle_tables(connection, catalog, schema, format),

        Commands::Credentials {
            connection,
            catalog,
            schema,
            table,
            write,
            show_secrets,
        } => cli::handle_credentials(connection, catalog, schema, table, write, show_secrets),
    }
}
