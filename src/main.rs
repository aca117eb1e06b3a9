// Copyright 2025 strigo contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use strigo::commands::available::AvailableCommand;
use strigo::commands::install::InstallCommand;
use strigo::commands::list::ListCommand;
use strigo::commands::remove::RemoveCommand;
use strigo::commands::use_sdk::UseCommand;
use strigo::config::StrigoConfig;
use strigo::error::{Result, StrigoError, format_error_with_color, get_exit_code};
use strigo::logging;

#[derive(Parser)]
#[command(name = "strigo")]
#[command(author, version, about = "SDK version manager backed by an artifact registry", long_about = None)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List SDK types, distributions or versions available in the registry
    #[command(long_about = "List SDK types, distributions or versions available in the registry

Examples:
  strigo available                  # SDK types
  strigo available jdk              # JDK distributions
  strigo available jdk temurin      # all Temurin versions, grouped by major
  strigo available jdk temurin 21   # Temurin 21 only")]
    Available {
        /// SDK type (e.g. "jdk", "node")
        sdk_type: Option<String>,
        /// Distribution (e.g. "temurin", "corretto")
        distribution: Option<String>,
        /// Major version filter (e.g. "11")
        major: Option<String>,
    },

    /// Install an exact SDK version
    #[command(visible_alias = "i")]
    Install {
        sdk_type: String,
        distribution: String,
        /// Exact version as shown by `strigo available`
        version: String,

        /// Disable progress indicators
        #[arg(long)]
        no_progress: bool,
    },

    /// List installed SDKs
    #[command(visible_alias = "ls")]
    List {
        sdk_type: Option<String>,
        distribution: Option<String>,
    },

    /// Make an installed version the active one and print shell exports
    Use {
        sdk_type: String,
        distribution: String,
        version: String,
    },

    /// Remove an installed version
    #[command(visible_alias = "rm")]
    Remove {
        sdk_type: String,
        distribution: String,
        version: String,

        /// Also delete the cached archive of this version
        #[arg(long)]
        clean_cache: bool,
    },
}

fn run(cli: Cli, config: &StrigoConfig) -> Result<()> {
    let json = cli.json;
    match cli.command {
        Commands::Available {
            sdk_type,
            distribution,
            major,
        } => {
            let command = AvailableCommand::new(config)?;
            command.execute(
                sdk_type.as_deref(),
                distribution.as_deref(),
                major.as_deref(),
                json,
            )
        }
        Commands::Install {
            sdk_type,
            distribution,
            version,
            no_progress,
        } => {
            let command = InstallCommand::new(config, no_progress)?;
            command.execute(&sdk_type, &distribution, &version, json)
        }
        Commands::List {
            sdk_type,
            distribution,
        } => {
            let command = ListCommand::new(config)?;
            command.execute(sdk_type.as_deref(), distribution.as_deref(), json)
        }
        Commands::Use {
            sdk_type,
            distribution,
            version,
        } => {
            let command = UseCommand::new(config)?;
            command.execute(&sdk_type, &distribution, &version, json)
        }
        Commands::Remove {
            sdk_type,
            distribution,
            version,
            clean_cache,
        } => {
            let command = RemoveCommand::new(config)?;
            command.execute(&sdk_type, &distribution, &version, clean_cache, json)
        }
    }
}

fn exit_with(error: &StrigoError) -> ! {
    let use_color = std::io::stderr().is_terminal();
    eprint!("{}", format_error_with_color(error, use_color));
    std::process::exit(get_exit_code(error));
}

fn main() {
    let cli = Cli::parse();

    // Load configuration once at startup
    let config = match StrigoConfig::load() {
        Ok(config) => config,
        Err(e) => {
            logging::setup_logger(cli.verbose, None, None);
            exit_with(&e);
        }
    };

    logging::setup_logger(
        cli.verbose,
        Some(&config.general.log_level),
        config.general.log_path.as_deref(),
    );

    if let Err(e) = run(cli, &config) {
        exit_with(&e);
    }
}
