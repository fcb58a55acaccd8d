// Copyright 2025 Fernando Borretti
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

use std::path::PathBuf;

use clap::Parser;

use crate::cmd::check::check_records;
use crate::cmd::export::export_tree;
use crate::cmd::import::import_tree;
use crate::cmd::stats::print_stats;
use crate::cmd::timer::timer_command;
use crate::config::Config;
use crate::config::ConfigFile;
use crate::config::Overrides;
use crate::error::Fallible;
use crate::web::server::start_server;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Browse folders and run quiz sessions in the browser.
    Serve {
        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Path to the database file.
        #[arg(long)]
        database: Option<String>,
        /// Address to listen on.
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,
        /// Don't open the browser.
        #[arg(long)]
        no_open: bool,
    },
    /// Print the folder tree as JSON.
    Export {
        /// Path to the database file.
        #[arg(long)]
        database: Option<String>,
    },
    /// Replace the folder tree with the contents of a JSON file.
    Import {
        /// Path to the JSON file.
        file: PathBuf,
        /// Path to the database file.
        #[arg(long)]
        database: Option<String>,
    },
    /// Print folder and card counts as JSON.
    Stats {
        /// Path to the database file.
        #[arg(long)]
        database: Option<String>,
    },
    /// Print the timer duration, or set it.
    Timer {
        /// New duration in seconds.
        seconds: Option<String>,
        /// Path to the database file.
        #[arg(long)]
        database: Option<String>,
    },
    /// Check that the stored records are readable.
    Check {
        /// Path to the database file.
        #[arg(long)]
        database: Option<String>,
    },
}

pub async fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Serve {
            config,
            database,
            host,
            port,
            no_open,
        } => {
            let file = match config {
                Some(path) => ConfigFile::load(&path)?,
                None => ConfigFile::default(),
            };
            let overrides = Overrides {
                database,
                host,
                port,
                no_open,
            };
            start_server(Config::resolve(file, overrides)).await
        }
        Command::Export { database } => export_tree(&database_path(database)),
        Command::Import { file, database } => import_tree(&file, &database_path(database)),
        Command::Stats { database } => print_stats(&database_path(database)),
        Command::Timer { seconds, database } => timer_command(seconds, &database_path(database)),
        Command::Check { database } => check_records(&database_path(database)),
    }
}

fn database_path(database: Option<String>) -> String {
    database.unwrap_or_else(|| Config::default().database)
}
