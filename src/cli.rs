// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Commands:
//   kata init <kata_name> <template_language> [template_name]
//   kata list languages
//   kata list templates <language>
//   kata debug explore <github_user> <repo> [sub_path] [--json]
//   kata debug download <github_user> <repo> [sub_path]
//   kata debug config-path
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "kata",
    version,
    about = "Scaffold coding katas from templates hosted on GitHub",
    long_about = "kata creates a new kata directory from a template stored in a GitHub repository. \
                  Templates are organized by language: <language>/<template>."
)]
pub struct Cli {
    /// Config file to use instead of ~/.katacli
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output on stderr (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new kata in the current directory
    ///
    /// Example: kata init bowling java junit5
    Init {
        /// Name of the kata directory (lowercase letters and underscores)
        kata_name: String,

        /// Language of the template (a top-level directory of the template repo)
        template_language: String,

        /// Template to use; can be omitted when the language has only one
        template_name: Option<String>,
    },

    /// List what's available in the template repository
    #[command(subcommand)]
    List(ListCommands),

    /// Low-level commands to explore any GitHub repository
    #[command(subcommand)]
    Debug(DebugCommands),
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// List available languages
    Languages,

    /// List available templates for a language
    Templates {
        /// Language to list templates for
        language: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DebugCommands {
    /// Print every file found under a path of a repository
    Explore {
        github_user: String,
        repo: String,

        /// Path inside the repository (defaults to the root)
        #[arg(default_value = "")]
        sub_path: String,

        /// Output the file list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Download every file under a path of a repository into ./sandbox
    ///
    /// ./sandbox must exist and be empty.
    Download {
        github_user: String,
        repo: String,

        /// Path inside the repository (defaults to the root)
        #[arg(default_value = "")]
        sub_path: String,
    },

    /// Print the location of the config file
    ConfigPath,
}
