// src/main.rs
// =============================================================================
// This is the entry point of the kata CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging, load the config file, wire the GitHub client and services
// 3. Dispatch to the appropriate subcommand handler
// 4. Print results or a human-readable error
// 5. Exit with proper code (0 = success, 1 = kata error, 2 = unexpected error)
//
// Rust concepts used:
// - async/await: every GitHub request is non-blocking, many run concurrently
// - Result<T, E>: For error handling (T = success type, E = error type)
// - match: Pattern matching to handle different subcommands and errors
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - ~/.katacli
mod error; // src/error.rs - KataError
mod github; // src/github/ - GitHub API client
mod grepo; // src/grepo/ - repository explorer and downloader
mod kata; // src/kata/ - languages, templates, init service
mod logging; // src/logging.rs - tracing setup

#[cfg(test)]
mod testing; // src/testing.rs - in-memory GitHub for tests

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser; // Parser trait enables the parse() method

// anyhow::Result is used at this outer layer only; the modules return KataError
use anyhow::Result;

use cli::{Cli, Commands, DebugCommands, ListCommands};
use config::{Config, LoadedConfig};
use error::KataError;
use github::{ContentFetcher, GithubApi};
use grepo::{GRepo, WorkerPool};
use kata::{InitKataService, KataLanguageRepo, KataTemplateRepo, LoginService};

const SANDBOX: &str = "./sandbox";

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = command succeeded
//   Ok(1) = a KataError was reported to the user
//   Err   = unexpected error (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config_file = match cli.config {
        Some(path) => path,
        None => config::default_config_path()?,
    };

    // This one doesn't need the config to be loaded (or even valid)
    if let Commands::Debug(DebugCommands::ConfigPath) = cli.command {
        println!("{}", config_file.display());
        return Ok(0);
    }

    let context = match KataContext::load(&config_file) {
        Ok(context) => context,
        Err(err) => {
            print_error(&err.to_string());
            return Ok(1);
        }
    };
    context.warn_if_not_logged_in();

    let outcome = match cli.command {
        Commands::Init {
            kata_name,
            template_language,
            template_name,
        } => handle_init(&context, &kata_name, &template_language, template_name.as_deref()).await,
        Commands::List(ListCommands::Languages) => handle_list_languages(&context).await,
        Commands::List(ListCommands::Templates { language }) => {
            handle_list_templates(&context, &language).await
        }
        Commands::Debug(DebugCommands::Explore {
            github_user,
            repo,
            sub_path,
            json,
        }) => handle_debug_explore(&context, &github_user, &repo, &sub_path, json).await,
        Commands::Debug(DebugCommands::Download {
            github_user,
            repo,
            sub_path,
        }) => handle_debug_download(&context, &github_user, &repo, &sub_path).await,
        Commands::Debug(DebugCommands::ConfigPath) => Ok(()),
    };

    match outcome {
        Ok(()) => Ok(0),
        Err(err) => {
            report_error(&err, &context);
            Ok(1)
        }
    }
}

// Everything the commands need, built once from the config file
struct KataContext {
    grepo: GRepo,
    init_kata_service: InitKataService,
    login_service: LoginService,
}

impl KataContext {
    fn load(config_file: &Path) -> error::Result<Self> {
        let LoadedConfig { config, created } = Config::load_or_create(config_file)?;
        if created {
            print_warning("Config file was not found!");
            print_warning("");
            print_warning("A new config file was created and loaded with default settings.");
            print_warning(&format!("Config file location: '{}'", config_file.display()));
            print_warning("");
        }
        let config = Arc::new(config);

        let api: Arc<dyn ContentFetcher> = Arc::new(GithubApi::new(
            config.auth_token().map(str::to_string),
            config.request_timeout(),
        )?);

        // One pool for the whole run: exploration and downloads share it
        let pool = WorkerPool::new(config.network.max_workers);
        let grepo = GRepo::new(api.clone(), pool);

        let init_kata_service = InitKataService::new(
            KataLanguageRepo::new(api.clone(), config.clone()),
            KataTemplateRepo::new(api, config.clone()),
            grepo.clone(),
            config.clone(),
        );

        Ok(Self {
            grepo,
            init_kata_service,
            login_service: LoginService::new(config),
        })
    }

    fn warn_if_not_logged_in(&self) {
        if self.login_service.is_logged_in()
            || self.login_service.should_skip_not_logged_in_warning()
        {
            return;
        }

        print_warning(
            "You are not logged-in!

There is a rate-limit of 60 calls per hour on the GitHub API for un-authenticated requests.

Listing a couple of languages or initializing one or two katas will work just fine.
When experimenting around, the rate limit will be reached quickly.

For un-authenticated requests the rate limit is shared by everyone on the network
(it is based on the public IP), so on a shared connection authentication is required.

To log in, add a GitHub token to the config:

    Auth:
      Token: <your token>

To skip this warning, set the following option to 'true' in the config:

    Auth:
      SkipNotLoggedInWarning: true
",
        );
    }
}

// Handles the 'init' subcommand
async fn handle_init(
    context: &KataContext,
    kata_name: &str,
    template_language: &str,
    template_name: Option<&str>,
) -> error::Result<()> {
    println!("Initializing Kata in './{}'", kata_name);
    println!("  - Kata Language: '{}'", template_language);
    println!("  - Kata Template: '{}'", template_name.unwrap_or("-"));
    println!();

    let result = context
        .init_kata_service
        .init_kata(Path::new("."), kata_name, template_language, template_name)
        .await;

    match result {
        Ok(kata_dir) => {
            println!("✅ Done! Kata created in '{}'", kata_dir.display());
            Ok(())
        }
        Err(KataError::KataLanguageNotFound { available }) => {
            print_language_not_found(template_language, &available);
            Err(KataError::KataLanguageNotFound { available })
        }
        Err(KataError::KataTemplateNotFound { available }) => {
            print_template_not_found(kata_name, template_language, template_name, &available);
            Err(KataError::KataTemplateNotFound { available })
        }
        Err(err) => Err(err),
    }
}

// Handles 'list languages'
async fn handle_list_languages(context: &KataContext) -> error::Result<()> {
    let languages = context.init_kata_service.list_available_languages().await?;

    println!("Available languages:");
    for language in &languages {
        println!("  - '{}'", language.name);
    }
    Ok(())
}

// Handles 'list templates <language>'
async fn handle_list_templates(context: &KataContext, language: &str) -> error::Result<()> {
    match context.init_kata_service.list_available_templates(language).await {
        Ok(templates) => {
            println!("Available templates for '{}':", language);
            for template in &templates {
                match &template.template_name {
                    Some(name) => println!("  - '{}'", name),
                    None => println!("  - (single template at the language root)"),
                }
            }
            Ok(())
        }
        Err(KataError::KataLanguageNotFound { available }) => {
            print_language_not_found(language, &available);
            Err(KataError::KataLanguageNotFound { available })
        }
        Err(err) => Err(err),
    }
}

// Handles 'debug explore'
async fn handle_debug_explore(
    context: &KataContext,
    github_user: &str,
    repo: &str,
    sub_path: &str,
    json: bool,
) -> error::Result<()> {
    if !json {
        println!("🔍 Exploring:");
        println!("   - User: '{}'", github_user);
        println!("   - Repo: '{}'", repo);
        println!("   - SubPath in Repo: '{}'", sub_path);
        println!();
    }

    let mut files = context
        .grepo
        .get_files_to_download(github_user, repo, sub_path)
        .await?;
    // The explorer gives no ordering guarantee; sort for stable output
    files.sort();

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    for file in &files {
        println!("{:<50} {}", file.relative_path().display(), file.download_reference());
    }
    println!();
    println!("📄 Found {} file(s)", files.len());
    Ok(())
}

// Handles 'debug download' - everything goes into ./sandbox
async fn handle_debug_download(
    context: &KataContext,
    github_user: &str,
    repo: &str,
    sub_path: &str,
) -> error::Result<()> {
    let sandbox = PathBuf::from(SANDBOX);
    check_sandbox(&sandbox)?;
    println!("Sandbox: {}", sandbox.display());

    let files = context
        .grepo
        .get_files_to_download(github_user, repo, sub_path)
        .await?;
    println!("📄 Found {} file(s). Writing to drive now", files.len());

    context.grepo.download_files_at_location(&sandbox, files).await?;
    println!("✅ Done!");
    Ok(())
}

// ./sandbox must exist and be empty
fn check_sandbox(sandbox: &Path) -> error::Result<()> {
    if !sandbox.is_dir() {
        return Err(KataError::SandboxMissing {
            path: sandbox.to_path_buf(),
        });
    }
    if std::fs::read_dir(sandbox)?.next().is_some() {
        return Err(KataError::SandboxNotEmpty {
            path: sandbox.to_path_buf(),
        });
    }
    Ok(())
}

// Prints any KataError that wasn't already explained by its handler
fn report_error(err: &KataError, context: &KataContext) {
    match err {
        // Already printed with the list of alternatives
        KataError::KataLanguageNotFound { .. } | KataError::KataTemplateNotFound { .. } => {}
        err if err.is_api_error() => {
            print_error(&err.to_string());
            if !context.login_service.is_logged_in() {
                print_warning("Adding a GitHub token to the config raises the API rate limit.");
            }
        }
        err => print_error(&err.to_string()),
    }
}

fn print_language_not_found(language: &str, available: &[kata::KataLanguage]) {
    print_error(&format!("Language '{}' could not be found!", language));
    print_error("");
    print_error("Available languages:");
    for language in available {
        print_error(&format!("  - {}", language.name));
    }
}

fn print_template_not_found(
    kata_name: &str,
    language: &str,
    template_name: Option<&str>,
    available: &[kata::KataTemplate],
) {
    print_error(&format!(
        "Template '{}' could not be found!",
        template_name.unwrap_or("-")
    ));
    print_error("");

    let only_root_template = available.len() == 1 && available[0].is_at_root();
    if only_root_template {
        print_warning(&format!(
            "Language '{}' only has one template, and it's located at its root",
            language
        ));
        print_warning(&format!(
            "To initialize a kata with '{}', simply do not specify any template name:",
            language
        ));
        print_warning("");
        print_warning(&format!("    kata init {} {}", kata_name, language));
        print_warning("");
    } else {
        print_error(&format!("Available templates for '{}':", language));
        for template in available {
            if let Some(name) = &template.template_name {
                print_error(&format!("  - {}", name));
            }
        }
    }
}

fn print_error(message: &str) {
    if message.is_empty() {
        eprintln!();
    } else {
        eprintln!("❌ {}", message);
    }
}

fn print_warning(message: &str) {
    if message.is_empty() {
        eprintln!();
    } else {
        eprintln!("⚠️  {}", message);
    }
}
