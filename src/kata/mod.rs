// src/kata/mod.rs
// =============================================================================
// The kata domain: what languages and templates exist, and how a kata is
// initialized from one of them.
//
// Submodules:
// - models: KataLanguage, KataTemplate, KataName
// - repos: language / template discovery in the template repository
// - services: InitKataService and LoginService, used by the CLI
// =============================================================================

mod models;
mod repos;
mod services;

pub use models::{KataLanguage, KataTemplate};
pub use repos::{KataLanguageRepo, KataTemplateRepo};
pub use services::{InitKataService, LoginService};
