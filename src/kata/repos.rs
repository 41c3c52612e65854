// src/kata/repos.rs
// =============================================================================
// Discovers the languages and templates available in the template repository.
//
// - Languages are the directories at the repository root
// - Templates are the directories inside a language directory, unless the
//   language keeps a single template at its root
//
// Whether a language has its template at the root comes from the config
// (HasTemplateAtRoot). When the config doesn't say, we guess: a README at the
// language root means the language directory is itself the template.
// =============================================================================

use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::models::{KataLanguage, KataTemplate};
use crate::config::Config;
use crate::error::Result;
use crate::github::{ContentFetcher, DirectoryEntry};

#[derive(Clone)]
pub struct KataLanguageRepo {
    fetcher: Arc<dyn ContentFetcher>,
    config: Arc<Config>,
}

impl KataLanguageRepo {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    pub async fn get_all(&self) -> Result<Vec<KataLanguage>> {
        let grepo = &self.config.kata_grepo;
        let root = self
            .fetcher
            .list_contents(&grepo.user, &grepo.repo, "")
            .await?;

        Ok(root
            .into_iter()
            .filter(DirectoryEntry::is_dir)
            .map(|dir| KataLanguage::new(dir.path))
            .collect())
    }

    pub async fn get(&self, language_name: &str) -> Result<Option<KataLanguage>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|language| language.name == language_name))
    }
}

#[derive(Clone)]
pub struct KataTemplateRepo {
    fetcher: Arc<dyn ContentFetcher>,
    config: Arc<Config>,
}

impl KataTemplateRepo {
    pub fn new(fetcher: Arc<dyn ContentFetcher>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    pub async fn get_for_language(&self, language: &KataLanguage) -> Result<Vec<KataTemplate>> {
        let grepo = &self.config.kata_grepo;
        let language_root = self
            .fetcher
            .list_contents(&grepo.user, &grepo.repo, &language.name)
            .await?;

        if self.has_template_at_root(language, &language_root) {
            return Ok(vec![KataTemplate::at_root(language.clone())]);
        }

        Ok(language_root
            .into_iter()
            .filter(DirectoryEntry::is_dir)
            .map(|dir| KataTemplate::new(language.clone(), Some(dir.name)))
            .collect())
    }

    fn has_template_at_root(&self, language: &KataLanguage, language_root: &[DirectoryEntry]) -> bool {
        match self.config.has_template_at_root(&language.name) {
            Some(at_root) => at_root,
            None => language_root
                .iter()
                .any(|entry| readme_pattern().is_match(&entry.path)),
        }
    }
}

// README, README.md, README.txt, ...
fn readme_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^.*README(\....?)?$").expect("README pattern is valid"))
}
