// src/kata/services.rs
// =============================================================================
// The use cases behind the CLI commands.
//
// InitKataService::init_kata does the actual scaffolding:
// 1. Check the parent directory exists and the kata name is valid
// 2. Resolve the language, then the template
// 3. Explore the template's directory in the template repository
// 4. Download everything into <parent_dir>/<kata_name>
//
// LoginService answers whether the user configured a GitHub token.
// =============================================================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::models::{KataLanguage, KataName, KataTemplate};
use super::repos::{KataLanguageRepo, KataTemplateRepo};
use crate::config::Config;
use crate::error::{KataError, Result};
use crate::grepo::GRepo;

pub struct InitKataService {
    languages: KataLanguageRepo,
    templates: KataTemplateRepo,
    grepo: GRepo,
    config: Arc<Config>,
}

impl InitKataService {
    pub fn new(
        languages: KataLanguageRepo,
        templates: KataTemplateRepo,
        grepo: GRepo,
        config: Arc<Config>,
    ) -> Self {
        Self {
            languages,
            templates,
            grepo,
            config,
        }
    }

    /// Creates `parent_dir/kata_name` from the requested template
    ///
    /// Returns the directory of the new kata.
    pub async fn init_kata(
        &self,
        parent_dir: &Path,
        kata_name: &str,
        template_language: &str,
        template_name: Option<&str>,
    ) -> Result<PathBuf> {
        if !parent_dir.exists() {
            return Err(KataError::ParentDirNotFound {
                path: std::env::current_dir()
                    .map(|cwd| cwd.join(parent_dir))
                    .unwrap_or_else(|_| parent_dir.to_path_buf()),
            });
        }
        let kata_name = KataName::parse(kata_name)?;

        let template = self.get_kata_template(template_language, template_name).await?;
        let grepo = &self.config.kata_grepo;
        let files = self
            .grepo
            .get_files_to_download(&grepo.user, &grepo.repo, &template.repo_path())
            .await?;

        tracing::info!(
            kata = kata_name.as_str(),
            template = %template.repo_path(),
            files = files.len(),
            "initializing kata"
        );

        let kata_dir = parent_dir.join(kata_name.as_str());
        self.grepo.download_files_at_location(&kata_dir, files).await?;

        Ok(kata_dir)
    }

    pub async fn list_available_languages(&self) -> Result<Vec<KataLanguage>> {
        self.languages.get_all().await
    }

    pub async fn list_available_templates(&self, language: &str) -> Result<Vec<KataTemplate>> {
        let language = self.get_kata_language_or_fail(language).await?;
        self.templates.get_for_language(&language).await
    }

    async fn get_kata_template(
        &self,
        template_language: &str,
        template_name: Option<&str>,
    ) -> Result<KataTemplate> {
        let language = self.get_kata_language_or_fail(template_language).await?;
        let mut templates = self.templates.get_for_language(&language).await?;

        // No template asked for and only one exists: use it
        if template_name.is_none() && templates.len() == 1 {
            return Ok(templates.remove(0));
        }

        match templates
            .iter()
            .position(|template| template.template_name.as_deref() == template_name)
        {
            Some(index) => Ok(templates.swap_remove(index)),
            None => Err(KataError::KataTemplateNotFound {
                available: templates,
            }),
        }
    }

    async fn get_kata_language_or_fail(&self, language_name: &str) -> Result<KataLanguage> {
        match self.languages.get(language_name).await? {
            Some(language) => Ok(language),
            None => Err(KataError::KataLanguageNotFound {
                available: self.languages.get_all().await?,
            }),
        }
    }
}

pub struct LoginService {
    config: Arc<Config>,
}

impl LoginService {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    pub fn is_logged_in(&self) -> bool {
        self.config.auth_token().is_some()
    }

    pub fn should_skip_not_logged_in_warning(&self) -> bool {
        self.config.auth.skip_not_logged_in_warning
    }
}
