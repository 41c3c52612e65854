// src/kata/models.rs
// =============================================================================
// Kata domain values: languages, templates, and kata names.
//
// The template repository is laid out as:
//
//   <language>/<template>/...     several templates for one language
//   <language>/...                a single template at the language root
//
// KataName is the name of the directory the kata is created in. It can only
// be built through KataName::parse, so holding one means it's valid.
// =============================================================================

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{KataError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KataLanguage {
    pub name: String,
}

impl KataLanguage {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KataTemplate {
    pub language: KataLanguage,
    /// None when the template lives at the language root
    pub template_name: Option<String>,
}

impl KataTemplate {
    pub fn new(language: KataLanguage, template_name: Option<String>) -> Self {
        Self {
            language,
            template_name,
        }
    }

    pub fn at_root(language: KataLanguage) -> Self {
        Self::new(language, None)
    }

    pub fn is_at_root(&self) -> bool {
        self.template_name.is_none()
    }

    /// Where the template's files live in the template repository
    ///
    /// "java" for a root template, "java/junit5" otherwise
    pub fn repo_path(&self) -> String {
        match &self.template_name {
            Some(template_name) => format!("{}/{}", self.language.name, template_name),
            None => self.language.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KataName(String);

impl KataName {
    pub fn parse(name: &str) -> Result<Self> {
        let invalid = |reason: Option<&str>| KataError::InvalidKataName {
            name: name.to_string(),
            reason: reason.map(str::to_string),
        };

        if name.is_empty() {
            return Err(invalid(Some("empty")));
        }
        if name.contains(' ') {
            return Err(invalid(Some("contains spaces")));
        }
        if !kata_name_pattern().is_match(name) {
            return Err(invalid(None));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KataName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// lowercase letters and underscores only
fn kata_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[_a-z]*$").expect("kata name pattern is valid"))
}
