use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::from_str;
use std::path::Path;

use crate::error::LanguageError;

static LANG_DIR: Dir = include_dir!("src/lang");

pub const DEFAULT_LANGUAGE: &str = "english";

/// A named word list that batches are drawn from.
#[derive(Deserialize, Clone, Debug)]
pub struct Language {
    pub name: String,
    pub size: u32,
    pub words: Vec<String>,
}

impl Language {
    /// Load one of the word lists compiled into the binary.
    pub fn builtin(name: &str) -> Result<Self, LanguageError> {
        read_language_from_file(format!("{name}.json"))
    }

    /// Load a user supplied word list in the same JSON shape as the built-in ones.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LanguageError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LanguageError::Io {
            path: path.display().to_string(),
            source,
        })?;
        parse_language(&contents)
    }

    pub fn distinct_words(&self) -> usize {
        self.words.iter().unique().count()
    }
}

fn read_language_from_file(file_name: String) -> Result<Language, LanguageError> {
    let file = LANG_DIR
        .get_file(&file_name)
        .ok_or_else(|| LanguageError::NotFound(file_name.clone()))?;

    let file_as_str = file
        .contents_utf8()
        .ok_or(LanguageError::NotUtf8(file_name))?;

    parse_language(file_as_str)
}

fn parse_language(json: &str) -> Result<Language, LanguageError> {
    let mut lang: Language = from_str(json)?;
    lang.words.retain(|w| !w.trim().is_empty() && !w.contains(char::is_whitespace));

    // back-to-back duplicates are never allowed inside a batch, so a list with a
    // single distinct word could never produce one
    let distinct = lang.distinct_words();
    if distinct < 2 {
        return Err(LanguageError::TooFewWords {
            name: lang.name,
            distinct,
        });
    }

    Ok(lang)
}
