//! Vocab command - convert authored word lists into quiz content files

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;

use quest_core::vocab::{order_by_index_list, parse_nouns, parse_verbs};

#[derive(Subcommand)]
pub enum VocabCommand {
    /// Parse a noun list into JSON
    Nouns {
        /// Input text file, one `N. english - spanish - gender` per line
        #[arg(long)]
        input: PathBuf,
        /// Output JSON file
        #[arg(long)]
        output: PathBuf,
    },
    /// Parse a verb list into JSON
    Verbs {
        /// Input text file, one `N. verb (meaning, ...)` per line
        #[arg(long)]
        input: PathBuf,
        /// Output JSON file
        #[arg(long)]
        output: PathBuf,
        /// Optional index file giving the teaching order
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

pub fn run(command: VocabCommand) -> Result<()> {
    match command {
        VocabCommand::Nouns { input, output } => convert_nouns(&input, &output),
        VocabCommand::Verbs { input, output, index } => {
            convert_verbs(&input, &output, index.as_deref())
        }
    }
}

fn convert_nouns(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let nouns = parse_nouns(&content)?;
    tracing::info!(count = nouns.len(), "parsed nouns");

    let json = serde_json::to_string_pretty(&nouns)?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

fn convert_verbs(input: &PathBuf, output: &PathBuf, index: Option<&std::path::Path>) -> Result<()> {
    let content = fs::read_to_string(input)
        .with_context(|| format!("reading {}", input.display()))?;
    let mut verbs = parse_verbs(&content)?;
    tracing::info!(count = verbs.len(), "parsed verbs");

    if let Some(index_path) = index {
        let index_content = fs::read_to_string(index_path)
            .with_context(|| format!("reading {}", index_path.display()))?;
        let (ordered, missing) = order_by_index_list(verbs, &index_content);
        for word in &missing {
            tracing::warn!(word, "index names a verb the list does not have");
        }
        verbs = ordered;
    }

    let json = serde_json::to_string_pretty(&verbs)?;
    fs::write(output, json).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_convert_nouns_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nouns.txt");
        let output = dir.path().join("nouns.json");
        fs::write(&input, "1. the dog - el perro - Masculine\n").unwrap();

        convert_nouns(&input, &output).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["spa"], "el perro");
        assert_eq!(list[0]["gender"], "masculine");
    }

    #[test]
    fn test_convert_verbs_with_index() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("verbs.txt");
        let output = dir.path().join("verbs.json");
        let index = dir.path().join("index.txt");
        fs::write(&input, "1. hablar (to talk)\n2. comer (to eat)\n").unwrap();
        fs::write(&index, "comer\nhablar\n").unwrap();

        convert_verbs(&input, &output, Some(index.as_path())).unwrap();

        let json: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        let list = json.as_array().unwrap();
        assert_eq!(list[0]["spa"], "comer");
        assert_eq!(list[1]["spa"], "hablar");
    }

    #[test]
    fn test_convert_nouns_bad_input_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("nouns.txt");
        let output = dir.path().join("nouns.json");
        fs::write(&input, "not a noun line\n").unwrap();

        assert!(convert_nouns(&input, &output).is_err());
    }
}
