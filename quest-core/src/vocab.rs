//! Vocabulary content parsing.
//!
//! Class content is authored as plain numbered lists. Nouns look like
//! `12. the dog - el perro - Masculine` and verbs like
//! `3. hablar (to talk, to speak)`. An optional index file reorders the
//! parsed entries into teaching order.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VocabError {
    #[error("line {line}: expected 'N. english - spanish - gender', got: {content}")]
    BadNounLine { line: usize, content: String },
    #[error("line {line}: expected 'N. verb (meaning, ...)', got: {content}")]
    BadVerbLine { line: usize, content: String },
    #[error("line {line}: bad entry number")]
    BadNumber { line: usize },
}

/// A parsed noun with its Spanish article and gender
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NounEntry {
    pub index: u32,
    pub eng: String,
    pub spa: String,
    pub gender: String,
}

/// A parsed verb infinitive with its English meanings
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VerbEntry {
    pub index: u32,
    pub spa: String,
    pub eng: Vec<String>,
}

fn split_number(line: &str, line_no: usize) -> Result<(u32, &str), VocabError> {
    let (number, rest) = line
        .split_once('.')
        .ok_or(VocabError::BadNumber { line: line_no })?;
    let index: u32 = number
        .trim()
        .parse()
        .map_err(|_| VocabError::BadNumber { line: line_no })?;
    Ok((index, rest.trim()))
}

/// Parse a noun list. A Spanish side with `/` alternatives fans out into one
/// entry per alternative, numbered consecutively.
pub fn parse_nouns(content: &str) -> Result<Vec<NounEntry>, VocabError> {
    let mut entries = Vec::new();
    let mut next_index = 1;
    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let (_, rest) = split_number(line, line_no)?;
        let mut parts = rest.splitn(3, " - ");
        let (eng, spa, gender) = match (parts.next(), parts.next(), parts.next()) {
            (Some(eng), Some(spa), Some(gender)) => (eng.trim(), spa.trim(), gender.trim()),
            _ => {
                return Err(VocabError::BadNounLine {
                    line: line_no,
                    content: line.to_string(),
                })
            }
        };
        for alternative in spa.split('/') {
            entries.push(NounEntry {
                index: next_index,
                eng: eng.to_string(),
                spa: alternative.trim().to_string(),
                gender: gender.to_lowercase(),
            });
            next_index += 1;
        }
    }
    Ok(entries)
}

/// Parse a verb list
pub fn parse_verbs(content: &str) -> Result<Vec<VerbEntry>, VocabError> {
    let mut entries = Vec::new();
    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let (index, rest) = split_number(line, line_no)?;
        let bad = || VocabError::BadVerbLine {
            line: line_no,
            content: line.to_string(),
        };
        let open = rest.find('(').ok_or_else(bad)?;
        let close = rest.rfind(')').ok_or_else(bad)?;
        if close < open {
            return Err(bad());
        }
        let spa = rest[..open].trim();
        if spa.is_empty() {
            return Err(bad());
        }
        let eng: Vec<String> = rest[open + 1..close]
            .split(',')
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if eng.is_empty() {
            return Err(bad());
        }
        entries.push(VerbEntry {
            index,
            spa: spa.to_string(),
            eng,
        });
    }
    Ok(entries)
}

/// Normalize a word for index matching: trim, lowercase, collapse whitespace
fn normalize(word: &str) -> String {
    word.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip an index line down to the word it names: drop the leading `N.`
/// number and any trailing `# comment`
fn index_word(line: &str) -> Option<String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return None;
    }
    let word = match line.split_once('.') {
        Some((number, rest)) if number.trim().parse::<u32>().is_ok() => rest,
        _ => line,
    };
    let word = word.trim();
    (!word.is_empty()).then(|| normalize(word))
}

/// Reorder verb entries to follow an index list of Spanish infinitives.
///
/// Returns the reordered entries plus the index words no entry matched.
/// Entries the index never names keep their relative order at the end.
pub fn order_by_index_list(
    entries: Vec<VerbEntry>,
    index_content: &str,
) -> (Vec<VerbEntry>, Vec<String>) {
    let mut remaining: Vec<Option<VerbEntry>> = entries.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    let mut missing = Vec::new();

    for word in index_content.lines().filter_map(index_word) {
        let found = remaining
            .iter_mut()
            .find(|slot| matches!(slot, Some(e) if normalize(&e.spa) == word));
        match found {
            Some(slot) => {
                if let Some(entry) = slot.take() {
                    ordered.push(entry);
                }
            }
            None => missing.push(word),
        }
    }
    ordered.extend(remaining.into_iter().flatten());
    (ordered, missing)
}
