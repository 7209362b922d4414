//! Reply body parsers
//!
//! One consumer per multi-line reply grammar. Each reads from the ongoing
//! stream up to and including the lone `.` terminator. The trailing `250`
//! status is left for the caller.

use tokio::io::AsyncBufRead;

use crate::error::{DictError, Result};
use crate::model::{Catalog, Database, Definition, MatchingStrategy};
use crate::protocol::reader::LineReader;
use crate::protocol::responses::DEFINITION_FOLLOWS;
use crate::protocol::tokenizer::split_atoms;

const MAX_PREALLOCATED: usize = 64;

/// Parses `n` definition blocks, `n` being the first token of the `150` detail.
pub async fn read_definitions<R>(
    reader: &mut LineReader<R>,
    word: &str,
    detail: &str,
) -> Result<Vec<Definition>>
where
    R: AsyncBufRead + Unpin,
{
    let count: usize = detail
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| DictError::MalformedStatus(detail.to_string()))?;

    // The count is server-supplied; a bogus one runs out of blocks and fails.
    let mut definitions = Vec::with_capacity(count.min(MAX_PREALLOCATED));
    for _ in 0..count {
        definitions.push(read_definition(reader, word).await?);
    }
    Ok(definitions)
}

/// One `151 word database description` header followed by its body.
pub async fn read_definition<R>(reader: &mut LineReader<R>, word: &str) -> Result<Definition>
where
    R: AsyncBufRead + Unpin,
{
    let header = reader.expect_status(DEFINITION_FOLLOWS).await?;

    // The word may be quoted and contain spaces, so tokenize rather than split.
    let atoms = split_atoms(header.detail());
    let database = atoms
        .get(1)
        .ok_or_else(|| DictError::MalformedStatus(header.to_string()))?;

    let mut text = String::new();
    while let Some(line) = reader.body_line().await? {
        if line.is_empty() {
            text.push('\n');
        } else {
            text.push_str(&line);
            text.push('\n');
        }
    }

    Ok(Definition::new(word, database.as_str(), text.trim()))
}

/// `db "word"` lines; yields the matched words, first occurrence wins.
pub async fn read_matches<R>(reader: &mut LineReader<R>) -> Result<Catalog<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut matches = Catalog::new();

    while let Some(line) = reader.body_line().await? {
        let clean = strip_quotes(line.trim());
        if let Some((_database, word)) = clean.split_once(' ') {
            matches.insert(word.replace('"', "").trim().to_string());
        }
    }

    Ok(matches)
}

/// `name "description"` lines. Lines without a quote are skipped.
pub async fn read_databases<R>(reader: &mut LineReader<R>) -> Result<Catalog<Database>>
where
    R: AsyncBufRead + Unpin,
{
    let mut databases = Catalog::new();

    while let Some(line) = reader.body_line().await? {
        let Some((name, description)) = line.trim().split_once('"') else {
            continue;
        };
        let description = description.trim();
        let description = description.strip_suffix('"').unwrap_or(description);
        databases.upsert(Database::new(name.trim(), description));
    }

    Ok(databases)
}

/// `name "description"` lines, one layer of quotes removed from each field.
pub async fn read_strategies<R>(reader: &mut LineReader<R>) -> Result<Catalog<MatchingStrategy>>
where
    R: AsyncBufRead + Unpin,
{
    let mut strategies = Catalog::new();

    while let Some(line) = reader.body_line().await? {
        if let Some((name, description)) = line.split_once(' ') {
            strategies.insert(MatchingStrategy::new(
                strip_quotes(name),
                strip_quotes(description),
            ));
        }
    }

    Ok(strategies)
}

/// Free text after a header line, which is discarded.
pub async fn read_database_info<R>(reader: &mut LineReader<R>) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut info = String::new();

    // The first body line is a header and may itself be the terminator.
    if reader.body_line().await?.is_none() {
        return Ok(info);
    }

    while let Some(line) = reader.body_line().await? {
        info.push_str(&line);
        info.push('\n');
    }

    Ok(info.trim().to_string())
}

/// Removes at most one leading and one trailing double quote.
fn strip_quotes(s: &str) -> &str {
    let s = s.strip_prefix('"').unwrap_or(s);
    s.strip_suffix('"').unwrap_or(s)
}
