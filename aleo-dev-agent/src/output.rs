//! Parsers for the textual output of the `snarkos` and `leo` binaries, and
//! for the quasi-JSON plaintext values the node returns.
//!
//! None of these formats are documented or stable. The token regex and the
//! positional block splitting below mirror what the toolchain actually prints
//! today; when the toolchain changes, this module is the blast radius.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::transaction::Transaction;

/// Tokens of an Aleo plaintext value: identifiers, literals like `1u64`, and
/// dotted visibility suffixes such as `aleo1...xyz.private`.
static PLAINTEXT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(['"])?([a-zA-Z0-9_.]+)(['"])?"#).unwrap());

/// The transaction blob inside `snarkos developer ... --dry-run` stdout:
/// everything from the first opening brace through the last closing brace.
static TRANSACTION_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Marker leo prints above the value block of a run/execute.
const OUTPUTS_MARKER: &str = "Outputs";
const OUTPUT_MARKER: &str = "Output";
/// Bullet prefixing each value in the output block.
const OUTPUT_BULLET: char = '\u{2022}';

/// Rewrites an Aleo plaintext value into valid JSON and parses it.
///
/// Every bare token is wrapped in double quotes, so a record such as
/// `{ owner: aleo1...private, microcredits: 1500u64.private }` becomes an
/// object of strings, and a bare literal like `10u64` becomes the JSON
/// string `"10u64"`. Field order is preserved.
///
/// # Example
/// ```
/// use aleo_dev_agent::output::parse_json_like;
///
/// let value = parse_json_like("{ amount: 10u64 }").unwrap();
/// assert_eq!(value["amount"], "10u64");
/// ```
pub fn parse_json_like(text: &str) -> Result<Value> {
    let quoted = PLAINTEXT_TOKEN.replace_all(text, "\"${2}\" ");
    serde_json::from_str(quoted.trim())
        .with_context(|| format!("value is not JSON-like: {text}"))
}

/// Extracts the transaction JSON from `snarkos developer deploy`/`execute`
/// stdout. The surrounding text (fee estimates, status lines) is discarded.
pub fn parse_transaction_json(stdout: &str) -> Result<Transaction> {
    let span = TRANSACTION_SPAN
        .find(stdout)
        .context("no transaction JSON found in command output")?;
    serde_json::from_str(span.as_str())
        .context("transaction JSON in command output is malformed")
}

/// The structured result of a `leo run` / `leo execute` invocation.
#[derive(Debug, Default)]
pub struct ExecutionOutput {
    /// The transition's output values, normalized through [`parse_json_like`].
    pub data: Vec<Value>,
    /// The transaction payload, when the command produced one.
    pub transaction: Option<Transaction>,
}

/// Splits `leo run` / `leo execute` stdout into its positional blocks.
///
/// The text after the `Outputs` marker (or `Output` for a single value)
/// separates, on blank lines, into: the bulleted value block, an optional
/// transaction JSON block, and a trailing status line which is dropped.
/// Without an output marker the command produced no values, but a
/// transaction block may still be present after the first three blocks of
/// compiler chatter.
pub fn parse_execute_stdout(stdout: &str) -> Result<ExecutionOutput> {
    let tail = match stdout.split_once(OUTPUTS_MARKER) {
        Some((_, tail)) => tail,
        None => match stdout.split_once(OUTPUT_MARKER) {
            Some((_, tail)) => tail,
            None => return parse_outputless_stdout(stdout),
        },
    };

    let mut blocks: Vec<&str> = tail
        .split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .collect();
    // the last block is the status line of the command itself
    blocks.pop();

    let mut blocks = blocks.into_iter();
    let data = match blocks.next() {
        Some(bullets) => bullets
            .split(OUTPUT_BULLET)
            .filter(|part| !part.trim().is_empty())
            .map(parse_json_like)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };
    let transaction = blocks
        .next()
        .map(|block| {
            serde_json::from_str(block.trim())
                .context("transaction block in command output is malformed")
        })
        .transpose()?;

    Ok(ExecutionOutput { data, transaction })
}

// No output marker: skip the leading compiler chatter (three blocks), drop
// the trailing status line, and read a transaction block if one remains.
fn parse_outputless_stdout(stdout: &str) -> Result<ExecutionOutput> {
    let mut blocks: Vec<&str> = stdout.split("\n\n").skip(3).collect();
    blocks.pop();
    let transaction = blocks
        .first()
        .map(|block| {
            serde_json::from_str(block.trim())
                .context("transaction block in command output is malformed")
        })
        .transpose()?;
    Ok(ExecutionOutput {
        data: Vec::new(),
        transaction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_like_record() {
        let record = "{\n  owner: aleo1rhgdu77hgyqd3xjj8ucu3jj9r2krwz6mnzyd80gncr5fxcwlh5rsvzp9px.private,\n  microcredits: 1500000u64.private,\n  _nonce: 3077450429259593211617823051143573281856129402760267155982965992208217472983group.public\n}";
        let value = parse_json_like(record).unwrap();
        assert_eq!(value["microcredits"], "1500000u64.private");
        assert!(value["owner"]
            .as_str()
            .unwrap()
            .starts_with("aleo1rhgdu77"));
    }

    #[test]
    fn test_parse_json_like_preserves_field_order() {
        let value = parse_json_like("{ zeta: 1u8, alpha: 2u8, mid: 3u8 }").unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_json_like_scalar() {
        let value = parse_json_like("10u64").unwrap();
        assert_eq!(value, "10u64");
    }

    #[test]
    fn test_parse_json_like_rejects_garbage() {
        assert!(parse_json_like("{ unterminated").is_err());
    }

    #[test]
    fn test_parse_transaction_json() {
        let stdout = "📦 Creating deployment transaction for 'sample_program.aleo'...\n\n{\"type\":\"deploy\",\"id\":\"at1deploy\",\"deployment\":{\"edition\":0}}\n\n✅ Created deployment transaction for 'sample_program.aleo'\n";
        let transaction = parse_transaction_json(stdout).unwrap();
        assert_eq!(transaction.id.as_deref(), Some("at1deploy"));
        assert!(transaction.is_deploy());
    }

    #[test]
    fn test_parse_transaction_json_missing() {
        assert!(parse_transaction_json("no braces here").is_err());
    }

    #[test]
    fn test_parse_execute_stdout_single_output() {
        let stdout = "       Leo ✅ Compiled 'main.aleo' into Aleo instructions\n\n⛓  Constraints\n\n •  'sample_program.aleo/main' - 33 constraints (called 1 time)\n\n➡️  Output\n\n • 3u32\n\n       Leo ✅ Finished 'sample_program.aleo/main'\n";
        let parsed = parse_execute_stdout(stdout).unwrap();
        assert_eq!(parsed.data, vec![Value::from("3u32")]);
        assert!(parsed.transaction.is_none());
    }

    #[test]
    fn test_parse_execute_stdout_multiple_outputs_with_transaction() {
        let stdout = "       Leo ✅ Compiled 'main.aleo' into Aleo instructions\n\n➡️  Outputs\n\n • 3u32\n • { amount: 7u64 }\n\n{\"type\":\"execute\",\"id\":\"at1exec\",\"execution\":{\"transitions\":[]}}\n\n       Leo ✅ Finished 'sample_program.aleo/main'\n";
        let parsed = parse_execute_stdout(stdout).unwrap();
        assert_eq!(parsed.data.len(), 2);
        assert_eq!(parsed.data[0], "3u32");
        assert_eq!(parsed.data[1]["amount"], "7u64");
        let transaction = parsed.transaction.unwrap();
        assert_eq!(transaction.id.as_deref(), Some("at1exec"));
    }

    #[test]
    fn test_parse_execute_stdout_no_output_marker() {
        let stdout = "block one\n\nblock two\n\nblock three\n\n{\"type\":\"execute\",\"id\":\"at1bare\",\"execution\":{\"transitions\":[]}}\n\nstatus line\n";
        let parsed = parse_execute_stdout(stdout).unwrap();
        assert!(parsed.data.is_empty());
        assert_eq!(
            parsed.transaction.unwrap().id.as_deref(),
            Some("at1bare")
        );
    }

    #[test]
    fn test_parse_execute_stdout_no_output_no_transaction() {
        let parsed = parse_execute_stdout("just one line of chatter\n").unwrap();
        assert!(parsed.data.is_empty());
        assert!(parsed.transaction.is_none());
    }
}
