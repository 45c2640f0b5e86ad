//! Routing of private transition outputs through an external decryption
//! routine.
//!
//! The decryption itself is out of scope for this crate: it is provided by an
//! implementation of [`OutputDecryptor`]. What lives here is the glue around
//! it: selecting the transition that matches the invoked function, computing
//! the output index offset, and normalizing the recovered plaintext.

use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::output::parse_json_like;
use crate::transaction::Transaction;

/// Decrypts a single private transition output.
///
/// `output_index` counts the transition's inputs first, matching the index
/// scheme the decryption routine derives nonces from.
pub trait OutputDecryptor: Send + Sync {
    fn decrypt_output(
        &self,
        ciphertext: &str,
        program_id: &str,
        function: &str,
        output_index: usize,
        private_key: &str,
        tpk: &str,
    ) -> Result<String>;
}

/// Returns ciphertexts untouched. The default when no decryption routine is
/// wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughDecryptor;

impl OutputDecryptor for PassthroughDecryptor {
    fn decrypt_output(
        &self,
        ciphertext: &str,
        _program_id: &str,
        _function: &str,
        _output_index: usize,
        _private_key: &str,
        _tpk: &str,
    ) -> Result<String> {
        Ok(ciphertext.to_string())
    }
}

/// Extracts the output values of the transition matching `function` within
/// `program_id`, decrypting `private` outputs through `decryptor`.
///
/// `record` and public outputs pass through as-is, `external_record` outputs
/// cannot be recovered and become JSON null. Every recovered value is
/// normalized with [`parse_json_like`].
pub(crate) fn decrypt_transition_outputs(
    transaction: &Transaction,
    program_id: &str,
    function: &str,
    private_key: &str,
    decryptor: &dyn OutputDecryptor,
) -> Result<Vec<Value>> {
    let Some(execution) = transaction.execution.as_ref() else {
        return Ok(Vec::new());
    };
    let Some(transition) = execution
        .transitions
        .iter()
        .find(|transition| transition.function == function && transition.program == program_id)
    else {
        return Ok(Vec::new());
    };

    let offset = transition.inputs.len();
    let mut values = Vec::with_capacity(transition.outputs.len());
    for (index, output) in transition.outputs.iter().enumerate() {
        let text = match output.kind.as_str() {
            "external_record" => {
                values.push(Value::Null);
                continue;
            }
            "private" => {
                let ciphertext = output
                    .value
                    .as_ref()
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        anyhow!("private output {index} of `{function}` has no ciphertext value")
                    })?;
                let tpk = transition
                    .tpk
                    .as_deref()
                    .ok_or_else(|| anyhow!("transition for `{function}` is missing its tpk"))?;
                decryptor.decrypt_output(
                    ciphertext,
                    program_id,
                    function,
                    offset + index,
                    private_key,
                    tpk,
                )?
            }
            _ => match output.value.as_ref() {
                Some(Value::String(text)) => text.clone(),
                Some(other) => {
                    values.push(other.clone());
                    continue;
                }
                None => {
                    values.push(Value::Null);
                    continue;
                }
            },
        };
        values.push(parse_json_like(&text)?);
    }
    Ok(values)
}
