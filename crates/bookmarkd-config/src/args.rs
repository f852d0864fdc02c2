//! Command-line tokenizer.
//!
//! Turns the raw process argument vector into a flat name → value map.
//! Element 0 is conventionally the program path and is ignored. Tokens
//! must look like `-name=value`; `-h` / `--help` anywhere short-circuits
//! with [`ConfigError::HelpRequested`].

use std::collections::HashMap;

use crate::error::ConfigError;

/// Tokenizes the argument vector into a raw argument map.
///
/// Names are trimmed of leading/trailing `-` and `=`; the value is
/// everything after the first `=` and may be empty (an empty value later
/// falls through to the parameter's baseline during resolution).
/// Duplicate names are de-duplicated last-write-wins.
///
/// # Errors
///
/// - [`ConfigError::HelpRequested`] for `-h` or `--help`.
/// - [`ConfigError::MalformedParameter`] for a token without the leading
///   `-` marker.
/// - [`ConfigError::UnknownOrNoValue`] for a token that has no `=`.
pub fn parse_args(args: &[String]) -> Result<HashMap<String, String>, ConfigError> {
    let mut map = HashMap::new();
    if args.len() < 2 {
        return Ok(map);
    }

    for token in &args[1..] {
        if token == "-h" || token == "--help" {
            return Err(ConfigError::HelpRequested);
        }
        if !token.starts_with('-') {
            return Err(ConfigError::MalformedParameter {
                token: token.clone(),
            });
        }
        let Some((name, value)) = token.split_once('=') else {
            return Err(ConfigError::UnknownOrNoValue {
                token: token.clone(),
            });
        };
        let name = name.trim_matches(['-', '=']);
        map.insert(name.to_string(), value.to_string());
    }

    Ok(map)
}
