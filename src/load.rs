//! Parsing of bulk-load input.
//!
//! Input is whitespace separated text: a count followed by that many values. Anything after the
//! announced values is ignored.

use crate::error::{Error, Result};
use log::debug;
use std::io::Read;
use std::str::FromStr;

/// Reads a count followed by that many values from `reader`.
///
/// # Examples
/// ```
/// use balanced_trees::load;
///
/// let values: Vec<i32> = load::read_values("3\n-1 4 1".as_bytes()).unwrap();
/// assert_eq!(values, vec![-1, 4, 1]);
/// ```
pub fn read_values<T, R>(mut reader: R) -> Result<Vec<T>>
where
    T: FromStr,
    R: Read,
{
    let mut input = String::new();
    reader.read_to_string(&mut input)?;
    let mut tokens = input.split_whitespace();

    let count_token = tokens.next().unwrap_or("");
    let expected: usize = count_token
        .parse()
        .map_err(|_| Error::InvalidCount(count_token.to_string()))?;

    let mut values = Vec::new();
    for (index, token) in tokens.take(expected).enumerate() {
        let value = token.parse().map_err(|_| Error::InvalidValue {
            index,
            token: token.to_string(),
        })?;
        values.push(value);
    }

    if values.len() < expected {
        return Err(Error::Truncated {
            expected,
            found: values.len(),
        });
    }

    debug!("read {} values", values.len());
    Ok(values)
}
