/// Line-oriented record files: loading and record grammars
///
/// Every asset (shape deltas, color deltas, mesh, weight tables) is plain
/// text with one comma-separated record per line.
use std::fs;
use std::path::Path;

use log::{debug, error};
use nom::{
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res},
    number::complete::double,
    sequence::delimited,
    IResult,
};

use crate::error::{MorphError, Result};

/// Read a whole asset file.
///
/// A missing or unreadable file is logged and yields empty text, so the
/// parse that consumes it fails on missing data instead of here.
pub fn read_lenient(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(text) => {
            debug!("read {} ({} bytes)", path.display(), text.len());
            text
        }
        Err(e) => {
            error!("failed to read {}: {}", path.display(), e);
            String::new()
        }
    }
}

/// Parse an `a,b,c` record of reals.
pub fn parse_triple(line: &str, line_no: usize) -> Result<[f64; 3]> {
    finish(all_consuming(real_triple)(line), line_no)
}

/// Parse an `i1,i2,i3` record of 1-based indices into 0-based ones.
pub fn parse_index_triple(line: &str, line_no: usize) -> Result<[usize; 3]> {
    let [a, b, c] = finish(all_consuming(index_triple)(line), line_no)?;
    let to_zero_based = |i: usize| {
        i.checked_sub(1).ok_or_else(|| MorphError::Parse {
            line: line_no,
            message: "vertex indices start at 1".to_string(),
        })
    };
    Ok([to_zero_based(a)?, to_zero_based(b)?, to_zero_based(c)?])
}

/// Parse a weight table: one real number per non-blank line.
pub fn parse_weights(text: &str) -> Result<Vec<f64>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| finish(all_consuming(field(double))(line), i + 1))
        .collect()
}

pub fn load_weights(path: &Path) -> Result<Vec<f64>> {
    let weights = parse_weights(&read_lenient(path))?;
    debug!("loaded {} weights from {}", weights.len(), path.display());
    Ok(weights)
}

fn finish<T>(result: IResult<&str, T>, line_no: usize) -> Result<T> {
    match result {
        Ok((_, value)) => Ok(value),
        Err(e) => Err(MorphError::Parse {
            line: line_no,
            message: format!("malformed record: {:?}", e),
        }),
    }
}

fn field<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(space0, inner, space0)
}

fn real_triple(input: &str) -> IResult<&str, [f64; 3]> {
    let (input, a) = field(double)(input)?;
    let (input, _) = char(',')(input)?;
    let (input, b) = field(double)(input)?;
    let (input, _) = char(',')(input)?;
    let (input, c) = field(double)(input)?;
    Ok((input, [a, b, c]))
}

fn index(input: &str) -> IResult<&str, usize> {
    field(map_res(digit1, str::parse::<usize>))(input)
}

fn index_triple(input: &str) -> IResult<&str, [usize; 3]> {
    let (input, a) = index(input)?;
    let (input, _) = char(',')(input)?;
    let (input, b) = index(input)?;
    let (input, _) = char(',')(input)?;
    let (input, c) = index(input)?;
    Ok((input, [a, b, c]))
}
