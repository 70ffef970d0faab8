/*!
# Rat file reader

Parses the rat population file: a header `N R` followed by `R` lines, each
a single node id giving a rat's initial position.
*/

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::RatwalkError;

/// Initial rat positions read from a rat file.
#[derive(Debug, Clone)]
pub struct RatFile {
    pub node_count: u32,
    pub positions: Vec<u32>,
}

fn strip_comment(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        None
    } else {
        Some(trimmed)
    }
}

fn next_content_line(lines: &mut std::io::Lines<BufReader<File>>) -> Result<String, RatwalkError> {
    for line in lines.by_ref() {
        let line = line?;
        if let Some(content) = strip_comment(&line) {
            return Ok(content.to_string());
        }
    }
    Err(RatwalkError::malformed_input(
        "unexpected end of file while reading rat positions",
    ))
}

/// Parses the rat file at `path`. `graph_node_count` is the node count read
/// from the graph file; the rat file's header must match it exactly.
pub fn parse_rats(path: &Path, graph_node_count: u32) -> Result<RatFile, RatwalkError> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = next_content_line(&mut lines)?;
    let mut fields = header.split_whitespace();
    let node_count: u32 = fields
        .next()
        .ok_or_else(|| RatwalkError::malformed_input("missing rat header node count"))?
        .parse()?;
    let rat_count: u32 = fields
        .next()
        .ok_or_else(|| RatwalkError::malformed_input("missing rat header rat count"))?
        .parse()?;

    if node_count != graph_node_count {
        return Err(RatwalkError::malformed_input(format!(
            "rat file node count {} does not match graph node count {}",
            node_count, graph_node_count
        )));
    }

    let mut positions = Vec::with_capacity(rat_count as usize);
    for _ in 0..rat_count {
        let line = next_content_line(&mut lines)?;
        let pos: u32 = line
            .parse()
            .map_err(|_| RatwalkError::malformed_input(format!("invalid rat position '{}'", line)))?;
        if pos >= node_count {
            return Err(RatwalkError::malformed_input(format!(
                "rat position {} out of range for {} nodes",
                pos, node_count
            )));
        }
        positions.push(pos);
    }

    Ok(RatFile { node_count, positions })
}
