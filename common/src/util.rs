use std::path::{Path, PathBuf};

use eyre::{Context, Result, bail, eyre};
use itertools::Itertools;

/// Parses fio-style size tokens ("8k", "1m") into bytes.
pub fn parse_request_size(request_size: &str) -> Result<u64> {
    let request_size = request_size.to_lowercase();
    if request_size.contains("k") {
        Ok(request_size
            .replace("k", "")
            .parse::<u64>()
            .context(format!("Parse request size: {request_size}"))?
            * 1024)
    } else if request_size.contains("m") {
        Ok(request_size
            .replace("m", "")
            .parse::<u64>()
            .context(format!("Parse request size: {request_size}"))?
            * 1024
            * 1024)
    } else {
        bail!("Unsupported request size {request_size}")
    }
}

/// Numeric block-size order. Lexical order would put "16k" before "8k".
pub fn sort_block_sizes<I>(block_sizes: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = String>,
{
    let keyed = block_sizes
        .into_iter()
        .map(|token| parse_request_size(&token).map(|bytes| (bytes, token)))
        .collect::<Result<Vec<_>>>()?;
    Ok(keyed
        .into_iter()
        .sorted_by_key(|&(bytes, _)| bytes)
        .map(|(_, token)| token)
        .collect())
}

/// Display value for axis labels and report lines, e.g. "32k" -> 32.
pub fn block_size_kib(block_size: &str) -> Result<u64> {
    Ok(parse_request_size(block_size)? / 1024)
}

/// Immediate subdirectories, in name order.
pub fn subdirs(root: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root).context(format!("List {}", root.display()))? {
        let entry = entry.context(format!("List {}", root.display()))?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Plain file names in a directory, sorted so scans are deterministic.
pub fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).context(format!("List {}", dir.display()))? {
        let entry = entry.context(format!("List {}", dir.display()))?;
        if entry.file_type()?.is_file() {
            let name = entry
                .file_name()
                .into_string()
                .map_err(|name| eyre!("Non-UTF-8 filename {name:?} in {}", dir.display()))?;
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
