//! Attribute file I/O (§6): a whitespace-separated header of attribute
//! names, one line per node in node-index order, one field per attribute.
//! Shared by all four attribute kinds; only the per-field parser differs.

use std::path::Path;

use eenet_graph::attributes::AttributeStore;
use eenet_graph::{EeError, Result};
use hashbrown::HashSet;

fn read_table(path: &Path) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| EeError::Config(format!("could not read attribute file '{}': {e}", path.display())))?;
    let mut lines = text.lines();
    let header = lines
        .next()
        .ok_or_else(|| EeError::Config(format!("{}: empty attribute file", path.display())))?;
    let names: Vec<String> = header.split_whitespace().map(str::to_string).collect();

    let mut rows = Vec::new();
    for (idx, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if fields.len() != names.len() {
            return Err(EeError::Config(format!(
                "{}:{}: expected {} fields, got {}",
                path.display(),
                idx + 2,
                names.len(),
                fields.len()
            )));
        }
        rows.push(fields);
    }
    Ok((names, rows))
}

fn check_node_count(path: &Path, rows: &[Vec<String>], number_of_nodes: usize) -> Result<()> {
    if rows.len() != number_of_nodes {
        return Err(EeError::Config(format!(
            "{}: {} node rows but the graph has {} nodes",
            path.display(),
            rows.len(),
            number_of_nodes
        )));
    }
    Ok(())
}

fn is_na(field: &str) -> bool {
    field.eq_ignore_ascii_case("NA")
}

/// Loads a `binattrFile` into `store`: `true`/`false` (case-insensitive),
/// or `NA` for missing.
pub fn read_binary_attributes(path: impl AsRef<Path>, store: &mut AttributeStore, number_of_nodes: usize) -> Result<()> {
    let path = path.as_ref();
    let (names, rows) = read_table(path)?;
    check_node_count(path, &rows, number_of_nodes)?;

    for (col, name) in names.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let field = &row[col];
            let value = if is_na(field) {
                None
            } else {
                match field.to_ascii_lowercase().as_str() {
                    "true" | "1" => Some(true),
                    "false" | "0" => Some(false),
                    other => {
                        return Err(EeError::Config(format!(
                            "{}: attribute '{name}' has non-binary value '{other}'",
                            path.display()
                        )))
                    }
                }
            };
            values.push(value);
        }
        store.add_binary(name.clone(), values, number_of_nodes)?;
    }
    Ok(())
}

/// Loads a `catattrFile` into `store`: non-negative integers, or `NA`.
pub fn read_categorical_attributes(path: impl AsRef<Path>, store: &mut AttributeStore, number_of_nodes: usize) -> Result<()> {
    let path = path.as_ref();
    let (names, rows) = read_table(path)?;
    check_node_count(path, &rows, number_of_nodes)?;

    for (col, name) in names.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let field = &row[col];
            let value = if is_na(field) {
                None
            } else {
                Some(field.parse::<u64>().map_err(|e| {
                    EeError::Config(format!("{}: attribute '{name}' has bad categorical value '{field}': {e}", path.display()))
                })?)
            };
            values.push(value);
        }
        store.add_categorical(name.clone(), values, number_of_nodes)?;
    }
    Ok(())
}

/// Loads a `contattrFile` into `store`: doubles, or `NA`.
pub fn read_continuous_attributes(path: impl AsRef<Path>, store: &mut AttributeStore, number_of_nodes: usize) -> Result<()> {
    let path = path.as_ref();
    let (names, rows) = read_table(path)?;
    check_node_count(path, &rows, number_of_nodes)?;

    for (col, name) in names.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let field = &row[col];
            let value = if is_na(field) {
                None
            } else {
                Some(field.parse::<f64>().map_err(|e| {
                    EeError::Config(format!("{}: attribute '{name}' has bad continuous value '{field}': {e}", path.display()))
                })?)
            };
            values.push(value);
        }
        store.add_continuous(name.clone(), values, number_of_nodes)?;
    }
    Ok(())
}

/// Loads a `setattrFile` into `store`: comma-separated non-negative
/// integers, or the tokens `none` (empty set) / `NA` (missing).
pub fn read_set_attributes(path: impl AsRef<Path>, store: &mut AttributeStore, number_of_nodes: usize) -> Result<()> {
    let path = path.as_ref();
    let (names, rows) = read_table(path)?;
    check_node_count(path, &rows, number_of_nodes)?;

    for (col, name) in names.iter().enumerate() {
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let field = &row[col];
            let value = if is_na(field) {
                None
            } else if field.eq_ignore_ascii_case("none") {
                Some(HashSet::new())
            } else {
                let mut set = HashSet::new();
                for token in field.split(',') {
                    let token = token.trim();
                    if token.is_empty() {
                        continue;
                    }
                    let member = token.parse::<u64>().map_err(|e| {
                        EeError::Config(format!(
                            "{}: attribute '{name}' has bad set member '{token}': {e}",
                            path.display()
                        ))
                    })?;
                    set.insert(member);
                }
                Some(set)
            };
            values.push(value);
        }
        store.add_set_valued(name.clone(), values, number_of_nodes)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("eenet-attr-test-{}-{}", std::process::id(), contents.len()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_binary_with_na() {
        let path = write_temp("sex smoker\nTRUE false\nFALSE NA\n");
        let mut store = AttributeStore::new();
        read_binary_attributes(&path, &mut store, 2).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(store.binary("sex", 0), Some(true));
        assert_eq!(store.binary("smoker", 1), None);
    }

    #[test]
    fn reads_categorical() {
        let path = write_temp("group\n1\n2\n3\n");
        let mut store = AttributeStore::new();
        read_categorical_attributes(&path, &mut store, 3).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(store.categorical("group", 2), Some(3));
    }

    #[test]
    fn reads_set_valued_with_none_and_na() {
        let path = write_temp("tags\n1,2,3\nnone\nNA\n");
        let mut store = AttributeStore::new();
        read_set_attributes(&path, &mut store, 3).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(store.set_valued("tags", 0).unwrap().len(), 3);
        assert_eq!(store.set_valued("tags", 1).unwrap().len(), 0);
        assert!(store.set_valued("tags", 2).is_none());
    }

    #[test]
    fn rejects_node_count_mismatch() {
        let path = write_temp("group\n1\n2\n");
        let mut store = AttributeStore::new();
        assert!(read_categorical_attributes(&path, &mut store, 3).is_err());
        std::fs::remove_file(&path).ok();
    }
}
