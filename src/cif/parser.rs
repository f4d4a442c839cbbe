//! Minimal CIF reader
//!
//! Extracts only what the descriptors need from a CIF data block: the unit
//! cell, the fractional atom-site coordinates, and the chemical formula.
//! Uncertainty suffixes like `5.43(2)` are stripped; loops the tool does not
//! care about are skipped wholesale.

use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::path::Path;

/// Unit cell parameters: lengths in angstroms, angles in degrees
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// One atom site with fractional coordinates
#[derive(Debug, Clone)]
pub struct AtomSite {
    pub label: String,
    pub fract: [f64; 3],
}

/// A parsed CIF data block
#[derive(Debug, Clone)]
pub struct CifDocument {
    /// `data_` block name
    pub name: String,
    pub formula: Option<String>,
    pub cell: Cell,
    pub sites: Vec<AtomSite>,
}

struct Loop {
    tags: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CifDocument {
    pub fn parse_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn parse_str(text: &str) -> Result<Self> {
        let (name, items, loops) = scan(text)?;

        let cell = Cell {
            a: numeric_item(&items, "_cell_length_a")?,
            b: numeric_item(&items, "_cell_length_b")?,
            c: numeric_item(&items, "_cell_length_c")?,
            alpha: numeric_item(&items, "_cell_angle_alpha")?,
            beta: numeric_item(&items, "_cell_angle_beta")?,
            gamma: numeric_item(&items, "_cell_angle_gamma")?,
        };
        validate_cell(&cell)?;

        let formula = items
            .get("_chemical_formula_structural")
            .or_else(|| items.get("_chemical_formula_sum"))
            .cloned();

        let sites = atom_sites(&loops)?;
        if sites.is_empty() {
            bail!("no atom sites found");
        }

        Ok(CifDocument { name, formula, cell, sites })
    }
}

/// Tokenize the block into single items and loops. Only the first `data_`
/// block is read.
fn scan(text: &str) -> Result<(String, HashMap<String, String>, Vec<Loop>)> {
    let mut name = String::new();
    let mut items = HashMap::new();
    let mut loops = Vec::new();

    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    let mut in_block = false;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() || line.starts_with('#') {
            i += 1;
            continue;
        }

        if let Some(block) = line.strip_prefix("data_") {
            if in_block {
                break; // second data block, stop
            }
            name = block.to_string();
            in_block = true;
            i += 1;
            continue;
        }

        if line == "loop_" {
            let (parsed, next) = scan_loop(&lines, i + 1);
            loops.push(parsed);
            i = next;
            continue;
        }

        if let Some(rest) = line.strip_prefix('_') {
            let mut parts = rest.splitn(2, char::is_whitespace);
            let tag = format!("_{}", parts.next().unwrap_or_default());
            let value = parts.next().unwrap_or("").trim();
            items.insert(tag, unquote(value));
        }

        i += 1;
    }

    if !in_block {
        bail!("no data_ block found");
    }
    Ok((name, items, loops))
}

fn scan_loop(lines: &[&str], mut i: usize) -> (Loop, usize) {
    let mut tags = Vec::new();

    // Header: one tag per line
    while i < lines.len() {
        let line = lines[i].trim();
        if let Some(tag) = line.strip_prefix('_') {
            let tag = tag.split_whitespace().next().unwrap_or_default();
            tags.push(format!("_{tag}"));
            i += 1;
        } else {
            break;
        }
    }

    // Body: whitespace-separated values, possibly wrapped across lines
    let mut rows = Vec::new();
    let mut pending: Vec<String> = Vec::new();
    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty()
            || line.starts_with('#')
            || line.starts_with('_')
            || line == "loop_"
            || line.starts_with("data_")
        {
            break;
        }
        pending.extend(line.split_whitespace().map(|t| unquote(t)));
        while !tags.is_empty() && pending.len() >= tags.len() {
            rows.push(pending.drain(..tags.len()).collect());
        }
        i += 1;
    }

    (Loop { tags, rows }, i)
}

fn atom_sites(loops: &[Loop]) -> Result<Vec<AtomSite>> {
    let site_loop = loops
        .iter()
        .find(|l| l.tags.iter().any(|t| t == "_atom_site_fract_x"))
        .context("no atom site loop found")?;

    let col = |tag: &str| site_loop.tags.iter().position(|t| t == tag);
    let label_col = col("_atom_site_label").or_else(|| col("_atom_site_type_symbol"));
    let x_col = col("_atom_site_fract_x").context("missing _atom_site_fract_x")?;
    let y_col = col("_atom_site_fract_y").context("missing _atom_site_fract_y")?;
    let z_col = col("_atom_site_fract_z").context("missing _atom_site_fract_z")?;

    let mut sites = Vec::with_capacity(site_loop.rows.len());
    for row in &site_loop.rows {
        let label = label_col
            .and_then(|c| row.get(c))
            .cloned()
            .unwrap_or_else(|| format!("site{}", sites.len() + 1));
        let fract = [
            parse_numeric(row.get(x_col).map(String::as_str).unwrap_or(""))
                .with_context(|| format!("bad fract_x for {label}"))?,
            parse_numeric(row.get(y_col).map(String::as_str).unwrap_or(""))
                .with_context(|| format!("bad fract_y for {label}"))?,
            parse_numeric(row.get(z_col).map(String::as_str).unwrap_or(""))
                .with_context(|| format!("bad fract_z for {label}"))?,
        ];
        sites.push(AtomSite { label, fract });
    }
    Ok(sites)
}

fn numeric_item(items: &HashMap<String, String>, tag: &str) -> Result<f64> {
    let value = items.get(tag).with_context(|| format!("missing {tag}"))?;
    parse_numeric(value).with_context(|| format!("bad value for {tag}"))
}

/// Parse a CIF numeric value, dropping a trailing uncertainty like `(2)`.
fn parse_numeric(value: &str) -> Result<f64> {
    let trimmed = match value.find('(') {
        Some(pos) => &value[..pos],
        None => value,
    };
    trimmed
        .parse::<f64>()
        .map_err(|_| anyhow::anyhow!("not a number: {value:?}"))
}

fn validate_cell(cell: &Cell) -> Result<()> {
    for (name, length) in [("a", cell.a), ("b", cell.b), ("c", cell.c)] {
        if !(length > 0.0) {
            bail!("cell length {name} must be positive, got {length}");
        }
    }
    for (name, angle) in
        [("alpha", cell.alpha), ("beta", cell.beta), ("gamma", cell.gamma)]
    {
        if !(angle > 0.0 && angle < 180.0) {
            bail!("cell angle {name} must be in (0, 180), got {angle}");
        }
    }
    Ok(())
}

fn unquote(value: &str) -> String {
    let v = value.trim();
    for quote in ['\'', '"'] {
        if v.len() >= 2 && v.starts_with(quote) && v.ends_with(quote) {
            return v[1..v.len() - 1].to_string();
        }
    }
    v.to_string()
}
