use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::grid::{Cell, Row, TableGrid};

pub const REFERENCE_URL: &str = "https://www.pastraiser.com/cpu/gameboy/gameboy_opcodes.html";

/// GET `url` and return the body. Any non-2xx status is an error.
pub fn fetch(url: &str) -> Result<String> {
    info!("fetching {url}");
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("fetch failed: {url}"))?;
    response
        .into_string()
        .with_context(|| format!("fetch failed: {url}: couldn't read body"))
}

/// Saved copy of the page.
pub fn read_html(path: &Path) -> Result<String> {
    info!("reading {}", path.display());
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Every `tr` in the document, with its `td`/`th` children.
///
/// A cell's text is all of its text nodes joined with nothing in between,
/// so `NOP<br>1&nbsp;&nbsp;4` becomes `NOP1\u{a0}\u{a0}4`.
pub fn parse(html: &str) -> TableGrid {
    static ROW: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());

    let doc = Html::parse_document(html);
    let grid: TableGrid = doc.select(&ROW).map(parse_row).collect();
    info!("found {} table rows", grid.len());
    grid
}

fn parse_row(tr: ElementRef<'_>) -> Row {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|el| matches!(el.value().name(), "td" | "th"))
        .map(|el| Cell::new(el.text().collect::<String>()))
        .collect()
}
