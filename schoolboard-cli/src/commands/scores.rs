use std::path::PathBuf;

use log::debug;
use schoolboard_lib::table::{Column, PageSize, SortDirection, Table};
use serde_json::Value;

use crate::error::{CliError, Result};

pub struct ScoresArgs {
    pub file: PathBuf,
    pub filter: Option<String>,
    pub sort: Vec<String>,
    pub page: usize,
    pub page_size: String,
    pub select: Vec<String>,
    pub select_all: bool,
}

pub fn handle(args: ScoresArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file).map_err(|source| CliError::Io {
        path: args.file.clone(),
        source,
    })?;
    let rows = match serde_json::from_str::<Value>(&raw)? {
        Value::Array(rows) => rows,
        _ => return Err(CliError::usage("score file must hold a JSON array")),
    };
    debug!("Loaded {} rows from {}", rows.len(), args.file.display());

    let table = build_table(rows, &args)?;
    print!("{}", render(&table));
    Ok(())
}

/// Selection and row number columns, then one column per field of the
/// first row.
fn columns_for(rows: &[Value]) -> Vec<Column<Value>> {
    let mut columns = vec![Column::selection("select"), Column::row_number("no", "No")];
    if let Some(Value::Object(first)) = rows.first() {
        columns.extend(first.keys().map(|key| Column::field(key.as_str(), key.as_str())));
    }
    columns
}

fn build_table(rows: Vec<Value>, args: &ScoresArgs) -> Result<Table<Value>> {
    let page_size = args
        .page_size
        .parse::<usize>()
        .ok()
        .and_then(|n| PageSize::try_from(n).ok())
        .ok_or_else(|| CliError::usage(format!("invalid page size: {}", args.page_size)))?;

    let table = Table::with_rows(columns_for(&rows), rows).with_multi_sort(args.sort.len() > 1);
    table.set_page_size(page_size);

    if let Some(filter) = &args.filter {
        table.set_filter_text(filter.as_str());
    }
    for key in &args.sort {
        let (column, direction) = parse_sort(key)?;
        table.set_sort(column, Some(direction))?;
    }
    if args.select_all {
        table.toggle_all_selected();
    }
    for id in &args.select {
        table.set_row_selected(id.as_str(), true);
    }
    table.set_page_index(args.page.saturating_sub(1));
    Ok(table)
}

/// `score` or `score:desc`.
fn parse_sort(key: &str) -> Result<(&str, SortDirection)> {
    let (column, direction) = match key.split_once(':') {
        Some((column, dir)) => (column, dir),
        None => (key, "asc"),
    };
    let direction = match direction.to_ascii_lowercase().as_str() {
        "asc" => SortDirection::Ascending,
        "desc" => SortDirection::Descending,
        other => return Err(CliError::usage(format!("invalid sort direction: {}", other))),
    };
    Ok((column, direction))
}

fn render(table: &Table<Value>) -> String {
    let headers: Vec<String> = table
        .header_cells()
        .into_iter()
        .map(|cell| match cell.sort {
            Some(dir) => format!("{} {}", cell.label, dir.indicator()),
            None => cell.label,
        })
        .collect();
    let body: Vec<Vec<String>> = table
        .visible_rows()
        .iter()
        .map(|row| table.render_row(row))
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{:<width$}", cell, width = width))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(&headers);
    for cells in &body {
        out.push_str(&line(cells));
    }

    let info = table.page_info();
    out.push_str(&format!(
        "\npage {}/{} ({} rows, {} per page)\n",
        if info.page_count == 0 { 0 } else { info.page_index + 1 },
        info.page_count,
        info.total_rows,
        info.page_size
    ));
    if table.is_some_selected() || table.is_all_selected() {
        let ids: Vec<String> = table.selected_ids().iter().map(ToString::to_string).collect();
        out.push_str(&format!("selected: {}\n", ids.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args() -> ScoresArgs {
        ScoresArgs {
            file: PathBuf::from("scores.json"),
            filter: None,
            sort: Vec::new(),
            page: 1,
            page_size: "10".to_string(),
            select: Vec::new(),
            select_all: false,
        }
    }

    fn rows() -> Vec<Value> {
        vec![
            json!({"name": "Ana", "score": 90}),
            json!({"name": "Budi", "score": 70}),
            json!({"name": "Cici", "score": 90}),
        ]
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("score").unwrap(), ("score", SortDirection::Ascending));
        assert_eq!(parse_sort("score:DESC").unwrap(), ("score", SortDirection::Descending));
        assert!(parse_sort("score:sideways").is_err());
    }

    #[test]
    fn test_sorted_and_filtered_render() {
        let mut a = args();
        a.sort = vec!["score:desc".to_string()];
        let table = build_table(rows(), &a).unwrap();
        let names: Vec<_> = table
            .visible_rows()
            .into_iter()
            .map(|r| r.row["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["Ana", "Cici", "Budi"]);

        table.set_filter_text("ci");
        let out = render(&table);
        assert!(out.contains("Cici"));
        assert!(!out.contains("Budi"));
        assert!(out.contains("score ▼"));
        assert!(out.contains("page 1/1 (1 rows, 10 per page)"));
    }

    #[test]
    fn test_selection_summary() {
        let mut a = args();
        a.select = vec!["1".to_string()];
        let out = render(&build_table(rows(), &a).unwrap());
        assert!(out.contains("selected: 1"));
    }

    #[test]
    fn test_unknown_sort_column_is_error() {
        let mut a = args();
        a.sort = vec!["age".to_string()];
        assert!(build_table(rows(), &a).is_err());
    }

    #[test]
    fn test_invalid_page_size() {
        let mut a = args();
        a.page_size = "7".to_string();
        assert!(build_table(rows(), &a).is_err());
    }
}
