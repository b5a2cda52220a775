use anyhow::Context;
use gtfcore::logbook::ExperimentRecord;
use std::collections::BTreeSet;

/// Renders the experiment table with 1-based row numbers matching the
/// numbering `delete --rows` accepts.
pub fn render_table(records: &[ExperimentRecord]) -> String {
    if records.is_empty() {
        return "Experiment log is empty.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>4}  {:<10}  {:<8}  {:>10}  {:>10}  {:>10}  {:>10}  {:>18}  {}\n",
        "#", "Date", "Time", "Updated X", "Updated Y", "M1 Z", "D", "Distance to Target", "Comment"
    ));
    for (position, row) in records.iter().enumerate() {
        out.push_str(&format!(
            "{:>4}  {:<10}  {:<8}  {:>10.4}  {:>10.4}  {:>10.4}  {:>10.4}  {:>18.4}  {}\n",
            position + 1,
            row.date.to_string(),
            row.time.to_string(),
            row.x,
            row.y,
            row.z,
            row.d,
            row.l,
            row.comment
        ));
    }
    out
}

/// Parses a row selection like `1,3-5` (1-based, as displayed) into the
/// zero-based index set the log store expects. A blank selection parses to
/// an empty set, which the store treats as a no-op. Rows beyond `row_count`
/// are rejected here, before any range is expanded.
pub fn parse_selection(selection: &str, row_count: usize) -> anyhow::Result<BTreeSet<usize>> {
    let mut selected = BTreeSet::new();
    for part in selection.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (start, end) = match part.split_once('-') {
            Some((low, high)) => (parse_row(low)?, parse_row(high)?),
            None => {
                let row = parse_row(part)?;
                (row, row)
            }
        };
        anyhow::ensure!(start <= end, "row range {} is reversed", part);
        anyhow::ensure!(
            end <= row_count,
            "row {} does not exist, log holds {} rows",
            end,
            row_count
        );
        for row in start..=end {
            selected.insert(row - 1);
        }
    }
    Ok(selected)
}

fn parse_row(raw: &str) -> anyhow::Result<usize> {
    let raw = raw.trim();
    let row: usize = raw
        .parse()
        .with_context(|| format!("invalid row number {:?}", raw))?;
    anyhow::ensure!(row >= 1, "rows are numbered from 1");
    Ok(row)
}
