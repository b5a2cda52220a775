use crate::logbook::clock;
use crate::logbook::record::{sort_newest_first, ExperimentRecord, COLUMNS};
use crate::prelude::{CalcError, CalcResult};
use log::info;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Durable experiment history backed by a single CSV file.
///
/// Every mutation rewrites the whole table through a temp file in the same
/// directory followed by a rename, so a failed write leaves the previous
/// version intact. There is no cross-process locking; deployments assume at
/// most one writer. The rewrite-per-mutation strategy is fine for the few
/// hundred rows a bench log accumulates and would need an embedded database
/// beyond that.
pub struct LogStore {
    path: PathBuf,
}

impl LogStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record and re-sorts the table. Duplicate (date, time)
    /// stamps are not rejected.
    pub fn append(&self, record: ExperimentRecord) -> CalcResult<()> {
        let mut rows = self.list_all()?;
        rows.push(record);
        sort_newest_first(&mut rows);
        self.write_rows(&self.path, &rows)?;
        info!("appended experiment record, log holds {} rows", rows.len());
        Ok(())
    }

    /// Full table, newest first. A log that has never been written lists as
    /// empty rather than an error.
    pub fn list_all(&self) -> CalcResult<Vec<ExperimentRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        sort_newest_first(&mut rows);
        Ok(rows)
    }

    /// Removes the rows at `indices`, positions into the sorted table as
    /// returned by [`list_all`](Self::list_all). An empty selection is a
    /// silent no-op; an out-of-range index fails without touching the file.
    pub fn delete_by_indices(&self, indices: &BTreeSet<usize>) -> CalcResult<usize> {
        if indices.is_empty() {
            return Ok(0);
        }

        let rows = self.list_all()?;
        if let Some(&highest) = indices.iter().next_back() {
            if highest >= rows.len() {
                return Err(CalcError::Validation(format!(
                    "index {} out of range, log holds {} rows",
                    highest,
                    rows.len()
                )));
            }
        }

        let kept: Vec<ExperimentRecord> = rows
            .into_iter()
            .enumerate()
            .filter(|(position, _)| !indices.contains(position))
            .map(|(_, row)| row)
            .collect();
        self.write_rows(&self.path, &kept)?;

        let deleted = indices.len();
        info!("deleted {} experiment rows, {} remain", deleted, kept.len());
        Ok(deleted)
    }

    /// Replaces the table with a header-only file, schema intact.
    pub fn clear_all(&self) -> CalcResult<()> {
        self.write_rows(&self.path, &[])?;
        info!("cleared experiment log");
        Ok(())
    }

    /// Writes a timestamped copy of the table into `dir` and returns the
    /// created path.
    pub fn export_copy(&self, dir: &Path) -> CalcResult<PathBuf> {
        let rows = self.list_all()?;
        let target = dir.join(format!("experiment_log_{}.csv", clock::export_stamp()));
        self.write_rows(&target, &rows)?;
        info!("exported {} rows to {}", rows.len(), target.display());
        Ok(target)
    }

    fn write_rows(&self, path: &Path, rows: &[ExperimentRecord]) -> CalcResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let staged = NamedTempFile::new_in(dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(staged.as_file());
            writer.write_record(COLUMNS)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        staged
            .persist(path)
            .map_err(|err| CalcError::Storage(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, NaiveTime};
    use std::fs;
    use tempfile::tempdir;

    fn record(day: u32, hour: u32, comment: &str) -> ExperimentRecord {
        ExperimentRecord {
            date: NaiveDate::from_ymd_opt(2026, 8, day).unwrap(),
            time: NaiveTime::from_hms_opt(hour, 15, 30).unwrap(),
            x: 140.0,
            y: 142.6794919,
            z: 100.0,
            d: 44.6472382,
            l: 160.3527618,
            comment: comment.to_string(),
        }
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv"));

        let original = record(25, 9, "baseline run");
        store.append(original.clone()).unwrap();

        let rows = store.list_all().unwrap();
        assert_eq!(rows, vec![original]);
    }

    #[test]
    fn missing_file_lists_empty() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv"));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn mutations_keep_newest_first_order() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv"));

        store.append(record(20, 9, "")).unwrap();
        store.append(record(27, 7, "")).unwrap();
        store.append(record(20, 17, "")).unwrap();

        let rows = store.list_all().unwrap();
        let stamps: Vec<_> = rows.iter().map(|r| (r.date, r.time)).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(rows[0].date.day(), 27);

        store
            .delete_by_indices(&BTreeSet::from([0]))
            .unwrap();
        let rows = store.list_all().unwrap();
        let stamps: Vec<_> = rows.iter().map(|r| (r.date, r.time)).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn empty_selection_deletes_nothing() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv"));
        store.append(record(25, 9, "")).unwrap();

        let deleted = store.delete_by_indices(&BTreeSet::new()).unwrap();
        assert_eq!(deleted, 0);
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_exactly_the_selected_rows() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv"));
        store.append(record(25, 9, "keep")).unwrap();
        store.append(record(26, 9, "drop")).unwrap();
        store.append(record(27, 9, "drop")).unwrap();

        // Rows 0 and 1 are the two newest (days 27 and 26).
        let deleted = store.delete_by_indices(&BTreeSet::from([0, 1])).unwrap();
        assert_eq!(deleted, 2);

        let rows = store.list_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].comment, "keep");
    }

    #[test]
    fn out_of_range_index_is_rejected_untouched() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv"));
        store.append(record(25, 9, "")).unwrap();

        let err = store.delete_by_indices(&BTreeSet::from([5])).unwrap_err();
        assert!(matches!(err, CalcError::Validation(_)));
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn clear_all_keeps_the_schema() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let store = LogStore::new(&path);
        store.append(record(25, 9, "")).unwrap();

        store.clear_all().unwrap();
        assert!(store.list_all().unwrap().is_empty());

        let contents = fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(header, COLUMNS.join(","));
    }

    #[test]
    fn export_copies_every_row() {
        let dir = tempdir().unwrap();
        let store = LogStore::new(dir.path().join("log.csv"));
        store.append(record(25, 9, "a")).unwrap();
        store.append(record(26, 9, "b")).unwrap();

        let exported = store.export_copy(dir.path()).unwrap();
        let name = exported.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("experiment_log_"));
        assert!(name.ends_with(".csv"));

        let copy = LogStore::new(&exported);
        assert_eq!(copy.list_all().unwrap(), store.list_all().unwrap());
    }

    #[test]
    fn blank_cells_normalize_without_sentinels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");
        let mut raw = COLUMNS.join(",");
        raw.push('\n');
        raw.push_str("2026-08-25,09:15:30,140.0,142.68,100.0,,160.35,\n");
        fs::write(&path, raw).unwrap();

        let rows = LogStore::new(&path).list_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].d, 0.0);
        assert_eq!(rows[0].comment, "");
    }
}
