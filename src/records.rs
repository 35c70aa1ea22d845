use crate::calc::{self, GradeResult, Letter, Scores, Tier, ValidatedInput, SUBJECTS};
use thiserror::Error;
use uuid::Uuid;

pub const CSV_LINE_END: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("row index {index} out of range (table has {len} rows)")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub record_id: String,
    pub name: String,
    pub scores: Scores,
    pub total: i32,
    pub percentage: f64,
    pub letter: Letter,
}

impl StudentRecord {
    pub fn new(input: ValidatedInput, result: &GradeResult) -> Self {
        Self {
            record_id: Uuid::new_v4().to_string(),
            name: input.name,
            scores: input.scores,
            total: result.total,
            percentage: result.percentage,
            letter: result.letter,
        }
    }

    pub fn percentage_2dp(&self) -> String {
        calc::format_percentage(self.percentage)
    }

    pub fn tier(&self) -> Tier {
        Tier::from_percentage(self.percentage)
    }

    // Names are written as-is; a comma in a name shifts the columns.
    fn csv_row(&self) -> String {
        let mut fields: Vec<String> = Vec::with_capacity(SUBJECTS.len() + 4);
        fields.push(self.name.clone());
        fields.extend(self.scores.iter().map(|s| s.to_string()));
        fields.push(self.total.to_string());
        fields.push(self.percentage_2dp());
        fields.push(self.letter.to_string());
        fields.join(",")
    }
}

pub fn csv_header() -> String {
    let mut cols: Vec<&str> = vec!["Name"];
    cols.extend(SUBJECTS);
    cols.extend(["Total", "Percentage", "Grade"]);
    cols.join(",")
}

/// Ordered student rows in insertion order. Duplicate names are allowed.
#[derive(Debug, Default)]
pub struct RecordTable {
    rows: Vec<StudentRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.rows
    }

    pub fn append(&mut self, record: StudentRecord) -> usize {
        self.rows.push(record);
        self.rows.len() - 1
    }

    fn check(&self, index: usize) -> Result<(), IndexError> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(IndexError {
                index,
                len: self.rows.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<&StudentRecord, IndexError> {
        self.check(index)?;
        Ok(&self.rows[index])
    }

    /// Stable removal: later rows shift down by one.
    pub fn remove_at(&mut self, index: usize) -> Result<StudentRecord, IndexError> {
        self.check(index)?;
        Ok(self.rows.remove(index))
    }

    /// Replaces the row at `index` wholesale. The replacement keeps the old
    /// row's id so a front end selection stays pinned to it.
    pub fn update_at(
        &mut self,
        index: usize,
        mut record: StudentRecord,
    ) -> Result<&StudentRecord, IndexError> {
        self.check(index)?;
        record.record_id = std::mem::take(&mut self.rows[index].record_id);
        self.rows[index] = record;
        Ok(&self.rows[index])
    }

    pub fn to_csv(&self) -> String {
        let mut csv = csv_header();
        csv.push_str(CSV_LINE_END);
        for r in &self.rows {
            csv.push_str(&r.csv_row());
            csv.push_str(CSV_LINE_END);
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{compute, validate};

    fn record(name: &str, scores: [&str; 5]) -> StudentRecord {
        let input = validate(name, &scores).expect("valid input");
        let result = compute(&input.scores);
        StudentRecord::new(input, &result)
    }

    #[test]
    fn append_then_get_returns_same_record() {
        let mut table = RecordTable::new();
        let r = record("Alice", ["80", "90", "70", "85", "95"]);
        let idx = table.append(r.clone());
        assert_eq!(idx, 0);
        assert_eq!(table.get(idx).expect("row"), &r);
    }

    #[test]
    fn remove_last_row_empties_table() {
        let mut table = RecordTable::new();
        table.append(record("Alice", ["1", "2", "3", "4", "5"]));
        let removed = table.remove_at(0).expect("remove");
        assert_eq!(removed.name, "Alice");
        assert!(table.is_empty());
    }

    #[test]
    fn out_of_range_index_leaves_table_unchanged() {
        let mut table = RecordTable::new();
        table.append(record("Alice", ["1", "2", "3", "4", "5"]));
        table.append(record("Bob", ["1", "2", "3", "4", "5"]));
        let e = table.remove_at(2).unwrap_err();
        assert_eq!(e, IndexError { index: 2, len: 2 });
        assert_eq!(table.len(), 2);
        assert!(table.get(5).is_err());
    }

    #[test]
    fn remove_shifts_later_rows_down() {
        let mut table = RecordTable::new();
        for name in ["A", "B", "C", "D"] {
            table.append(record(name, ["1", "1", "1", "1", "1"]));
        }
        table.remove_at(1).expect("remove");
        let names: Vec<&str> = table.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
    }

    #[test]
    fn duplicate_names_are_kept() {
        let mut table = RecordTable::new();
        table.append(record("Sam", ["1", "1", "1", "1", "1"]));
        table.append(record("Sam", ["1", "1", "1", "1", "1"]));
        assert_eq!(table.len(), 2);
        assert_ne!(table.records()[0].record_id, table.records()[1].record_id);
    }

    #[test]
    fn update_replaces_in_place_and_keeps_id() {
        let mut table = RecordTable::new();
        table.append(record("Alice", ["10", "10", "10", "10", "10"]));
        table.append(record("Bob", ["20", "20", "20", "20", "20"]));
        let old_id = table.records()[0].record_id.clone();

        let updated = table
            .update_at(0, record("Alicia", ["90", "90", "90", "90", "90"]))
            .expect("update");
        assert_eq!(updated.record_id, old_id);
        assert_eq!(updated.letter, Letter::APlus);
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].name, "Bob");
        assert!(table
            .update_at(2, record("X", ["1", "1", "1", "1", "1"]))
            .is_err());
    }

    #[test]
    fn empty_table_csv_is_header_only() {
        let table = RecordTable::new();
        assert_eq!(
            table.to_csv(),
            "Name,Math,Physics,Chemistry,English,Computer,Total,Percentage,Grade\n"
        );
    }

    #[test]
    fn csv_rows_follow_insertion_order() {
        let mut table = RecordTable::new();
        table.append(record("Alice", ["80", "90", "70", "85", "95"]));
        table.append(record("Zed", ["0", "0", "0", "0", "0"]));
        table.append(record("Mid", ["50", "50", "50", "50", "50"]));

        let csv = table.to_csv();
        assert!(csv.ends_with('\n'));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Alice,80,90,70,85,95,420,84.00,A");
        assert_eq!(lines[2], "Zed,0,0,0,0,0,0,0.00,F");
        assert_eq!(lines[3], "Mid,50,50,50,50,50,250,50.00,D");
        for line in &lines {
            assert_eq!(line.split(',').count(), 9);
        }
    }

    #[test]
    fn csv_does_not_escape_commas_in_names() {
        let mut table = RecordTable::new();
        table.append(record("Doe, Jane", ["1", "1", "1", "1", "1"]));
        let csv = table.to_csv();
        let row = csv.lines().nth(1).expect("row");
        assert!(row.starts_with("Doe, Jane,1,"));
        assert_eq!(row.split(',').count(), 10);
    }
}
