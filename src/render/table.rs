//! Tabular model for a readings dataset.

use super::format::format_value;
use super::options::{DisplayOptions, TableLayout};
use crate::api::Reading;

/// Header and rows of the readings table, already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableModel {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    /// Build the table: one row per reading, in the order given.
    pub fn build(readings: &[Reading], unit: &str, options: &DisplayOptions) -> Self {
        let header = match options.table_layout {
            TableLayout::HeaderUnit => {
                vec!["Date & Time".to_string(), format!("Water Level ({})", unit)]
            }
            TableLayout::UnitColumn => vec![
                "Date & Time".to_string(),
                "Water Level".to_string(),
                "Unit".to_string(),
            ],
        };

        let rows = readings
            .iter()
            .map(|r| {
                let mut row = vec![
                    options.zone.format(r.date_time, &options.timestamp_format),
                    format_value(r.value, options.precision),
                ];
                if options.table_layout == TableLayout::UnitColumn {
                    row.push(r.unit.clone());
                }
                row
            })
            .collect();

        Self { header, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DisplayZone;
    use chrono::{TimeZone, Utc};

    fn readings() -> Vec<Reading> {
        vec![
            Reading {
                date_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                value: 1.2345,
                unit: "m".to_string(),
            },
            Reading {
                date_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 15, 0).unwrap(),
                value: 1.3,
                unit: "m".to_string(),
            },
        ]
    }

    #[test]
    fn test_header_unit_layout() {
        let options = DisplayOptions {
            zone: DisplayZone::Utc,
            ..DisplayOptions::default()
        };
        let table = TableModel::build(&readings(), "m", &options);

        assert_eq!(table.header, vec!["Date & Time", "Water Level (m)"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0], vec!["01/01/2024, 00:00:00", "1.2345"]);
        assert_eq!(table.rows[1], vec!["01/01/2024, 00:15:00", "1.3000"]);
    }

    #[test]
    fn test_unit_column_layout() {
        let options = DisplayOptions {
            precision: 2,
            table_layout: TableLayout::UnitColumn,
            zone: DisplayZone::Utc,
            ..DisplayOptions::default()
        };
        let table = TableModel::build(&readings(), "m", &options);

        assert_eq!(table.header, vec!["Date & Time", "Water Level", "Unit"]);
        assert_eq!(table.rows[0], vec!["01/01/2024, 00:00:00", "1.23", "m"]);
    }

    #[test]
    fn test_empty() {
        let table = TableModel::build(&[], "Unknown", &DisplayOptions::default());
        assert!(table.is_empty());
        assert_eq!(table.header[1], "Water Level (Unknown)");
    }
}
