use crate::core::models::table::{ResultRow, ResultTable, RowStatistic, TableKind};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Unrecognized result table header: [{0}]")]
    UnknownHeader(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct PivotRecord {
    resid: isize,
    resname: String,
    segid: String,
    rmsf: f64,
    low: f64,
    high: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct MeanStdRecord {
    resid: isize,
    resname: String,
    segid: String,
    mean: f64,
    std: f64,
}

/// Comma-separated persistence of [`ResultTable`]s.
///
/// The header row names the columns of the table kind (see
/// [`TableKind::columns`]); there is no index column. Reading detects the
/// kind from the header.
pub struct CsvTableFile;

impl CsvTableFile {
    pub fn write_to(table: &ResultTable, writer: impl Write) -> Result<(), TableError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        // Written explicitly so that an empty table still carries its header.
        wtr.write_record(table.kind().columns())?;
        for row in table.rows() {
            match row.statistic {
                RowStatistic::Interval { rmsf, low, high } => wtr.serialize(PivotRecord {
                    resid: row.resid,
                    resname: row.resname.clone(),
                    segid: row.segid.clone(),
                    rmsf,
                    low,
                    high,
                })?,
                RowStatistic::MeanStd { mean, std } => wtr.serialize(MeanStdRecord {
                    resid: row.resid,
                    resname: row.resname.clone(),
                    segid: row.segid.clone(),
                    mean,
                    std,
                })?,
            }
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(table: &ResultTable, path: P) -> Result<(), TableError> {
        let file = std::fs::File::create(path)?;
        Self::write_to(table, io::BufWriter::new(file))
    }

    pub fn read_from(reader: impl Read) -> Result<ResultTable, TableError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let kind = if headers == TableKind::PIVOT_COLUMNS {
            TableKind::Pivot
        } else if headers == TableKind::MEAN_STD_COLUMNS {
            TableKind::MeanStd
        } else {
            return Err(TableError::UnknownHeader(headers.join(",")));
        };

        let rows = match kind {
            TableKind::Pivot => rdr
                .deserialize::<PivotRecord>()
                .map(|record| {
                    record.map(|r| ResultRow {
                        resid: r.resid,
                        resname: r.resname,
                        segid: r.segid,
                        statistic: RowStatistic::Interval {
                            rmsf: r.rmsf,
                            low: r.low,
                            high: r.high,
                        },
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            TableKind::MeanStd => rdr
                .deserialize::<MeanStdRecord>()
                .map(|record| {
                    record.map(|r| ResultRow {
                        resid: r.resid,
                        resname: r.resname,
                        segid: r.segid,
                        statistic: RowStatistic::MeanStd {
                            mean: r.mean,
                            std: r.std,
                        },
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok(ResultTable::new(kind, rows))
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ResultTable, TableError> {
        let file = std::fs::File::open(path)?;
        Self::read_from(io::BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pivot_table() -> ResultTable {
        ResultTable::new(
            TableKind::Pivot,
            vec![
                ResultRow {
                    resid: 1,
                    resname: "MET".to_string(),
                    segid: "A".to_string(),
                    statistic: RowStatistic::Interval {
                        rmsf: 1.5,
                        low: 1.25,
                        high: 2.0,
                    },
                },
                ResultRow {
                    resid: 2,
                    resname: "ALA".to_string(),
                    segid: "A".to_string(),
                    statistic: RowStatistic::Interval {
                        rmsf: 0.5,
                        low: 0.25,
                        high: 0.75,
                    },
                },
            ],
        )
    }

    #[test]
    fn pivot_table_is_written_with_exact_header_and_no_index() {
        let mut buffer = Vec::new();
        CsvTableFile::write_to(&pivot_table(), &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "resid,resname,segid,rmsf,low,high");
        assert_eq!(lines[1], "1,MET,A,1.5,1.25,2.0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn mean_std_table_is_written_with_exact_header() {
        let table = ResultTable::new(
            TableKind::MeanStd,
            vec![ResultRow {
                resid: 10,
                resname: "GLY".to_string(),
                segid: "B".to_string(),
                statistic: RowStatistic::MeanStd { mean: 0.5, std: 0.125 },
            }],
        );
        let mut buffer = Vec::new();
        CsvTableFile::write_to(&table, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "resid,resname,segid,mean,std\n10,GLY,B,0.5,0.125\n");
    }

    #[test]
    fn empty_table_still_has_header() {
        let mut buffer = Vec::new();
        CsvTableFile::write_to(&ResultTable::new(TableKind::MeanStd, Vec::new()), &mut buffer)
            .unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "resid,resname,segid,mean,std\n");
    }

    #[test]
    fn written_table_reads_back_with_detected_kind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rmsf.csv");
        let table = pivot_table();
        CsvTableFile::write_to_path(&table, &path).unwrap();
        let loaded = CsvTableFile::read_from_path(&path).unwrap();
        assert_eq!(loaded, table);
    }

    #[test]
    fn unknown_header_is_rejected() {
        let err = CsvTableFile::read_from("a,b,c\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, TableError::UnknownHeader(h) if h == "a,b,c"));
    }
}
