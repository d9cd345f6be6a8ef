//! KPI import from spreadsheet exports.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::planning::Kpi;

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidTarget { kpi_id: String, raw: String },
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read KPI export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid KPI CSV data: {}", err),
            ImportError::InvalidTarget { kpi_id, raw } => {
                write!(f, "KPI {} has an unreadable target '{}'", kpi_id, raw)
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::InvalidTarget { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Reads `KPI ID, KPI Name, Target, Current` exports into [`Kpi`] records.
pub struct KpiCsvImporter;

impl KpiCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Kpi>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// A missing or unreadable current value leaves the KPI unassessed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<Kpi>, ImportError> {
        parser::parse_rows(reader)?
            .into_iter()
            .map(|row| {
                let raw_target = row.target.unwrap_or_default();
                let target = parser::parse_number(&raw_target).ok_or_else(|| {
                    ImportError::InvalidTarget {
                        kpi_id: row.kpi_id.clone(),
                        raw: raw_target.clone(),
                    }
                })?;

                let current = row.current.as_deref().and_then(|raw| {
                    let parsed = parser::parse_number(raw);
                    if parsed.is_none() {
                        warn!(kpi_id = %row.kpi_id, value = raw, "ignoring unreadable KPI reading");
                    }
                    parsed
                });

                Ok(Kpi {
                    kpi_id: row.kpi_id,
                    kpi_name: row.kpi_name,
                    target,
                    current,
                })
            })
            .collect()
    }
}
