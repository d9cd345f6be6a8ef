use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct KpiRow {
    pub(crate) kpi_id: String,
    pub(crate) kpi_name: String,
    pub(crate) target: Option<String>,
    pub(crate) current: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<KpiRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for record in csv_reader.deserialize::<RawKpiRow>() {
        let row = record?;
        rows.push(KpiRow {
            kpi_name: row.kpi_name.unwrap_or_else(|| row.kpi_id.clone()),
            kpi_id: row.kpi_id,
            target: row.target,
            current: row.current,
        });
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct RawKpiRow {
    #[serde(rename = "KPI ID")]
    kpi_id: String,
    #[serde(rename = "KPI Name", default, deserialize_with = "empty_string_as_none")]
    kpi_name: Option<String>,
    #[serde(rename = "Target", default, deserialize_with = "empty_string_as_none")]
    target: Option<String>,
    #[serde(rename = "Current", default, deserialize_with = "empty_string_as_none")]
    current: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Pulls a number out of a decorated cell such as `85%`, `$1,200` or
/// `4.5 / 5`. Only the first numeric run is read.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let start = value.find(|c: char| c.is_ascii_digit() || c == '-' || c == '.')?;
    let digits: String = value[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .filter(|c| *c != ',')
        .collect();

    digits.parse::<f64>().ok().filter(|number| number.is_finite())
}
