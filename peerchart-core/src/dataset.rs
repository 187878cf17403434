use peerchart_common::NotFound;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Best-effort numeric read of a raw cell: surrounding whitespace, `,`
/// grouping and a trailing `%` are tolerated. Empty or unparseable cells and
/// non-finite results give `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let t = raw.trim();
    let t = t.strip_suffix('%').unwrap_or(t).trim_end();
    if t.is_empty() {
        return None;
    }
    let cleaned: String = t.chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub industry: String,
    pub country: String,
    pub fields: BTreeMap<String, String>, // every raw column, name/industry/country included
}

impl CompanyRecord {
    /// Build a record from one table row; rows without a name are rejected.
    pub fn from_row(row: BTreeMap<String, String>) -> Option<Self> {
        let name = row.get("name").filter(|n| !n.trim().is_empty())?.clone();
        let industry = row.get("industry").cloned().unwrap_or_default();
        let country = row.get("country").cloned().unwrap_or_default();
        Some(Self { name, industry, country, fields: row })
    }

    pub fn field(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.field(column).and_then(coerce_number)
    }

    pub fn cap(&self) -> Option<f64> {
        self.number("cap")
    }
}

/// Numeric values of one column plus how many cells were left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Sample {
    pub values: Vec<f64>,
    pub excluded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<CompanyRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<CompanyRecord>) -> Self {
        Self { records }
    }

    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = BTreeMap<String, String>>,
    {
        let mut seen: HashSet<String> = HashSet::new();
        let mut records = Vec::new();
        for (i, row) in rows.into_iter().enumerate() {
            let Some(rec) = CompanyRecord::from_row(row) else {
                log::warn!("row {i}: no company name, skipped");
                continue;
            };
            if !seen.insert(rec.name.clone()) {
                log::warn!(
                    "row {i}: duplicate company name '{}', first row wins on lookup",
                    rec.name
                );
            }
            records.push(rec);
        }
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Coerced values of `column` over every record except `exclude`.
    pub fn numeric_column(&self, column: &str, exclude: Option<&str>) -> Sample {
        let mut sample = Sample::default();
        for rec in self.records.iter().filter(|r| Some(r.name.as_str()) != exclude) {
            match rec.number(column) {
                Some(v) => sample.values.push(v),
                None => sample.excluded += 1,
            }
        }
        if sample.excluded > 0 {
            log::warn!(
                "column {column}: {} of {} cells are not numeric and were excluded",
                sample.excluded,
                sample.excluded + sample.values.len()
            );
        }
        sample
    }
}

/// Exact, case-sensitive lookup by company name; the first match wins.
pub fn select_company<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a CompanyRecord, NotFound> {
    if name.trim().is_empty() {
        return Err(NotFound::EmptyQuery);
    }
    dataset
        .records
        .iter()
        .find(|r| r.name == name)
        .ok_or_else(|| NotFound::Company(name.to_string()))
}

/// Like `select_company`, but a blank query resolves to `default_name`.
pub fn select_or_default<'a>(
    dataset: &'a Dataset,
    query: &str,
    default_name: &str,
) -> Result<&'a CompanyRecord, NotFound> {
    match select_company(dataset, query) {
        Err(NotFound::EmptyQuery) => select_company(dataset, default_name),
        other => other,
    }
}

/// Case-insensitive substring matches for a search box; nothing until the
/// term is at least `min_length` characters long.
pub fn suggest_companies<'a>(dataset: &'a Dataset, term: &str, min_length: usize) -> Vec<&'a str> {
    let term = term.trim();
    if term.chars().count() < min_length.max(1) {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    dataset
        .names()
        .filter(|n| n.to_lowercase().contains(&needle))
        .collect()
}
