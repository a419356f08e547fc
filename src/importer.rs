use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use sha2::{Digest, Sha256};

use crate::error::{Result, RowError, RowErrorKind, SpendlogError};
use crate::models::{ImportRecord, NewTransaction, DEFAULT_CURRENCY};
use crate::store::TransactionStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn thousands_grouping() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d*)?$").ok())
        .as_ref()
}

/// Parse a decimal amount. Commas are accepted only as thousands separators
/// (`1,250.50`); anything else with a comma, such as `4,5`, is not a number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if !s.contains(',') {
        return s.parse::<f64>().ok();
    }
    if !thousands_grouping().is_some_and(|re| re.is_match(s)) {
        return None;
    }
    s.replace(',', "").parse::<f64>().ok()
}

/// Parse a `DD/MM/YYYY` (or `DD/MM/YY`) date, falling back to `today`.
///
/// Two-digit years pivot at 50: `49` is 2049, `50` is 1950. Fractional parts
/// are truncated toward zero. The day and month are not range-checked; values
/// outside the calendar roll into the neighbouring month the way calendar
/// arithmetic does, so `31/04/2024` is 1 May 2024, `01/13/2024` is 1 January
/// 2025 and `-1/02/2024` is 30 January 2024. A zero or non-numeric part means
/// the date is unusable.
pub fn parse_date_dmy(raw: &str, today: NaiveDate) -> NaiveDate {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return today;
    }
    let (Some(day), Some(month), Some(mut year)) = (
        date_component(parts[0]),
        date_component(parts[1]),
        date_component(parts[2]),
    ) else {
        return today;
    };
    if (0..100).contains(&year) {
        year += if year < 50 { 2000 } else { 1900 };
    }
    rollover_date(year, month, day).unwrap_or(today)
}

fn date_component(raw: &str) -> Option<i64> {
    let n = raw.trim().parse::<f64>().ok()?;
    if !n.is_finite() || n == 0.0 || n.abs() > i32::MAX as f64 {
        return None;
    }
    Some(n.trunc() as i64)
}

fn rollover_date(year: i64, month: i64, day: i64) -> Option<NaiveDate> {
    let months = year.checked_mul(12)?.checked_add(month - 1)?;
    let y = i32::try_from(months.div_euclid(12)).ok()?;
    let m = u32::try_from(months.rem_euclid(12)).ok()? + 1;
    let first = NaiveDate::from_ymd_opt(y, m, 1)?;
    let offset = day - 1;
    if offset >= 0 {
        first.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        first.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Columns and defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Field {
    Name,
    Amount,
    Date,
    Kind,
    Category,
    Description,
    Status,
    Currency,
}

impl Field {
    fn from_header(header: &str) -> Option<Self> {
        match header.trim_start_matches('\u{feff}').trim().to_lowercase().as_str() {
            "name" => Some(Self::Name),
            "amount" => Some(Self::Amount),
            "date" => Some(Self::Date),
            "type" => Some(Self::Kind),
            "category" => Some(Self::Category),
            "description" => Some(Self::Description),
            "status" => Some(Self::Status),
            "currency" => Some(Self::Currency),
            _ => None,
        }
    }
}

/// Values used when an optional column is absent or blank. `date` defaults to
/// the processing date and is handled separately.
const DEFAULTS: &[(Field, &str)] = &[
    (Field::Kind, "expense"),
    (Field::Category, ""),
    (Field::Description, ""),
    (Field::Status, "cleared"),
    (Field::Currency, DEFAULT_CURRENCY),
];

struct RawRow<'a> {
    values: HashMap<Field, &'a str>,
}

impl<'a> RawRow<'a> {
    fn get(&self, field: Field) -> Option<&'a str> {
        self.values.get(&field).copied().filter(|v| !v.is_empty())
    }

    fn get_or_default(&self, field: Field) -> &'a str {
        self.get(field).unwrap_or_else(|| {
            DEFAULTS
                .iter()
                .find(|(f, _)| *f == field)
                .map_or("", |(_, v)| *v)
        })
    }

    fn into_record(self, owner: &str, today: NaiveDate) -> std::result::Result<NewTransaction, RowErrorKind> {
        let name = self
            .get(Field::Name)
            .ok_or_else(|| RowErrorKind::Validation("missing name".to_string()))?;
        let raw_amount = self
            .get(Field::Amount)
            .ok_or_else(|| RowErrorKind::Validation("missing amount".to_string()))?;
        let amount = parse_amount(raw_amount)
            .filter(|a| a.is_finite())
            .ok_or_else(|| RowErrorKind::Parse(format!("invalid amount '{raw_amount}'")))?;
        if amount < 0.0 {
            return Err(RowErrorKind::Parse(format!("negative amount '{raw_amount}'")));
        }

        let date = match self.get(Field::Date) {
            Some(raw) => parse_date_dmy(raw, today),
            None => today,
        };

        let raw_kind = self.get_or_default(Field::Kind);
        let kind = raw_kind
            .parse()
            .map_err(|_| RowErrorKind::Validation(format!("unknown type '{raw_kind}'")))?;
        let raw_status = self.get_or_default(Field::Status);
        let status = raw_status
            .parse()
            .map_err(|_| RowErrorKind::Validation(format!("unknown status '{raw_status}'")))?;

        Ok(NewTransaction {
            owner: owner.to_string(),
            date,
            amount,
            kind,
            name: name.to_string(),
            category: self.get_or_default(Field::Category).to_string(),
            description: self.get_or_default(Field::Description).to_string(),
            status,
            currency: self.get_or_default(Field::Currency).to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// parse_import
// ---------------------------------------------------------------------------

/// Valid records in file order plus every row that was dropped.
#[derive(Debug, Default)]
pub struct ImportBatch {
    pub records: Vec<NewTransaction>,
    pub rejected: Vec<RowError>,
}

pub fn parse_import<R: Read>(reader: R, owner: &str, today: NaiveDate) -> Result<ImportBatch> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns: Vec<Option<Field>> = rdr.headers()?.iter().map(Field::from_header).collect();

    let mut batch = ImportBatch::default();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        let mut values = HashMap::new();
        for (field, value) in columns.iter().zip(record.iter()) {
            if let Some(field) = field {
                values.insert(*field, value);
            }
        }
        match (RawRow { values }).into_record(owner, today) {
            Ok(txn) => batch.records.push(txn),
            Err(kind) => {
                let err = RowError { line, kind };
                tracing::debug!(%err, "rejected import row");
                batch.rejected.push(err);
            }
        }
    }
    Ok(batch)
}

// ---------------------------------------------------------------------------
// import_file
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ImportResult {
    pub ids: Vec<i64>,
    pub rejected: Vec<RowError>,
}

/// Hand a parsed batch to the store as a single insert.
pub fn import_batch<S: TransactionStore>(store: &mut S, batch: ImportBatch) -> Result<ImportResult> {
    let batch = require_records(batch)?;
    let ids = store.insert_batch(&batch.records)?;
    Ok(ImportResult {
        ids,
        rejected: batch.rejected,
    })
}

fn require_records(batch: ImportBatch) -> Result<ImportBatch> {
    if batch.records.is_empty() {
        return Err(SpendlogError::NoValidRows {
            rejected: batch.rejected,
        });
    }
    Ok(batch)
}

pub fn import_file<S: TransactionStore>(
    store: &mut S,
    file_path: &Path,
    owner: &str,
    today: NaiveDate,
    force: bool,
) -> Result<ImportResult> {
    let filename = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_string();
    let data = std::fs::read(file_path)?;
    let checksum = compute_checksum(&data);

    if !force {
        if let Some(previous) = store.find_import(owner, &checksum)? {
            tracing::warn!(
                file = %filename,
                previous = %previous.filename,
                owner = %previous.owner,
                checksum = %previous.checksum,
                records = previous.record_count,
                rejected = previous.rejected_count,
                from = ?previous.date_range_start,
                to = ?previous.date_range_end,
                "duplicate import refused"
            );
            return Err(SpendlogError::DuplicateImport(filename));
        }
    }

    let batch = require_records(parse_import(data.as_slice(), owner, today)?)?;
    let record = ImportRecord {
        filename: filename.clone(),
        owner: owner.to_string(),
        record_count: batch.records.len(),
        rejected_count: batch.rejected.len(),
        date_range_start: batch.records.iter().map(|r| r.date).min(),
        date_range_end: batch.records.iter().map(|r| r.date).max(),
        checksum,
    };
    let ids = store.insert_import(&batch.records, &record)?;

    tracing::info!(
        file = %filename,
        imported = ids.len(),
        rejected = batch.rejected.len(),
        "import complete"
    );
    Ok(ImportResult {
        ids,
        rejected: batch.rejected,
    })
}
