use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::models::Transaction;

/// Column order of the import format.
#[derive(Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    amount: f64,
    date: String,
    #[serde(rename = "type")]
    kind: &'a str,
    category: &'a str,
    description: &'a str,
    status: &'a str,
    currency: &'a str,
}

/// Write `transactions` in the import file format, dates as `DD/MM/YYYY`.
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    for t in transactions {
        wtr.serialize(ExportRow {
            name: &t.name,
            amount: t.amount,
            date: t.date.format("%d/%m/%Y").to_string(),
            kind: t.kind.as_str(),
            category: &t.category,
            description: &t.description,
            status: t.status.as_str(),
            currency: &t.currency,
        })?;
    }
    wtr.flush()?;
    Ok(transactions.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::parse_import;
    use crate::models::{TransactionKind, TransactionStatus};
    use chrono::NaiveDate;

    fn stored() -> Vec<Transaction> {
        vec![
            Transaction {
                id: 1,
                owner: "alice".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                amount: 1250.75,
                kind: TransactionKind::Income,
                name: "Invoice, March".to_string(),
                category: "Work".to_string(),
                description: "Client \"A\"".to_string(),
                status: TransactionStatus::Pending,
                currency: "USD".to_string(),
            },
            Transaction {
                id: 2,
                owner: "alice".to_string(),
                date: NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
                amount: 4.5,
                kind: TransactionKind::Expense,
                name: "Coffee".to_string(),
                category: String::new(),
                description: String::new(),
                status: TransactionStatus::Cleared,
                currency: "IDR".to_string(),
            },
        ]
    }

    #[test]
    fn test_write_csv_header_and_dates() {
        let mut buf = Vec::new();
        let n = write_csv(&mut buf, &stored()).unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,amount,date,type,category,description,status,currency")
        );
        assert!(lines.next().unwrap().contains("29/02/2024"));
        assert_eq!(lines.next(), Some("Coffee,4.5,31/12/1999,expense,,,cleared,IDR"));
    }

    #[test]
    fn test_exported_file_reimports_to_same_records() {
        let txns = stored();
        let mut buf = Vec::new();
        write_csv(&mut buf, &txns).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let batch = parse_import(buf.as_slice(), "alice", today).unwrap();
        assert!(batch.rejected.is_empty());
        assert_eq!(batch.records.len(), 2);
        for (original, imported) in txns.iter().zip(&batch.records) {
            assert_eq!(imported.name, original.name);
            assert_eq!(imported.amount, original.amount);
            assert_eq!(imported.date, original.date);
            assert_eq!(imported.kind, original.kind);
            assert_eq!(imported.category, original.category);
            assert_eq!(imported.description, original.description);
            assert_eq!(imported.status, original.status);
            assert_eq!(imported.currency, original.currency);
        }
    }
}
