//! Material usage reports
//!
//! Exports the usage log of a date range as a spreadsheet-friendly CSV:
//! `;`-separated with a UTF-8 byte-order mark.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use shared::{DateRange, Language, MaterialUsage};

use crate::error::{ClientError, ClientResult};
use crate::notify::{Notification, Notifier};
use crate::services::UsageService;

const BOM: &str = "\u{FEFF}";

pub fn report_file_name(range: &DateRange) -> String {
    format!(
        "material-usage-report-{}-to-{}.csv",
        range.start.format("%Y-%m-%d"),
        range.end.format("%Y-%m-%d")
    )
}

fn headers(lang: Language) -> [&'static str; 5] {
    [
        lang.pick("Матеріал", "Material"),
        lang.pick("Робітник", "Employee"),
        lang.pick("Використано", "Amount used"),
        lang.pick("Дата", "Date"),
        lang.pick("Нотатка", "Comment"),
    ]
}

/// Render usage rows as CSV bytes
pub fn usage_csv(rows: &[MaterialUsage], lang: Language) -> ClientResult<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(BOM.as_bytes().to_vec());

    writer.write_record(headers(lang))?;
    for usage in rows {
        let amount = usage.amount_used.to_string();
        let date = usage.usage_date.format("%d.%m.%Y").to_string();
        writer.write_record([
            usage.material.name.as_str(),
            usage.employee.full_name.as_str(),
            amount.as_str(),
            date.as_str(),
            usage.comment.as_deref().unwrap_or_default(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| ClientError::Export(e.to_string()))
}

/// Total consumed per material, for the report chart
pub fn totals_by_material(rows: &[MaterialUsage]) -> BTreeMap<String, i64> {
    rows.iter().fold(BTreeMap::new(), |mut totals, usage| {
        *totals.entry(usage.material.name.clone()).or_insert(0) += usage.amount_used;
        totals
    })
}

/// Write the report into `dir`. Returns `None` when there is nothing to export.
pub fn write_usage_report(
    rows: &[MaterialUsage],
    range: &DateRange,
    dir: &Path,
    lang: Language,
    notifier: &dyn Notifier,
) -> ClientResult<Option<PathBuf>> {
    if rows.is_empty() {
        notifier.notify(Notification::warning(
            lang.pick("Немає даних для експорту", "No data to export"),
        ));
        return Ok(None);
    }

    let bytes = usage_csv(rows, lang)?;
    let path = dir.join(report_file_name(range));
    std::fs::write(&path, bytes).map_err(|e| ClientError::Export(e.to_string()))?;
    tracing::info!("Wrote {} usage rows to {}", rows.len(), path.display());
    Ok(Some(path))
}

/// Fetch the range from the backend and export it
pub async fn export_usage_report(
    usage: &UsageService,
    range: DateRange,
    dir: &Path,
    lang: Language,
    notifier: &dyn Notifier,
) -> ClientResult<Option<PathBuf>> {
    let rows = usage.report(range).await?;
    write_usage_report(&rows, &range, dir, lang, notifier)
}
