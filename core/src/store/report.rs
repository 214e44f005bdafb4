use super::ChurnStore;
use crate::{
    error::{ChurnError, ChurnResult},
    report::{Report, ReportKind, ReportStatus},
};
use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

const DATE_FORMAT: &str = "%Y-%m-%d";

type RawRow = (i64, String, String, String, String, String, Option<String>);

fn decode(raw: RawRow) -> ChurnResult<Report> {
    let (number, title, kind, date, status, size, run_id) = raw;
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT)
        .map_err(|e| ChurnError::invalid("report_date", format!("bad date '{date}': {e}")))?;
    Ok(Report {
        id: Report::id_for(number),
        title,
        kind: kind.parse::<ReportKind>()?,
        date,
        status: status.parse::<ReportStatus>()?,
        size,
        run_id,
    })
}

impl ChurnStore {
    // ── Report ────────────────────────────────────────────────────

    pub fn insert_report(
        &self,
        number: i64,
        title: &str,
        kind: ReportKind,
        date: NaiveDate,
        status: ReportStatus,
        size: &str,
    ) -> ChurnResult<()> {
        self.conn.execute(
            "INSERT INTO report (report_number, title, kind, report_date, status, size)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                number,
                title,
                kind.as_str(),
                date.format(DATE_FORMAT).to_string(),
                status.as_str(),
                size,
            ],
        )?;
        Ok(())
    }

    /// Attach the body and mark the report Ready.
    pub fn finish_report(
        &self,
        number: i64,
        size: &str,
        body: &str,
        run_id: &str,
    ) -> ChurnResult<()> {
        self.conn.execute(
            "UPDATE report SET status = ?1, size = ?2, body = ?3, run_id = ?4
             WHERE report_number = ?5",
            params![ReportStatus::Ready.as_str(), size, body, run_id, number],
        )?;
        Ok(())
    }

    pub fn max_report_number(&self) -> ChurnResult<Option<i64>> {
        let n = self
            .conn
            .query_row("SELECT MAX(report_number) FROM report", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Newest first.
    pub fn list_reports(&self) -> ChurnResult<Vec<Report>> {
        let mut stmt = self.conn.prepare(
            "SELECT report_number, title, kind, report_date, status, size, run_id
             FROM report ORDER BY report_number DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                    row.get(6)?,
                ))
            })?
            .collect::<Result<Vec<RawRow>, _>>()?;
        rows.into_iter().map(decode).collect()
    }

    pub fn get_report(&self, number: i64) -> ChurnResult<Option<Report>> {
        let raw: Option<RawRow> = self
            .conn
            .query_row(
                "SELECT report_number, title, kind, report_date, status, size, run_id
                 FROM report WHERE report_number = ?1",
                params![number],
                |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                    ))
                },
            )
            .optional()?;
        raw.map(decode).transpose()
    }

    pub fn report_body(&self, number: i64) -> ChurnResult<Option<String>> {
        let body: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT body FROM report WHERE report_number = ?1",
                params![number],
                |row| row.get(0),
            )
            .optional()?;
        Ok(body.flatten())
    }
}
