//! Deadline reminder batch.
//!
//! Given a lookahead window, fetches deadline-bearing competitions, joins
//! each to its approved registrants, and buckets by urgency. The `send`
//! action pushes one payload per (competition, registrant) pair through the
//! configured mail transport.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use puspresma_cms::records::{KalenderRecord, LombaRecord, PendaftaranLombaRecord};
use puspresma_cms::repositories::{
    KalenderRepository, LombaRepository, PendaftaranLombaRepository,
};
use puspresma_common::{AppError, AppResult, FormValidator};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::format::format_date;
use crate::services::mail::{Mailer, ReminderMail};

/// Default lookahead in days.
pub const DEFAULT_LOOKAHEAD_DAYS: i64 = 7;

/// Approved registrant joined to a competition deadline.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    /// Registrant name.
    pub nama: String,
    /// Registrant email.
    pub email: String,
    /// Registrant student number.
    pub nim: String,
}

/// One competition inside the lookahead window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineItem {
    /// Competition id.
    pub lomba_id: String,
    /// Competition title.
    pub judul: String,
    /// The deadline itself.
    pub deadline: NaiveDate,
    /// Whole days until the deadline.
    pub days_left: i64,
    /// Approved registrants to be reminded.
    pub registrants: Vec<Registrant>,
}

/// Bucketed lookahead report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineReport {
    /// First day of the window (today).
    pub window_start: NaiveDate,
    /// Last day of the window.
    pub window_end: NaiveDate,
    /// Deadlines at most one day out.
    pub urgent: Vec<DeadlineItem>,
    /// Deadlines two to three days out.
    pub soon: Vec<DeadlineItem>,
    /// Deadlines four or more days out.
    pub upcoming: Vec<DeadlineItem>,
    /// Competitions across all buckets.
    pub total: usize,
}

/// Outcome of a `send` run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDispatch {
    /// The underlying report.
    #[serde(flatten)]
    pub report: DeadlineReport,
    /// Transport used.
    pub transport: &'static str,
    /// Constructed payloads, one per (competition, registrant) pair.
    pub mails: Vec<ReminderMail>,
    /// Payloads accepted by the transport.
    pub sent: usize,
    /// Payloads the transport refused.
    pub failed: usize,
}

/// Ad-hoc reminder creation body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdhocReminder {
    pub lomba_id: Option<String>,
    pub tanggal: Option<NaiveDate>,
    pub pesan: Option<String>,
    pub nim: Option<String>,
}

/// Service producing deadline reminder batches.
#[derive(Clone)]
pub struct ReminderService {
    lomba_repo: LombaRepository,
    pendaftaran_repo: PendaftaranLombaRepository,
    kalender_repo: KalenderRepository,
    mailer: Arc<Mailer>,
}

impl ReminderService {
    /// Create a new reminder service.
    #[must_use]
    pub const fn new(
        lomba_repo: LombaRepository,
        pendaftaran_repo: PendaftaranLombaRepository,
        kalender_repo: KalenderRepository,
        mailer: Arc<Mailer>,
    ) -> Self {
        Self {
            lomba_repo,
            pendaftaran_repo,
            kalender_repo,
            mailer,
        }
    }

    /// Bucket the competitions whose deadline falls in `[today, today+days]`.
    pub async fn check(&self, days: i64) -> AppResult<DeadlineReport> {
        let today = Utc::now().date_naive();
        let days = days.max(0);
        let window_end = today + chrono::Duration::days(days);

        let competitions = self
            .lomba_repo
            .find_deadline_between(today, window_end)
            .await?;

        let mut report = DeadlineReport {
            window_start: today,
            window_end,
            urgent: Vec::new(),
            soon: Vec::new(),
            upcoming: Vec::new(),
            total: 0,
        };

        for lomba in competitions {
            let Some(item) = self.deadline_item(&lomba, today).await else {
                continue;
            };
            report.total += 1;
            match item.days_left {
                ..=1 => report.urgent.push(item),
                2..=3 => report.soon.push(item),
                _ => report.upcoming.push(item),
            }
        }

        Ok(report)
    }

    /// Run `check`, then push one payload per (competition, approved
    /// registrant) pair through the mail transport. Individual failures are
    /// counted, never fatal.
    pub async fn send(&self, days: i64) -> AppResult<ReminderDispatch> {
        let report = self.check(days).await?;

        let mut mails = Vec::new();
        for item in report
            .urgent
            .iter()
            .chain(report.soon.iter())
            .chain(report.upcoming.iter())
        {
            for registrant in &item.registrants {
                mails.push(compose_mail(item, registrant));
            }
        }

        let mut sent = 0;
        let mut failed = 0;
        for mail in &mails {
            match self.mailer.send(mail).await {
                Ok(()) => sent += 1,
                Err(e) => {
                    failed += 1;
                    warn!(to = %mail.to, error = %e, "Reminder email failed");
                }
            }
        }

        Ok(ReminderDispatch {
            report,
            transport: self.mailer.name(),
            mails,
            sent,
            failed,
        })
    }

    /// Create one ad-hoc reminder record tied to a competition.
    pub async fn create_adhoc(&self, body: &AdhocReminder) -> AppResult<KalenderRecord> {
        let mut v = FormValidator::new();
        v.require("lombaId", body.lomba_id.as_deref());
        v.require("pesan", body.pesan.as_deref());
        if body.tanggal.is_none() {
            v.require("tanggal", None);
        }
        if !v.is_valid() {
            return Err(AppError::Validation(v.into_errors()));
        }

        // Present after validation
        let lomba_id = body.lomba_id.as_deref().unwrap_or_default();
        let lomba = self
            .lomba_repo
            .find_by_id(lomba_id)
            .await?
            .filter(|l| !l.is_deleted)
            .ok_or_else(|| AppError::NotFound("Lomba".to_string()))?;

        let link = lomba
            .slug
            .as_ref()
            .map_or_else(|| format!("/lomba/{}", lomba.id), |s| format!("/lomba/{s}"));
        let payload = json!({
            "nim": body.nim,
            "judul": body.pesan,
            "tanggal": body.tanggal.map(|d| d.to_string()),
            "tipe": "deadline",
            "deskripsi": format!("Pengingat untuk {}", lomba.judul),
            "link": link,
        });
        self.kalender_repo.create(&payload).await
    }

    async fn deadline_item(&self, lomba: &LombaRecord, today: NaiveDate) -> Option<DeadlineItem> {
        let deadline = lomba.deadline?;
        let registrants = match self.pendaftaran_repo.find_approved_by_lomba(&lomba.id).await {
            Ok(rows) => rows.iter().map(registrant_from).collect(),
            Err(e) => {
                warn!(lomba_id = %lomba.id, error = %e, "Failed to load registrants for reminder");
                Vec::new()
            }
        };

        Some(DeadlineItem {
            lomba_id: lomba.id.clone(),
            judul: lomba.judul.clone(),
            deadline,
            days_left: (deadline - today).num_days(),
            registrants,
        })
    }
}

fn registrant_from(record: &PendaftaranLombaRecord) -> Registrant {
    Registrant {
        nama: record.nama.clone(),
        email: record.email.clone(),
        nim: record.nim.clone(),
    }
}

/// One urgency-tagged payload for one registrant.
fn compose_mail(item: &DeadlineItem, registrant: &Registrant) -> ReminderMail {
    let subject = match item.days_left {
        ..=1 => format!("[SEGERA] Deadline {} tinggal {} hari", item.judul, item.days_left.max(0)),
        2..=3 => format!("Deadline {} tinggal {} hari", item.judul, item.days_left),
        _ => format!("Pengingat: deadline {} pada {}", item.judul, format_date(item.deadline)),
    };

    let body = format!(
        "Halo {},\n\n\
        Batas pendaftaran {} adalah {} ({} hari lagi).\n\
        Pastikan berkas pendaftaranmu sudah lengkap.\n\n\
        Salam,\nPusat Prestasi Mahasiswa",
        registrant.nama,
        item.judul,
        format_date(item.deadline),
        item.days_left.max(0),
    );

    ReminderMail {
        to: registrant.email.clone(),
        subject,
        body,
    }
}
