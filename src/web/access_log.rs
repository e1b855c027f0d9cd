//! Append-only request log.

use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::{DateTime, SecondsFormat, Utc};
use poem::http::{Method, StatusCode, Uri};
use serde::Deserialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::prelude::*;

#[derive(Deserialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogField {
    Time,
    Remote,
    Method,
    Uri,
    Status,
    Elapsed,
}

impl LogField {
    pub const ALL: [Self; 6] = [
        Self::Time,
        Self::Remote,
        Self::Method,
        Self::Uri,
        Self::Status,
        Self::Elapsed,
    ];
}

pub struct Entry {
    pub time: DateTime<Utc>,
    pub remote: String,
    pub method: Method,
    pub uri: Uri,
    pub status: StatusCode,
    pub elapsed: StdDuration,
}

impl Entry {
    fn field(&self, field: LogField) -> String {
        match field {
            LogField::Time => self.time.to_rfc3339_opts(SecondsFormat::Millis, true),
            LogField::Remote => self.remote.clone(),
            LogField::Method => self.method.to_string(),
            LogField::Uri => self.uri.to_string(),
            LogField::Status => self.status.as_u16().to_string(),
            LogField::Elapsed => format!("{:?}", self.elapsed),
        }
    }
}

pub struct AccessLog {
    path: PathBuf,
    fields: Vec<LogField>,
    file: Mutex<File>,
}

impl AccessLog {
    pub async fn open(path: &Path, fields: Vec<LogField>) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("failed to open the access log `{}`", path.display()))?;
        info!(path = %path.display(), ?fields, "access log opened");
        Ok(Self {
            path: path.to_owned(),
            fields,
            file: Mutex::new(file),
        })
    }

    pub fn format(&self, entry: &Entry) -> String {
        let mut line = self
            .fields
            .iter()
            .map(|field| entry.field(*field))
            .collect::<Vec<_>>()
            .join(" ");
        line.push('\n');
        line
    }

    pub async fn write(&self, entry: &Entry) -> Result {
        let line = self.format(entry);
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("failed to write to `{}`", self.path.display()))?;
        file.flush().await?;
        Ok(())
    }
}
