use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{ApiError, Backend, handle_response};
use crate::domain::analysis::AnalysisReport;
use crate::domain::dashboard::DashboardSummary;
use crate::domain::email::{EmailId, EmailSummary};

#[derive(Debug, Serialize)]
struct EmailAnalyzeRequest<'a> {
    email_id: &'a str,
}

/// Blocking HTTP client for the PhishGard-AI backend.
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("invalid api_base_url: {base_url}"))?;
        Ok(Self {
            http: reqwest::blocking::Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        // `path` is always absolute, so this works whether or not the
        // configured base carries a trailing slash
        format!("{}{}", self.base.as_str().trim_end_matches('/'), path)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        log::debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(ApiError::Network)?;
        let status = resp.status();
        let body = resp.bytes().map_err(ApiError::Network)?;
        handle_response(status, &body)
    }

    fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        log::debug!("POST {url}");
        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(ApiError::Network)?;
        let status = resp.status();
        let bytes = resp.bytes().map_err(ApiError::Network)?;
        handle_response(status, &bytes)
    }

    /// Dashboard aggregates for the last `period_days` days.
    pub fn dashboard_summary(&self, period_days: u32) -> Result<DashboardSummary, ApiError> {
        self.get_json(
            "/api/dashboard/summary",
            &[("period", period_days.to_string())],
        )
    }

    /// Dashboard aggregates for an explicit date range (YYYY-MM-DD).
    pub fn dashboard_summary_range(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<DashboardSummary, ApiError> {
        self.get_json(
            "/api/dashboard/summary",
            &[
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
            ],
        )
    }
}

impl Backend for ApiClient {
    fn fetch_emails(&self) -> Result<Vec<EmailSummary>, ApiError> {
        self.get_json("/api/emails", &[])
    }

    fn analyze_email(&self, id: &EmailId) -> Result<AnalysisReport, ApiError> {
        self.post_json("/api/analyze/email", &EmailAnalyzeRequest { email_id: id })
    }
}
