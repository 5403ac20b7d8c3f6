use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::{ApiError, CalendarApi, EventQuery};
use crate::models::category::{CalendarCategory, CategoryDraft};
use crate::models::deadline::DeadlineEvent;
use crate::models::event::{CalendarEvent, EventDraft, EventScope, RsvpStatus};
use crate::models::settings::ApiSettings;
use crate::models::ui::DateRange;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Serialize)]
struct MoveRequest {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

#[derive(Serialize)]
struct RsvpRequest {
    status: RsvpStatus,
}

/// `CalendarApi` over the lab's JSON REST endpoints.
pub struct RestCalendarApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl RestCalendarApi {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let mut base = settings.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url =
            Url::parse(&base).with_context(|| format!("Invalid API base URL: {}", base))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(concat!("lab-calendar/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build lab API HTTP client")?;

        Ok(Self {
            client,
            base_url,
            token: settings.token.clone().filter(|token| !token.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments; segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        log::debug!("{} {}", method, url);
        let request = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check_status(request.send()?)?;
        response
            .json::<T>()
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn send_empty(request: RequestBuilder) -> Result<(), ApiError> {
        Self::check_status(request.send()?)?;
        Ok(())
    }

    fn check_status(response: Response) -> Result<Response, ApiError> {
        match response.status() {
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ApiError::Api {
                status: 403,
                message: "Forbidden – insufficient permissions".into(),
            }),
            status if status.is_client_error() || status.is_server_error() => {
                let code = status.as_u16();
                let message = response.text().unwrap_or_default();
                Err(ApiError::Api {
                    status: code,
                    message: summarize_body(&message),
                })
            }
            _ => Ok(response),
        }
    }
}

/// Error bodies can be whole HTML pages; keep the first line, bounded.
fn summarize_body(body: &str) -> String {
    let first_line = body.lines().next().unwrap_or("").trim();
    if first_line.chars().count() > 200 {
        let truncated: String = first_line.chars().take(200).collect();
        format!("{}…", truncated)
    } else {
        first_line.to_string()
    }
}

fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

impl CalendarApi for RestCalendarApi {
    fn list_events(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>, ApiError> {
        let request = self.request(Method::GET, &["calendar", "events"])?.query(&[
            ("start", format_timestamp(query.start)),
            ("end", format_timestamp(query.end)),
            ("scope", query.scope.as_str().to_string()),
        ]);
        Self::send_json(request)
    }

    fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, ApiError> {
        let request = self.request(Method::POST, &["calendar", "events"])?.json(draft);
        Self::send_json(request)
    }

    fn update_event(&self, id: &str, draft: &EventDraft) -> Result<CalendarEvent, ApiError> {
        let request = self
            .request(Method::PUT, &["calendar", "events", id])?
            .json(draft);
        Self::send_json(request)
    }

    fn delete_event(&self, id: &str) -> Result<(), ApiError> {
        Self::send_empty(self.request(Method::DELETE, &["calendar", "events", id])?)
    }

    fn move_event(
        &self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<CalendarEvent, ApiError> {
        let request = self
            .request(Method::PATCH, &["calendar", "events", id, "move"])?
            .json(&MoveRequest { start, end });
        Self::send_json(request)
    }

    fn list_categories(&self, scope: EventScope) -> Result<Vec<CalendarCategory>, ApiError> {
        let request = self
            .request(Method::GET, &["calendar", "categories"])?
            .query(&[("scope", scope.as_str())]);
        Self::send_json(request)
    }

    fn create_category(&self, draft: &CategoryDraft) -> Result<CalendarCategory, ApiError> {
        let request = self
            .request(Method::POST, &["calendar", "categories"])?
            .json(draft);
        Self::send_json(request)
    }

    fn list_deadlines(&self, range: &DateRange) -> Result<Vec<DeadlineEvent>, ApiError> {
        let request = self
            .request(Method::GET, &["calendar", "deadlines"])?
            .query(&[
                ("start", range.start.format("%Y-%m-%d").to_string()),
                ("end", range.end.format("%Y-%m-%d").to_string()),
            ]);
        Self::send_json(request)
    }

    fn rsvp(&self, id: &str, status: RsvpStatus) -> Result<CalendarEvent, ApiError> {
        let request = self
            .request(Method::POST, &["calendar", "events", id, "rsvp"])?
            .json(&RsvpRequest { status });
        Self::send_json(request)
    }
}
