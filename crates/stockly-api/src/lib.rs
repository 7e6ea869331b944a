// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use time::Date;

use stockly_app::{
    CredentialsInput, DeadStockAlert, IntakeFormInput, InventoryRecord, Item, ItemId,
    NearExpiryAlert, NewItemFormInput, RegisterFormInput, ReportPrompt, SaleFormInput,
    SalesForecast, SalesPoint, Session, UserRole,
};

time::serde::format_description!(backend_date, Date, "[year]-[month]-[day]");

/// Decoded assistant reply from `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatReply {
    Text(String),
    ReportPrompt(ReportPrompt),
}

/// A generated report as served by `POST /generate_report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Blocking client for the Stockly backend REST API.
#[derive(Debug)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn inventory(&self) -> Result<Vec<InventoryRecord>> {
        let response = self.get_checked("/inventory")?;
        response.json().context("decode inventory rows")
    }

    pub fn items(&self) -> Result<Vec<Item>> {
        let response = self.get_checked("/items")?;
        response.json().context("decode catalog items")
    }

    pub fn near_expiry(&self, days: u32) -> Result<Vec<NearExpiryAlert>> {
        let response = self.get_checked(&format!("/near_expiry?days={days}"))?;
        response.json().context("decode expiry alerts")
    }

    pub fn dead_stock(&self, months_back: u32) -> Result<Vec<DeadStockAlert>> {
        let response = self.get_checked(&format!("/dead_stock?months_back={months_back}"))?;
        response.json().context("decode dead stock alerts")
    }

    pub fn inventory_sales(&self, item_id: ItemId) -> Result<Vec<SalesPoint>> {
        let response = self.get_checked(&format!("/inventory_sales/{}", item_id.get()))?;
        response.json().context("decode sales history")
    }

    pub fn predict_sales(&self, item_id: ItemId) -> Result<Vec<SalesForecast>> {
        let response = self.get_checked(&format!("/predict_sales/{}", item_id.get()))?;
        response.json().context("decode sales forecast")
    }

    pub fn add_inventory(&self, input: &IntakeFormInput, token: &str) -> Result<()> {
        let request = AddInventoryRequest {
            item_id: input.item_id.get(),
            stock_quantity: input.stock_quantity,
            expire_date: input.expire_date,
        };
        self.post_checked("/add_inventory", &request, Some(token))?;
        Ok(())
    }

    pub fn add_item(&self, input: &NewItemFormInput, token: &str) -> Result<()> {
        let request = AddItemRequest {
            item_code: &input.item_code,
            item_name: &input.item_name,
            department: &input.department,
            kind: &input.kind,
            reorder_level: input.reorder_level,
            reorder_quantity: input.reorder_quantity,
        };
        self.post_checked("/add_item", &request, Some(token))?;
        Ok(())
    }

    pub fn add_sale(&self, input: &SaleFormInput, token: &str) -> Result<()> {
        let request = AddSaleRequest {
            item_id: input.item_id.get(),
            quantity_sold: input.quantity_sold,
            sale_date: input.sale_date,
        };
        self.post_checked("/add_sale", &request, Some(token))?;
        Ok(())
    }

    pub fn login(&self, credentials: &CredentialsInput) -> Result<Session> {
        let request = CredentialsRequest {
            username: &credentials.username,
            password: &credentials.password,
        };
        let response = self.post_checked("/login", &request, None)?;
        let parsed: LoginResponse = response.json().context("decode login response")?;
        let role = UserRole::parse(&parsed.role)
            .ok_or_else(|| anyhow!("login returned unknown role {:?}", parsed.role))?;
        Ok(Session {
            token: parsed.token,
            role,
            username: parsed.username,
        })
    }

    pub fn register(&self, input: &RegisterFormInput, token: &str) -> Result<()> {
        let request = RegisterRequest {
            username: &input.credentials.username,
            password: &input.credentials.password,
            role: input.role.as_str(),
        };
        self.post_checked("/register", &request, Some(token))?;
        Ok(())
    }

    pub fn chat(&self, message: &str, token: &str) -> Result<ChatReply> {
        let request = ChatRequest { message };
        let response = self.post_checked("/chat", &request, Some(token))?;
        let parsed: ChatEnvelope = response.json().context("decode chat response")?;
        match parsed.response {
            ChatReplyWire::Text(text) => Ok(ChatReply::Text(text)),
            ChatReplyWire::Prompt(prompt) => {
                if prompt.kind != "report_prompt" {
                    bail!("unexpected chat reply kind {:?}", prompt.kind);
                }
                Ok(ChatReply::ReportPrompt(ReportPrompt {
                    title: prompt.title,
                    options: prompt.options,
                    months: prompt.months,
                }))
            }
        }
    }

    pub fn generate_report(
        &self,
        report_type: &str,
        month: &str,
        token: &str,
    ) -> Result<ReportDownload> {
        let request = GenerateReportRequest { report_type, month };
        let response = self.post_checked("/generate_report", &request, Some(token))?;

        let file_name = response
            .headers()
            .get("content-disposition")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_content_disposition)
            .unwrap_or_else(|| format!("{report_type}_report_{month}.pdf"));

        let bytes = response.bytes().context("read report body")?.to_vec();
        Ok(ReportDownload { file_name, bytes })
    }

    fn get_checked(&self, path: &str) -> Result<Response> {
        let request = self.http.get(format!("{}{path}", self.base_url));
        self.send_checked(request)
    }

    fn post_checked<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<Response> {
        let mut request = self.http.post(format!("{}{path}", self.base_url)).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        self.send_checked(request)
    }

    fn send_checked(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }
}

/// Filename from a `Content-Disposition: attachment; filename=...` header.
fn parse_content_disposition(value: &str) -> Option<String> {
    let (_, after) = value.split_once("filename=")?;
    let after = after.split(';').next().unwrap_or(after).trim();
    let name = after.trim_matches('"').trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_owned())
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- check that the Stockly backend is running ({} )",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(error) = parsed.error
        && !error.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), error);
    }

    if let Ok(parsed) = serde_json::from_str::<MessageEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), message);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

#[derive(Debug, Serialize)]
struct AddInventoryRequest {
    item_id: i64,
    stock_quantity: i64,
    #[serde(with = "backend_date::option")]
    expire_date: Option<Date>,
}

#[derive(Debug, Serialize)]
struct AddItemRequest<'a> {
    item_code: &'a str,
    item_name: &'a str,
    department: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
    reorder_level: i64,
    reorder_quantity: i64,
}

#[derive(Debug, Serialize)]
struct AddSaleRequest {
    item_id: i64,
    quantity_sold: i64,
    #[serde(with = "backend_date")]
    sale_date: Date,
}

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    role: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerateReportRequest<'a> {
    report_type: &'a str,
    month: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    role: String,
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
struct ChatEnvelope {
    response: ChatReplyWire,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatReplyWire {
    Text(String),
    Prompt(ReportPromptWire),
}

#[derive(Debug, Deserialize)]
struct ReportPromptWire {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    months: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{clean_error_response, parse_content_disposition};
    use reqwest::StatusCode;

    #[test]
    fn error_envelope_wins_over_message_envelope() {
        let error = clean_error_response(
            StatusCode::BAD_REQUEST,
            r#"{"error":"month is required","message":"ignored"}"#,
        );
        assert_eq!(error.to_string(), "server error (400): month is required");
    }

    #[test]
    fn message_envelope_used_when_error_absent() {
        let error =
            clean_error_response(StatusCode::UNAUTHORIZED, r#"{"message":"token expired"}"#);
        assert_eq!(error.to_string(), "server error (401): token expired");
    }

    #[test]
    fn short_plain_bodies_pass_through() {
        let error = clean_error_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(error.to_string(), "server error (502): upstream down");
    }

    #[test]
    fn long_or_markup_bodies_collapse_to_status() {
        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, &"x".repeat(400));
        assert_eq!(error.to_string(), "server returned 500");

        let error = clean_error_response(StatusCode::NOT_FOUND, r#"{"detail":"nope"}"#);
        assert_eq!(error.to_string(), "server returned 404");
    }

    #[test]
    fn content_disposition_variants() {
        assert_eq!(
            parse_content_disposition(r#"attachment; filename="sales_report_2026-07.pdf""#),
            Some("sales_report_2026-07.pdf".to_owned()),
        );
        assert_eq!(
            parse_content_disposition("attachment; filename=report.pdf; size=100"),
            Some("report.pdf".to_owned()),
        );
        assert_eq!(parse_content_disposition("attachment"), None);
        assert_eq!(parse_content_disposition(r#"attachment; filename="""#), None);
    }
}
