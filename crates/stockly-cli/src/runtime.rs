// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;
use stockly_api::{ChatReply, Client};
use stockly_app::{
    ChatReplyContent, CredentialsInput, DeadStockAlert, FormPayload, InventoryRecord, Item, ItemId,
    MessageId, NearExpiryAlert, SalesForecast, SalesPoint, Session,
};
use stockly_tui::{
    ChatWorkerEvent, InternalEvent, ReportWorkerEvent, SavedReport,
};

use crate::session;

/// Runtime backed by the Stockly HTTP API. Chat and report requests run on
/// worker threads so the event loop stays responsive while the backend thinks.
pub struct ApiRuntime {
    client: Arc<Client>,
    session_path: PathBuf,
    report_dir: PathBuf,
}

impl ApiRuntime {
    pub fn new(client: Client, session_path: PathBuf, report_dir: PathBuf) -> Self {
        Self {
            client: Arc::new(client),
            session_path,
            report_dir,
        }
    }
}

fn map_reply(reply: ChatReply) -> ChatReplyContent {
    match reply {
        ChatReply::Text(text) => ChatReplyContent::Text(text),
        ChatReply::ReportPrompt(prompt) => ChatReplyContent::ReportPrompt(prompt),
    }
}

fn chat_request(client: &Client, message: &str, token: &str) -> Result<ChatReplyContent> {
    Ok(map_reply(client.chat(message, token)?))
}

fn report_request(
    client: &Client,
    report_dir: &Path,
    report_type: &str,
    month: &str,
    token: &str,
) -> Result<SavedReport> {
    let download = client.generate_report(report_type, month, token)?;

    fs::create_dir_all(report_dir)
        .with_context(|| format!("create report directory {}", report_dir.display()))?;
    let path = report_dir.join(&download.file_name);
    fs::write(&path, &download.bytes)
        .with_context(|| format!("write report file {}", path.display()))?;

    Ok(SavedReport {
        file_name: path.display().to_string(),
    })
}

impl stockly_tui::AppRuntime for ApiRuntime {
    fn load_inventory(&mut self) -> Result<Vec<InventoryRecord>> {
        self.client.inventory()
    }

    fn load_items(&mut self) -> Result<Vec<Item>> {
        self.client.items()
    }

    fn load_near_expiry(&mut self, days: u32) -> Result<Vec<NearExpiryAlert>> {
        self.client.near_expiry(days)
    }

    fn load_dead_stock(&mut self, months_back: u32) -> Result<Vec<DeadStockAlert>> {
        self.client.dead_stock(months_back)
    }

    fn load_sales_history(&mut self, item_id: ItemId) -> Result<Vec<SalesPoint>> {
        self.client.inventory_sales(item_id)
    }

    fn load_sales_forecast(&mut self, item_id: ItemId) -> Result<Vec<SalesForecast>> {
        self.client.predict_sales(item_id)
    }

    fn submit_form(&mut self, payload: &FormPayload, session: &Session) -> Result<()> {
        match payload {
            FormPayload::Intake(form) => self.client.add_inventory(form, &session.token),
            FormPayload::NewItem(form) => self.client.add_item(form, &session.token),
            FormPayload::Sale(form) => self.client.add_sale(form, &session.token),
            FormPayload::Register(form) => self.client.register(form, &session.token),
        }
    }

    fn login(&mut self, credentials: &CredentialsInput) -> Result<Session> {
        self.client.login(credentials)
    }

    fn store_session(&mut self, session: Option<&Session>) -> Result<()> {
        match session {
            Some(session) => session::save(&self.session_path, session),
            None => session::remove(&self.session_path),
        }
    }

    fn run_chat(&mut self, message: &str, token: &str) -> Result<ChatReplyContent> {
        chat_request(&self.client, message, token)
    }

    fn run_report(&mut self, report_type: &str, month: &str, token: &str) -> Result<SavedReport> {
        report_request(&self.client, &self.report_dir, report_type, month, token)
    }

    fn spawn_chat(
        &mut self,
        request_id: u64,
        message: &str,
        token: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = Arc::clone(&self.client);
        let message = message.to_owned();
        let token = token.to_owned();

        thread::spawn(move || {
            let event = match chat_request(&client, &message, &token) {
                Ok(reply) => ChatWorkerEvent::Completed { request_id, reply },
                Err(error) => ChatWorkerEvent::Failed {
                    request_id,
                    error: format!("{error:#}"),
                },
            };
            let _ = tx.send(InternalEvent::Chat(event));
        });
        Ok(())
    }

    fn spawn_report(
        &mut self,
        message_id: MessageId,
        report_type: &str,
        month: &str,
        token: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let client = Arc::clone(&self.client);
        let report_dir = self.report_dir.clone();
        let report_type = report_type.to_owned();
        let month = month.to_owned();
        let token = token.to_owned();

        thread::spawn(move || {
            let event = match report_request(&client, &report_dir, &report_type, &month, &token) {
                Ok(report) => ReportWorkerEvent::Completed { message_id, report },
                Err(error) => ReportWorkerEvent::Failed {
                    message_id,
                    error: format!("{error:#}"),
                },
            };
            let _ = tx.send(InternalEvent::Report(event));
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ApiRuntime;
    use anyhow::Result;
    use std::thread;
    use std::time::Duration;
    use stockly_api::Client;
    use stockly_app::{ChatReplyContent, FormPayload, IntakeFormInput, ItemId, Session, UserRole};
    use stockly_tui::AppRuntime;

    fn respond_json(server: tiny_http::Server, status: u16, body: &'static str) {
        thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let header =
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("static header");
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                let _ = request.respond(response);
            }
        });
    }

    fn runtime_against(base_url: &str, dir: &std::path::Path) -> Result<ApiRuntime> {
        let client = Client::new(base_url, Duration::from_secs(2))?;
        Ok(ApiRuntime::new(
            client,
            dir.join("session.toml"),
            dir.join("reports"),
        ))
    }

    #[test]
    fn chat_reply_maps_to_message_content() -> Result<()> {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let base_url = format!("http://{}", server.server_addr());
        respond_json(server, 200, "{\"response\": \"Stock looks healthy.\"}");

        let temp = tempfile::tempdir()?;
        let mut runtime = runtime_against(&base_url, temp.path())?;
        let reply = runtime.run_chat("how is stock?", "tok")?;
        assert_eq!(
            reply,
            ChatReplyContent::Text("Stock looks healthy.".to_owned())
        );
        Ok(())
    }

    #[test]
    fn report_download_lands_in_report_dir() -> Result<()> {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let base_url = format!("http://{}", server.server_addr());
        thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let header = tiny_http::Header::from_bytes(
                    &b"Content-Disposition"[..],
                    &b"attachment; filename=\"sales_report_2026-07.pdf\""[..],
                )
                .expect("static header");
                let response = tiny_http::Response::from_data(b"%PDF-1.4 stub".to_vec())
                    .with_header(header);
                let _ = request.respond(response);
            }
        });

        let temp = tempfile::tempdir()?;
        let mut runtime = runtime_against(&base_url, temp.path())?;
        let saved = runtime.run_report("sales", "2026-07", "tok")?;

        let expected = temp.path().join("reports").join("sales_report_2026-07.pdf");
        assert_eq!(saved.file_name, expected.display().to_string());
        assert_eq!(std::fs::read(expected)?, b"%PDF-1.4 stub");
        Ok(())
    }

    #[test]
    fn session_store_round_trips_through_disk() -> Result<()> {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let base_url = format!("http://{}", server.server_addr());
        drop(server);

        let temp = tempfile::tempdir()?;
        let mut runtime = runtime_against(&base_url, temp.path())?;
        let session = Session {
            token: "tok-9".to_owned(),
            role: UserRole::Employee,
            username: "clerk".to_owned(),
        };

        runtime.store_session(Some(&session))?;
        let loaded = crate::session::load(&temp.path().join("session.toml"))?
            .expect("session should persist");
        assert_eq!(loaded.token, "tok-9");

        runtime.store_session(None)?;
        assert!(crate::session::load(&temp.path().join("session.toml"))?.is_none());
        Ok(())
    }

    #[test]
    fn intake_form_posts_with_bearer_token() -> Result<()> {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
        let base_url = format!("http://{}", server.server_addr());
        let handle = thread::spawn(move || -> (String, String) {
            let request = server.recv().expect("one request");
            let url = request.url().to_owned();
            let auth = request
                .headers()
                .iter()
                .find(|header| header.field.as_str().as_str().eq_ignore_ascii_case("authorization"))
                .map(|header| header.value.as_str().to_owned())
                .unwrap_or_default();
            let _ = request.respond(tiny_http::Response::from_string("{}"));
            (url, auth)
        });

        let temp = tempfile::tempdir()?;
        let mut runtime = runtime_against(&base_url, temp.path())?;
        let session = Session {
            token: "tok-42".to_owned(),
            role: UserRole::Manager,
            username: "boss".to_owned(),
        };
        runtime.submit_form(
            &FormPayload::Intake(IntakeFormInput {
                item_id: ItemId::new(7),
                stock_quantity: 25,
                expire_date: None,
            }),
            &session,
        )?;

        let (url, auth) = handle.join().expect("server thread");
        assert_eq!(url, "/add_inventory");
        assert_eq!(auth, "Bearer tok-42");
        Ok(())
    }
}
