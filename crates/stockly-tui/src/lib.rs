// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;
use time::macros::format_description;

use stockly_app::{
    AppCommand, AppMode, AppState, ChatLog, ChatReplyContent, ChatRole, ChatVisibility,
    CredentialsInput, DeadStockAlert, FormKind, FormPayload, IntakeFormInput, InventoryRecord,
    InventoryTable, Item, ItemId, MessageContent, MessageId, NearExpiryAlert, NewItemFormInput,
    RegisterFormInput, SaleFormInput, SalesForecast, SalesPoint, Session, SortKey, TabKind,
    UserRole,
};

const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const CHAT_VISIBLE_MESSAGES: usize = 12;

static DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// A generated report handed back by the runtime, already written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedReport {
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatWorkerEvent {
    Completed {
        request_id: u64,
        reply: ChatReplyContent,
    },
    Failed {
        request_id: u64,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportWorkerEvent {
    Completed {
        message_id: MessageId,
        report: SavedReport,
    },
    Failed {
        message_id: MessageId,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Chat(ChatWorkerEvent),
    Report(ReportWorkerEvent),
}

/// Seam between the UI and the backend. The CLI implements this over the
/// HTTP client; tests implement it with canned data.
pub trait AppRuntime {
    fn load_inventory(&mut self) -> Result<Vec<InventoryRecord>>;
    fn load_items(&mut self) -> Result<Vec<Item>>;
    fn load_near_expiry(&mut self, days: u32) -> Result<Vec<NearExpiryAlert>>;
    fn load_dead_stock(&mut self, months_back: u32) -> Result<Vec<DeadStockAlert>>;
    fn load_sales_history(&mut self, item_id: ItemId) -> Result<Vec<SalesPoint>>;
    fn load_sales_forecast(&mut self, item_id: ItemId) -> Result<Vec<SalesForecast>>;
    fn submit_form(&mut self, payload: &FormPayload, session: &Session) -> Result<()>;
    fn login(&mut self, credentials: &CredentialsInput) -> Result<Session>;
    fn store_session(&mut self, session: Option<&Session>) -> Result<()>;
    fn run_chat(&mut self, message: &str, token: &str) -> Result<ChatReplyContent>;
    fn run_report(&mut self, report_type: &str, month: &str, token: &str) -> Result<SavedReport>;

    /// Default implementation answers synchronously through the channel; the
    /// CLI overrides this to spawn a worker thread.
    fn spawn_chat(
        &mut self,
        request_id: u64,
        message: &str,
        token: &str,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let event = match self.run_chat(message, token) {
            Ok(reply) => InternalEvent::Chat(ChatWorkerEvent::Completed { request_id, reply }),
            Err(error) => InternalEvent::Chat(ChatWorkerEvent::Failed {
                request_id,
                error: error.to_string(),
            }),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("chat event channel closed"))?;
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
        let event = match self.run_report(report_type, month, token) {
            Ok(report) => InternalEvent::Report(ReportWorkerEvent::Completed { message_id, report }),
            Err(error) => InternalEvent::Report(ReportWorkerEvent::Failed {
                message_id,
                error: error.to_string(),
            }),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("report event channel closed"))?;
        Ok(())
    }
}

/// Thresholds the CLI reads from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub expiry_days: u32,
    pub dead_stock_months: u32,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            expiry_days: 30,
            dead_stock_months: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptField {
    Option,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PromptFocus {
    message_id: MessageId,
    field: PromptField,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ChatUiState {
    input: String,
    log: ChatLog,
    prompt_focus: Option<PromptFocus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct LoginUiState {
    username: String,
    password: String,
    field_index: usize,
    error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FormUiState {
    kind: FormKind,
    field_index: usize,
    values: Vec<String>,
}

impl FormUiState {
    fn blank(kind: FormKind) -> Self {
        Self {
            kind,
            field_index: 0,
            values: vec![String::new(); form_field_labels(kind).len()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct SalesUiState {
    cursor: usize,
    history: Vec<SalesPoint>,
    forecast: Vec<SalesForecast>,
    loaded_for: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    session: Option<Session>,
    table: InventoryTable,
    search_active: bool,
    table_cursor: usize,
    items: Vec<Item>,
    near_expiry: Vec<NearExpiryAlert>,
    expiry_days: u32,
    dead_stock: Vec<DeadStockAlert>,
    dead_stock_months: u32,
    sales: SalesUiState,
    chat: ChatUiState,
    login: LoginUiState,
    form: Option<FormUiState>,
    help_visible: bool,
    status_token: u64,
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
    session: Option<Session>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData {
        expiry_days: options.expiry_days,
        dead_stock_months: options.dead_stock_months,
        session,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    if view_data.session.is_some() {
        state.dispatch(AppCommand::CompleteLogin);
        if let Err(error) = refresh_all(state, runtime, &mut view_data) {
            state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
        }
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Chat(event) => handle_chat_worker_event(state, view_data, tx, event),
            InternalEvent::Report(event) => {
                handle_report_worker_event(state, view_data, tx, event);
            }
        }
    }
}

fn handle_chat_worker_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: ChatWorkerEvent,
) {
    match event {
        ChatWorkerEvent::Completed { request_id, reply } => {
            view_data.chat.log.resolve(request_id, reply);
        }
        ChatWorkerEvent::Failed { request_id, error } => {
            let message = format!("chat request failed: {error}");
            if view_data.chat.log.fail(request_id, &message) {
                emit_status(state, view_data, tx, message);
            }
        }
    }
}

fn handle_report_worker_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: ReportWorkerEvent,
) {
    match event {
        ReportWorkerEvent::Completed { message_id, report } => {
            view_data.chat.log.finish_report(message_id);
            emit_status(
                state,
                view_data,
                tx,
                format!("report saved: {}", report.file_name),
            );
        }
        ReportWorkerEvent::Failed { message_id, error } => {
            let message = format!("report failed: {error}");
            view_data.chat.log.fail_report(message_id, &message);
            emit_status(state, view_data, tx, message);
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn refresh_all<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    refresh_inventory(runtime, view_data)?;
    view_data.items = runtime.load_items()?;
    refresh_active_tab(state, runtime, view_data)
}

/// A failed fetch leaves the previous snapshot in place.
fn refresh_inventory<R: AppRuntime>(runtime: &mut R, view_data: &mut ViewData) -> Result<()> {
    let rows = runtime.load_inventory()?;
    view_data.table.replace_snapshot(rows);
    view_data.table_cursor = 0;
    Ok(())
}

fn refresh_active_tab<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    match state.active_tab {
        TabKind::Inventory | TabKind::Restock => refresh_inventory(runtime, view_data),
        TabKind::Items => {
            view_data.items = runtime.load_items()?;
            Ok(())
        }
        TabKind::Expiry => {
            view_data.near_expiry = runtime.load_near_expiry(view_data.expiry_days)?;
            Ok(())
        }
        TabKind::DeadStock => {
            view_data.dead_stock = runtime.load_dead_stock(view_data.dead_stock_months)?;
            Ok(())
        }
        TabKind::Sales => refresh_sales_selection(runtime, view_data),
        TabKind::Intake | TabKind::NewItem => Ok(()),
    }
}

fn refresh_sales_selection<R: AppRuntime>(
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    let Some(item) = view_data.items.get(view_data.sales.cursor) else {
        view_data.sales = SalesUiState::default();
        return Ok(());
    };
    let item_id = item.item_id;
    if view_data.sales.loaded_for == Some(item_id) {
        return Ok(());
    }
    view_data.sales.history = runtime.load_sales_history(item_id)?;
    view_data.sales.forecast = runtime.load_sales_forecast(item_id)?;
    view_data.sales.loaded_for = Some(item_id);
    Ok(())
}

// Returns true when the app should quit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    if state.mode == AppMode::Login {
        return handle_login_key(state, runtime, view_data, internal_tx, key);
    }

    if state.chat == ChatVisibility::Visible {
        handle_chat_key(state, runtime, view_data, internal_tx, key);
        return false;
    }

    if let AppMode::Form(kind) = state.mode {
        handle_form_key(state, runtime, view_data, internal_tx, key, kind);
        return false;
    }

    if view_data.search_active {
        match key.code {
            KeyCode::Esc => {
                view_data.search_active = false;
                view_data.table.set_search("");
            }
            KeyCode::Enter => view_data.search_active = false,
            KeyCode::Backspace => {
                let mut needle = view_data.table.search().to_owned();
                needle.pop();
                view_data.table.set_search(needle);
            }
            KeyCode::Char(c) => {
                let mut needle = view_data.table.search().to_owned();
                needle.push(c);
                view_data.table.set_search(needle);
            }
            _ => {}
        }
        view_data.table_cursor = 0;
        return false;
    }

    handle_nav_key(state, runtime, view_data, internal_tx, key)
}

fn handle_login_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Esc => return true,
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
            view_data.login.field_index = (view_data.login.field_index + 1) % 2;
        }
        KeyCode::Backspace => {
            let field = login_field_mut(&mut view_data.login);
            field.pop();
        }
        KeyCode::Char(c) => {
            let field = login_field_mut(&mut view_data.login);
            field.push(c);
        }
        KeyCode::Enter => {
            let credentials = CredentialsInput {
                username: view_data.login.username.clone(),
                password: view_data.login.password.clone(),
            };
            if let Err(error) = credentials.validate() {
                view_data.login.error = Some(error.to_string());
                return false;
            }
            match runtime.login(&credentials) {
                Ok(session) => {
                    if let Err(error) = runtime.store_session(Some(&session)) {
                        view_data.login.error = Some(format!("session save failed: {error}"));
                    } else {
                        view_data.login.error = None;
                    }
                    view_data.session = Some(session);
                    view_data.login.password.clear();
                    state.dispatch(AppCommand::CompleteLogin);
                    if let Err(error) = refresh_all(state, runtime, view_data) {
                        emit_status(
                            state,
                            view_data,
                            internal_tx,
                            format!("load failed: {error}"),
                        );
                    }
                }
                Err(error) => view_data.login.error = Some(error.to_string()),
            }
        }
        _ => {}
    }
    false
}

fn login_field_mut(login: &mut LoginUiState) -> &mut String {
    if login.field_index == 0 {
        &mut login.username
    } else {
        &mut login.password
    }
}

fn handle_chat_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            state.dispatch(AppCommand::CloseChat);
        }
        KeyCode::Tab => cycle_prompt_focus(&mut view_data.chat),
        KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
            if let Some(focus) = view_data.chat.prompt_focus {
                let delta = match key.code {
                    KeyCode::Up | KeyCode::Left => -1,
                    _ => 1,
                };
                match focus.field {
                    PromptField::Option => {
                        view_data.chat.log.cycle_report_option(focus.message_id, delta);
                    }
                    PromptField::Month => {
                        view_data.chat.log.cycle_report_month(focus.message_id, delta);
                    }
                }
            }
        }
        KeyCode::Enter => {
            if let Some(focus) = view_data.chat.prompt_focus {
                submit_report_request(state, runtime, view_data, internal_tx, focus.message_id);
            } else {
                submit_chat_input(state, runtime, view_data, internal_tx);
            }
        }
        KeyCode::Backspace => {
            if view_data.chat.prompt_focus.is_none() {
                view_data.chat.input.pop();
            }
        }
        KeyCode::Char(c) => {
            if view_data.chat.prompt_focus.is_none() {
                view_data.chat.input.push(c);
            }
        }
        _ => {}
    }
}

fn cycle_prompt_focus(chat: &mut ChatUiState) {
    let Some(prompt_id) = latest_prompt_id(&chat.log) else {
        chat.prompt_focus = None;
        return;
    };
    chat.prompt_focus = match chat.prompt_focus {
        None => Some(PromptFocus {
            message_id: prompt_id,
            field: PromptField::Option,
        }),
        Some(PromptFocus {
            field: PromptField::Option,
            ..
        }) => Some(PromptFocus {
            message_id: prompt_id,
            field: PromptField::Month,
        }),
        Some(PromptFocus {
            field: PromptField::Month,
            ..
        }) => None,
    };
}

fn latest_prompt_id(log: &ChatLog) -> Option<MessageId> {
    log.messages()
        .iter()
        .rev()
        .find(|message| matches!(message.content, MessageContent::ReportPrompt(..)))
        .map(|message| message.id)
}

fn submit_chat_input<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let input = view_data.chat.input.trim().to_owned();
    if input.is_empty() {
        return;
    }

    let token = view_data
        .session
        .as_ref()
        .filter(|session| session.has_token())
        .map(|session| session.token.clone());

    let outcome = view_data.chat.log.begin_request(&input, token.is_some());
    let request_id = match outcome {
        stockly_app::ChatSendOutcome::Dispatch { request_id } => request_id,
        stockly_app::ChatSendOutcome::Busy => {
            // Keep the typed message in the input box for a later send.
            emit_status(state, view_data, internal_tx, "assistant is busy");
            return;
        }
        stockly_app::ChatSendOutcome::Rejected | stockly_app::ChatSendOutcome::NoSession => {
            view_data.chat.input.clear();
            return;
        }
    };
    view_data.chat.input.clear();

    let token = token.unwrap_or_default();
    if let Err(error) = runtime.spawn_chat(request_id, &input, &token, internal_tx.clone()) {
        let message = format!("chat request failed: {error}");
        view_data.chat.log.fail(request_id, &message);
        emit_status(state, view_data, internal_tx, message);
    }
}

fn submit_report_request<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message_id: MessageId,
) {
    let Some((report_type, month)) = view_data
        .chat
        .log
        .report_selection(message_id)
        .map(|(report_type, month)| (report_type.to_owned(), month.to_owned()))
    else {
        emit_status(state, view_data, internal_tx, "report prompt is empty");
        return;
    };

    if !view_data.chat.log.begin_report(message_id) {
        emit_status(state, view_data, internal_tx, "report already generating");
        return;
    }

    let token = view_data
        .session
        .as_ref()
        .map(|session| session.token.clone())
        .unwrap_or_default();

    if let Err(error) = runtime.spawn_report(
        message_id,
        &report_type,
        &month,
        &token,
        internal_tx.clone(),
    ) {
        let message = format!("report failed: {error}");
        view_data.chat.log.fail_report(message_id, &message);
        emit_status(state, view_data, internal_tx, message);
    }
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
    kind: FormKind,
) {
    let Some(form) = view_data.form.as_mut() else {
        view_data.form = Some(FormUiState::blank(kind));
        return;
    };

    match key.code {
        KeyCode::Esc => {
            view_data.form = None;
            state.dispatch(AppCommand::ExitToNav);
            if matches!(state.active_tab, TabKind::Intake | TabKind::NewItem) {
                state.dispatch(AppCommand::SelectTab(TabKind::Inventory));
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            form.field_index = (form.field_index + 1) % form.values.len();
        }
        KeyCode::Up => {
            form.field_index = (form.field_index + form.values.len() - 1) % form.values.len();
        }
        KeyCode::Backspace => {
            form.values[form.field_index].pop();
        }
        KeyCode::Char(c) => {
            form.values[form.field_index].push(c);
        }
        KeyCode::Enter => submit_form_payload(state, runtime, view_data, internal_tx),
        _ => {}
    }
}

fn submit_form_payload<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(form) = view_data.form.clone() else {
        return;
    };
    let Some(session) = view_data.session.clone() else {
        emit_status(state, view_data, internal_tx, "sign in first");
        return;
    };

    let payload = match build_form_payload(form.kind, &form.values, &view_data.items) {
        Ok(payload) => payload,
        Err(error) => {
            emit_status(state, view_data, internal_tx, error.to_string());
            return;
        }
    };
    if let Err(error) = payload.validate() {
        emit_status(state, view_data, internal_tx, error.to_string());
        return;
    }

    match runtime.submit_form(&payload, &session) {
        Ok(()) => {
            view_data.form = Some(FormUiState::blank(form.kind));
            emit_status(state, view_data, internal_tx, "saved");
            if let Err(error) = refresh_all(state, runtime, view_data) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("refresh failed: {error}"),
                );
            }
        }
        Err(error) => emit_status(state, view_data, internal_tx, format!("save failed: {error}")),
    }
}

fn form_field_labels(kind: FormKind) -> &'static [&'static str] {
    match kind {
        FormKind::Intake => &["item code", "quantity", "expire date (YYYY-MM-DD, blank for none)"],
        FormKind::NewItem => &[
            "item code",
            "item name",
            "department",
            "type",
            "reorder level",
            "reorder quantity",
        ],
        FormKind::Sale => &["item code", "quantity sold", "sale date (YYYY-MM-DD)"],
        FormKind::Register => &["username", "password", "role (manager/employee)"],
    }
}

fn build_form_payload(kind: FormKind, values: &[String], items: &[Item]) -> Result<FormPayload> {
    match kind {
        FormKind::Intake => {
            let item = lookup_item(items, &values[0])?;
            Ok(FormPayload::Intake(IntakeFormInput {
                item_id: item.item_id,
                stock_quantity: parse_integer(&values[1], "quantity")?,
                expire_date: parse_optional_date(&values[2])?,
            }))
        }
        FormKind::NewItem => Ok(FormPayload::NewItem(NewItemFormInput {
            item_code: values[0].trim().to_owned(),
            item_name: values[1].trim().to_owned(),
            department: values[2].trim().to_owned(),
            kind: values[3].trim().to_owned(),
            reorder_level: parse_integer(&values[4], "reorder level")?,
            reorder_quantity: parse_integer(&values[5], "reorder quantity")?,
        })),
        FormKind::Sale => {
            let item = lookup_item(items, &values[0])?;
            Ok(FormPayload::Sale(SaleFormInput {
                item_id: item.item_id,
                quantity_sold: parse_integer(&values[1], "quantity sold")?,
                sale_date: parse_date(&values[2], "sale date")?,
            }))
        }
        FormKind::Register => {
            let role = UserRole::parse(values[2].trim())
                .ok_or_else(|| anyhow::anyhow!("role must be manager or employee"))?;
            Ok(FormPayload::Register(RegisterFormInput {
                credentials: CredentialsInput {
                    username: values[0].trim().to_owned(),
                    password: values[1].clone(),
                },
                role,
            }))
        }
    }
}

fn lookup_item<'a>(items: &'a [Item], code: &str) -> Result<&'a Item> {
    let code = code.trim();
    if code.is_empty() {
        bail!("item code is required -- enter a code and retry");
    }
    items
        .iter()
        .find(|item| item.item_code.eq_ignore_ascii_case(code))
        .ok_or_else(|| anyhow::anyhow!("unknown item code {code:?}"))
}

fn parse_integer(value: &str, label: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("{label} must be a whole number"))
}

fn parse_date(value: &str, label: &str) -> Result<Date> {
    Date::parse(value.trim(), DATE_FORMAT).with_context(|| format!("{label} must be YYYY-MM-DD"))
}

fn parse_optional_date(value: &str) -> Result<Option<Date>> {
    if value.trim().is_empty() {
        return Ok(None);
    }
    parse_date(value, "expire date").map(Some)
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('?') => view_data.help_visible = true,
        KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
            state.dispatch(AppCommand::NextTab);
            sync_form_with_tab(state, view_data);
            if let Err(error) = refresh_active_tab(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
            }
        }
        KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
            state.dispatch(AppCommand::PrevTab);
            sync_form_with_tab(state, view_data);
            if let Err(error) = refresh_active_tab(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
            }
        }
        KeyCode::Char('c') => {
            state.dispatch(AppCommand::OpenChat);
        }
        KeyCode::Char('r') => {
            view_data.sales.loaded_for = None;
            match refresh_active_tab(state, runtime, view_data) {
                Ok(()) => emit_status(state, view_data, internal_tx, "refreshed"),
                Err(error) => {
                    emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
                }
            }
        }
        KeyCode::Char('x') => {
            if let Err(error) = runtime.store_session(None) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("session remove failed: {error}"),
                );
            }
            view_data.session = None;
            view_data.login = LoginUiState::default();
            state.dispatch(AppCommand::Logout);
        }
        KeyCode::Char('/') if state.active_tab == TabKind::Inventory => {
            view_data.search_active = true;
        }
        KeyCode::Char(c @ '1'..='7') if state.active_tab == TabKind::Inventory => {
            let index = (c as usize) - ('1' as usize);
            view_data.table.toggle_sort(SortKey::ALL[index]);
            view_data.table_cursor = 0;
        }
        KeyCode::Char('j') | KeyCode::Down => move_cursor(state, view_data, runtime, 1),
        KeyCode::Char('k') | KeyCode::Up => move_cursor(state, view_data, runtime, -1),
        KeyCode::Char('a') if state.active_tab == TabKind::Sales => {
            view_data.form = Some(FormUiState::blank(FormKind::Sale));
            state.dispatch(AppCommand::OpenForm(FormKind::Sale));
        }
        KeyCode::Char('u') => {
            let is_manager = view_data
                .session
                .as_ref()
                .is_some_and(|session| session.role == UserRole::Manager);
            if is_manager {
                view_data.form = Some(FormUiState::blank(FormKind::Register));
                state.dispatch(AppCommand::OpenForm(FormKind::Register));
            } else {
                emit_status(state, view_data, internal_tx, "manager role required");
            }
        }
        KeyCode::Char('+') | KeyCode::Char('=') if state.active_tab == TabKind::Expiry => {
            view_data.expiry_days = view_data.expiry_days.saturating_add(1).min(90);
            reload_expiry(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('-') if state.active_tab == TabKind::Expiry => {
            view_data.expiry_days = view_data.expiry_days.saturating_sub(1).max(1);
            reload_expiry(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('+') | KeyCode::Char('=') if state.active_tab == TabKind::DeadStock => {
            view_data.dead_stock_months = view_data.dead_stock_months.saturating_add(1).min(24);
            reload_dead_stock(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('-') if state.active_tab == TabKind::DeadStock => {
            view_data.dead_stock_months = view_data.dead_stock_months.saturating_sub(1).max(1);
            reload_dead_stock(state, runtime, view_data, internal_tx);
        }
        _ => {}
    }
    false
}

/// Intake and NewItem tabs are forms; landing on them opens the form, leaving
/// them closes it.
fn sync_form_with_tab(state: &mut AppState, view_data: &mut ViewData) {
    match state.active_tab {
        TabKind::Intake => {
            view_data.form = Some(FormUiState::blank(FormKind::Intake));
            state.dispatch(AppCommand::OpenForm(FormKind::Intake));
        }
        TabKind::NewItem => {
            view_data.form = Some(FormUiState::blank(FormKind::NewItem));
            state.dispatch(AppCommand::OpenForm(FormKind::NewItem));
        }
        _ => {
            if matches!(state.mode, AppMode::Form(_)) {
                view_data.form = None;
                state.dispatch(AppCommand::ExitToNav);
            }
        }
    }
}

fn move_cursor<R: AppRuntime>(
    state: &mut AppState,
    view_data: &mut ViewData,
    runtime: &mut R,
    delta: isize,
) {
    match state.active_tab {
        TabKind::Inventory | TabKind::Restock => {
            let len = if state.active_tab == TabKind::Inventory {
                view_data.table.visible_rows().len()
            } else {
                view_data.table.restock_rows().len()
            };
            view_data.table_cursor = step_cursor(view_data.table_cursor, len, delta);
        }
        TabKind::Sales => {
            view_data.sales.cursor = step_cursor(view_data.sales.cursor, view_data.items.len(), delta);
            let _ = refresh_sales_selection(runtime, view_data);
        }
        TabKind::Items => {
            view_data.sales.cursor = step_cursor(view_data.sales.cursor, view_data.items.len(), delta);
        }
        _ => {}
    }
}

fn step_cursor(cursor: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = cursor as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

fn reload_expiry<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.load_near_expiry(view_data.expiry_days) {
        Ok(alerts) => view_data.near_expiry = alerts,
        Err(error) => emit_status(state, view_data, internal_tx, format!("load failed: {error}")),
    }
}

fn reload_dead_stock<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.load_dead_stock(view_data.dead_stock_months) {
        Ok(alerts) => view_data.dead_stock = alerts,
        Err(error) => emit_status(state, view_data, internal_tx, format!("load failed: {error}")),
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    if state.mode == AppMode::Login {
        render_login(frame, view_data);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab.label().to_owned())
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("stockly").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_tab {
        TabKind::Inventory => render_inventory_table(frame, layout[1], view_data, false),
        TabKind::Restock => render_inventory_table(frame, layout[1], view_data, true),
        TabKind::Items => {
            let body = Paragraph::new(render_items_text(view_data))
                .block(Block::default().borders(Borders::ALL).title("items"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::Sales => {
            let body = Paragraph::new(render_sales_text(view_data))
                .block(Block::default().borders(Borders::ALL).title("sales"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::Expiry => {
            let body = Paragraph::new(render_expiry_text(view_data))
                .block(Block::default().borders(Borders::ALL).title("expiry alerts"));
            frame.render_widget(body, layout[1]);
        }
        TabKind::DeadStock => {
            let body = Paragraph::new(render_dead_stock_text(view_data)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("dead stock alerts"),
            );
            frame.render_widget(body, layout[1]);
        }
        TabKind::Intake | TabKind::NewItem => {
            let body = Paragraph::new(String::new())
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(body, layout[1]);
        }
    }

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if let Some(form) = &view_data.form {
        let area = centered_rect(60, 55, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_form_overlay_text(form)).block(
            Block::default()
                .title(form_title(form.kind))
                .borders(Borders::ALL),
        );
        frame.render_widget(overlay, area);
    }

    if state.chat == ChatVisibility::Visible {
        let area = centered_rect(70, 55, frame.area());
        frame.render_widget(Clear, area);
        let chat = Paragraph::new(render_chat_overlay_text(&view_data.chat))
            .block(Block::default().title("assistant").borders(Borders::ALL));
        frame.render_widget(chat, area);
    }

    if view_data.help_visible {
        let area = centered_rect(75, 65, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_login(frame: &mut ratatui::Frame<'_>, view_data: &ViewData) {
    let area = centered_rect(50, 40, frame.area());
    let login = Paragraph::new(render_login_text(&view_data.login))
        .block(Block::default().title("stockly sign in").borders(Borders::ALL));
    frame.render_widget(login, area);
}

fn render_login_text(login: &LoginUiState) -> String {
    let mut lines = vec![
        format!(
            "{} username: {}",
            if login.field_index == 0 { ">" } else { " " },
            login.username,
        ),
        format!(
            "{} password: {}",
            if login.field_index == 1 { ">" } else { " " },
            "*".repeat(login.password.chars().count()),
        ),
        String::new(),
    ];
    if let Some(error) = &login.error {
        lines.push(error.clone());
        lines.push(String::new());
    }
    lines.push("tab switch | enter sign in | esc quit".to_owned());
    lines.join("\n")
}

fn render_inventory_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view_data: &ViewData,
    restock_only: bool,
) {
    let rows_source: Vec<&InventoryRecord> = if restock_only {
        view_data.table.restock_rows()
    } else {
        view_data.table.visible_rows()
    };

    let header_cells = SortKey::ALL
        .iter()
        .map(|key| {
            let mut label = key.label().to_owned();
            if !restock_only && view_data.table.sort().key == *key {
                let mark = match view_data.table.sort().direction {
                    stockly_app::SortDirection::Asc => "▲",
                    stockly_app::SortDirection::Desc => "▼",
                };
                label = format!("{label} {mark}");
            }
            Cell::from(label)
        })
        .collect::<Vec<Cell>>();
    let header = Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD));

    let rows = rows_source
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let expire = record
                .expire_date
                .map(|date| date.to_string())
                .unwrap_or_default();
            let row = Row::new(vec![
                Cell::from(record.item_code.clone()),
                Cell::from(record.product_name.clone()),
                Cell::from(record.department.clone()),
                Cell::from(record.kind.clone()),
                Cell::from(record.stock_quantity.to_string()),
                Cell::from(record.reorder_level.to_string()),
                Cell::from(expire),
            ]);
            if index == view_data.table_cursor {
                row.style(Style::default().fg(Color::Cyan))
            } else {
                row
            }
        })
        .collect::<Vec<Row>>();

    let title = if restock_only {
        format!("restock ({} below reorder level)", rows_source.len())
    } else if view_data.search_active || !view_data.table.search().is_empty() {
        format!("inventory | search: {}", view_data.table.search())
    } else {
        format!("inventory ({} rows)", rows_source.len())
    };

    let widths = [
        Constraint::Length(10),
        Constraint::Min(18),
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn render_items_text(view_data: &ViewData) -> String {
    if view_data.items.is_empty() {
        return "(no catalog items)".to_owned();
    }
    let mut lines = Vec::new();
    for (index, item) in view_data.items.iter().enumerate() {
        let marker = if index == view_data.sales.cursor { ">" } else { " " };
        lines.push(format!(
            "{marker} {} | {} | {} | {} | reorder at {} (order {})",
            item.item_code,
            item.item_name,
            item.department,
            item.kind,
            item.reorder_level,
            item.reorder_quantity_or_default(),
        ));
    }
    lines.join("\n")
}

fn render_sales_text(view_data: &ViewData) -> String {
    let Some(item) = view_data.items.get(view_data.sales.cursor) else {
        return "(no catalog items; add one first)".to_owned();
    };

    let mut lines = vec![format!("item: {} ({})", item.item_name, item.item_code)];
    lines.push(String::new());

    if view_data.sales.history.is_empty() {
        lines.push("(no recorded sales)".to_owned());
    } else {
        let values: Vec<i64> = view_data
            .sales
            .history
            .iter()
            .map(|point| point.quantity_sold)
            .collect();
        lines.push(format!("sold:     {}", sparkline(&values)));
        let months = view_data
            .sales
            .history
            .iter()
            .map(|point| format!("{}-{:02}", point.year, point.month))
            .collect::<Vec<String>>()
            .join(" ");
        lines.push(format!("months:   {months}"));
    }

    if !view_data.sales.forecast.is_empty() {
        let values: Vec<i64> = view_data
            .sales
            .forecast
            .iter()
            .map(|point| point.predicted_quantity.round() as i64)
            .collect();
        lines.push(format!("forecast: {}", sparkline(&values)));
    }

    lines.push(String::new());
    lines.push("j/k pick item | a record sale | r reload".to_owned());
    lines.join("\n")
}

fn render_expiry_text(view_data: &ViewData) -> String {
    let mut lines = vec![format!(
        "threshold: {} days (+/- adjust)",
        view_data.expiry_days
    )];
    lines.push(String::new());
    if view_data.near_expiry.is_empty() {
        lines.push("(nothing expiring soon)".to_owned());
    }
    for alert in &view_data.near_expiry {
        lines.push(format!(
            "{} | {} units | {} days left | discount {:.0}%",
            alert.product_name,
            alert.stock_quantity,
            alert.days_left,
            alert.recommended_discount * 100.0,
        ));
        if !alert.bundling_suggestion.is_empty() {
            lines.push(format!("  bundle: {}", alert.bundling_suggestion));
        }
        if !alert.loyalty_tip.is_empty() {
            lines.push(format!("  loyalty: {}", alert.loyalty_tip));
        }
    }
    lines.join("\n")
}

fn render_dead_stock_text(view_data: &ViewData) -> String {
    let mut lines = vec![format!(
        "lookback: {} months (+/- adjust)",
        view_data.dead_stock_months
    )];
    lines.push(String::new());
    if view_data.dead_stock.is_empty() {
        lines.push("(no dead stock)".to_owned());
    }
    for alert in &view_data.dead_stock {
        lines.push(format!(
            "{} | {} units on hand | {} recent sales",
            alert.item_name, alert.stock_quantity, alert.recent_sales,
        ));
        if !alert.recommendation.is_empty() {
            lines.push(format!("  {}", alert.recommendation));
        }
    }
    lines.join("\n")
}

fn render_form_overlay_text(form: &FormUiState) -> String {
    let labels = form_field_labels(form.kind);
    let mut lines = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        let marker = if index == form.field_index { ">" } else { " " };
        let value = if form.kind == FormKind::Register && index == 1 {
            "*".repeat(form.values[index].chars().count())
        } else {
            form.values[index].clone()
        };
        lines.push(format!("{marker} {label}: {value}"));
    }
    lines.push(String::new());
    lines.push("tab/arrows move | enter save | esc cancel".to_owned());
    lines.join("\n")
}

fn form_title(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Intake => "stock intake",
        FormKind::NewItem => "new item",
        FormKind::Sale => "record sale",
        FormKind::Register => "new user",
    }
}

fn render_chat_overlay_text(chat: &ChatUiState) -> String {
    let mut lines = Vec::new();
    if chat.log.is_awaiting() {
        lines.push("assistant is thinking…".to_owned());
        lines.push(String::new());
    }

    let messages = chat.log.messages();
    let keep = messages.len().saturating_sub(CHAT_VISIBLE_MESSAGES);
    for message in messages.iter().skip(keep) {
        let label = match message.role {
            ChatRole::User => "you",
            ChatRole::Bot => "bot",
        };
        match &message.content {
            MessageContent::Loading => lines.push(format!("{label}: …")),
            MessageContent::Text(text) => {
                let mut rendered = render_markdown_lines(text).into_iter();
                if let Some(first) = rendered.next() {
                    lines.push(format!("{label}: {first}"));
                }
                for rest in rendered {
                    lines.push(format!("     {rest}"));
                }
            }
            MessageContent::Error(error) => lines.push(format!("{label}: ! {error}")),
            MessageContent::ReportPrompt(prompt, form) => {
                lines.push(format!("{label}: {}", prompt.title));
                let option = prompt
                    .options
                    .get(form.option_index)
                    .map(String::as_str)
                    .unwrap_or("-");
                let month = prompt
                    .months
                    .get(form.month_index)
                    .map(String::as_str)
                    .unwrap_or("-");
                let focus_mark = |field: PromptField| {
                    if chat.prompt_focus
                        == Some(PromptFocus {
                            message_id: message.id,
                            field,
                        })
                    {
                        ">"
                    } else {
                        " "
                    }
                };
                lines.push(format!(
                    "    {} report: {option}   {} month: {month}",
                    focus_mark(PromptField::Option),
                    focus_mark(PromptField::Month),
                ));
                if form.generating {
                    lines.push("    generating…".to_owned());
                }
            }
        }
    }

    if messages.is_empty() {
        lines.push("Ask about stock, expiry, sales or reports.".to_owned());
    }

    lines.push(String::new());
    lines.push(format!("> {}", chat.input));
    lines.push("enter send | tab report form | esc close".to_owned());
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    match state.active_tab {
        TabKind::Inventory => {
            "/ search | 1-7 sort | j/k move | c chat | r reload | ? help | q quit".to_owned()
        }
        _ => format!(
            "{} | tab/h/l switch | c chat | r reload | ? help | q quit",
            signed_in_label(view_data),
        ),
    }
}

fn signed_in_label(view_data: &ViewData) -> String {
    match &view_data.session {
        Some(session) => format!("{} ({})", session.username, session.role.as_str()),
        None => "signed out".to_owned(),
    }
}

fn help_overlay_text() -> &'static str {
    "tab / h / l     switch tab\n\
     j / k           move selection\n\
     /               search inventory\n\
     1-7             sort by column (again to flip)\n\
     a               record a sale (sales tab)\n\
     u               add a user (manager only)\n\
     + / -           adjust alert threshold (expiry / dead stock tabs)\n\
     c               open the assistant\n\
     r               reload the active tab\n\
     x               sign out\n\
     q               quit\n\
     \n\
     any key closes this help"
}

/// Scaled bar per value, tallest glyph for the max.
fn sparkline(values: &[i64]) -> String {
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    values
        .iter()
        .map(|value| {
            let clamped = (*value).max(0);
            let index = (clamped * (SPARK_GLYPHS.len() as i64 - 1)) / max;
            SPARK_GLYPHS[index.clamp(0, SPARK_GLYPHS.len() as i64 - 1) as usize]
        })
        .collect()
}

/// Minimal markdown for bot replies: headings, bullets, emphasis and inline
/// code collapse to plain terminal text.
fn render_markdown_lines(input: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in input.lines() {
        let trimmed = raw_line.trim_end();
        if let Some(heading) = strip_heading(trimmed) {
            lines.push(strip_inline_markup(heading).to_uppercase());
        } else if let Some(item) = trimmed
            .trim_start()
            .strip_prefix("- ")
            .or_else(|| trimmed.trim_start().strip_prefix("* "))
        {
            lines.push(format!("• {}", strip_inline_markup(item)));
        } else {
            lines.push(strip_inline_markup(trimmed));
        }
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn strip_heading(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let stripped = trimmed.trim_start_matches('#');
    if stripped.len() < trimmed.len() {
        Some(stripped.trim_start())
    } else {
        None
    }
}

fn strip_inline_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' | '_' | '`' => {
                // Collapse doubled markers too.
                while chars.peek() == Some(&c) {
                    chars.next();
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
