mod backend;
mod commands;
mod runtime;
mod ui;

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event as CEvent, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use llmtop_core::config::MonitorConfig;
use llmtop_core::consumer::{Consumer, SourceUpdate};
use llmtop_core::model::*;
use llmtop_core::notify::{Notifier, Severity};
use llmtop_core::scheduler::Scheduler;
use llmtop_core::source::DataSource;

use backend::LiveDataSource;
use runtime::{EngineCommand, EngineDriver};
use ui::styles;

/// Format a SystemTime as HH:MM:SS for log and gauge stamps
fn format_timestamp(time: SystemTime) -> String {
    match time.duration_since(SystemTime::UNIX_EPOCH) {
        Ok(duration) => {
            let secs = duration.as_secs();
            let hours = (secs / 3600) % 24;
            let minutes = (secs / 60) % 60;
            let seconds = secs % 60;
            format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
        }
        Err(_) => "??:??:??".to_string(),
    }
}

#[derive(Parser)]
#[command(name = "llmtop")]
#[command(about = "Live dashboard for a local model-serving backend", long_about = None)]
struct Cli {
    /// Config file path (default: search llmtop.yaml upward from the cwd)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the model listing and host usage once, then exit
    List,
    /// Run the interactive dashboard (the default)
    Tui,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // RUST_LOG opts in to stderr diagnostics; without it they are discarded
    // rather than painted over the dashboard.
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::sink)
            .init();
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = MonitorConfig::load_or_default(cli.config.as_deref());

    match cli.command {
        Some(Commands::List) => {
            if let Err(e) = commands::run_list(&config).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Commands::Tui) | None => run_tui(config).await,
    }
}

// ---------------------------------------------------------------------------
// Engine plumbing: everything the engine pushes at the UI flows through one
// channel, so the render loop stays the only owner of view state.

enum UiEvent {
    Source(SourceUpdate),
    Selection(Option<String>),
    Notice { message: String, severity: Severity },
}

struct UiEventConsumer {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl Consumer for UiEventConsumer {
    fn on_source_changed(&mut self, update: &SourceUpdate) {
        let _ = self.tx.send(UiEvent::Source(update.clone()));
    }

    fn on_selection_changed(&mut self, id: Option<&str>) {
        let _ = self.tx.send(UiEvent::Selection(id.map(str::to_string)));
    }
}

struct UiNotifier {
    tx: mpsc::UnboundedSender<UiEvent>,
}

impl Notifier for UiNotifier {
    fn notify(&mut self, message: &str, severity: Severity) {
        let _ = self.tx.send(UiEvent::Notice {
            message: message.to_string(),
            severity,
        });
    }
}

async fn run_tui(config: MonitorConfig) -> io::Result<()> {
    let source = match LiveDataSource::new(&config.backend) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    let source: Arc<dyn DataSource> = Arc::new(source);

    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (command_tx, command_rx) = mpsc::channel::<EngineCommand>(100);

    let mut scheduler = Scheduler::new(&config);
    scheduler.register_consumer(Box::new(UiEventConsumer { tx: ui_tx.clone() }));
    scheduler.set_notifier(Box::new(UiNotifier { tx: ui_tx }));

    let driver = EngineDriver::new(scheduler, source, config.retry_policy());
    let driver_task = tokio::spawn(driver.run(command_rx));

    let mut dashboard = Dashboard::new(&config);
    let mut terminal = setup_terminal()?;
    let result = tui_loop(&mut terminal, &mut dashboard, &mut ui_rx, &command_tx).await;
    restore_terminal(terminal)?;

    let _ = command_tx.send(EngineCommand::Shutdown).await;
    let _ = driver_task.await;
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// View state

/// How long a notice stays in the footer before the key hints come back.
const NOTICE_TTL: Duration = Duration::from_secs(5);

struct Notice {
    message: String,
    severity: Severity,
    shown_at: Instant,
}

struct DetailsView {
    id: ModelId,
    descriptor: Option<ModelDescriptor>,
}

/// Everything the render pass reads. Fed exclusively from `UiEvent`s and
/// keystrokes; the engine owns the real state.
struct Dashboard {
    models: Vec<ModelDescriptor>,
    perf: BTreeMap<ModelId, PerfSample>,
    usage: Option<ResourceSnapshot>,
    peaks: PeakUsage,
    selected_id: Option<ModelId>,
    details: Option<DetailsView>,
    logs: Vec<LogLine>,
    log_cap: usize,
    notice: Option<Notice>,
    show_help: bool,
    cursor: usize,
    list_state: ListState,
    started_at: Instant,
    backend_label: String,
}

impl Dashboard {
    fn new(config: &MonitorConfig) -> Self {
        Self {
            models: Vec::new(),
            perf: BTreeMap::new(),
            usage: None,
            peaks: PeakUsage::default(),
            selected_id: None,
            details: None,
            logs: Vec::new(),
            log_cap: config.logs.history_cap.max(1),
            notice: None,
            show_help: false,
            cursor: 0,
            list_state: ListState::default(),
            started_at: Instant::now(),
            backend_label: config.backend.url.clone(),
        }
    }

    fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Source(SourceUpdate::Models(models)) => {
                self.models = models;
                if self.models.is_empty() {
                    self.cursor = 0;
                } else if self.cursor >= self.models.len() {
                    self.cursor = self.models.len() - 1;
                }
            }
            UiEvent::Source(SourceUpdate::System { snapshot, peaks }) => {
                self.usage = Some(snapshot);
                self.peaks = peaks;
            }
            UiEvent::Source(SourceUpdate::Performance(samples)) => {
                self.perf = samples.into_iter().map(|s| (s.id.clone(), s)).collect();
            }
            UiEvent::Source(SourceUpdate::Details { id, descriptor }) => {
                self.details = Some(DetailsView { id, descriptor });
            }
            UiEvent::Source(SourceUpdate::Logs { lines, .. }) => {
                self.logs.extend(lines);
                if self.logs.len() > self.log_cap {
                    let excess = self.logs.len() - self.log_cap;
                    self.logs.drain(..excess);
                }
            }
            UiEvent::Selection(id) => {
                // Fresh view for the new selection; its data follows shortly
                self.selected_id = id;
                self.details = None;
                self.logs.clear();
            }
            UiEvent::Notice { message, severity } => {
                self.notice = Some(Notice {
                    message,
                    severity,
                    shown_at: Instant::now(),
                });
            }
        }
    }

    fn expire_notice(&mut self) {
        if let Some(notice) = &self.notice {
            if notice.shown_at.elapsed() >= NOTICE_TTL {
                self.notice = None;
            }
        }
    }

    /// Move the highlight and return the id now under it.
    fn move_cursor(&mut self, delta: i64) -> Option<ModelId> {
        if self.models.is_empty() {
            return None;
        }
        let last = (self.models.len() - 1) as i64;
        self.cursor = (self.cursor as i64 + delta).clamp(0, last) as usize;
        self.models.get(self.cursor).map(|m| m.id.clone())
    }

    fn highlighted(&self) -> Option<ModelId> {
        self.models.get(self.cursor).map(|m| m.id.clone())
    }
}

// ---------------------------------------------------------------------------
// Rendering helpers

/// ASCII gauge: `CPU  [████░░░░░░]  42.0%  peak 80.5%`
fn usage_gauge(label: &str, pct: f32, peak: f32, width: usize) -> Line<'static> {
    let filled = (((pct / 100.0) * width as f32).round() as usize).min(width);
    let bar: String = "█".repeat(filled) + &"░".repeat(width - filled);
    Line::from(vec![
        Span::styled(format!(" {:<5}", label), styles::text_dim()),
        Span::raw("["),
        Span::styled(bar, styles::usage(pct)),
        Span::raw("] "),
        Span::styled(format!("{:5.1}%", pct), styles::usage(pct)),
        Span::styled(format!("  peak {:5.1}%", peak), styles::text_muted()),
    ])
}

fn detail_row(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<9}", label), styles::text_dim()),
        Span::styled(value.to_string(), styles::text()),
    ])
}

fn fit_title(s: &str, width: u16) -> String {
    // width includes borders; keep safe margin
    let max = width.saturating_sub(4) as usize;
    if max == 0 {
        return "".into();
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return s.to_string();
    }
    if max <= 1 {
        return "…".into();
    }
    let mut out: String = chars.into_iter().take(max - 1).collect();
    out.push('…');
    out
}

// ---------------------------------------------------------------------------
// Main loop

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    dashboard: &mut Dashboard,
    ui_rx: &mut mpsc::UnboundedReceiver<UiEvent>,
    command_tx: &mpsc::Sender<EngineCommand>,
) -> io::Result<()> {
    loop {
        while let Ok(event) = ui_rx.try_recv() {
            dashboard.apply(event);
        }
        dashboard.expire_notice();

        terminal.draw(|f| {
            let area = f.area();

            let outer = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(0),
                    Constraint::Length(1),
                ])
                .split(area);

            // ---------------- Top bar ----------------
            let uptime_secs = dashboard.started_at.elapsed().as_secs();
            let uptime_str = format!(
                "{:02}:{:02}:{:02}",
                uptime_secs / 3600,
                (uptime_secs / 60) % 60,
                uptime_secs % 60
            );
            let (cpu, ram) = dashboard
                .usage
                .map(|s| (s.usage.cpu_percent, s.usage.ram_percent))
                .unwrap_or((0.0, 0.0));

            let top_bar = Line::from(vec![
                Span::styled(" llmtop ", styles::accent_bold()),
                Span::styled(dashboard.backend_label.clone(), styles::text_muted()),
                Span::raw("  "),
                Span::styled(
                    format!("{} models", dashboard.models.len()),
                    styles::success(),
                ),
                Span::raw("    "),
                Span::styled(format!("CPU {:.0}%", cpu), styles::usage(cpu)),
                Span::raw("  "),
                Span::styled(format!("RAM {:.0}%", ram), styles::usage(ram)),
                Span::raw("  "),
                Span::styled(format!("⏱ {}", uptime_str), styles::text_muted()),
            ]);
            f.render_widget(Paragraph::new(top_bar), outer[0]);

            let main = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
                .split(outer[1]);

            let left = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(8), Constraint::Length(7)])
                .split(main[0]);

            let right = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(8),
                    Constraint::Length(9),
                    Constraint::Min(4),
                ])
                .split(main[1]);

            // ---------------- Models ----------------
            let items: Vec<ListItem> = if dashboard.models.is_empty() {
                vec![ListItem::new(Line::from(Span::styled(
                    " no models detected",
                    styles::text_muted(),
                )))]
            } else {
                dashboard
                    .models
                    .iter()
                    .map(|m| {
                        let name_style = if dashboard.selected_id.as_deref() == Some(&m.id) {
                            styles::accent()
                        } else {
                            styles::text()
                        };
                        ListItem::new(Line::from(vec![
                            Span::styled(m.id.clone(), name_style),
                            Span::styled(
                                format!("  {} {} {}", m.family, m.parameter_scale, m.quantization),
                                styles::text_dim(),
                            ),
                            Span::styled(
                                format!("  {}", format_bytes(m.size_bytes)),
                                styles::text_muted(),
                            ),
                        ]))
                    })
                    .collect()
            };
            let total_bytes: u64 = dashboard.models.iter().map(|m| m.size_bytes).sum();
            let models_title = if dashboard.models.is_empty() {
                "Models".to_string()
            } else {
                format!(
                    "Models ({}, {})",
                    dashboard.models.len(),
                    format_bytes(total_bytes)
                )
            };
            let models_list = List::new(items)
                .block(
                    Block::default()
                        .title(fit_title(&models_title, left[0].width))
                        .borders(Borders::ALL)
                        .border_style(styles::border_focused()),
                )
                .highlight_style(styles::selection())
                .highlight_symbol("▶ ");
            if dashboard.models.is_empty() {
                dashboard.list_state.select(None);
            } else {
                dashboard.list_state.select(Some(dashboard.cursor));
            }
            f.render_stateful_widget(models_list, left[0], &mut dashboard.list_state);

            // ---------------- System gauges ----------------
            let system_lines: Vec<Line> = match dashboard.usage {
                Some(snapshot) => {
                    let u = snapshot.usage;
                    let p = dashboard.peaks;
                    vec![
                        usage_gauge("CPU", u.cpu_percent, p.cpu_percent, 14),
                        usage_gauge("RAM", u.ram_percent, p.ram_percent, 14),
                        usage_gauge("GPU", u.gpu_percent, p.gpu_percent, 14),
                        Line::from(vec![
                            Span::styled(" VRAM ", styles::text_dim()),
                            Span::styled(format_bytes(u.vram_used_bytes), styles::text()),
                            Span::styled(
                                format!("  peak {}", format_bytes(p.vram_used_bytes)),
                                styles::text_muted(),
                            ),
                        ]),
                        Line::from(Span::styled(
                            format!(" sampled {}", format_timestamp(snapshot.captured_at)),
                            styles::text_muted(),
                        )),
                    ]
                }
                None => vec![Line::from(Span::styled(
                    " waiting for telemetry...",
                    styles::text_muted(),
                ))],
            };
            f.render_widget(
                Paragraph::new(system_lines).block(
                    Block::default()
                        .title("System")
                        .borders(Borders::ALL)
                        .border_style(styles::border_subtle()),
                ),
                left[1],
            );

            // ---------------- Performance ----------------
            let perf_lines: Vec<Line> = if dashboard.models.is_empty() {
                vec![Line::from(Span::styled(
                    " nothing to estimate",
                    styles::text_muted(),
                ))]
            } else {
                dashboard
                    .models
                    .iter()
                    .map(|m| match dashboard.perf.get(&m.id) {
                        Some(s) => {
                            let mut spans = vec![
                                Span::styled(format!(" {:<18.18}", m.id), styles::text()),
                                Span::styled(
                                    format!("{:>4} tok/s", s.throughput_tps),
                                    styles::success(),
                                ),
                                Span::styled(format!("  {:>4}ms", s.latency_ms), styles::warn()),
                                Span::styled(
                                    format!("  {:>8}", format_bytes(s.memory_bytes)),
                                    styles::text_dim(),
                                ),
                            ];
                            if let Some(load) = s.load_percent {
                                spans.push(Span::styled(
                                    format!("  {:4.1}%", load),
                                    styles::usage(load),
                                ));
                            }
                            Line::from(spans)
                        }
                        None => Line::from(vec![
                            Span::styled(format!(" {:<18.18}", m.id), styles::text()),
                            Span::styled("pending", styles::text_muted()),
                        ]),
                    })
                    .collect()
            };
            f.render_widget(
                Paragraph::new(perf_lines).block(
                    Block::default()
                        .title("Performance")
                        .borders(Borders::ALL)
                        .border_style(styles::border_subtle()),
                ),
                right[0],
            );

            // ---------------- Details ----------------
            let details_title = match &dashboard.selected_id {
                Some(id) => format!("Details - {}", id),
                None => "Details".to_string(),
            };
            let detail_lines: Vec<Line> = match (&dashboard.selected_id, &dashboard.details) {
                (Some(_), Some(view)) => match &view.descriptor {
                    Some(d) => vec![
                        detail_row("Family", &d.family),
                        detail_row("Scale", &d.parameter_scale),
                        detail_row("Quant", &d.quantization),
                        detail_row("Format", &d.format),
                        detail_row("Size", &format_bytes(d.size_bytes)),
                        detail_row("Digest", &d.digest),
                        detail_row("Modified", &format_modified_at(&d.modified_at)),
                    ],
                    None => vec![Line::from(Span::styled(
                        " no longer in the backend listing",
                        styles::warn(),
                    ))],
                },
                (Some(_), None) => vec![Line::from(Span::styled(
                    " fetching...",
                    styles::text_muted(),
                ))],
                (None, _) => vec![Line::from(Span::styled(
                    " select a model with j/k",
                    styles::text_muted(),
                ))],
            };
            f.render_widget(
                Paragraph::new(detail_lines).block(
                    Block::default()
                        .title(fit_title(&details_title, right[1].width))
                        .borders(Borders::ALL)
                        .border_style(styles::border_subtle()),
                ),
                right[1],
            );

            // ---------------- Logs ----------------
            let logs_title = match &dashboard.selected_id {
                Some(id) => format!("Logs - {}", id),
                None => "Logs".to_string(),
            };
            let visible = right[2].height.saturating_sub(2) as usize;
            let start = dashboard.logs.len().saturating_sub(visible);
            let log_lines: Vec<Line> = if dashboard.selected_id.is_none() {
                vec![Line::from(Span::styled(
                    " logs follow the selected model",
                    styles::text_muted(),
                ))]
            } else {
                dashboard.logs[start..]
                    .iter()
                    .map(|l| {
                        Line::from(vec![
                            Span::styled(
                                format!("{} ", format_timestamp(l.seen_at)),
                                styles::text_muted(),
                            ),
                            Span::styled(l.text.clone(), styles::level(l.level)),
                        ])
                    })
                    .collect()
            };
            f.render_widget(
                Paragraph::new(log_lines).block(
                    Block::default()
                        .title(fit_title(&logs_title, right[2].width))
                        .borders(Borders::ALL)
                        .border_style(styles::border_subtle()),
                ),
                right[2],
            );

            // ---------------- Footer ----------------
            let footer = match &dashboard.notice {
                Some(notice) => Line::from(vec![
                    Span::styled(
                        format!(" {} ", styles::severity_icon(notice.severity)),
                        styles::severity(notice.severity),
                    ),
                    Span::styled(notice.message.clone(), styles::severity(notice.severity)),
                ]),
                None => Line::from(vec![
                    Span::styled(" q ", styles::key_hint()),
                    Span::styled("quit  ", styles::text_dim()),
                    Span::styled("j/k ", styles::key_hint()),
                    Span::styled("select  ", styles::text_dim()),
                    Span::styled("Enter ", styles::key_hint()),
                    Span::styled("re-pull  ", styles::text_dim()),
                    Span::styled("r ", styles::key_hint()),
                    Span::styled("refresh  ", styles::text_dim()),
                    Span::styled("c ", styles::key_hint()),
                    Span::styled("clear logs  ", styles::text_dim()),
                    Span::styled("? ", styles::key_hint()),
                    Span::styled("help", styles::text_dim()),
                ]),
            };
            f.render_widget(Paragraph::new(footer), outer[2]);

            // ---------------- Help overlay ----------------
            if dashboard.show_help {
                let help_width = 44u16.min(area.width.saturating_sub(4));
                let help_height = 14u16.min(area.height.saturating_sub(4));
                let help_rect = Rect {
                    x: (area.width.saturating_sub(help_width)) / 2,
                    y: (area.height.saturating_sub(help_height)) / 2,
                    width: help_width,
                    height: help_height,
                };

                f.render_widget(Clear, help_rect);

                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(styles::border_focused())
                    .title(" Help - Press ? or Esc to close ");
                let inner = block.inner(help_rect);
                f.render_widget(block, help_rect);

                let help_lines = vec![
                    Line::from(Span::styled("NAVIGATION", styles::title())),
                    Line::from(vec![
                        Span::styled("  j/k ↑↓ ", styles::key_hint()),
                        Span::styled("Move selection", styles::text()),
                    ]),
                    Line::from(vec![
                        Span::styled("  Enter  ", styles::key_hint()),
                        Span::styled("Re-pull the highlighted model", styles::text()),
                    ]),
                    Line::from(""),
                    Line::from(Span::styled("ACTIONS", styles::title())),
                    Line::from(vec![
                        Span::styled("  r      ", styles::key_hint()),
                        Span::styled("Refresh every source now", styles::text()),
                    ]),
                    Line::from(vec![
                        Span::styled("  c      ", styles::key_hint()),
                        Span::styled("Clear the log pane", styles::text()),
                    ]),
                    Line::from(""),
                    Line::from(Span::styled("GENERAL", styles::title())),
                    Line::from(vec![
                        Span::styled("  ?      ", styles::key_hint()),
                        Span::styled("Toggle this help", styles::text()),
                    ]),
                    Line::from(vec![
                        Span::styled("  q      ", styles::key_hint()),
                        Span::styled("Quit", styles::text()),
                    ]),
                ];
                f.render_widget(Paragraph::new(help_lines), inner);
            }
        })?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = event::read()?;
        let CEvent::Key(KeyEvent {
            code, modifiers, ..
        }) = ev
        else {
            continue;
        };

        match (code, modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => break,
            (KeyCode::Char('?'), _) => {
                dashboard.show_help = !dashboard.show_help;
            }
            (KeyCode::Esc, _) => {
                dashboard.show_help = false;
            }
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => {
                if let Some(id) = dashboard.move_cursor(-1) {
                    let _ = command_tx.send(EngineCommand::Select { id }).await;
                }
            }
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => {
                if let Some(id) = dashboard.move_cursor(1) {
                    let _ = command_tx.send(EngineCommand::Select { id }).await;
                }
            }
            (KeyCode::Enter, _) => {
                if let Some(id) = dashboard.highlighted() {
                    let _ = command_tx.send(EngineCommand::Select { id }).await;
                }
            }
            (KeyCode::Char('r'), _) => {
                let _ = command_tx.send(EngineCommand::Refresh).await;
            }
            (KeyCode::Char('c'), _) => {
                dashboard.logs.clear();
                let _ = command_tx.send(EngineCommand::ClearLogs).await;
            }
            _ => {}
        }
    }

    Ok(())
}
