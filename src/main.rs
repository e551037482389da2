mod app;
mod batch;
mod config;
mod core;
mod models;
mod system;
mod ui;
mod utils;

use crate::core::actions::{find_action, Action};
use anyhow::Context;
use app::App;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use models::OperationRequest;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};
use ui::{
    ArchiveTreeView, CommandBar, LayoutMode, PathPrompt, ProgressPanel, StatusBar, Theme,
    WarningScreen,
};
use utils::{logging, path_display::truncate_path};

/// 작업 중 이벤트 폴링 간격 (진행률 갱신)
const BUSY_POLL: Duration = Duration::from_millis(30);
const IDLE_POLL: Duration = Duration::from_millis(100);

/// Compress folders to ZIP, extract and preview ZIP archives
#[derive(Parser, Debug)]
#[command(name = "zipper", version, about, long_about = None)]
struct Cli {
    /// Run the command without the interactive UI
    #[arg(long)]
    batch: bool,

    /// Configuration file (default: $ZIPPER_CONFIG or <config dir>/zipper/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Compress a folder into <folder>.zip next to it
    Compress {
        folder: PathBuf,
        /// Archive to write instead of <folder>.zip
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Extract an archive into a sibling folder
    Extract {
        archive: PathBuf,
        /// Folder to extract into instead of the archive name without extension
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
    /// Show the entries of an archive
    Preview { archive: PathBuf },
}

impl Command {
    /// 압축/해제 명령이면 작업 요청으로 변환
    fn request(&self) -> Option<OperationRequest> {
        let (request, output) = match self {
            Command::Compress { folder, output } => (OperationRequest::compress(folder), output),
            Command::Extract { archive, output } => (OperationRequest::extract(archive), output),
            Command::Preview { .. } => return None,
        };
        Some(match output {
            Some(dest) => request.with_destination(dest),
            None => request,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let log_path = logging::init(&config);
    info!(log_file = ?log_path, batch = cli.batch, "zipper started");

    if cli.batch {
        let command = cli
            .command
            .context("--batch needs a command: compress, extract or preview")?;
        return run_batch(&config, command);
    }
    run_interactive(config, cli.command)
}

fn run_batch(config: &Config, command: Command) -> anyhow::Result<()> {
    match (command.request(), command) {
        (Some(request), _) => {
            let summary = batch::run_with_progress(config, request)?;
            println!("{}", batch::describe(&summary));
        }
        (None, Command::Preview { archive }) => {
            let metadata = batch::load_metadata(config, &archive)?;
            batch::print_listing(&metadata, &mut io::stdout().lock())?;
        }
        (None, _) => {}
    }
    Ok(())
}

fn run_interactive(config: Config, command: Option<Command>) -> anyhow::Result<()> {
    let mut app = App::new(config);
    match command.map(|command| (command.request(), command)) {
        Some((Some(request), _)) => app.start_operation(request),
        Some((None, Command::Preview { archive })) => app.start_preview(archive),
        _ => {}
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| {
            let size = f.area();
            app.layout.update(size);

            match app.layout.mode() {
                LayoutMode::TooSmall => {
                    let (width, height) = app.layout.terminal_size();
                    let warning = WarningScreen::new()
                        .current_size(width, height)
                        .theme(&app.theme);
                    f.render_widget(warning, size);
                }
                LayoutMode::Normal => render_main_ui(f, app),
            }
        })?;

        let poll_timeout = if app.is_processing() {
            BUSY_POLL
        } else {
            IDLE_POLL
        };

        // 작업 중에도 Esc(취소) 처리 가능
        if event::poll(poll_timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key.modifiers, key.code);
                }
            }
        }

        app.process_events();

        if app.should_quit {
            break;
        }
    }

    info!("zipper exiting");
    Ok(())
}

fn handle_key(app: &mut App, modifiers: KeyModifiers, code: KeyCode) {
    // 경고 화면에서는 종료만 허용
    if app.layout.is_too_small() {
        if find_action(modifiers, code) == Some(Action::Quit) {
            app.quit();
        }
        return;
    }

    if app.prompt.is_some() {
        app.handle_prompt_key(modifiers, code);
        return;
    }

    if let Some(action) = find_action(modifiers, code) {
        app.execute_action(action);
    }
}

fn render_main_ui(f: &mut Frame<'_>, app: &App) {
    let areas = app.layout.areas();
    let theme = &app.theme;

    render_title_bar(f, app, theme, areas.title_bar);
    render_preview(f, app, theme, areas.preview);

    let progress = app.progress.as_ref();
    let detail = match progress {
        Some(p) if p.cancel_requested => format!("{} (cancelling)", p.detail),
        Some(p) => p.detail.clone(),
        None => String::new(),
    };
    let progress_panel = ProgressPanel::new()
        .operation(progress.map(|p| p.kind.name()))
        .percent(progress.map_or(0, |p| p.percent))
        .detail(&detail)
        .theme(theme);
    f.render_widget(progress_panel, areas.progress);

    let summary = app.preview_summary();
    let status_bar = StatusBar::new()
        .message(&app.status.text, app.status.level)
        .summary(&summary)
        .theme(theme);
    f.render_widget(status_bar, areas.status_bar);

    let command_bar = CommandBar::new().busy(app.is_operation_busy()).theme(theme);
    f.render_widget(command_bar, areas.command_bar);

    if let Some(prompt) = &app.prompt {
        let popup = PathPrompt::new(
            prompt.purpose.title(),
            prompt.input.value(),
            prompt.input.cursor(),
        )
        .prompt(prompt.purpose.label())
        .theme(theme);
        f.render_widget(popup, f.area());
    }
}

fn render_title_bar(f: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let style = Style::default()
        .bg(theme.title_bar_bg.to_color())
        .fg(theme.title_bar_fg.to_color());

    let mut spans = vec![Span::styled(
        " zipper ",
        style.add_modifier(Modifier::BOLD),
    )];
    if let Some(preview) = &app.preview {
        let max_width = (area.width as usize).saturating_sub(10);
        spans.push(Span::styled(
            truncate_path(&preview.archive_path, max_width),
            style,
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).style(style), area);
}

fn render_preview(f: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let title = app
        .preview
        .as_ref()
        .and_then(|p| p.archive_path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Preview".to_string());
    let view = ArchiveTreeView::new().title(&title).theme(theme);

    let view = match &app.preview {
        Some(preview) => view
            .tree(&preview.tree, &preview.rows)
            .selected(preview.selected)
            .scroll_offset(preview.scroll_offset),
        None if app.preview_loading.is_some() => view.placeholder("Loading..."),
        None => view.placeholder("Press p to preview an archive"),
    };

    f.render_widget(view, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_output_option_sets_destination() {
        let cli = parse(&["zipper", "compress", "docs", "-o", "out/docs.zip"]);
        let request = cli.command.and_then(|c| c.request()).unwrap();
        assert_eq!(request.source, PathBuf::from("docs"));
        assert_eq!(request.destination, Some(PathBuf::from("out/docs.zip")));

        let cli = parse(&["zipper", "--batch", "extract", "a.zip", "--output", "dest"]);
        assert!(cli.batch);
        let request = cli.command.and_then(|c| c.request()).unwrap();
        assert_eq!(request.resolved_destination(), PathBuf::from("dest"));
    }

    #[test]
    fn test_default_destination_without_output() {
        let cli = parse(&["zipper", "extract", "/data/a.zip"]);
        let request = cli.command.and_then(|c| c.request()).unwrap();
        assert_eq!(request.destination, None);
        assert_eq!(request.resolved_destination(), PathBuf::from("/data/a"));
    }

    #[test]
    fn test_preview_is_not_an_operation() {
        let cli = parse(&["zipper", "preview", "a.zip"]);
        assert!(cli.command.and_then(|c| c.request()).is_none());
    }
}
