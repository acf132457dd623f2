mod app;
mod layout;
mod settings;

use anyhow::Result;
use app::App;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use env_logger::{Builder, Env, Target};
use findmark_config::Config;
use findmark_engine::{SearchController, SearchSettings, io, page};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
    time::{Duration, Instant},
};

/// Poll interval while no scroll is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Default, PartialEq)]
struct Args {
    pages_path: Option<PathBuf>,
    find: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--find" => {
                let query = iter.next().ok_or("--find needs a query")?;
                parsed.find = Some(query.clone());
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            path if parsed.pages_path.is_none() => parsed.pages_path = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument {extra}")),
        }
    }
    Ok(parsed)
}

fn usage(program: &str) -> String {
    format!("Usage: {program} [pages-folder-path] [--find <query>]")
}

/// Log to a file; the terminal belongs to the UI.
fn init_logging() {
    let log_path = env::var_os("FINDMARK_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("findmark.log"));

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    init_logging();
    log::info!("findmark starting up");

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("findmark");
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(program));
            process::exit(2);
        }
    };

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };
    let search_config = config
        .as_ref()
        .map(|c| c.search.clone())
        .unwrap_or_default();

    let (pages_path, from_config) = match (cli.pages_path, config) {
        (Some(path), _) => (path, false),
        (None, Some(config)) => (config.pages_path, true),
        (None, None) => {
            eprintln!("Error: No pages path provided and no config file found");
            eprintln!("{}", usage(program));
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_pages_dir(&pages_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Pages path '{}'{} is invalid: {e}",
            pages_path.display(),
            source
        );
        process::exit(1);
    }

    let settings = settings::search_settings(&search_config);

    if let Some(query) = cli.find {
        return print_matches(&pages_path, settings, &query);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = App::new(pages_path, settings).and_then(|mut app| run_app(&mut terminal, &mut app));

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Search every page for `query` and print the highlighted content of each
/// page that matched.
fn print_matches(pages_path: &Path, settings: SearchSettings, query: &str) -> Result<()> {
    let site = io::build_site_map(pages_path)?;
    let mut search = SearchController::new(settings);
    let mut total = 0;

    for entry in site.pages() {
        let mut view = io::load_page_view(entry, pages_path)?;
        view.set_search_text(query);
        search.set_query(view.tree_mut(), query);

        let count = search.match_count();
        if count > 0 {
            println!("<!-- {} ({count}) -->", entry.route());
            println!("{}", page::node_to_html(view.tree(), view.content()));
            total += count;
        }
        search.on_navigate(view.tree_mut());
    }

    eprintln!("{total} matches in {} pages", site.len());
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Layout is current now, so pending scrolls can land
        if app.run_due_scrolls(Instant::now()) > 0 {
            continue;
        }

        let timeout = app
            .next_scroll_due()
            .map(|due| due.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);
        if !event::poll(timeout)? {
            continue;
        }

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key)
        {
            return Ok(());
        }
    }
}

/// Returns true when the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return true;
    }

    if app.search_open() {
        match key.code {
            KeyCode::Esc => app.escape(),
            KeyCode::Enter => app.close_search(),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Char('u') if ctrl => app.clear_input(),
            KeyCode::Char(c) => app.type_char(c),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('/') => app.open_search(),
        KeyCode::Esc => app.clear_input(),
        KeyCode::Down | KeyCode::Char('j') => app.next_page(),
        KeyCode::Up | KeyCode::Char('k') => app.previous_page(),
        KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_content(10),
        KeyCode::PageUp => app.scroll_content(-10),
        _ => {}
    }
    false
}

/// Display columns taken by the typed query.
fn cursor_offset(input: &str) -> u16 {
    u16::try_from(Line::raw(input).width()).unwrap_or(u16::MAX)
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    // Search bar
    let bar_style = if app.search_open() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let bar_text = if app.search_open() || !app.input().is_empty() {
        Line::from(vec![Span::raw("/"), Span::raw(app.input().to_string())])
    } else {
        Line::from(Span::styled(
            "Press / to search this page",
            Style::default().fg(Color::DarkGray),
        ))
    };
    let bar = Paragraph::new(bar_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(bar_style)
            .title("Search"),
    );
    f.render_widget(bar, rows[0]);
    if app.search_open() {
        let x = rows[0].x.saturating_add(2).saturating_add(cursor_offset(app.input()));
        f.set_cursor_position(Position::new(x, rows[0].y + 1));
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[1]);

    // Page list panel
    let page_items: Vec<ListItem> = app
        .site()
        .pages()
        .map(|p| ListItem::new(Line::from(p.route().to_string())))
        .collect();
    let pages_list = List::new(page_items)
        .block(Block::default().borders(Borders::ALL).title("Pages"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(pages_list, columns[0], &mut app.page_list_state);

    // Content panel
    let height = columns[1].height.saturating_sub(2) as usize;
    app.sync_layout(height);

    let content_lines: Vec<Line> = if let Some(error) = app.load_error() {
        vec![Line::from(error.to_string())]
    } else if app.page().is_none() {
        vec![Line::from("No pages found")]
    } else {
        let lines = app.viewport().layout().lines();
        let start = app.viewport().offset().min(lines.len());
        let end = (start + height).min(lines.len());
        lines[start..end].to_vec()
    };

    let title = app.current_route().unwrap_or("Content").to_string();
    let content = Paragraph::new(content_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title(Line::from(app.status()).right_aligned()),
    );
    f.render_widget(content, columns[1]);

    let help = Paragraph::new(Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("↑/k ↓/j: Page | "),
        Span::raw("/: Search | "),
        Span::raw("Esc: Clear | "),
        Span::raw("PgUp/PgDn: Scroll"),
    ]));
    f.render_widget(help, rows[2]);
}
