//! algoviz walkthrough - Terminal User Interface
//!
//! Renders the controller's current step with ratatui.
//! App logic lives in `algoviz::tui::walkthrough_app`.

#![forbid(unsafe_code)]

#[cfg(feature = "tui")]
fn main() -> std::io::Result<()> {
    use algoviz::tui::walkthrough_app::WalkthroughApp;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args: Vec<String> = std::env::args().collect();
    let loaded = match args.get(1) {
        Some(path) => WalkthroughApp::from_yaml_file(path),
        None => WalkthroughApp::default_scenario(),
    };

    let app = match loaded {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error loading scenario: {e}");
            eprintln!("Usage: walkthrough_tui [path/to/scenario.yaml]");
            std::process::exit(1);
        }
    };

    tui::run(app)
}

#[cfg(not(feature = "tui"))]
fn main() {
    eprintln!("TUI feature not enabled. Run with: cargo run --bin walkthrough_tui --features tui");
    std::process::exit(1);
}

#[cfg(feature = "tui")]
mod tui {
    use algoviz::engine::Narrated;
    use algoviz::generators::recursion::Phase;
    use algoviz::generators::Snapshot;
    use algoviz::tui::walkthrough_app::{bar_heights, WalkthroughApp};
    use crossterm::{
        event::{self, Event, KeyEventKind},
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{
        backend::CrosstermBackend,
        layout::{Constraint, Direction, Layout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Wrap},
        Frame, Terminal,
    };
    use std::io;
    use std::time::Duration;

    const FRAME_RATE: Duration = Duration::from_millis(50);

    pub fn run(mut app: WalkthroughApp) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, crossterm::cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = run_main_loop(&mut terminal, &mut app);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_main_loop(
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        app: &mut WalkthroughApp,
    ) -> io::Result<()> {
        loop {
            terminal.draw(|f| ui(f, app))?;

            // Wake for input or the next due tick, whichever comes first.
            let timeout = app
                .controller
                .time_until_next_tick()
                .map_or(FRAME_RATE, |due| due.min(FRAME_RATE));
            if crossterm::event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        app.handle_key(key.code);
                    }
                }
            }

            app.update();

            if app.should_quit() {
                break;
            }
        }

        Ok(())
    }

    fn ui(f: &mut Frame, app: &WalkthroughApp) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(f.area());

        render_title(f, chunks[0], app);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        render_state(f, main_chunks[0], app);
        render_step_list(f, main_chunks[1], app);
        render_description(f, chunks[2], app);
        render_progress(f, chunks[3], app);
        render_status_bar(f, chunks[4], app);
    }

    fn render_title(f: &mut Frame, area: Rect, app: &WalkthroughApp) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", app.scenario.display_name()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("[{}]", app.scenario.algorithm.name()),
                Style::default().fg(Color::Gray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("algoviz"));
        f.render_widget(title, area);
    }

    fn render_state(f: &mut Frame, area: Rect, app: &WalkthroughApp) {
        let Some(snapshot) = app.current_step().map(|s| s.payload()) else {
            let empty = Paragraph::new("No steps")
                .block(Block::default().borders(Borders::ALL).title("State"));
            f.render_widget(empty, area);
            return;
        };

        if let Some(values) = snapshot.values() {
            render_bars(f, area, values, &snapshot.highlighted());
        } else if let Some(stack) = snapshot.call_stack() {
            render_call_stack(f, area, snapshot, stack);
        } else {
            render_counters(f, area, snapshot);
        }
    }

    fn render_bars(f: &mut Frame, area: Rect, values: &[i64], highlighted: &[usize]) {
        let heights = bar_heights(values);
        let bars: Vec<Bar> = values
            .iter()
            .zip(heights)
            .enumerate()
            .map(|(i, (&v, height))| {
                let color = if highlighted.contains(&i) {
                    Color::Yellow
                } else {
                    Color::Blue
                };
                Bar::default()
                    .value(height)
                    .text_value(v.to_string())
                    .label(Line::from(i.to_string()))
                    .style(Style::default().fg(color))
            })
            .collect();

        let width = (area.width.saturating_sub(2) / values.len().max(1) as u16)
            .saturating_sub(1)
            .clamp(1, 9);
        let chart = BarChart::default()
            .block(Block::default().borders(Borders::ALL).title("Array"))
            .data(BarGroup::default().bars(&bars))
            .bar_width(width)
            .bar_gap(1);
        f.render_widget(chart, area);
    }

    fn render_call_stack(
        f: &mut Frame,
        area: Rect,
        snapshot: &Snapshot,
        stack: &[algoviz::generators::recursion::Frame],
    ) {
        let mut lines: Vec<Line> = stack
            .iter()
            .rev()
            .map(|frame| {
                let style = if frame.is_base_case {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(Span::styled(
                    format!("{}{}", "  ".repeat(frame.depth), frame.call),
                    style,
                ))
            })
            .collect();

        if let Snapshot::Recursion(payload) = snapshot {
            let (label, color) = match payload.phase {
                Phase::Descent => ("descending", Color::Yellow),
                Phase::Ascent => ("returning", Color::Green),
                Phase::Rejected => ("rejected", Color::Red),
            };
            lines.insert(0, Line::from(Span::styled(label, Style::default().fg(color))));
            if let Some(value) = payload.frame.as_ref().and_then(|fr| fr.return_value) {
                lines.insert(1, Line::from(format!("returned {value}")));
            }
            if let Some(result) = payload.result {
                lines.push(Line::from(Span::styled(
                    format!("result = {result}"),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
        }

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Call stack"));
        f.render_widget(widget, area);
    }

    fn render_counters(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
        let lines = match snapshot {
            Snapshot::Iteration(p) => vec![
                Line::from(format!(
                    "i     = {}",
                    p.iteration.map_or_else(|| "-".to_string(), |i| i.to_string())
                )),
                Line::from(format!("total = {}", p.total)),
                Line::from(Span::styled(
                    p.result.map_or_else(String::new, |r| format!("result = {r}")),
                    Style::default().fg(Color::Cyan),
                )),
            ],
            _ => vec![Line::from(snapshot.description().to_string())],
        };
        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Variables"));
        f.render_widget(widget, area);
    }

    fn render_step_list(f: &mut Frame, area: Rect, app: &WalkthroughApp) {
        let sequence = app.controller.sequence();
        let cursor = app.controller.cursor().unwrap_or(0);
        let visible = usize::from(area.height.saturating_sub(2)).max(1);
        let start = cursor.saturating_sub(visible / 2);

        let lines: Vec<Line> = sequence
            .iter()
            .skip(start)
            .take(visible)
            .map(|step| {
                let style = if step.index() == cursor {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else if step.index() < cursor {
                    Style::default().fg(Color::Gray)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Line::from(Span::styled(
                    format!("{:>3} {}", step.index() + 1, step.payload().description()),
                    style,
                ))
            })
            .collect();

        let widget = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Steps"));
        f.render_widget(widget, area);
    }

    fn render_description(f: &mut Frame, area: Rect, app: &WalkthroughApp) {
        let text = app
            .current_step()
            .map_or("", |s| s.payload().description())
            .to_string();
        let widget = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("What happens"));
        f.render_widget(widget, area);
    }

    fn render_progress(f: &mut Frame, area: Rect, app: &WalkthroughApp) {
        let len = app.controller.sequence().len();
        let position = app.controller.cursor().map_or(0, |c| c + 1);
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(Style::default().fg(if app.controller.is_complete() {
                Color::Green
            } else {
                Color::Cyan
            }))
            .ratio(app.progress().clamp(0.0, 1.0))
            .label(format!("step {position}/{len}"));
        f.render_widget(gauge, area);
    }

    fn render_status_bar(f: &mut Frame, area: Rect, app: &WalkthroughApp) {
        let status_style = match app.status_label() {
            "PLAYING" => Style::default().fg(Color::Green),
            "COMPLETE" => Style::default().fg(Color::Cyan),
            _ => Style::default().fg(Color::Yellow),
        };
        let status_text = Line::from(vec![
            Span::styled(format!(" {} ", app.status_label()), status_style),
            Span::raw(format!(
                "| {} ms | [Space] play/pause [←/→] step [Home] reset [g] end [+/-] speed [q] quit",
                app.controller.interval().as_millis()
            )),
        ]);
        let widget = Paragraph::new(status_text).block(Block::default().borders(Borders::ALL));
        f.render_widget(widget, area);
    }
}
