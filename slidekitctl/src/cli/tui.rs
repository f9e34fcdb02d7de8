//! Terminal carousel (`slidekitctl play`).
//!
//! The controller runs on [`VirtualTimers`] whose clock follows the event
//! source: wall time for a real terminal, `wait:` steps for scripted runs.

use std::{
    fs::File,
    io::{self, Write},
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
        enable_raw_mode,
    },
};
use ratatui::{
    Frame as TuiFrame, Terminal,
    backend::{Backend, CrosstermBackend, TestBackend},
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use slidekit_core::{
    CarouselController, Command, Frame, InputEvent, MountPlan,
    SchedulerState, SlideRenderer, SlideSource, VirtualTimers,
};

use super::Prepared;

pub const SCRIPT_VAR: &str = "SLIDEKITCTL_TUI_SCRIPT";
pub const TRACE_VAR: &str = "SLIDEKITCTL_TUI_TRACE";

const POLL_INTERVAL: Duration = Duration::from_millis(150);
const SCRIPTED_SIZE: (u16, u16) = (72, 16);

/// Source of key/input events so tests can drive the TUI without a real tty.
trait EventSource {
    fn next(&mut self, timeout: Duration) -> Result<Option<Event>>;
    /// Time since the source started; drives the carousel clock.
    fn elapsed(&self) -> Duration;
    fn is_scripted(&self) -> bool {
        false
    }
}

struct CrosstermEventSource {
    started: Instant,
}

impl EventSource for CrosstermEventSource {
    fn next(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

enum ScriptStep {
    Key(KeyEvent),
    Wait(Duration),
}

/// Scripted event source driven by a line-oriented DSL:
///   left|right|h|p|space|q|esc|0-9|wait:<duration>
/// Lines beginning with # are ignored. `wait:` advances the virtual clock.
/// Running out of steps before quitting is an error.
struct ScriptEventSource {
    steps: Vec<ScriptStep>,
    cursor: usize,
    elapsed: Duration,
    trace: Option<File>,
}

impl ScriptEventSource {
    fn from_path(path: PathBuf, trace_path: Option<PathBuf>) -> Result<Self> {
        let contents = std::fs::read_to_string(&path)
            .context("read scripted TUI input")?;
        let trace = trace_path
            .map(|p| File::create(p).context("create tui trace file"))
            .transpose()?;
        Self::parse(&contents, trace)
    }

    fn parse(contents: &str, trace: Option<File>) -> Result<Self> {
        let mut steps = Vec::new();
        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let key = |code: KeyCode| {
                ScriptStep::Key(KeyEvent::new(code, KeyModifiers::NONE))
            };
            let step = match line {
                "left" => key(KeyCode::Left),
                "right" => key(KeyCode::Right),
                "h" | "hover" => key(KeyCode::Char('h')),
                "p" => key(KeyCode::Char('p')),
                "space" => key(KeyCode::Char(' ')),
                "q" | "quit" => key(KeyCode::Char('q')),
                "esc" => key(KeyCode::Esc),
                digit if digit.len() == 1 && digit.chars().all(|c| c.is_ascii_digit()) => {
                    let ch = digit.chars().next().unwrap_or('0');
                    key(KeyCode::Char(ch))
                }
                _ => {
                    if let Some(rest) = line.strip_prefix("wait:") {
                        let wait = humantime::parse_duration(rest.trim())
                            .with_context(|| {
                                format!("invalid wait at line {}", idx + 1)
                            })?;
                        ScriptStep::Wait(wait)
                    } else {
                        return Err(anyhow!(
                            "unrecognized TUI script token at line {}: {}",
                            idx + 1,
                            line
                        ));
                    }
                }
            };
            steps.push(step);
        }

        Ok(Self {
            steps,
            cursor: 0,
            elapsed: Duration::ZERO,
            trace,
        })
    }
}

impl EventSource for ScriptEventSource {
    fn next(&mut self, _timeout: Duration) -> Result<Option<Event>> {
        let Some(step) = self.steps.get(self.cursor) else {
            return Err(anyhow!("scripted TUI input exhausted before quit"));
        };
        self.cursor += 1;

        let event = match step {
            ScriptStep::Wait(wait) => {
                self.elapsed += *wait;
                None
            }
            ScriptStep::Key(key) => Some(Event::Key(*key)),
        };

        if let Some(trace) = self.trace.as_mut() {
            let _ = match &event {
                Some(ev) => writeln!(trace, "{:?}", ev),
                None => writeln!(trace, "wait -> {:?}", self.elapsed),
            };
        }

        Ok(event)
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn is_scripted(&self) -> bool {
        true
    }
}

fn event_source_from_env() -> Result<Box<dyn EventSource>> {
    if let Ok(path) = std::env::var(SCRIPT_VAR) {
        let trace = std::env::var(TRACE_VAR).ok();
        let src = ScriptEventSource::from_path(
            PathBuf::from(path),
            trace.map(PathBuf::from),
        )?;
        Ok(Box::new(src))
    } else {
        Ok(Box::new(CrosstermEventSource {
            started: Instant::now(),
        }))
    }
}

/// Renderer state read back by the draw pass.
#[derive(Debug, Default)]
pub struct ScreenModel {
    plan: Option<MountPlan>,
    frame: Option<Frame>,
    renders: usize,
    transitions: usize,
}

impl SlideRenderer for ScreenModel {
    fn mount(&mut self, plan: &MountPlan) {
        self.plan = Some(plan.clone());
    }

    fn render(&mut self, frame: &Frame) {
        if self
            .frame
            .as_ref()
            .is_some_and(|previous| previous.active != frame.active)
        {
            self.transitions += 1;
        }
        self.frame = Some(frame.clone());
        self.renders += 1;
    }
}

/// What `play` reports once the terminal is released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayOutcome {
    pub index: usize,
    pub total: usize,
    pub label: String,
    /// Index changes after the initial render.
    pub transitions: usize,
    /// Final screen contents, captured for scripted runs only.
    pub screen: Option<Vec<String>>,
}

struct App {
    controller: CarouselController<ScreenModel, VirtualTimers>,
    status: Option<String>,
    quit: bool,
}

impl App {
    fn new(controller: CarouselController<ScreenModel, VirtualTimers>) -> Self {
        Self {
            controller,
            status: None,
            quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Left => self.input(InputEvent::PrevClicked),
            KeyCode::Right => self.input(InputEvent::NextClicked),
            KeyCode::Char('h') => {
                let event = if self.controller.state().pointer_over {
                    InputEvent::PointerLeft
                } else {
                    InputEvent::PointerEntered
                };
                self.input(event);
            }
            KeyCode::Char('p') | KeyCode::Char(' ') => self.toggle_autoplay(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                // Keyboard order: 1..9 are the first nine dots, 0 the tenth.
                let digit = c.to_digit(10).unwrap_or(0) as usize;
                let slot = if digit == 0 { 9 } else { digit - 1 };
                self.input(InputEvent::DotClicked(slot));
            }
            _ => {}
        }
    }

    fn input(&mut self, event: InputEvent) {
        let renders = self.controller.renderer().renders;
        let pointer = self.controller.state().pointer_over;
        self.controller.handle_input(event);

        let changed = self.controller.renderer().renders != renders
            || self.controller.state().pointer_over != pointer;
        self.status = Some(if changed {
            event.to_string()
        } else {
            format!("{event} ignored")
        });
    }

    fn toggle_autoplay(&mut self) {
        let command = match self.controller.scheduler_state() {
            SchedulerState::Running => Command::Pause,
            _ => Command::StartAutoplay,
        };
        self.controller.apply(command);
        self.status = Some(match command {
            Command::Pause => "paused".to_string(),
            _ => "autoplay started".to_string(),
        });
    }

    fn finish(mut self, screen: Option<Vec<String>>) -> PlayOutcome {
        self.controller.destroy();
        let index = self.controller.current_index();
        PlayOutcome {
            index,
            total: self.controller.deck().len(),
            label: self
                .controller
                .deck()
                .get(index)
                .map(|slide| slide.label().to_string())
                .unwrap_or_default(),
            transitions: self.controller.renderer().transitions,
            screen,
        }
    }
}

/// Build the carousel and run the terminal UI until the user quits.
pub fn play(prepared: &Prepared) -> Result<PlayOutcome> {
    let mut source = event_source_from_env()?;
    let controller = CarouselController::new(
        Some(&prepared.container),
        prepared.config().clone(),
        ScreenModel::default(),
        VirtualTimers::new(),
    )
    .context("failed to build carousel")?;
    let mut app = App::new(controller);

    if source.is_scripted() {
        let (width, height) = SCRIPTED_SIZE;
        let mut terminal = Terminal::new(TestBackend::new(width, height))?;
        run_app(&mut terminal, &mut app, &mut *source)?;
        let screen = screen_lines(terminal.backend().buffer());
        return Ok(app.finish(Some(screen)));
    }

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &mut *source);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;
    Ok(app.finish(None))
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: &mut dyn EventSource,
) -> Result<()> {
    loop {
        app.controller.advance_clock_to(source.elapsed());
        terminal.draw(|f| draw(f, app))?;
        if app.quit {
            return Ok(());
        }

        let timeout = app
            .controller
            .timers()
            .next_due()
            .map(|(at, _)| at.saturating_sub(source.elapsed()))
            .map_or(POLL_INTERVAL, |due| due.min(POLL_INTERVAL));

        if let Some(Event::Key(key)) = source.next(timeout)?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
    }
}

fn draw(f: &mut TuiFrame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.size());

    draw_header(f, rows[0], app);
    draw_slide(f, rows[1], app);
    draw_dots(f, rows[2], app);

    let help = match &app.status {
        Some(status) => format!("←/→ move  1-0 dots  h hover  p pause  q quit | {status}"),
        None => "←/→ move  1-0 dots  h hover  p pause  q quit".to_string(),
    };
    f.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[3],
    );
}

fn draw_header(f: &mut TuiFrame, area: Rect, app: &App) {
    let controller = &app.controller;
    let (label, color) = match controller.scheduler_state() {
        SchedulerState::Running => ("running", Color::Green),
        SchedulerState::Paused => ("paused", Color::Yellow),
        SchedulerState::Suppressed => ("waiting", Color::Cyan),
        SchedulerState::Destroyed => ("stopped", Color::Red),
    };
    let now = Duration::from_millis(controller.now().as_millis() as u64);
    let pointer = if controller.state().pointer_over {
        "over"
    } else {
        "out"
    };

    let line = Line::from(vec![
        Span::styled(
            format!(
                "Slide {}/{}",
                controller.current_index() + 1,
                controller.deck().len()
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  autoplay "),
        Span::styled(label, Style::default().fg(color)),
        Span::raw(format!("  pointer {pointer}")),
        Span::raw(format!("  {}", humantime::format_duration(now))),
    ]);
    f.render_widget(
        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title(" slidekit ")),
        area,
    );
}

fn draw_slide(f: &mut TuiFrame, area: Rect, app: &App) {
    let controller = &app.controller;
    let arrows = controller
        .renderer()
        .plan
        .as_ref()
        .is_some_and(|plan| plan.arrows.is_some());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    let mut body = vec![Line::from("")];
    if let Some(slide) = controller.deck().get(controller.current_index()) {
        body.push(Line::styled(
            slide.label().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let detail = match &slide.source {
            SlideSource::Element { .. } => "element".to_string(),
            SlideSource::Image { alt, .. } => format!("image, alt \"{alt}\""),
        };
        body.push(Line::styled(detail, Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(
        Paragraph::new(body)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        columns[1],
    );

    if arrows {
        let arrow = |glyph: &'static str| {
            Paragraph::new(vec![Line::from(""), Line::from(""), Line::from(glyph)])
                .alignment(Alignment::Center)
        };
        f.render_widget(arrow("‹"), columns[0]);
        f.render_widget(arrow("›"), columns[2]);
    }
}

fn draw_dots(f: &mut TuiFrame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" pagination ");
    let Some(window) = app.controller.pagination() else {
        f.render_widget(Paragraph::new("off").block(block), area);
        return;
    };

    let dots = app
        .controller
        .renderer()
        .frame
        .as_ref()
        .map(|frame| frame.dots.as_slice())
        .unwrap_or_default();
    let range = window.visible_range();
    let mut spans = Vec::new();
    if range.start > 0 {
        spans.push(Span::raw("… "));
    }
    for dot in dots {
        let style = if dot.active {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", dot.slide + 1), style));
    }
    if range.end < window.total() {
        spans.push(Span::raw(" …"));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn screen_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .map(|x| buffer.get(x, y).symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use slidekit_core::{CarouselConfig, StaticContainer};

    use super::*;

    fn app(config: CarouselConfig) -> App {
        let container = StaticContainer::with_slides(
            &config.slide_selector,
            ["intro", "middle", "outro"],
        );
        let controller = CarouselController::new(
            Some(&container),
            config,
            ScreenModel::default(),
            VirtualTimers::new(),
        )
        .expect("controller");
        App::new(controller)
    }

    fn drive(app: &mut App, script: &str) -> Vec<String> {
        let mut source =
            ScriptEventSource::parse(script, None).expect("script");
        let (width, height) = SCRIPTED_SIZE;
        let mut terminal =
            Terminal::new(TestBackend::new(width, height)).expect("terminal");
        run_app(&mut terminal, app, &mut source).expect("run");
        screen_lines(terminal.backend().buffer())
    }

    #[test]
    fn script_tokens_are_validated() {
        assert!(ScriptEventSource::parse("left\n# c\nwait:1s\n7\nq", None).is_ok());
        assert!(ScriptEventSource::parse("jump", None).is_err());
        assert!(ScriptEventSource::parse("wait:soon", None).is_err());
    }

    #[test]
    fn autoplay_follows_virtual_waits() {
        let mut app = app(CarouselConfig {
            delay_ms: 1000,
            ..CarouselConfig::default()
        });
        let screen = drive(&mut app, "wait:1s\nwait:1s\nq\n");

        assert_eq!(app.controller.current_index(), 2);
        assert!(screen.iter().any(|l| l.contains("Slide 3/3")), "{screen:#?}");
        assert!(screen.iter().any(|l| l.contains("outro")), "{screen:#?}");
    }

    #[test]
    fn keys_navigate_and_suppress_autoplay() {
        let mut app = app(CarouselConfig {
            delay_ms: 1000,
            ..CarouselConfig::default()
        });
        drive(&mut app, "right\nright\nwait:1500ms\n1\nq\n");

        assert_eq!(app.controller.current_index(), 0);
        assert_eq!(
            app.controller.scheduler_state(),
            SchedulerState::Suppressed
        );
        assert_eq!(app.status.as_deref(), Some("dot 0"));
    }

    #[test]
    fn hover_pauses_autoplay() {
        let mut app = app(CarouselConfig {
            delay_ms: 200,
            ..CarouselConfig::default()
        });
        drive(&mut app, "h\nwait:1s\nq\n");
        assert!(app.controller.state().pointer_over);
        assert_eq!(app.controller.current_index(), 0);
        assert_eq!(app.controller.scheduler_state(), SchedulerState::Paused);
    }

    #[test]
    fn pause_key_toggles_autoplay() {
        let mut app = app(CarouselConfig {
            delay_ms: 200,
            ..CarouselConfig::default()
        });
        drive(&mut app, "h\nh\np\nwait:1s\nspace\nq\n");
        assert!(!app.controller.state().pointer_over);
        assert_eq!(app.controller.current_index(), 0);
        assert_eq!(app.controller.scheduler_state(), SchedulerState::Running);
        assert_eq!(app.status.as_deref(), Some("autoplay started"));
    }

    #[test]
    fn disabled_arrows_report_ignored_input() {
        let mut app = app(CarouselConfig {
            autoplay: false,
            arrows: false,
            ..CarouselConfig::default()
        });
        let screen = drive(&mut app, "right\nq\n");
        assert_eq!(app.controller.current_index(), 0);
        assert_eq!(app.status.as_deref(), Some("next ignored"));
        assert!(!screen.iter().any(|l| l.contains('›')));
    }

    #[test]
    fn exhausted_script_is_an_error() {
        let mut app = app(CarouselConfig::default());
        let mut source = ScriptEventSource::parse("right", None).expect("script");
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).expect("terminal");
        assert!(run_app(&mut terminal, &mut app, &mut source).is_err());
    }

    #[test]
    fn rerenders_without_movement_are_not_transitions() {
        let config = CarouselConfig {
            autoplay: false,
            ..CarouselConfig::default()
        };
        let container =
            StaticContainer::with_slides(&config.slide_selector, ["only"]);
        let controller = CarouselController::new(
            Some(&container),
            config,
            ScreenModel::default(),
            VirtualTimers::new(),
        )
        .expect("controller");
        let mut app = App::new(controller);
        drive(&mut app, "right
left
1
q
");

        assert_eq!(app.controller.renderer().renders, 4);
        let outcome = app.finish(None);
        assert_eq!(outcome.index, 0);
        assert_eq!(outcome.label, "only");
        assert_eq!(outcome.transitions, 0);
    }

    #[test]
    fn finish_reports_position() {
        let mut app = app(CarouselConfig {
            autoplay: false,
            ..CarouselConfig::default()
        });
        drive(&mut app, "left\nq\n");
        let outcome = app.finish(None);
        assert_eq!(outcome.index, 2);
        assert_eq!(outcome.total, 3);
        assert_eq!(outcome.label, "outro");
        assert_eq!(outcome.transitions, 1);
    }
}
