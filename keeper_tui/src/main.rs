use anyhow::Result;
use clap::Parser;
use keeper_core::{
    CellKind, SearchError,
    keeper::{Keeper, KeeperAi},
    maze::{Maze, TurnOutcome},
    sensing::MazeView,
};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use std::{
    collections::HashSet,
    io::{self, Stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze file to load
    #[arg(short, long, value_name = "MAZE_FILE")]
    maze: Option<PathBuf>,

    /// RNG seed for the exploration phase (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Milliseconds between simulation ticks
    #[arg(short, long, default_value_t = 100)]
    tick_ms: u64,
}

/// How a run can end.
enum Outcome {
    Won,
    Unsolvable(SearchError),
}

struct App {
    /// The maze being solved.
    maze: Maze,
    /// The keeper deciding one movement per tick.
    keeper: KeeperAi,
    /// Ticks taken so far.
    turns: usize,
    /// Set once the run has ended, one way or the other.
    outcome: Option<Outcome>,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(maze_file: &PathBuf, seed: u64) -> Result<Self> {
        let text = std::fs::read_to_string(maze_file)?;
        let maze = Maze::parse(&text)?;

        Ok(App {
            maze,
            keeper: KeeperAi::new(seed),
            turns: 0,
            outcome: None,
            should_quit: false,
        })
    }

    /// Handles one step of the simulation.
    fn tick(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        match self.keeper.decide(&self.maze) {
            Ok(movement) => {
                self.turns += 1;
                if self.maze.apply(movement) == TurnOutcome::Won {
                    self.outcome = Some(Outcome::Won);
                }
            }
            Err(error) => {
                self.outcome = Some(Outcome::Unsolvable(error));
            }
        }
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let maze_file = args.maze.unwrap_or(PathBuf::from("maps/maze01.txt"));
    if !maze_file.exists() {
        return Err(anyhow::anyhow!(
            "Maze file does not exist: {}",
            maze_file.display()
        ));
    }
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut app = App::new(&maze_file, seed)?;

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &mut app, Duration::from_millis(args.tick_ms));
    restore_terminal(&mut terminal)?;

    result
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    _ => {}
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Area for the maze
            Constraint::Length(4), // Area for status
            Constraint::Length(1), // Area for help
        ])
        .split(frame.area());

    render_maze(frame, main_layout[0], app);
    render_status(frame, main_layout[1], app);

    let help_text = Paragraph::new("Press 'q' or 'Esc' to quit.").alignment(Alignment::Center);
    frame.render_widget(help_text, main_layout[2]);
}

/// Renders keys found, turn count, phase and outcome.
fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let phase = if app.keeper.is_following_path() {
        "following optimal path to the door"
    } else {
        "exploring"
    };
    let outcome = match &app.outcome {
        Some(Outcome::Won) => Span::styled(
            "The keeper reached the door!",
            Style::default().fg(Color::Green).bold(),
        ),
        Some(Outcome::Unsolvable(error)) => Span::styled(
            format!("Unsolvable: {error}"),
            Style::default().fg(Color::Red).bold(),
        ),
        None => Span::raw(phase),
    };

    // Visit order repeats backtracked cells; count each cell once.
    let explored: HashSet<_> = app.keeper.explorer().visited().iter().collect();
    let lines = vec![
        Line::from(format!(
            "Keys: {} / {}    Turns: {}    Explored: {} cells",
            app.maze.keys_found(),
            app.maze.total_keys(),
            app.turns,
            explored.len()
        )),
        Line::from(outcome),
    ];
    let status =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Status"));
    frame.render_widget(status, area);
}

/// Renders the maze grid onto the frame.
fn render_maze(frame: &mut Frame, area: Rect, app: &App) {
    let cells = app.maze.cells();
    let keeper = app.maze.keeper();

    let mut lines: Vec<Line> = Vec::with_capacity(cells.rows());
    for row in 0..cells.rows() {
        let mut spans: Vec<Span> = Vec::with_capacity(cells.cols());
        for col in 0..cells.cols() {
            let position = keeper_core::Position::new(row as i32, col as i32);
            if position == keeper {
                spans.push(Span::styled("@", Style::default().fg(Color::Red).bold()));
                continue;
            }
            let span = match cells[position] {
                CellKind::Path => Span::raw(" "),
                CellKind::Wall => Span::styled("#", Style::default().fg(Color::DarkGray)),
                CellKind::Door => Span::styled("d", Style::default().fg(Color::Green)),
                CellKind::Key => Span::styled("k", Style::default().fg(Color::Yellow)),
            };
            spans.push(span);
        }
        lines.push(Line::from(spans));
    }

    let maze_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Maze Keeper").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(maze_paragraph, area);
}
