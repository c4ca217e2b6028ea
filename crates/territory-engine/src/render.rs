//! Terminal renderer.
//!
//! Draws the ownership grid once per tick, after the buffer swap. Each owned
//! cell shows its owner's symbol on the owner's color; the controlled avatar
//! is drawn as `@` and every other avatar as `+`. A status line below the
//! map shows the tick and territory counts.

use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use territory_core::runner::TickCallback;
use territory_core::tick::{SimulationState, TickSummary};
use territory_types::{AgentColor, Point};
use tracing::{error, warn};

use crate::error::EngineError;

const CONTROLLED_AVATAR: char = '@';
const OTHER_AVATAR: char = '+';
const UNOWNED: char = ' ';

/// Raw mode plus alternate screen, restored on drop.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    /// Switch the terminal into raw mode on the alternate screen.
    pub fn enter() -> Result<Self, EngineError> {
        enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen) {
            // Undo raw mode before bailing out.
            disable_raw_mode().ok();
            return Err(err.into());
        }
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            error!(?err, "failed to disable raw mode");
        }
        if let Err(err) = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show) {
            error!(?err, "failed to leave alternate screen");
        }
    }
}

/// Tick callback painting the grid into a ratatui terminal.
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
}

impl TerminalRenderer<CrosstermBackend<Stdout>> {
    /// Renderer over the process's stdout. Enter a [`TerminalGuard`] first.
    pub fn stdout() -> Result<Self, EngineError> {
        let mut renderer = Self::new(CrosstermBackend::new(io::stdout()))?;
        renderer.terminal.hide_cursor()?;
        Ok(renderer)
    }
}

impl<B: Backend> TerminalRenderer<B> {
    /// Renderer over an arbitrary backend.
    pub fn new(backend: B) -> Result<Self, EngineError> {
        Ok(Self {
            terminal: Terminal::new(backend)?,
        })
    }

    /// Draw one frame. `summary` is `None` before the first tick.
    pub fn draw(
        &mut self,
        state: &SimulationState,
        summary: Option<&TickSummary>,
    ) -> Result<(), EngineError> {
        self.terminal.draw(|frame| draw_frame(frame, state, summary))?;
        Ok(())
    }

    /// The underlying backend.
    #[cfg(test)]
    pub fn backend(&self) -> &B {
        self.terminal.backend()
    }
}

impl<B: Backend + Send> TickCallback for TerminalRenderer<B> {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        if let Err(err) = self.draw(state, Some(summary)) {
            warn!(tick = summary.tick, error = %err, "frame draw failed");
        }
    }
}

fn draw_frame(frame: &mut Frame<'_>, state: &SimulationState, summary: Option<&TickSummary>) {
    let size = state.grid.size();
    let [map_area, status_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    let block = Block::default()
        .title(format!(" Territory {}x{} ", size.width, size.height))
        .borders(Borders::ALL);
    let inner = block.inner(map_area);
    frame.render_widget(block, map_area);
    frame.render_widget(Paragraph::new(map_lines(state)), inner);
    frame.render_widget(Paragraph::new(status_line(state, summary)), status_area);
}

/// One styled line per grid row.
pub fn map_lines(state: &SimulationState) -> Vec<Line<'static>> {
    let view = state.grid.view();
    let controlled = state
        .roster
        .get(state.controlled)
        .map(|agent| agent.position());
    let others: Vec<Point> = state
        .roster
        .iter()
        .filter(|agent| agent.id() != state.controlled)
        .map(|agent| agent.position())
        .collect();

    view.rows()
        .zip(0_i32..)
        .map(|(row, y)| {
            let spans: Vec<Span<'static>> = row
                .iter()
                .zip(0_i32..)
                .map(|(owner, x)| {
                    let cell = Point::new(x, y);
                    let agent = owner.and_then(|id| state.roster.get(id));
                    let mut style = agent.map_or_else(Style::default, |agent| {
                        Style::default()
                            .fg(Color::Black)
                            .bg(palette_color(agent.color()))
                    });
                    let mut glyph = agent.map_or(UNOWNED, |agent| agent.symbol());
                    if controlled == Some(cell) {
                        glyph = CONTROLLED_AVATAR;
                        style = style.add_modifier(Modifier::BOLD);
                    } else if others.contains(&cell) {
                        glyph = OTHER_AVATAR;
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    Span::styled(glyph.to_string(), style)
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Tick number and territory per agent.
///
/// Before the first tick there is no summary, so the counts are taken from
/// the grid itself.
pub fn status_line(state: &SimulationState, summary: Option<&TickSummary>) -> Line<'static> {
    let territory = summary.map_or_else(
        || state.grid.territory_counts(state.roster.len()),
        |summary| summary.territory.clone(),
    );
    let mut spans = vec![Span::styled(
        format!(" tick {} ", state.clock.tick()),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for (index, agent) in state.roster.iter().enumerate() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} {}", agent.name(), territory.owned_by(index)),
            Style::default().fg(palette_color(agent.color())),
        ));
    }
    spans.push(Span::raw(format!("  unowned {}", territory.unowned)));
    spans.push(Span::styled(
        "  arrows move, q quits",
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

/// Terminal color for an agent color.
pub const fn palette_color(color: AgentColor) -> Color {
    match color {
        AgentColor::Black => Color::Black,
        AgentColor::Red => Color::Red,
        AgentColor::Green => Color::Green,
        AgentColor::Yellow => Color::Yellow,
        AgentColor::Blue => Color::Blue,
        AgentColor::Magenta => Color::Magenta,
        AgentColor::Cyan => Color::Cyan,
        AgentColor::White => Color::White,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ratatui::backend::TestBackend;
    use territory_core::config::SimulationConfig;
    use territory_core::setup::build_state;
    use territory_types::AgentId;

    use super::*;

    fn state() -> SimulationState {
        let mut config = SimulationConfig::default();
        config.world.width = 6;
        config.world.height = 4;
        for agent in &mut config.agents {
            agent.random_seeds = 0;
        }
        if let Some(david) = config.agents.first_mut() {
            david.seed_cells = vec![Point::new(2, 1)];
        }
        if let Some(enemy) = config.agents.get_mut(1) {
            enemy.start = Point::new(5, 3);
            enemy.seed_cells = vec![Point::new(5, 3)];
        }
        build_state(&config, 1).unwrap().0
    }

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn map_shows_symbols_and_avatars() {
        let state = state();
        let lines = map_lines(&state);
        assert_eq!(lines.len(), 4);
        assert_eq!(text(lines.first().unwrap()), "@     ");
        assert_eq!(text(lines.get(1).unwrap()), "  B   ");
        assert_eq!(text(lines.get(3).unwrap()), "     +");
    }

    #[test]
    fn owned_cells_use_the_owner_color() {
        let state = state();
        let lines = map_lines(&state);
        let cell = lines.get(1).unwrap().spans.get(2).unwrap();
        assert_eq!(cell.style.bg, Some(Color::Green));
        let blank = lines.get(1).unwrap().spans.first().unwrap();
        assert_eq!(blank.style.bg, None);
    }

    #[test]
    fn status_line_lists_every_agent() {
        let state = state();
        let line = status_line(&state, None);
        let rendered = text(&line);
        assert!(rendered.contains("tick 0"));
        assert!(rendered.contains("david 1"));
        assert!(rendered.contains("enemy 1"));
        assert!(rendered.contains("unowned 22"));
    }

    #[test]
    fn first_frame_counts_the_seeded_cells() {
        let (state, seeds) = build_state(&SimulationConfig::default(), 42).unwrap();
        assert_eq!(seeds.claimed.len(), 4);
        let rendered = text(&status_line(&state, None));
        assert!(rendered.contains("david 2"), "{rendered}");
        assert!(rendered.contains("enemy 2"), "{rendered}");
    }

    #[test]
    fn summary_counts_take_precedence() {
        let state = state();
        let mut territory = state.grid.territory_counts(2);
        territory.unowned = 0;
        let summary = TickSummary {
            tick: 3,
            territory,
            changed_cells: 0,
        };
        let rendered = text(&status_line(&state, Some(&summary)));
        assert!(rendered.contains("unowned 0"), "{rendered}");
    }

    #[test]
    fn frames_render_into_a_test_backend() {
        let mut state = state();
        state.roster.move_agent(AgentId(0), territory_types::Direction::Right).unwrap();
        let mut renderer = TerminalRenderer::new(TestBackend::new(20, 8)).unwrap();
        renderer.draw(&state, None).unwrap();
        let buffer = renderer.backend().buffer();
        // Border at (0, 0); the map starts at (1, 1).
        assert_eq!(buffer.cell((2, 1)).unwrap().symbol(), "@");
        assert_eq!(buffer.cell((3, 2)).unwrap().symbol(), "B");
    }
}
