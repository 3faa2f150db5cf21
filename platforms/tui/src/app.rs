use action::Action;
use keymap::{Config, KeyMapConfig};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap},
    Frame,
};
use std::time::Duration;
use tmsim::{
    Program, ProgramLoader, ProgramManager, RunConfig, Rule, Simulator, Status, Step,
};

const BLOCK_PADDING: Padding = Padding::new(1, 1, 0, 0);
/// How much one speed key press changes the auto-play delay.
const DELAY_INCREMENT_MS: u64 = 50;

pub struct App {
    simulator: Simulator,
    current_program_index: usize,
    auto_play: bool,
    message: String,
    show_help: bool,
    pub(crate) keymap: Config<Action>,
    // Program switching is disabled for definitions loaded from a file or stdin
    program_loaded_from_source: bool,
}

impl App {
    pub fn new_default(config: RunConfig) -> Result<Self, String> {
        let program = ProgramManager::get_program_by_index(0).map_err(|e| e.to_string())?;
        Self::new(program, config, false, "Press 'h' for help.")
    }

    pub fn new_from_program_string(content: &str, config: RunConfig) -> Result<Self, String> {
        let program = ProgramLoader::load_program_from_string(content)
            .map_err(|e| format!("Failed to load program: {}", e))?;
        Self::new(
            program,
            config,
            true,
            "Program loaded from source. Press 'h' for help.",
        )
    }

    fn new(
        program: Program,
        config: RunConfig,
        from_source: bool,
        message: &str,
    ) -> Result<Self, String> {
        let simulator = Simulator::with_config(program, config).map_err(|e| e.to_string())?;

        Ok(Self {
            simulator,
            keymap: Action::keymap_config(),
            current_program_index: 0,
            auto_play: false,
            message: message.to_string(),
            show_help: false,
            program_loaded_from_source: from_source,
        })
    }

    /// Replaces the input used by runs and resets.
    pub fn set_input(&mut self, input: &str) -> Result<(), String> {
        self.simulator.prepare(input).map_err(|e| e.to_string())
    }

    pub fn render(&mut self, f: &mut Frame) {
        let inner_area = f.area().inner(Margin::new(1, 0));

        // Program info, middle (table + machine), status
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(inner_area);

        self.render_program_info(f, main_chunks[0]);

        let middle_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50),
                Constraint::Length(1),
                Constraint::Percentage(50),
            ])
            .split(main_chunks[1]);

        self.render_transition_table(f, middle_chunks[0]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(middle_chunks[2]);

        self.render_machine_state(f, right_chunks[0]);

        if self.show_help {
            self.render_help(f, right_chunks[1]);
        } else {
            self.render_tape(f, right_chunks[1]);
        }

        self.render_status(f, main_chunks[2]);
    }

    fn render_program_info(&self, f: &mut Frame, area: Rect) {
        let program = self.simulator.program();
        let label = Style::default().fg(Color::Yellow);

        let title = if self.program_loaded_from_source {
            format!("{} (Custom)", program.name)
        } else {
            format!(
                "{} ({}/{})",
                program.name,
                self.current_program_index + 1,
                ProgramManager::get_program_count()
            )
        };
        let alphabet: Vec<String> = program.alphabet().iter().map(char::to_string).collect();

        let text = vec![
            Line::from(vec![Span::styled("Program: ", label), Span::raw(title)]),
            Line::from(vec![
                Span::styled("Input: ", label),
                Span::raw(format!("\"{}\"", self.simulator.input())),
            ]),
            Line::from(vec![
                Span::styled("States: ", label),
                Span::raw(program.states().join(", ")),
                Span::styled(" | Start: ", label),
                Span::raw(program.initial_state().unwrap_or("(none)")),
            ]),
            Line::from(vec![
                Span::styled("Symbols: ", label),
                Span::raw(alphabet.join(", ")),
                Span::styled(" | Rules: ", label),
                Span::raw(program.rules().len().to_string()),
            ]),
        ];

        let paragraph = Paragraph::new(text)
            .block(block("Turing Machine Simulator (TUI)").title_alignment(Alignment::Center));

        f.render_widget(paragraph, area);
    }

    fn render_transition_table(&self, f: &mut Frame, area: Rect) {
        let program = self.simulator.program();
        let machine = self.simulator.machine();
        let alphabet = program.alphabet();
        let failure = self.simulator.validation_error();
        let active = (!machine.is_halted()).then(|| (machine.state(), machine.symbol()));

        let cells: Vec<Vec<String>> = program
            .states()
            .iter()
            .map(|state| {
                alphabet
                    .iter()
                    .map(|&symbol| describe_rule(program.rule(state, symbol)))
                    .collect()
            })
            .collect();
        let state_width = program
            .states()
            .iter()
            .map(|s| s.chars().count())
            .max()
            .unwrap_or(0)
            .max(5);
        let cell_width = cells
            .iter()
            .flatten()
            .map(|c| c.chars().count())
            .max()
            .unwrap_or(0)
            .max(3);

        let header_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let mut header = vec![Span::styled(format!("{:<state_width$}", "state"), header_style)];
        for symbol in &alphabet {
            header.push(Span::raw(" │ "));
            header.push(Span::styled(format!("{:<cell_width$}", symbol), header_style));
        }
        let mut lines = vec![Line::from(header)];

        for (state, row) in program.states().iter().zip(&cells) {
            let mut spans = vec![Span::styled(
                format!("{:<state_width$}", state),
                Style::default().fg(Color::Cyan),
            )];
            for (&symbol, text) in alphabet.iter().zip(row) {
                let complete = program.rule(state, symbol).is_some_and(Rule::is_complete);
                let failed = failure.is_some_and(|e| e.state == *state && e.symbol == symbol);

                let style = if active == Some((state.as_str(), symbol)) {
                    Style::default()
                        .bg(Color::Yellow)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else if failed {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else if !complete {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default()
                };

                spans.push(Span::raw(" │ "));
                spans.push(Span::styled(format!("{:<cell_width$}", text), style));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Accept: ", Style::default().fg(Color::Yellow)),
            Span::raw(program.accept_state()),
            Span::styled(" | Reject: ", Style::default().fg(Color::Yellow)),
            Span::raw(program.reject_state()),
        ]));

        let paragraph = section("Transition Table", lines);
        f.render_widget(paragraph, area);
    }

    fn render_tape(&self, f: &mut Frame, area: Rect) {
        let head = self.simulator.head();

        let tape_spans: Vec<Span> = self
            .simulator
            .tape()
            .cells()
            .iter()
            .enumerate()
            .map(|(i, symbol)| {
                let style = if i == head {
                    Style::default()
                        .bg(Color::Yellow)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Span::styled(format!(" {symbol} "), style)
            })
            .collect();

        let text_lines = vec![
            Line::from(tape_spans),
            Line::from(Span::styled(
                format!(
                    "Head at position: {} (symbol: '{}')",
                    head,
                    self.simulator.machine().symbol()
                ),
                Style::default().fg(Color::Cyan),
            )),
        ];

        let paragraph = section("Tape", text_lines).wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_machine_state(&self, f: &mut Frame, area: Rect) {
        let machine = self.simulator.machine();
        let status = self.simulator.status();
        let status_color = match status {
            Status::Idle => Color::Blue,
            Status::Validated => Color::Cyan,
            Status::Running | Status::Accepted => Color::Green,
            Status::Rejected(_) | Status::Errored(_) => Color::Red,
        };

        let mut text = vec![
            Line::from(vec![
                Span::styled("Current State: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    machine.state(),
                    Style::default()
                        .fg(status_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" | Steps: ", Style::default().fg(Color::Yellow)),
                Span::raw(machine.step_count().to_string()),
                Span::styled(" | Status: ", Style::default().fg(Color::Yellow)),
                Span::styled(status.label(), Style::default().fg(status_color)),
            ]),
            Line::from(vec![
                Span::styled("Delay: ", Style::default().fg(Color::Cyan)),
                Span::raw(format!("{}ms", self.simulator.config().step_delay_ms)),
            ]),
        ];

        if let Some(note) = machine.message() {
            text.push(Line::from(Span::styled(
                note,
                Style::default().fg(status_color),
            )));
        }

        let paragraph = section("Machine State", text).wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from("Controls:"),
            Line::from("  Enter - Validate and run"),
            Line::from("  Space - Step forward"),
            Line::from("  v - Validate the transition table"),
            Line::from("  r - Reset tape and head"),
            Line::from("  p - Pause/resume auto-play"),
            Line::from("  ↑ ↓ - Faster/slower auto-play"),
            Line::from(if self.program_loaded_from_source {
                "  ← → - Program switching disabled (loaded from file/stdin)"
            } else {
                "  ← → - Switch programs"
            }),
            Line::from("  h - Toggle this help"),
            Line::from("  q - Quit"),
            Line::from(""),
            Line::from("Grey cells have no rule or a partial rule."),
            Line::from("The highlighted cell is the rule applied next."),
        ];

        let paragraph = section("Help", help_text);
        f.render_widget(paragraph, area);
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let auto_play_status = if self.auto_play { "ON" } else { "OFF" };
        let status = Line::from(vec![
            Span::raw("Auto-play: "),
            Span::styled(auto_play_status, Style::default().fg(Color::Yellow)),
            Span::raw(format!(" | {}", self.message)),
        ]);

        f.render_widget(Paragraph::new(status).block(block("Status")), area);
    }

    pub fn step_machine(&mut self) {
        match self.simulator.step() {
            Step::Continue => {
                self.message = format!(
                    "Step {} completed",
                    self.simulator.machine().step_count()
                );
            }
            Step::Halt(_) => {
                self.message = "Machine is halted. Press 'r' to reset.".to_string();
                self.auto_play = false;
            }
        }
    }

    /// Validates, resets and starts auto-play.
    pub fn run_machine(&mut self) {
        match self.simulator.run() {
            Ok(Ok(())) => {
                self.auto_play = true;
                self.message = "Running".to_string();
            }
            Ok(Err(failure)) => {
                self.auto_play = false;
                self.message = format!("Validation failed: {}", failure);
            }
            Err(e) => {
                self.auto_play = false;
                self.message = e.to_string();
            }
        }
    }

    pub fn validate_machine(&mut self) {
        self.auto_play = false;
        self.message = match self.simulator.validate() {
            Ok(()) => "Transition table is complete".to_string(),
            Err(failure) => format!("Validation failed: {}", failure),
        };
    }

    pub fn reset_machine(&mut self) {
        self.auto_play = false;
        self.message = match self.simulator.reset() {
            Ok(()) => "Machine reset".to_string(),
            Err(e) => e.to_string(),
        };
    }

    pub fn toggle_auto_play(&mut self) {
        self.auto_play = !self.auto_play;
        self.message = format!(
            "Auto-play {}",
            if self.auto_play {
                "enabled"
            } else {
                "disabled"
            }
        );
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play && !self.simulator.machine().is_halted()
    }

    pub fn step_delay(&self) -> Duration {
        self.simulator.config().step_delay()
    }

    /// Moves the auto-play delay one increment in the given direction.
    pub fn change_delay(&mut self, direction: i8) {
        let current = self.simulator.config().step_delay_ms;
        let delay = if direction < 0 {
            current.saturating_sub(DELAY_INCREMENT_MS)
        } else {
            current.saturating_add(DELAY_INCREMENT_MS)
        };
        self.simulator.set_step_delay_ms(delay);
        self.message = format!("Delay set to {}ms", self.simulator.config().step_delay_ms);
    }

    pub fn next_program(&mut self) {
        if self.program_loaded_from_source {
            self.message = "Cannot switch programs when loaded from file/stdin.".to_string();
            return;
        }
        let count = ProgramManager::get_program_count();
        self.current_program_index = (self.current_program_index + 1) % count;
        self.load_current_program();
    }

    pub fn previous_program(&mut self) {
        if self.program_loaded_from_source {
            self.message = "Cannot switch programs when loaded from file/stdin.".to_string();
            return;
        }
        let count = ProgramManager::get_program_count();
        self.current_program_index = if self.current_program_index == 0 {
            count - 1
        } else {
            self.current_program_index - 1
        };
        self.load_current_program();
    }

    fn load_current_program(&mut self) {
        let loaded = ProgramManager::get_program_by_index(self.current_program_index)
            .and_then(|program| {
                Simulator::with_config(program, self.simulator.config().clone())
            });

        self.auto_play = false;
        self.message = match loaded {
            Ok(simulator) => {
                self.simulator = simulator;
                format!("Loaded program: {}", self.simulator.program().name)
            }
            Err(e) => format!("Failed to load program: {}", e),
        };
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

/// Renders one table cell as `write,next,direction`; unset fields show as `?`.
fn describe_rule(rule: Option<&Rule>) -> String {
    match rule {
        None => "-".to_string(),
        Some(rule) => format!(
            "{},{},{}",
            rule.write.unwrap_or('?'),
            rule.next_state.as_deref().unwrap_or("?"),
            rule.direction
        ),
    }
}

fn section<'a>(title: &'a str, content: Vec<Line<'a>>) -> Paragraph<'a> {
    Paragraph::new(content).block(block(title))
}

fn block(title: &str) -> Block {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {title} "))
        .padding(BLOCK_PADDING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmsim::{Direction as Move, RuleUpdate, TransitionTable};

    #[test]
    fn test_describe_rule() {
        assert_eq!(describe_rule(None), "-");
        assert_eq!(
            describe_rule(Some(&Rule::new('X', "q0", Move::Right))),
            "X,q0,R"
        );

        let mut table = TransitionTable::new();
        let partial = table.set("q0", '1', RuleUpdate::new().direction(Move::Left));
        assert_eq!(describe_rule(Some(partial)), "?,?,L");
    }

    #[test]
    fn test_change_delay_is_clamped() {
        let mut app = App::new_default(RunConfig::default()).unwrap();
        for _ in 0..100 {
            app.change_delay(-1);
        }
        assert_eq!(app.step_delay(), Duration::from_millis(50));
    }

    #[test]
    fn test_run_machine_starts_auto_play() {
        let mut app = App::new_default(RunConfig::default()).unwrap();
        app.run_machine();
        assert!(app.is_auto_playing());

        while app.is_auto_playing() {
            app.step_machine();
        }
        assert_eq!(app.simulator.status(), &Status::Accepted);
    }

    #[test]
    fn test_program_switching_wraps() {
        let mut app = App::new_default(RunConfig::default()).unwrap();
        app.previous_program();
        assert_eq!(
            app.current_program_index,
            ProgramManager::get_program_count() - 1
        );
        app.next_program();
        assert_eq!(app.current_program_index, 0);
    }
}
