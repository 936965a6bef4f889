use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Backend as _;
use crate::domain::models::Event;
use crate::domain::models::Loading;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::Panel;
use crate::domain::services::Submission;
use crate::domain::services::IDLE_STATUS;
use crate::infrastructure::backends::FeelerApi;

pub const TITLE: &str = "Feeling Interpreter";

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Submit how you are feeling. Ignored while the previous submission is still processing.
- CTRL+C / Esc - Exit Feeler, closing any open stream.
        "#;

    return text.trim().to_string();
}

fn render<B: Backend>(
    frame: &mut Frame<B>,
    submission: &Submission,
    textarea: &tui_textarea::TextArea,
    loading: &Loading,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.size());

    frame.render_widget(
        Paragraph::new(TITLE)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double),
            ),
        layout[0],
    );

    Panel::new(submission).render(frame, layout[1]);

    if submission.is_processing() {
        loading.render(frame, layout[2]);
    } else {
        frame.render_widget(textarea.widget(), layout[2]);
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    submission: &mut Submission,
    tx: &mpsc::UnboundedSender<Action>,
    events: &mut EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();
    let loading = Loading::default();

    loop {
        TextArea::set_submittable(&mut textarea, submission.can_submit());
        terminal.draw(|frame| {
            render(frame, submission, &textarea, &loading);
        })?;

        match events.next().await? {
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardEnter() => {
                submission.submit(tx);
            }
            Event::KeyboardCharInput(input) => {
                if submission.is_processing() {
                    continue;
                }
                textarea.input(input);
                submission.set_user_input(&textarea.lines().join(" "));
            }
            Event::KeyboardPaste(text) => {
                if submission.is_processing() {
                    continue;
                }
                for char in text.chars() {
                    if char == '\n' || char == '\r' {
                        textarea.insert_char(' ');
                    } else {
                        textarea.insert_char(char);
                    }
                }
                submission.set_user_input(&textarea.lines().join(" "));
            }
            Event::StreamMessage(session_id, raw) => {
                submission.on_stream_message(session_id, &raw, tx);
            }
            Event::StreamTransportError(session_id, err) => {
                submission.on_stream_transport_error(session_id, &err, tx);
            }
            Event::UITick() => {
                continue;
            }
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

async fn initial_status() -> String {
    let backend = FeelerApi::default();
    if let Err(err) = backend.health_check().await {
        return format!(
            "Hey, it looks like the Feeling Interpreter at {} isn't running. Submissions will fail until it is.\n\nError: {err}",
            backend.url()
        );
    }

    return IDLE_STATUS.to_string();
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut submission = Submission::new(&initial_status().await);
    let mut events = EventsService::new(rx);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut submission, &tx, &mut events).await;
    submission.teardown(&tx);

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
