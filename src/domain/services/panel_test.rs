use anyhow::Result;
use ratatui::style::Modifier;
use ratatui::text::Line;
use tokio::sync::mpsc;

use super::Panel;
use crate::domain::models::Action;
use crate::domain::services::Submission;

fn as_text(lines: &[Line]) -> Vec<String> {
    return lines
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| return span.content.to_string())
                .collect::<String>();
        })
        .collect();
}

#[test]
fn it_only_shows_status_while_idle() {
    let submission = Submission::default();
    let lines = Panel::new(&submission).lines();

    assert_eq!(as_text(&lines), vec!["Enter your feeling below"]);
}

#[test]
fn it_shows_encouragement_in_bold() -> Result<()> {
    let (tx, _rx) = mpsc::unbounded_channel::<Action>();
    let mut submission = Submission::default();
    submission.set_user_input("happy");
    submission.submit(&tx);
    let session_id = submission.session_id().unwrap();
    submission.on_stream_message(
        session_id,
        r#"{"status":"complete","message":"✅ Done!","data":{"output":"Keep going.\nSeriously."}}"#,
        &tx,
    );

    let lines = Panel::new(&submission).lines();

    assert_eq!(
        as_text(&lines),
        vec!["✅ Done!", "", "Keep going.", "Seriously."]
    );
    assert!(lines[2].spans[0]
        .style
        .add_modifier
        .contains(Modifier::BOLD));

    return Ok(());
}
