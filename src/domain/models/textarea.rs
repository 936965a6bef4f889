use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;

pub const INPUT_PROMPT: &str = "How are you feeling?";

pub struct TextArea {}

impl<'a> TextArea {
    pub fn default() -> tui_textarea::TextArea<'a> {
        let mut textarea = tui_textarea::TextArea::default();
        TextArea::set_submittable(&mut textarea, false);

        return textarea;
    }

    /// Swaps the block title so the user can tell whether Enter will submit.
    pub fn set_submittable(textarea: &mut tui_textarea::TextArea<'a>, submittable: bool) {
        let mut title = INPUT_PROMPT.to_string();
        if submittable {
            title = format!("{INPUT_PROMPT} (Enter to submit)");
        }

        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title(title)
                .padding(Padding::new(1, 1, 0, 0)),
        );
    }
}
