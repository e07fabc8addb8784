//! Commit tab rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use super::{render_empty, render_list};
use crate::studio::components::render_text_input;
use crate::studio::state::{AppState, InputField};
use crate::studio::theme;

pub fn render_commit(frame: &mut Frame, area: Rect, state: &AppState) {
    let commit = &state.commit;
    let recent_height = u16::try_from(commit.recent.len().max(1) + 2).unwrap_or(u16::MAX);
    let [input, suggestions, recent] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(recent_height),
    ])
    .areas(area);

    let input_focused = state.focus == Some(InputField::CommitMessage);
    render_text_input(
        frame,
        input,
        &commit.input,
        "Custom message",
        "Press c to write your own message",
        input_focused,
    );

    let mut items = vec![ListItem::new(Span::styled(
        "✎ custom message",
        theme::dimmed(),
    ))];
    items.extend(commit.suggestions.iter().enumerate().map(|(index, suggestion)| {
        ListItem::new(Line::from(vec![
            Span::styled(format!("{}. ", index + 1), theme::dimmed()),
            Span::styled(suggestion.message.clone(), theme::commit_type(suggestion.kind)),
        ]))
    }));
    let title = format!("Suggestions ({} staged)", state.staged_count());
    render_list(
        frame,
        suggestions,
        &title,
        items,
        Some(commit.selected),
        !input_focused,
    );

    if commit.recent.is_empty() {
        render_empty(frame, recent, "Recent commits", "No commits yet");
        return;
    }
    let items = commit
        .recent
        .iter()
        .map(|record| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", record.hash), theme::commit_hash()),
                Span::styled(record.subject.clone(), theme::author()),
                Span::styled(format!("  {}", record.date), theme::timestamp()),
            ]))
        })
        .collect();
    render_list(frame, recent, "Recent commits", items, None, false);
}
