//! Tools tab rendering: menu, undo, rebase planner, history and remote

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph, Wrap};

use super::{panel, render_empty, render_list};
use crate::git::ops::ResetMode;
use crate::git::{RebaseAction, RebaseCommit};
use crate::studio::components::render_text_input;
use crate::studio::state::{AppState, HistorySource, InputField, ToolMode, UndoEntry};
use crate::studio::theme;

pub fn render_tools(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.tools.mode {
        ToolMode::Menu => render_menu(frame, area, state),
        ToolMode::Undo => render_undo(frame, area, state),
        ToolMode::Rebase => render_rebase(frame, area, state),
        ToolMode::History => render_history(frame, area, state),
        ToolMode::Remote => render_remote(frame, area, state),
    }
}

fn render_menu(frame: &mut Frame, area: Rect, state: &AppState) {
    let items = ToolMode::MENU
        .iter()
        .map(|mode| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<10}", mode.to_string()), theme::keyword()),
                Span::styled(mode.description(), theme::dimmed()),
            ]))
        })
        .collect();
    render_list(
        frame,
        area,
        "Tools",
        items,
        Some(state.tools.menu_selected),
        true,
    );
}

fn render_undo(frame: &mut Frame, area: Rect, state: &AppState) {
    let items = UndoEntry::ALL
        .iter()
        .map(|entry| {
            let style = match entry {
                UndoEntry::Reset(ResetMode::Hard) => theme::error(),
                _ => theme::author(),
            };
            ListItem::new(Span::styled(entry.label(), style))
        })
        .collect();
    render_list(
        frame,
        area,
        "Undo",
        items,
        Some(state.tools.undo_selected),
        true,
    );
}

fn action_style(action: RebaseAction) -> Style {
    match action {
        RebaseAction::Pick => theme::success(),
        RebaseAction::Reword => theme::keyword(),
        RebaseAction::Squash | RebaseAction::Fixup => theme::warning(),
        RebaseAction::Drop => theme::error(),
    }
}

fn rebase_item(commit: &RebaseCommit) -> ListItem<'static> {
    ListItem::new(Line::from(vec![
        Span::styled(format!("{:<7}", commit.action.to_string()), action_style(commit.action)),
        Span::styled(format!("{} ", commit.hash), theme::commit_hash()),
        Span::raw(commit.subject.clone()),
    ]))
}

fn render_rebase(frame: &mut Frame, area: Rect, state: &AppState) {
    let tools = &state.tools;
    let [input, plan] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    render_text_input(
        frame,
        input,
        &tools.rebase_count,
        "Commits to rebase",
        "Press Enter to choose how many commits",
        state.focus == Some(InputField::RebaseCount),
    );

    if tools.rebase_plan.is_empty() {
        render_empty(frame, plan, "Plan", "No commits loaded");
        return;
    }
    let items = tools.rebase_plan.iter().map(rebase_item).collect();
    render_list(
        frame,
        plan,
        "Plan (oldest first)",
        items,
        Some(tools.rebase_selected),
        state.focus.is_none(),
    );
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let tools = &state.tools;
    let title = match tools.history_source {
        HistorySource::Log => "History",
        HistorySource::Reflog => "Reflog",
    };
    if tools.history.is_empty() {
        render_empty(frame, area, title, "Nothing to show");
        return;
    }

    let items = tools
        .history
        .iter()
        .map(|commit| {
            let mut spans = vec![
                Span::styled(format!("{} ", commit.hash), theme::commit_hash()),
                Span::raw(commit.subject.clone()),
            ];
            if !commit.author.is_empty() {
                spans.push(Span::styled(format!("  {}", commit.author), theme::author()));
            }
            spans.push(Span::styled(format!("  {}", commit.date), theme::timestamp()));
            ListItem::new(Line::from(spans))
        })
        .collect();
    render_list(
        frame,
        area,
        title,
        items,
        Some(tools.history_selected),
        true,
    );
}

fn render_remote(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![Line::from(vec![
        Span::styled("Branch ", theme::dimmed()),
        Span::styled(state.branch_name().to_string(), theme::keyword()),
    ])];
    if let Some(repo) = &state.repo {
        lines.push(Line::from(Span::styled(
            format!("{} ahead, {} behind upstream", repo.ahead, repo.behind),
            theme::warning(),
        )));
    }
    if let Some(output) = &state.tools.last_push {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Last push", theme::keyword())));
        lines.extend(
            output
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), theme::dimmed()))),
        );
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Remote", true))
            .wrap(Wrap { trim: false }),
        area,
    );
}
