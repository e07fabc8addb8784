//! Rendering for the studio
//!
//! Splits rendering by tab; this module draws the frame around them.

mod branches;
mod commit;
mod tools;
mod workspace;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use super::state::{AppState, InputField, StatusLevel, Tab, ToolMode, WorkspaceView};
use super::theme;

/// Draw the whole studio
pub fn render(frame: &mut Frame, state: &AppState) {
    let [header, body, status, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, state);
    match state.tab {
        Tab::Workspace => workspace::render_workspace(frame, body, state),
        Tab::Commit => commit::render_commit(frame, body, state),
        Tab::Branches => branches::render_branches(frame, body, state),
        Tab::Tools => tools::render_tools(frame, body, state),
    }
    render_status_line(frame, status, state);
    render_help(frame, help, state);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Frame Pieces
// ═══════════════════════════════════════════════════════════════════════════════

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();
    for (index, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == state.tab {
            theme::tab_active()
        } else {
            theme::tab_inactive()
        };
        spans.push(Span::styled(format!(" {} {} ", index + 1, tab), style));
    }

    spans.push(Span::styled("│ ", theme::dimmed()));
    spans.push(Span::styled(state.branch_name().to_string(), theme::keyword()));
    if let Some(repo) = &state.repo {
        if repo.ahead > 0 || repo.behind > 0 {
            spans.push(Span::styled(
                format!(" ↑{} ↓{}", repo.ahead, repo.behind),
                theme::warning(),
            ));
        }
        spans.push(Span::styled(
            format!("  {} staged", repo.summary.staged),
            theme::git_staged(),
        ));
        spans.push(Span::styled(
            format!("  {} unstaged", repo.summary.unstaged),
            theme::git_modified(),
        ));
        if repo.summary.clean {
            spans.push(Span::styled("  clean", theme::dimmed()));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = Vec::new();

    if state.in_flight > 0 {
        let frame_char = theme::SPINNER_BRAILLE
            .get(state.spinner_frame % theme::SPINNER_BRAILLE.len())
            .copied()
            .unwrap_or(' ');
        spans.push(Span::styled(format!("{frame_char} "), theme::keyword()));
    }

    if let Some(message) = &state.message {
        let style = match message.level {
            StatusLevel::Info => theme::author(),
            StatusLevel::Success => theme::success(),
            StatusLevel::Error => theme::error(),
            StatusLevel::Prompt => theme::warning(),
        };
        spans.push(Span::styled(message.text.clone(), style));
    } else if let Some(pending) = &state.pending {
        // The prompt may have expired; the token itself has not
        spans.push(Span::styled(
            format!("Pending: {} (y to confirm, Esc to cancel)", pending.describe()),
            theme::warning(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn help_text(state: &AppState) -> &'static str {
    if let Some(field) = state.focus {
        return match field {
            InputField::CommitMessage => "Enter commit  Esc cancel",
            InputField::NewBranch => "Enter create branch  Esc cancel",
            InputField::RebaseCount => "Enter load commits  Esc cancel",
        };
    }

    match state.tab {
        Tab::Workspace => match state.workspace.view {
            WorkspaceView::Files => {
                "space stage/unstage  a stage all  R unstage all  v preview  d diff  r refresh  q quit"
            }
            WorkspaceView::Diff => "↑↓ scroll  PgUp/PgDn page  Esc back",
            WorkspaceView::Conflicts => {
                "o ours  t theirs  b both  c continue merge  r reload  Esc back"
            }
        },
        Tab::Commit => "Enter commit selected  c custom message  A amend  r refresh  q quit",
        Tab::Branches => "Enter checkout  n new  d delete  c compare  r refresh  q quit",
        Tab::Tools => match state.tools.mode {
            ToolMode::Menu => "Enter open tool  1-4 tabs  q quit",
            ToolMode::Undo => "Enter select  y confirm  Esc back",
            ToolMode::Rebase => {
                "p pick  s squash  r reword  d drop  f fixup  Enter execute  Esc back"
            }
            ToolMode::History => "c show hash  r refresh  Esc back",
            ToolMode::Remote => "p push  l pull  f fetch  Esc back",
        },
    }
}

fn render_help(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(
        Paragraph::new(Span::styled(help_text(state), theme::dimmed())),
        area,
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// Shared Helpers
// ═══════════════════════════════════════════════════════════════════════════════

fn panel(title: &str, focused: bool) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::focused_border()
        } else {
            theme::unfocused_border()
        })
}

/// Bordered list with the selected row highlighted
fn render_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem<'static>>,
    selected: Option<usize>,
    focused: bool,
) {
    let list = List::new(items)
        .block(panel(title, focused))
        .highlight_style(theme::selected())
        .highlight_symbol("▸ ");
    let mut list_state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Placeholder shown in an empty panel
fn render_empty(frame: &mut Frame, area: Rect, title: &str, text: &str) {
    frame.render_widget(
        Paragraph::new(Span::styled(text.to_string(), theme::dimmed())).block(panel(title, false)),
        area,
    );
}
