//! Workspace tab rendering: file list, diff preview and conflicts

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph, Wrap};

use super::{panel, render_empty, render_list};
use crate::conflict::ConflictFile;
use crate::git::ChangeRecord;
use crate::studio::components::render_diff_view;
use crate::studio::state::{AppState, WorkspaceView};
use crate::studio::theme;

pub fn render_workspace(frame: &mut Frame, area: Rect, state: &AppState) {
    let workspace = &state.workspace;
    match workspace.view {
        WorkspaceView::Files => {
            if workspace.preview {
                let [list, preview] =
                    Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                        .areas(area);
                render_files(frame, list, state);
                match &workspace.diff {
                    Some(diff) => render_diff_view(frame, preview, diff, false),
                    None => render_empty(frame, preview, "Preview", "No diff loaded"),
                }
            } else {
                render_files(frame, area, state);
            }
        }
        WorkspaceView::Diff => match &workspace.diff {
            Some(diff) => render_diff_view(frame, area, diff, true),
            None => render_empty(frame, area, "Diff", "Loading diff..."),
        },
        WorkspaceView::Conflicts => render_conflicts(frame, area, state),
    }
}

fn status_style(change: &ChangeRecord) -> Style {
    if change.is_conflicted() {
        theme::git_conflicted()
    } else if change.is_untracked() {
        theme::git_untracked()
    } else if change.is_staged() {
        theme::git_staged()
    } else {
        theme::git_modified()
    }
}

fn change_item(change: &ChangeRecord) -> ListItem<'static> {
    let mut spans = vec![
        Span::styled(format!("{} ", change.status()), status_style(change)),
        Span::styled(change.path.clone(), theme::file_path()),
    ];

    if let Some(kind) = change.derived_type {
        let badge = match change.derived_scope.as_deref() {
            Some(scope) if !scope.is_empty() => format!("  {kind}({scope})"),
            _ => format!("  {kind}"),
        };
        spans.push(Span::styled(badge, theme::commit_type(kind)));
    }

    ListItem::new(Line::from(spans))
}

fn render_files(frame: &mut Frame, area: Rect, state: &AppState) {
    let workspace = &state.workspace;
    if workspace.changes.is_empty() {
        render_empty(frame, area, "Changes", "Working tree clean");
        return;
    }

    let items = workspace.changes.iter().map(change_item).collect();
    let title = format!("Changes ({})", workspace.changes.len());
    render_list(frame, area, &title, items, Some(workspace.selected), true);
}

fn conflict_item(file: &ConflictFile) -> ListItem<'static> {
    let (marker, style) = if file.resolved {
        ("✓ ", theme::success())
    } else {
        ("✗ ", theme::error())
    };
    ListItem::new(Line::from(vec![
        Span::styled(marker, style),
        Span::styled(file.path.clone(), theme::file_path()),
        Span::styled(format!("  {} regions", file.regions.len()), theme::dimmed()),
    ]))
}

fn render_conflicts(frame: &mut Frame, area: Rect, state: &AppState) {
    let workspace = &state.workspace;
    let [list, detail] =
        Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);

    let items = workspace.conflicts.iter().map(conflict_item).collect();
    let resolved = workspace.conflicts.iter().filter(|file| file.resolved).count();
    let title = format!("Conflicts ({resolved}/{} resolved)", workspace.conflicts.len());
    render_list(
        frame,
        list,
        &title,
        items,
        Some(workspace.conflict_selected),
        true,
    );

    let Some(file) = workspace.selected_conflict() else {
        render_empty(frame, detail, "Regions", "No conflicts");
        return;
    };

    let mut lines = Vec::new();
    for region in &file.regions {
        lines.push(Line::from(Span::styled(
            format!("line {}", region.start_line),
            theme::timestamp(),
        )));
        lines.push(Line::from(Span::styled("ours", theme::keyword())));
        lines.extend(
            region
                .ours
                .iter()
                .map(|text| Line::from(Span::styled(format!("  {text}"), theme::diff_added()))),
        );
        lines.push(Line::from(Span::styled("theirs", theme::keyword())));
        lines.extend(
            region
                .theirs
                .iter()
                .map(|text| Line::from(Span::styled(format!("  {text}"), theme::diff_removed()))),
        );
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel(&file.path, false))
            .wrap(Wrap { trim: false }),
        detail,
    );
}
