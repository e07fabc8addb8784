//! Branches tab rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{ListItem, Paragraph, Wrap};

use super::{panel, render_empty, render_list};
use crate::git::{BranchComparison, BranchRecord};
use crate::studio::components::render_text_input;
use crate::studio::state::{AppState, InputField};
use crate::studio::theme;

pub fn render_branches(frame: &mut Frame, area: Rect, state: &AppState) {
    let branches = &state.branches;
    let [input, body] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    render_text_input(
        frame,
        input,
        &branches.new_branch,
        "New branch",
        "Press n to create a branch",
        state.focus == Some(InputField::NewBranch),
    );

    let (list_area, comparison_area) = if branches.comparison.is_some() {
        let [list, comparison] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(body);
        (list, Some(comparison))
    } else {
        (body, None)
    };

    if branches.branches.is_empty() {
        render_empty(frame, list_area, "Branches", "No branches loaded");
    } else {
        let items = branches.branches.iter().map(branch_item).collect();
        render_list(
            frame,
            list_area,
            "Branches",
            items,
            Some(branches.selected),
            state.focus.is_none(),
        );
    }

    if let (Some(area), Some(comparison)) = (comparison_area, &branches.comparison) {
        render_comparison(frame, area, comparison);
    }
}

fn branch_item(branch: &BranchRecord) -> ListItem<'static> {
    let (marker, name_style) = if branch.is_current {
        ("* ", theme::tab_active())
    } else {
        ("  ", theme::author())
    };

    let mut spans = vec![
        Span::styled(marker, theme::keyword()),
        Span::styled(branch.name.clone(), name_style),
    ];
    if let Some(upstream) = &branch.upstream {
        spans.push(Span::styled(format!("  → {upstream}"), theme::dimmed()));
    }
    if branch.ahead > 0 || branch.behind > 0 {
        spans.push(Span::styled(
            format!("  ↑{} ↓{}", branch.ahead, branch.behind),
            theme::warning(),
        ));
    }
    ListItem::new(Line::from(spans))
}

fn render_comparison(frame: &mut Frame, area: Rect, comparison: &BranchComparison) {
    let mut lines = vec![Line::from(vec![
        Span::styled(comparison.source.clone(), theme::keyword()),
        Span::styled(" vs ", theme::dimmed()),
        Span::styled(comparison.target.clone(), theme::keyword()),
    ])];

    lines.push(Line::from(Span::styled(
        format!("{} commits ahead", comparison.ahead.len()),
        theme::success(),
    )));
    for commit in &comparison.ahead {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", commit.hash), theme::commit_hash()),
            Span::raw(commit.subject.clone()),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("{} commits behind", comparison.behind.len()),
        theme::warning(),
    )));
    for commit in &comparison.behind {
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", commit.hash), theme::commit_hash()),
            Span::raw(commit.subject.clone()),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("{} files differ", comparison.differing_files.len()),
        theme::author(),
    )));
    for file in &comparison.differing_files {
        lines.push(Line::from(Span::styled(format!("  {file}"), theme::file_path())));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("Comparison", false))
            .wrap(Wrap { trim: false }),
        area,
    );
}
