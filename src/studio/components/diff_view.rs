//! Diff view component
//!
//! Displays a single file's unified diff with colored added/removed lines.

use ratatui::Frame;
use ratatui::layout::{Margin, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::studio::theme;

// ═══════════════════════════════════════════════════════════════════════════════
// Diff Types
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineType {
    Context,
    Added,
    Removed,
    /// Hunk header (@@ ... @@)
    HunkHeader,
    /// `diff --git`, `index`, `---`/`+++` lines
    FileHeader,
}

impl DiffLineType {
    pub fn style(self) -> Style {
        match self {
            Self::Context => theme::diff_context(),
            Self::Added => theme::diff_added(),
            Self::Removed => theme::diff_removed(),
            Self::HunkHeader => theme::diff_hunk(),
            Self::FileHeader => Style::default()
                .fg(theme::TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// A single line in a diff
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine {
    pub line_type: DiffLineType,
    /// Line content including its prefix character
    pub content: String,
    /// New-side line number for context and added lines
    pub new_line_num: Option<usize>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Diff View State
// ═══════════════════════════════════════════════════════════════════════════════

/// Loaded diff and scroll position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffViewState {
    path: String,
    lines: Vec<DiffLine>,
    scroll_offset: usize,
}

impl DiffViewState {
    pub fn new(path: impl Into<String>, diff_text: &str) -> Self {
        Self {
            path: path.into(),
            lines: parse_diff(diff_text),
            scroll_offset: 0,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn lines(&self) -> &[DiffLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.lines.len().saturating_sub(1);
        self.scroll_offset = (self.scroll_offset + amount).min(max);
    }

    /// Added and removed line counts
    pub fn lines_changed(&self) -> (usize, usize) {
        self.lines.iter().fold((0, 0), |(added, removed), line| match line.line_type {
            DiffLineType::Added => (added + 1, removed),
            DiffLineType::Removed => (added, removed + 1),
            _ => (added, removed),
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Parsing
// ═══════════════════════════════════════════════════════════════════════════════

/// Start of the new-side range in `@@ -a,b +c,d @@`
fn hunk_new_start(header: &str) -> usize {
    header
        .split(' ')
        .find_map(|part| part.strip_prefix('+'))
        .and_then(|range| range.split(',').next())
        .and_then(|start| start.parse().ok())
        .unwrap_or(0)
}

/// Parse a single-file unified diff into typed lines
pub fn parse_diff(diff_text: &str) -> Vec<DiffLine> {
    let mut lines = Vec::new();
    let mut new_line = 0;
    let mut in_hunk = false;

    for line in diff_text.lines() {
        let (line_type, number) = if line.starts_with("@@") {
            in_hunk = true;
            new_line = hunk_new_start(line);
            (DiffLineType::HunkHeader, None)
        } else if !in_hunk || line.starts_with("diff --git") {
            in_hunk = false;
            (DiffLineType::FileHeader, None)
        } else if line.starts_with('+') {
            new_line += 1;
            (DiffLineType::Added, Some(new_line - 1))
        } else if line.starts_with('-') {
            (DiffLineType::Removed, None)
        } else {
            new_line += 1;
            (DiffLineType::Context, Some(new_line - 1))
        };

        lines.push(DiffLine {
            line_type,
            content: line.to_string(),
            new_line_num: number,
        });
    }

    lines
}

// ═══════════════════════════════════════════════════════════════════════════════
// Rendering
// ═══════════════════════════════════════════════════════════════════════════════

/// Render the diff view widget
#[allow(clippy::as_conversions)]
pub fn render_diff_view(frame: &mut Frame, area: Rect, state: &DiffViewState, focused: bool) {
    let (added, removed) = state.lines_changed();
    let block = Block::default()
        .title(Line::from(vec![
            Span::raw(" "),
            Span::styled(state.path().to_string(), theme::file_path()),
            Span::styled(format!(" +{added}"), theme::diff_added()),
            Span::styled(format!(" -{removed} "), theme::diff_removed()),
        ]))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::focused_border()
        } else {
            theme::unfocused_border()
        });

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let visible_height = inner.height as usize;
    let lines = state.lines();
    let scroll_offset = state.scroll_offset();

    let display_lines: Vec<Line> = lines
        .iter()
        .skip(scroll_offset)
        .take(visible_height)
        .map(render_diff_line)
        .collect();

    frame.render_widget(Paragraph::new(display_lines), inner);

    if lines.len() > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(None)
            .end_symbol(None);
        let mut scrollbar_state = ScrollbarState::new(lines.len()).position(scroll_offset);
        frame.render_stateful_widget(
            scrollbar,
            area.inner(Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_diff_line(line: &DiffLine) -> Line<'static> {
    let number = line
        .new_line_num
        .map_or_else(|| "    ".to_string(), |n| format!("{n:>4}"));

    Line::from(vec![
        Span::styled(number, theme::dimmed()),
        Span::styled(" │ ", theme::dimmed()),
        Span::styled(line.content.clone(), line.line_type.style()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "diff --git a/src/lib.rs b/src/lib.rs\n\
index 1..2 100644\n\
--- a/src/lib.rs\n\
+++ b/src/lib.rs\n\
@@ -10,3 +10,3 @@ fn main\n\
 context\n\
-old\n\
+new\n\
 tail\n";

    #[test]
    fn test_parse_diff_numbers_new_side() {
        let lines = parse_diff(SAMPLE);
        assert_eq!(lines[3].line_type, DiffLineType::FileHeader);
        assert_eq!(lines[4].line_type, DiffLineType::HunkHeader);
        assert_eq!(lines[5].new_line_num, Some(10));
        assert_eq!(lines[6].line_type, DiffLineType::Removed);
        assert_eq!(lines[7].new_line_num, Some(11));
        assert_eq!(lines[8].new_line_num, Some(12));
    }

    #[test]
    fn test_counts_and_scroll_bounds() {
        let mut state = DiffViewState::new("src/lib.rs", SAMPLE);
        assert_eq!(state.lines_changed(), (1, 1));

        state.scroll_down(100);
        assert_eq!(state.scroll_offset(), state.lines().len() - 1);
        state.scroll_up(100);
        assert_eq!(state.scroll_offset(), 0);
    }
}
