//! Color palette and semantic styles for the studio

use ratatui::style::{Color, Modifier, Style};

use crate::commit::CommitType;

// ═══════════════════════════════════════════════════════════════════════════════
// Core Palette
// ═══════════════════════════════════════════════════════════════════════════════

/// Electric Purple #e135ff - Keywords, markers, active tab
pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255);

/// Neon Cyan #80ffea - Paths, interactions, focus
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234);

/// Coral #ff6ac1 - Hashes, numbers
pub const CORAL: Color = Color::Rgb(255, 106, 193);

/// Electric Yellow #f1fa8c - Warnings, prompts, dates
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140);

/// Success Green #50fa7b - Success states, staged files
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123);

/// Error Red #ff6363 - Errors, danger, removals
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99);

// ═══════════════════════════════════════════════════════════════════════════════
// Backgrounds & Text
// ═══════════════════════════════════════════════════════════════════════════════

/// Highlighted/selected background
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54);

/// Primary text - soft white
pub const TEXT_PRIMARY: Color = Color::Rgb(248, 248, 242);

/// Secondary/dimmed text
pub const TEXT_DIM: Color = Color::Rgb(98, 114, 164);

/// Muted text for borders
pub const TEXT_MUTED: Color = Color::Rgb(68, 71, 90);

// ═══════════════════════════════════════════════════════════════════════════════
// Semantic Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn commit_hash() -> Style {
    Style::default().fg(CORAL)
}

pub fn file_path() -> Style {
    Style::default().fg(NEON_CYAN)
}

pub fn keyword() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Style for selected list rows
pub fn selected() -> Style {
    Style::default()
        .bg(BG_HIGHLIGHT)
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD)
}

pub fn focused_border() -> Style {
    Style::default().fg(NEON_CYAN)
}

pub fn unfocused_border() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn success() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn error() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn warning() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

pub fn timestamp() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

pub fn author() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn dimmed() -> Style {
    Style::default().fg(TEXT_DIM)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tab Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(TEXT_DIM)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Indicator Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn git_staged() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn git_modified() -> Style {
    Style::default().fg(ELECTRIC_YELLOW)
}

pub fn git_untracked() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn git_conflicted() -> Style {
    Style::default().fg(ERROR_RED).add_modifier(Modifier::BOLD)
}

/// Color for an inferred commit type badge
pub fn commit_type(kind: CommitType) -> Style {
    let color = match kind {
        CommitType::Feat => SUCCESS_GREEN,
        CommitType::Fix => ERROR_RED,
        CommitType::Docs => NEON_CYAN,
        CommitType::Test => ELECTRIC_YELLOW,
        CommitType::Refactor | CommitType::Style => ELECTRIC_PURPLE,
        CommitType::Chore => TEXT_DIM,
    };
    Style::default().fg(color)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Diff Colors
// ═══════════════════════════════════════════════════════════════════════════════

pub fn diff_added() -> Style {
    Style::default().fg(SUCCESS_GREEN)
}

pub fn diff_removed() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn diff_hunk() -> Style {
    Style::default().fg(NEON_CYAN)
}

pub fn diff_context() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Braille spinner frames shown while tasks are in flight
pub const SPINNER_BRAILLE: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
