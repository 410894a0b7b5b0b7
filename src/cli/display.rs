// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display for the tzfanim CLI.
//!
//! OneDark for dark terminals, One Light for light ones. The theme comes from
//! `TZFANIM_THEME` when set, then `COLORFGBG`, then defaults to dark. Colors
//! are dropped when `NO_COLOR` is set or stdout is not a terminal.
//!
//! Verse text is printed as the engine returns it, with the `[match]` brackets
//! swapped for color when colors are on.

use std::io::IsTerminal;
use std::sync::OnceLock;

use tzfanim::{CorpusStats, RuleFamily, SearchMethod, SearchResponse, Variant};

// Width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("TZFANIM_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // COLORFGBG is "fg;bg"; backgrounds 7 and up (except 8) are light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// ONEDARK / ONE LIGHT COLOR PALETTES (True Color)
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
}

pub use colors::*;

mod onedark {
    pub const RED: (u8, u8, u8) = (224, 108, 117);     // #e06c75
    pub const GREEN: (u8, u8, u8) = (152, 195, 121);   // #98c379
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123);  // #e5c07b
    pub const BLUE: (u8, u8, u8) = (97, 175, 239);     // #61afef
    pub const MAGENTA: (u8, u8, u8) = (198, 120, 221); // #c678dd
    pub const CYAN: (u8, u8, u8) = (86, 182, 194);     // #56b6c2
    pub const GRAY: (u8, u8, u8) = (92, 99, 112);      // #5c6370
    pub const BRIGHT_GREEN: (u8, u8, u8) = (166, 226, 46);
    pub const BRIGHT_YELLOW: (u8, u8, u8) = (255, 215, 0);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (102, 217, 239);
}

mod onelight {
    pub const RED: (u8, u8, u8) = (228, 86, 73);       // #e45649
    pub const GREEN: (u8, u8, u8) = (80, 161, 79);     // #50a14f
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1);    // #c18401
    pub const BLUE: (u8, u8, u8) = (64, 120, 242);     // #4078f2
    pub const MAGENTA: (u8, u8, u8) = (166, 38, 164);  // #a626a4
    pub const CYAN: (u8, u8, u8) = (1, 132, 188);      // #0184bc
    pub const GRAY: (u8, u8, u8) = (160, 161, 167);    // #a0a1a7
    pub const BRIGHT_GREEN: (u8, u8, u8) = (68, 140, 39);
    pub const BRIGHT_YELLOW: (u8, u8, u8) = (152, 104, 1);
    pub const BRIGHT_CYAN: (u8, u8, u8) = (1, 112, 158);
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(RED);
theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(BLUE);
theme_color!(MAGENTA);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(BRIGHT_GREEN);
theme_color!(BRIGHT_YELLOW);
theme_color!(BRIGHT_CYAN);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Apply theme color with optional modifiers
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length in chars, excluding ANSI codes
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

/// Cut to `max` visible chars, ending with an ellipsis when shortened.
/// Only for plain text.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// Print a content line: │ content          │
pub fn row(content: &str) {
    let border = GRAY();
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{}│{}{}{}{}│{}", border, RESET, content, " ".repeat(pad), border, RESET);
}

/// Print section header: ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}┌{}{}{}{}┐{}", border, RESET, label_part, border, "─".repeat(remaining), RESET);
}

/// Print section divider: ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{}├{}{}{}{}┤{}", border, RESET, label_part, border, "─".repeat(remaining), RESET);
}

/// Print section footer: └──────────────────┘
pub fn section_bot() {
    println!("{}└{}┘{}", GRAY(), "─".repeat(BOX_WIDTH), RESET);
}

/// Print centered title in a double-line box
pub fn title(text: &str) {
    let border = BLUE();
    let colored = themed(BRIGHT_CYAN, &[BOLD], text);
    let total_pad = BOX_WIDTH.saturating_sub(visible_len(&colored));
    let left_pad = total_pad / 2;
    println!("{}╔{}╗{}", border, "═".repeat(BOX_WIDTH), RESET);
    println!(
        "{}║{}{}{}{}{}║{}",
        border,
        RESET,
        " ".repeat(left_pad),
        colored,
        " ".repeat(total_pad - left_pad),
        border,
        RESET
    );
    println!("{}╚{}╝{}", border, "═".repeat(BOX_WIDTH), RESET);
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Color-coded rule family badge
pub fn family_badge(family: RuleFamily) -> String {
    let label = family.label();
    if !use_colors() {
        return format!("[{}]", label);
    }
    let color = match family {
        RuleFamily::Original => GRAY(),
        RuleFamily::Prefix => YELLOW(),
        RuleFamily::Map1 | RuleFamily::Map2 | RuleFamily::Map3 => BLUE(),
        RuleFamily::Map4 | RuleFamily::Map5 | RuleFamily::Map6 => MAGENTA(),
        RuleFamily::Map7 | RuleFamily::Map8 => GREEN(),
    };
    format!("{}[{}]{}", color, label, RESET)
}

/// Badges for the distinct families that changed a letter, in order of
/// first use. An unchanged phrase gets the Original badge.
pub fn source_badges(sources: &[RuleFamily]) -> String {
    let mut seen: Vec<RuleFamily> = Vec::new();
    for family in sources.iter().copied().filter(|f| *f != RuleFamily::Original) {
        if !seen.contains(&family) {
            seen.push(family);
        }
    }
    if seen.is_empty() {
        return family_badge(RuleFamily::Original);
    }
    seen.into_iter().map(family_badge).collect::<Vec<_>>().join(" ")
}

/// Replace `[match]` markers with color. Plain output keeps the brackets.
pub fn marks(highlighted: &str) -> String {
    if !use_colors() {
        return highlighted.to_string();
    }
    let open = format!("{}{}", BOLD, BRIGHT_YELLOW());
    highlighted.replace('[', &open).replace(']', RESET)
}

pub fn method_label(method: Option<SearchMethod>) -> String {
    match method {
        Some(m) => themed(CYAN, &[], m.as_str()),
        None => themed(GRAY, &[], "none"),
    }
}

/// Color-coded timing in seconds (green=fast, yellow=medium, red=slow)
pub fn timing_secs(value: f64) -> String {
    if !use_colors() {
        return format!("{:.3}s", value);
    }
    let color = if value < 1.0 {
        GREEN()
    } else if value < 10.0 {
        YELLOW()
    } else {
        RED()
    };
    format!("{}{:.3}s{}", color, value, RESET)
}

// ═══════════════════════════════════════════════════════════════════════════
// REPORTS
// ═══════════════════════════════════════════════════════════════════════════

/// Print a search response, showing at most `limit` variants.
pub fn print_response(response: &SearchResponse, limit: usize) {
    title(&format!("tzfanim: {}", response.input_phrase));
    println!();

    section_top("SUMMARY");
    row(&format!(" Variants found:  {}", themed(BRIGHT_GREEN, &[BOLD], &response.total_variants.to_string())));
    row(&format!(" Locations:       {}", response.location_count()));
    row(&format!(" Method:          {}", method_label(response.method)));
    row(&format!(" Time:            {}", timing_secs(response.search_time_seconds)));
    if response.cached {
        row(&format!(" {}", themed(YELLOW, &[], "served from cache")));
    }

    for result in response.results.iter().take(limit) {
        section_mid(&result.variant);
        row(&format!(" {}", source_badges(&result.sources)));
        for location in &result.locations {
            let reference = format!("{} {}:{}", location.book, location.chapter, location.verse);
            let text = truncate(&location.highlighted_text, BOX_WIDTH - 20);
            row(&format!(" {} {}", themed(GRAY, &[], &pad_right(&reference, 16)), marks(&text)));
        }
    }
    if response.results.len() > limit {
        section_mid("MORE");
        row(&format!(" {} more variants not shown", response.results.len() - limit));
    }
    section_bot();
}

/// Print generated variants for a phrase.
pub fn print_variants(phrase: &str, variants: &[Variant], limit: usize) {
    title(&format!("variants: {}", phrase));
    println!();
    section_top("VARIANTS");
    row(&format!(" Generated: {}", variants.len()));
    section_mid("LIST");
    for variant in variants.iter().take(limit) {
        row(&format!(" {} {}", pad_right(&variant.text, 24), source_badges(&variant.sources)));
    }
    if variants.len() > limit {
        row(&format!(" … {} more", variants.len() - limit));
    }
    section_bot();
}

/// Print corpus statistics and its books.
pub fn print_stats(path: &str, stats: &CorpusStats, books: &[&str]) {
    title(&format!("corpus: {}", path));
    println!();
    section_top("CORPUS");
    row(&format!(" Lines:     {}", stats.lines));
    row(&format!(" Books:     {}", stats.books));
    row(&format!(" Chapters:  {}", stats.chapters));
    row(&format!(" Verses:    {}", stats.verses));
    row(&format!(" Words:     {}", stats.words));
    section_mid("BOOKS");
    for chunk in books.chunks(6) {
        row(&format!(" {}", chunk.join("  ")));
    }
    section_bot();
}

// ═══════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════
