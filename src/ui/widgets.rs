//! Custom widgets for the lingo TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::theme::{icons, Theme};
use crate::models::Lesson;
use crate::practice::{ChatMessage, Sender};
use crate::progress::ProgressSummary;

// ══════════════════════════════════════════════════════════════════════════
// Logo Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct Logo<'a> {
    theme: &'a Theme,
}

impl<'a> Logo<'a> {
    const ART: &'static str = r#"
    ╭──────────────────────────────────────╮
    │  _     _                             │
    │ | |   (_)_ __   __ _  ___            │
    │ | |   | | '_ \ / _` |/ _ \           │
    │ | |___| | | | | (_| | (_) |          │
    │ |_____|_|_| |_|\__, |\___/   speak,  │
    │                |___/     practice,   │
    │                          progress.   │
    ╰──────────────────────────────────────╯"#;

    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }
}

impl Widget for Logo<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = Self::ART
            .lines()
            .skip(1)
            .map(|line| Line::from(Span::styled(line, Style::default().fg(self.theme.colors.primary))))
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Score Gauges Widget
// ══════════════════════════════════════════════════════════════════════════

/// One gauge per skill score, side by side.
pub struct ScoreGauges<'a> {
    progress: &'a ProgressSummary,
    theme: &'a Theme,
}

impl<'a> ScoreGauges<'a> {
    pub fn new(progress: &'a ProgressSummary, theme: &'a Theme) -> Self {
        Self { progress, theme }
    }
}

impl Widget for ScoreGauges<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scores = self.progress.scores();
        let chunks = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

        let colors = [
            self.theme.colors.primary,
            self.theme.colors.secondary,
            self.theme.colors.accent,
        ];

        for (i, (name, score)) in scores.iter().enumerate() {
            Gauge::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(colors[i]))
                        .title(format!(" {} Score ", name))
                        .title_style(Style::default().fg(colors[i])),
                )
                .gauge_style(Style::default().fg(colors[i]).bg(self.theme.colors.bg_card))
                .percent(u16::from(*score))
                .label(format!("{}%", score))
                .render(chunks[i], buf);
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Lesson Card Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct LessonCard<'a> {
    lesson: &'a Lesson,
    favorite: bool,
    bookmarked: bool,
    theme: &'a Theme,
}

impl<'a> LessonCard<'a> {
    pub fn new(lesson: &'a Lesson, favorite: bool, bookmarked: bool, theme: &'a Theme) -> Self {
        Self {
            lesson,
            favorite,
            bookmarked,
            theme,
        }
    }
}

impl Widget for LessonCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lesson = self.lesson;
        let colors = &self.theme.colors;

        let mut title = vec![
            Span::raw(" "),
            Span::styled(lesson.title.as_str(), self.theme.title()),
            Span::raw(" "),
        ];
        if lesson.is_new {
            title.push(Span::styled(" NEW ", self.theme.badge()));
            title.push(Span::raw(" "));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(colors.primary))
            .title(Line::from(title));

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(1),   // Favorite / bookmark markers
            Constraint::Length(1),   // Spacing
            Constraint::Length(3),   // Description
            Constraint::Length(1),   // Metadata
            Constraint::Length(1),   // Tags
            Constraint::Length(1),   // Spacing
            Constraint::Length(1),   // Completion label
            Constraint::Length(1),   // Completion gauge
            Constraint::Min(0),
        ])
        .split(inner);

        let markers = Line::from(vec![
            if self.favorite {
                Span::styled(format!("{} Favorite  ", icons::HEART), self.theme.favorite())
            } else {
                Span::styled(format!("{} Favorite  ", icons::HEART), self.theme.key_hint())
            },
            if self.bookmarked {
                Span::styled(format!("{} Bookmarked", icons::BOOKMARK), self.theme.bookmark())
            } else {
                Span::styled(format!("{} Bookmark", icons::BOOKMARK), self.theme.key_hint())
            },
        ]);
        Paragraph::new(markers)
            .alignment(Alignment::Right)
            .render(chunks[0], buf);

        Paragraph::new(lesson.description.as_str())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(colors.text_muted))
            .render(chunks[2], buf);

        let metadata = Line::from(vec![
            Span::styled(format!("{} ", icons::CLOCK), Style::default().fg(colors.text_muted)),
            Span::styled(lesson.duration.as_str(), Style::default().fg(colors.text)),
            Span::raw("   "),
            Span::styled(format!("{} ", icons::STAR), Style::default().fg(colors.warning)),
            Span::styled(format!("{:.1}", lesson.rating), Style::default().fg(colors.text)),
            Span::raw("   "),
            Span::styled(
                lesson.level.label(),
                Style::default()
                    .fg(self.theme.level_color(lesson.level))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("   "),
            Span::styled(lesson.kind.label(), Style::default().fg(colors.info)),
        ]);
        Paragraph::new(metadata).render(chunks[3], buf);

        let tags: Vec<Span> = lesson
            .tags
            .iter()
            .map(|tag| Span::styled(format!("#{} ", tag), Style::default().fg(colors.text_dim)))
            .collect();
        Paragraph::new(Line::from(tags)).render(chunks[4], buf);

        let completion = Line::from(vec![
            Span::styled("Completion Rate ", Style::default().fg(colors.text_muted)),
            Span::styled(format!("{}%", lesson.completion_rate), Style::default().fg(colors.text)),
        ]);
        Paragraph::new(completion).render(chunks[6], buf);

        Gauge::default()
            .gauge_style(Style::default().fg(colors.primary).bg(colors.bg_card))
            .percent(u16::from(lesson.completion_rate))
            .label("")
            .render(chunks[7], buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Chat Transcript Widget
// ══════════════════════════════════════════════════════════════════════════

/// Chat bubbles: the user's on the right, the partner's on the left.
/// Shows the newest messages when the transcript overflows.
pub struct ChatTranscript<'a> {
    messages: &'a [ChatMessage],
    typing: bool,
    theme: &'a Theme,
}

impl<'a> ChatTranscript<'a> {
    pub fn new(messages: &'a [ChatMessage], typing: bool, theme: &'a Theme) -> Self {
        Self { messages, typing, theme }
    }
}

impl Widget for ChatTranscript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.primary))
            .title(" Chat Practice ")
            .title_style(self.theme.highlight());
        let inner = block.inner(area);
        block.render(area, buf);

        let bubble_width = (inner.width as usize * 3 / 4).max(10);
        let mut lines: Vec<Line> = Vec::new();

        for message in self.messages {
            let (style, alignment) = match message.sender {
                Sender::User => (self.theme.chat_user(), Alignment::Right),
                Sender::Partner => (self.theme.chat_partner(), Alignment::Left),
            };
            for wrapped in textwrap::wrap(&message.text, bubble_width) {
                lines.push(Line::from(Span::styled(wrapped.into_owned(), style)).alignment(alignment));
            }
            lines.push(
                Line::from(Span::styled(
                    message.timestamp.format("%H:%M:%S").to_string(),
                    self.theme.key_hint(),
                ))
                .alignment(alignment),
            );
            lines.push(Line::from(""));
        }

        if self.typing {
            lines.push(Line::from(Span::styled("• • •", self.theme.chat_partner())));
        }

        let overflow = lines.len().saturating_sub(inner.height as usize);
        Paragraph::new(lines.split_off(overflow)).render(inner, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let separator = Span::styled(" │ ", Style::default().fg(self.theme.colors.text_dim));
        let mut spans = Vec::new();

        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(separator.clone());
            }
            spans.push(Span::styled(*key, self.theme.key_highlight()));
            spans.push(Span::styled(format!(" {}", desc), self.theme.key_hint()));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Empty State Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct EmptyState<'a> {
    headline: &'a str,
    detail: &'a str,
    theme: &'a Theme,
}

impl<'a> EmptyState<'a> {
    pub fn new(headline: &'a str, detail: &'a str, theme: &'a Theme) -> Self {
        Self { headline, detail, theme }
    }
}

impl Widget for EmptyState<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(self.headline, self.theme.title())),
            Line::from(""),
            Line::from(Span::styled(self.detail, self.theme.subtitle())),
        ];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════

/// Cut `text` to at most `max_width` terminal columns, marking the cut with "…".
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w + 1 > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}
