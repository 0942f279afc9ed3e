use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};
use recite::{feedback::FeedbackKind, tokenizer::WordStatus, util::percent};
use unicode_width::UnicodeWidthStr;

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let recital = self.session.recital();
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);

        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);

        let underlined_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::UNDERLINED);

        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        match self.state {
            AppState::Reading => {
                let spans = recital
                    .tokens()
                    .iter()
                    .enumerate()
                    .flat_map(|(idx, token)| {
                        let style = match token.status {
                            WordStatus::Waiting => dim_bold_style,
                            WordStatus::Current => underlined_bold_style,
                            WordStatus::Correct => green_bold_style,
                            WordStatus::Incorrect => red_bold_style,
                        };
                        let gap = (idx > 0 && !token.is_punctuation).then(|| Span::raw(" "));
                        gap.into_iter()
                            .chain(std::iter::once(Span::styled(token.text.clone(), style)))
                    })
                    .collect::<Vec<Span>>();

                let passage_width = Line::from(spans.clone()).width();
                let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
                let passage_lines = if passage_width <= max_chars_per_line as usize {
                    1
                } else {
                    (passage_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
                };
                let padding = area.height.saturating_sub(passage_lines + 8) / 2;

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .constraints([
                        Constraint::Length(padding),
                        Constraint::Length(1), // feedback
                        Constraint::Length(1),
                        Constraint::Length(passage_lines),
                        Constraint::Length(1),
                        Constraint::Length(1), // progress
                        Constraint::Length(1), // transcript
                        Constraint::Min(0),
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                if let Some(feedback) = self.session.feedback().current() {
                    let color = match feedback.kind {
                        FeedbackKind::Positive => Color::Green,
                        FeedbackKind::Negative => Color::Red,
                    };
                    Paragraph::new(Span::styled(
                        feedback.message.clone(),
                        Style::default().patch(bold_style).fg(color),
                    ))
                    .alignment(Alignment::Center)
                    .render(chunks[1], buf);
                }

                Paragraph::new(Line::from(spans))
                    .alignment(if passage_lines == 1 {
                        Alignment::Center
                    } else {
                        Alignment::Left
                    })
                    .wrap(Wrap { trim: true })
                    .render(chunks[3], buf);

                let streak = recital.streak();
                Gauge::default()
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .percent(percent(recital.progress()))
                    .label(format!(
                        "{}%   streak {}",
                        percent(recital.progress()),
                        streak
                    ))
                    .render(chunks[5], buf);

                let indicator = if self.speech.is_listening() {
                    Span::styled("● ", Style::default().fg(Color::Red))
                } else {
                    Span::styled("○ muted ", dim_bold_style)
                };
                let heard = self.speech.text();
                // keep the tail of the transcript in view
                let room = chunks[6].width.saturating_sub(10) as usize;
                let tail = if heard.width() > room {
                    let skip = heard.chars().count().saturating_sub(room);
                    heard.chars().skip(skip).collect::<String>()
                } else {
                    heard.to_string()
                };
                Paragraph::new(Line::from(vec![indicator, Span::styled(tail, italic_style)]))
                    .alignment(Alignment::Center)
                    .render(chunks[6], buf);

                Paragraph::new(Span::styled(
                    format!(
                        "{} / (tab) listen / (←) restart / (→) next / (↑↓) level / (esc)ape",
                        self.session.difficulty()
                    ),
                    italic_style,
                ))
                .render(chunks[8], buf);
            }
            AppState::Results => {
                let summary = recital.summary();

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .horizontal_margin(HORIZONTAL_MARGIN)
                    .vertical_margin(VERTICAL_MARGIN)
                    .constraints([
                        Constraint::Min(1),
                        Constraint::Length(1), // headline
                        Constraint::Length(1), // stats
                        Constraint::Min(1),
                        Constraint::Length(1), // legend
                    ])
                    .split(area);

                Paragraph::new(Span::styled(
                    format!("{} / {} words read correctly", summary.correct, summary.words),
                    if summary.incorrect == 0 {
                        green_bold_style
                    } else {
                        bold_style
                    },
                ))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);

                let confidence = summary
                    .mean_confidence
                    .map(|c| format!("{:.0}% confidence", c))
                    .unwrap_or_else(|| "no words heard".to_string());
                Paragraph::new(Span::styled(
                    format!("{}   best streak {}", confidence, summary.best_streak),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);

                Paragraph::new(Span::styled(
                    "(r)etry / (n)ext / (↑↓) level / (esc)ape",
                    italic_style,
                ))
                .render(chunks[4], buf);
            }
        }
    }
}
