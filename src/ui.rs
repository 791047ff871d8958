use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap};
use ratatui::Terminal;
use std::io;
use std::io::Stdout;

use crate::app::{App, CollectionState, DetailState};
use crate::models::DetailView;
use crate::utils::{format_name, text_to_lines};

// Badge background per type, the classic palette.
fn type_color(t: &str) -> (u8, u8, u8) {
    match t {
        "normal" => (168, 168, 120),
        "fire" => (240, 128, 48),
        "water" => (104, 144, 240),
        "grass" => (120, 200, 80),
        "electric" => (248, 208, 48),
        "ice" => (152, 216, 216),
        "fighting" => (192, 48, 40),
        "poison" => (160, 64, 160),
        "ground" => (224, 192, 104),
        "flying" => (168, 144, 240),
        "psychic" => (248, 88, 136),
        "bug" => (168, 184, 32),
        "rock" => (184, 160, 56),
        "ghost" => (112, 88, 152),
        "dragon" => (112, 56, 248),
        "dark" => (112, 88, 72),
        "steel" => (184, 184, 208),
        "fairy" => (238, 153, 172),
        _ => (200, 200, 200),
    }
}

fn type_badges(types: &[String]) -> Vec<Span<'static>> {
    let mut spans: Vec<Span> = Vec::new();
    for (i, t) in types.iter().enumerate() {
        let (r, g, b) = type_color(&t.to_lowercase());
        let bg = Color::Rgb(r, g, b);
        // choose contrasting foreground (black or white)
        let lum = 0.2126 * (r as f32) + 0.7152 * (g as f32) + 0.0722 * (b as f32);
        let fg = if lum > 160.0 { Color::Black } else { Color::White };
        spans.push(Span::styled(
            format!(" {} ", format_name(t)),
            Style::default().fg(fg).bg(bg),
        ));
        if i < types.len() - 1 {
            spans.push(Span::raw(" "));
        }
    }
    spans
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_w = r.width.saturating_mul(percent_x) / 100;
    let popup_h = r.height.saturating_mul(percent_y) / 100;
    let popup_x = r.x + (r.width.saturating_sub(popup_w) / 2);
    let popup_y = r.y + (r.height.saturating_sub(popup_h) / 2);
    Rect::new(popup_x, popup_y, popup_w, popup_h)
}

fn stat_abbrev(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SpA".to_string(),
        "special-defense" => "SpD".to_string(),
        "speed" => "SPD".to_string(),
        other => format_name(other),
    }
}

pub fn draw_ui(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    terminal
        .draw(|f| {
            let size = f.size();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ])
                .split(size);

            draw_tabs(f, app, chunks[0]);
            draw_gallery(f, app, chunks[1]);
            draw_status(f, app, chunks[2]);

            match &app.detail {
                DetailState::Closed => {}
                DetailState::Loading(identifier) => {
                    let popup = centered_rect(50, 20, size);
                    let para = Paragraph::new(format!("Loading {}...", format_name(identifier)))
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).title("Details"));
                    f.render_widget(para, popup);
                }
                DetailState::Failed(message) => {
                    let popup = centered_rect(60, 20, size);
                    let para = Paragraph::new(Spans::from(Span::styled(
                        message.clone(),
                        Style::default().fg(Color::Red),
                    )))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("Details"));
                    f.render_widget(para, popup);
                }
                DetailState::Ready(view, artwork) => {
                    draw_detail(f, view, artwork.as_ref(), size);
                }
            }

            if app.show_help {
                draw_help(f, size);
            }
        })
        .map(|_| ())
}

fn draw_tabs(
    f: &mut ratatui::Frame<CrosstermBackend<Stdout>>,
    app: &App,
    area: Rect,
) {
    let titles: Vec<Spans> = std::iter::once("all".to_string())
        .chain(app.types.iter().cloned())
        .map(|t| Spans::from(Span::raw(t)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab_index)
        .block(Block::default().borders(Borders::ALL).title("Types"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

fn draw_gallery(
    f: &mut ratatui::Frame<CrosstermBackend<Stdout>>,
    app: &mut App,
    area: Rect,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(chunks[0]);

    let items: Vec<ListItem> = app
        .visible
        .iter()
        .map(|p| {
            let line = Spans::from(Span::raw(format!("#{} {}", p.id, format_name(&p.name))));
            ListItem::new(vec![line])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Pokémon"))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, left_chunks[0], &mut {
        let mut state = ratatui::widgets::ListState::default();
        if !app.visible.is_empty() {
            state.select(Some(app.selected));
        }
        state
    });

    let search_para = if app.search_mode {
        Paragraph::new(vec![Spans::from(Span::raw(format!("/{}", app.search_query)))])
            .block(Block::default().borders(Borders::ALL).title("Search"))
    } else if !app.search_query.is_empty() {
        Paragraph::new(vec![Spans::from(Span::raw(format!(
            "filter: {}",
            app.search_query
        )))])
        .block(Block::default().borders(Borders::ALL).title("Search"))
    } else {
        Paragraph::new(vec![Spans::from(Span::raw(
            "Press '/' to search by name or type.",
        ))])
        .block(Block::default().borders(Borders::ALL).title("Search"))
    };
    f.render_widget(search_para, left_chunks[1]);

    let card = match (&app.collection_state, app.selected_record()) {
        (CollectionState::Failed(message), _) => Paragraph::new(Spans::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        )))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Gallery")),
        (CollectionState::Loading, _) => Paragraph::new("Loading Pokémon...")
            .block(Block::default().borders(Borders::ALL).title("Gallery")),
        (CollectionState::Ready, Some(p)) => {
            let mut lines: Vec<Spans> = Vec::new();
            lines.push(Spans::from(Span::styled(
                format!("{} (#{})", format_name(&p.name), p.id),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let mut badge_line = vec![Span::raw("Types: ")];
            badge_line.extend(type_badges(&p.types));
            lines.push(Spans::from(badge_line));
            lines.push(Spans::from(Span::raw("")));
            lines.push(Spans::from(Span::raw("Press Enter for details.")));
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Gallery"))
        }
        (CollectionState::Ready, None) => Paragraph::new("No Pokémon match the filter")
            .block(Block::default().borders(Borders::ALL).title("Gallery")),
    };
    f.render_widget(card, chunks[1]);
}

fn draw_status(
    f: &mut ratatui::Frame<CrosstermBackend<Stdout>>,
    app: &App,
    area: Rect,
) {
    let text = if let Some(status) = &app.status {
        status.clone()
    } else {
        "q quit | / search | Left/Right type | Enter details | Esc close | r reload | h help"
            .to_string()
    };
    let para = Paragraph::new(Spans::from(Span::styled(
        text,
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(para, area);
}

fn draw_detail(
    f: &mut ratatui::Frame<CrosstermBackend<Stdout>>,
    view: &DetailView,
    artwork: Option<&crate::app::Artwork>,
    size: Rect,
) {
    let popup = centered_rect(92, 92, size);
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} (#{})", format_name(&view.name), view.id));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let detail_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(14), Constraint::Min(6)])
        .split(inner);

    let top_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(10)])
        .split(detail_chunks[0]);

    // Artwork pane
    let art_para = if let Some(art) = artwork {
        let rect = top_chunks[0];
        let avail_w = rect.width.saturating_sub(2).max(1) as u32;
        let avail_h = rect.height.saturating_sub(2).max(1) as u32;
        let rows = art.rows(avail_w.min(64), avail_h.min(64));
        let mut stext: Vec<Spans> = Vec::new();
        for row in rows.iter() {
            let mut spans = Vec::new();
            for &(r, g, b) in row.iter() {
                spans.push(Span::styled(" ", Style::default().bg(Color::Rgb(r, g, b))));
            }
            stext.push(Spans::from(spans));
        }
        Paragraph::new(stext).block(Block::default().borders(Borders::ALL).title("Artwork"))
    } else {
        Paragraph::new("(no image)")
            .block(Block::default().borders(Borders::ALL).title("Artwork"))
    };
    f.render_widget(art_para, top_chunks[0]);

    // Info pane
    let mut info_lines: Vec<Spans> = Vec::new();
    let mut badge_line = vec![Span::raw("Types: ")];
    badge_line.extend(type_badges(&view.types));
    info_lines.push(Spans::from(badge_line));
    if !view.abilities.is_empty() {
        let names: Vec<String> = view.abilities.iter().map(|a| format_name(a)).collect();
        info_lines.push(Spans::from(Span::raw(format!(
            "Abilities: {}",
            names.join(", ")
        ))));
    }
    info_lines.push(Spans::from(Span::raw(format!(
        "Height: {} cm  Weight: {:.1} kg  Base EXP: {}",
        view.height * 10,
        view.weight as f32 / 10.0,
        view.base_experience
    ))));
    info_lines.push(Spans::from(Span::raw("")));
    info_lines.push(Spans::from(Span::styled(
        "About",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for line in text_to_lines(&view.flavor, 70) {
        info_lines.push(Spans::from(Span::raw(line)));
    }
    let info_para = Paragraph::new(info_lines)
        .block(Block::default().borders(Borders::ALL).title("Info"))
        .wrap(Wrap { trim: true });
    f.render_widget(info_para, top_chunks[1]);

    let bottom_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(10)])
        .split(detail_chunks[1]);

    // Per-stat bars: NAME (padded) | VALUE | [bar...], scaled against the
    // stat ceiling of 255.
    let stats_rect = bottom_chunks[0];
    let inner_w = stats_rect.width.saturating_sub(2).max(1) as usize;
    let name_w = 10usize;
    let val_w = 4usize;
    let bar_max_w = inner_w.saturating_sub(name_w + val_w + 2);

    let mut stat_lines: Vec<Spans> = Vec::new();
    for st in view.stats.iter() {
        let filled = ((st.base.min(255) as f32 / 255.0) * bar_max_w as f32).round() as usize;
        let bar = "█".repeat(filled);
        let line = format!(
            "{:<name_w$} {:>val_w$} {}",
            stat_abbrev(&st.name),
            st.base,
            bar,
            name_w = name_w,
            val_w = val_w
        );
        stat_lines.push(Spans::from(Span::raw(line)));
    }
    let stats_para =
        Paragraph::new(stat_lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    f.render_widget(stats_para, stats_rect);

    // Evolution + moves pane
    let mut right_text: Vec<Spans> = Vec::new();
    right_text.push(Spans::from(Span::styled(
        "Evolution",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if view.evolution_stages.is_empty() {
        right_text.push(Spans::from(Span::raw("No evolution data")));
    } else {
        let stages: Vec<String> = view
            .evolution_stages
            .iter()
            .map(|s| format_name(s))
            .collect();
        right_text.push(Spans::from(Span::raw(stages.join(" -> "))));
    }
    right_text.push(Spans::from(Span::raw("")));
    if !view.moves.is_empty() {
        right_text.push(Spans::from(Span::styled(
            "Moves (sample)",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let names: Vec<String> = view.moves.iter().map(|m| format_name(m)).collect();
        right_text.push(Spans::from(Span::raw(names.join(", "))));
    }
    right_text.push(Spans::from(Span::raw("")));
    right_text.push(Spans::from(Span::styled(
        "Esc to close",
        Style::default().fg(Color::DarkGray),
    )));
    let right_para = Paragraph::new(right_text)
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: true });
    f.render_widget(right_para, bottom_chunks[1]);
}

fn draw_help(f: &mut ratatui::Frame<CrosstermBackend<Stdout>>, size: Rect) {
    let popup = centered_rect(60, 50, size);
    let mut help_lines: Vec<Spans> = Vec::new();
    help_lines.push(Spans::from(Span::styled(
        "Keybindings",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    help_lines.push(Spans::from(Span::raw("")));
    help_lines.push(Spans::from(Span::raw("q          Quit")));
    help_lines.push(Spans::from(Span::raw("/          Enter search mode")));
    help_lines.push(Spans::from(Span::raw(
        "Enter/Esc  Finish or cancel search mode",
    )));
    help_lines.push(Spans::from(Span::raw("Up/Down    Navigate list")));
    help_lines.push(Spans::from(Span::raw("Left/Right Switch type tab")));
    help_lines.push(Spans::from(Span::raw("Enter      Open details")));
    help_lines.push(Spans::from(Span::raw("Esc        Close details")));
    help_lines.push(Spans::from(Span::raw("r          Reload collection")));
    help_lines.push(Spans::from(Span::raw("h          Toggle this help")));
    let help_para = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    f.render_widget(help_para, popup);
}
