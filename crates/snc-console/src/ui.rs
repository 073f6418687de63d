use crate::state::{App, Panel};
use crate::theme::{self, ConsoleTheme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.size();
    let theme = theme::console_theme();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    frame.render_widget(render_header(app, theme, area.width), layout[0]);
    match app.panel {
        Panel::Tokens => render_tokens(frame, app, theme, layout[1]),
        Panel::Trades => render_trades(frame, app, theme, layout[1]),
    }
    frame.render_widget(render_footer(app, theme), layout[2]);

    if app.help_open {
        render_help_overlay(frame, theme);
    }
}

fn render_header(app: &App, theme: ConsoleTheme, width: u16) -> Paragraph<'static> {
    let inner_width = (width.saturating_sub(4) as usize).max(12);
    let run_label = match &app.status {
        Some(status) if status.is_running => "RUNNING",
        Some(_) => "STOPPED",
        None => "--",
    };
    let fields = match &app.status {
        Some(status) => vec![
            format!("Bot: {run_label}"),
            format!("Network: {}", status.network),
            format!("Wallet: {:.4} SOL", status.wallet_balance),
            format!("Scanned: {}", status.tokens_scanned),
            format!("Active Trades: {}", status.active_trades),
        ],
        None => vec![
            "Bot: --".to_string(),
            "Network: --".to_string(),
            "Wallet: -- SOL".to_string(),
            "Scanned: --".to_string(),
            "Active Trades: --".to_string(),
        ],
    };
    let status_line = fit_fields(&fields, inner_width);

    let second_line = if let Some(notice) = app.notices.current() {
        Line::from(Span::styled(
            ellipsize(&notice.message, inner_width),
            Style::default()
                .fg(theme::notice_color(notice.kind, theme))
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        let updated = match &app.last_status_at {
            Some(at) => format!("Updated: {}", at.format("%H:%M:%S")),
            None => "Updated: never".to_string(),
        };
        let api = format!("API: {}", app.config.api_base_url);
        Line::from(Span::styled(
            fit_fields(&[updated, api], inner_width),
            Style::default().fg(theme.muted),
        ))
    };

    let run_state = theme::run_state_color(app.status.as_ref().map(|s| s.is_running), theme);
    Paragraph::new(Text::from(vec![
        Line::from(Span::styled(status_line, Style::default().fg(run_state))),
        second_line,
    ]))
    .style(Style::default().fg(theme.text).bg(theme.bg))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border))
            .style(Style::default().bg(theme.bg))
            .title(Span::styled("Sniper Bot", theme::header_style(theme))),
    )
}

fn render_tokens(frame: &mut Frame, app: &mut App, theme: ConsoleTheme, area: Rect) {
    if app.tokens.is_empty() {
        render_empty_panel(
            frame,
            theme,
            area,
            "Tokens",
            if app.status.is_some() {
                "No tokens observed yet."
            } else {
                "Waiting for first sync..."
            },
        );
        return;
    }

    let rows: Vec<Row> = app
        .tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            Row::new(vec![
                Cell::from(Span::raw(ellipsize(&token.address, 16))),
                Cell::from(Span::raw(token.symbol.clone())),
                Cell::from(Span::raw(format!("{:.6}", token.price))),
                Cell::from(Span::raw(format!("{:.2}", token.volume_24h))),
                Cell::from(Span::styled(
                    format!("{:+.2}%", token.price_change_1h),
                    Style::default().fg(theme::change_color(token.price_change_1h, theme)),
                )),
            ])
            .style(theme::zebra_row_style(index))
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Min(8),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Address", "Symbol", "Price", "Vol 24h", "1h Chg"])
                .style(theme::header_style(theme)),
        )
        .block(panel_block("Tokens", theme))
        .highlight_style(theme::selected_style(theme));
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_trades(frame: &mut Frame, app: &mut App, theme: ConsoleTheme, area: Rect) {
    if app.trades.is_empty() {
        render_empty_panel(frame, theme, area, "Trades", "No trades recorded yet.");
        return;
    }

    let rows: Vec<Row> = app
        .trades
        .iter()
        .enumerate()
        .map(|(index, trade)| {
            Row::new(vec![
                Cell::from(Span::raw(ellipsize(&trade.token_address, 16))),
                Cell::from(Span::styled(
                    trade.side.clone(),
                    Style::default().fg(theme::trade_side_color(&trade.side, theme)),
                )),
                Cell::from(Span::raw(format!("{:.4}", trade.amount))),
                Cell::from(Span::raw(trade.status.clone())),
                Cell::from(Span::raw(trade.timestamp.clone())),
            ])
            .style(theme::zebra_row_style(index))
        })
        .collect();

    let widths = [
        Constraint::Length(18),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(10),
        Constraint::Min(12),
    ];
    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Token", "Side", "Amount", "Status", "Time"])
                .style(theme::header_style(theme)),
        )
        .block(panel_block("Trades", theme))
        .highlight_style(theme::selected_style(theme));
    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_empty_panel(
    frame: &mut Frame,
    theme: ConsoleTheme,
    area: Rect,
    title: &'static str,
    message: &'static str,
) {
    let block = panel_block(title, theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(theme.muted),
        )))
        .wrap(Wrap { trim: true }),
        inner,
    );
}

fn panel_block(title: &'static str, theme: ConsoleTheme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg))
        .title(Span::styled(title, theme::header_style(theme)))
}

fn render_footer(app: &App, theme: ConsoleTheme) -> Paragraph<'static> {
    let controls = app.controls();
    let mut spans: Vec<Span<'static>> = Vec::new();
    push_hint(&mut spans, "s", "start", controls.start, theme);
    push_hint(&mut spans, "x", "stop", controls.stop, theme);
    push_hint(&mut spans, "n", "network", controls.switch_network, theme);
    push_hint(&mut spans, "r", "refresh", true, theme);
    push_hint(&mut spans, "Tab", "panel", true, theme);
    push_hint(&mut spans, "?", "help", true, theme);
    push_hint(&mut spans, "q", "quit", true, theme);
    if app.control_pending() {
        spans.push(Span::styled(
            " [request in flight]",
            Style::default().fg(theme.warn),
        ));
    }

    Paragraph::new(Line::from(spans))
        .style(Style::default().fg(theme.text).bg(theme.surface))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border))
                .style(Style::default().bg(theme.surface))
                .title(Span::styled(
                    app.panel.title(),
                    Style::default().fg(theme.muted),
                )),
        )
}

fn push_hint(
    spans: &mut Vec<Span<'static>>,
    key: &'static str,
    label: &'static str,
    enabled: bool,
    theme: ConsoleTheme,
) {
    let key_style = if enabled {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted).add_modifier(Modifier::DIM)
    };
    let label_style = if enabled {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.muted).add_modifier(Modifier::DIM)
    };
    if !spans.is_empty() {
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(key, key_style));
    spans.push(Span::raw(" "));
    spans.push(Span::styled(label, label_style));
}

fn render_help_overlay(frame: &mut Frame, theme: ConsoleTheme) {
    let area = centered_rect(60, 60, frame.size());
    let lines = vec![
        Line::from(Span::styled(
            "Controls",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  s        start the bot (when stopped)"),
        Line::from("  x        stop the bot (when running)"),
        Line::from("  n        switch network (mainnet/devnet)"),
        Line::from("  r        refresh now"),
        Line::from(""),
        Line::from(Span::styled(
            "Navigation",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("  1/2      Tokens / Trades panel"),
        Line::from("  Tab      cycle panel"),
        Line::from("  j/k      move selection"),
        Line::from(""),
        Line::from("  ? or F1  toggle this help"),
        Line::from("  Esc      close help"),
        Line::from("  q        quit"),
    ];
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .style(Style::default().fg(theme.text).bg(theme.surface))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(theme.border))
                    .style(Style::default().bg(theme.surface))
                    .title(Span::styled("Help", theme::header_style(theme))),
            ),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100u16.saturating_sub(percent_y)) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100u16.saturating_sub(percent_y)) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100u16.saturating_sub(percent_x)) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100u16.saturating_sub(percent_x)) / 2),
        ])
        .split(vertical[1])[1]
}

fn ellipsize(input: &str, max: usize) -> String {
    if input.chars().count() <= max {
        return input.to_string();
    }
    if max <= 3 {
        return "...".chars().take(max).collect();
    }
    let prefix: String = input.chars().take(max - 3).collect();
    format!("{prefix}...")
}

fn fit_fields(fields: &[String], max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut output = String::new();
    for field in fields {
        if field.trim().is_empty() {
            continue;
        }
        let candidate = if output.is_empty() {
            field.clone()
        } else {
            format!("{output} | {field}")
        };
        if candidate.chars().count() <= max {
            output = candidate;
            continue;
        }
        if output.is_empty() {
            return ellipsize(field, max);
        }
        break;
    }
    output
}
