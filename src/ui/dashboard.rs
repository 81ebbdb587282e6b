//! Dashboard screen UI
//!
//! Renders the single-screen dashboard: a search bar at the top, then the
//! current conditions, the five-day strip, the temperature curve and the
//! air quality gauge, with a help line at the bottom.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::{App, AppState};
use crate::data::{AirQuality, AqiLevel, CitySnapshot, DailySummary};
use crate::ui::widgets::TemperatureSparkline;

/// Color scheme for the dashboard
mod colors {
    use ratatui::style::Color;

    /// Good air quality (green)
    pub const GOOD: Color = Color::Green;
    /// Moderate air quality (yellow)
    pub const MODERATE: Color = Color::Yellow;
    /// Unhealthy for sensitive groups (orange)
    pub const SENSITIVE: Color = Color::Rgb(255, 165, 0);
    /// Unhealthy (red)
    pub const UNHEALTHY: Color = Color::Red;
    /// Very unhealthy (purple)
    pub const VERY_UNHEALTHY: Color = Color::Magenta;
    /// Hazardous (maroon)
    pub const HAZARDOUS: Color = Color::Rgb(128, 0, 0);
    /// Unknown/unavailable status (gray)
    pub const UNKNOWN: Color = Color::DarkGray;
    /// Section headers
    pub const HEADER: Color = Color::Cyan;
    /// Primary text
    pub const PRIMARY: Color = Color::White;
    /// Secondary/dimmed text
    pub const SECONDARY: Color = Color::Gray;
    /// Error banner
    pub const ERROR: Color = Color::Red;
    /// Temperature curve
    pub const CURVE: Color = Color::Cyan;
}

/// AQI value above which the gauge renders full
const GAUGE_AQI_CEILING: u32 = 200;

/// Renders the dashboard screen
///
/// # Arguments
/// * `frame` - The ratatui frame to render into
/// * `app` - The application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(0),    // Body
            Constraint::Length(1), // Help line
        ])
        .split(area);

    render_search_bar(frame, main_chunks[0], app);
    render_body(frame, main_chunks[1], app);
    render_help_line(frame, main_chunks[2]);
}

/// Renders the search bar with the current input text
fn render_search_bar(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::HEADER))
        .title(Span::styled(
            " Recherche ",
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ));

    let input = Paragraph::new(Line::from(vec![
        Span::styled(app.input.clone(), Style::default().fg(colors::PRIMARY)),
        Span::styled("\u{2588}", Style::default().fg(colors::SECONDARY)),
    ]))
    .block(block);

    frame.render_widget(input, area);
}

/// Renders the body according to the current application state
fn render_body(frame: &mut Frame, area: Rect, app: &App) {
    match &app.state {
        AppState::Idle => render_idle(frame, area),
        AppState::Loading => render_loading(frame, area, app),
        AppState::Error(message) => {
            // The last snapshot stays visible behind the banner
            if let Some(snapshot) = &app.snapshot {
                let banner_chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Length(3), Constraint::Min(0)])
                    .split(area);
                render_error_banner(frame, banner_chunks[0], message);
                render_snapshot(frame, banner_chunks[1], app, snapshot);
            } else {
                render_error_banner(frame, area, message);
            }
        }
        AppState::Dashboard => {
            if let Some(snapshot) = &app.snapshot {
                render_snapshot(frame, area, app, snapshot);
            }
        }
    }
}

/// Renders the idle prompt shown before any search
fn render_idle(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Entrez un nom de ville puis validez avec Entrée.",
            Style::default().fg(colors::SECONDARY),
        )),
    ]);
    frame.render_widget(paragraph, area);
}

/// Renders the loading indicator while a search is in flight
fn render_loading(frame: &mut Frame, area: Rect, app: &App) {
    let city = app.input.trim();
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Chargement", Style::default().fg(colors::HEADER)),
            Span::styled(
                if city.is_empty() {
                    "...".to_string()
                } else {
                    format!(" de {}...", city)
                },
                Style::default().fg(colors::SECONDARY),
            ),
        ]),
    ]);
    frame.render_widget(paragraph, area);
}

/// Renders the error banner with a user-facing message
fn render_error_banner(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::ERROR))
        .title(Span::styled(
            " Erreur ",
            Style::default()
                .fg(colors::ERROR)
                .add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(colors::PRIMARY),
    )))
    .block(block);

    frame.render_widget(paragraph, area);
}

/// Renders a full snapshot: current conditions, daily strip, curve, air gauge
fn render_snapshot(frame: &mut Frame, area: Rect, app: &App, snapshot: &CitySnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Current conditions
            Constraint::Length(5), // Daily strip
            Constraint::Length(4), // Temperature curve
            Constraint::Length(4), // Air quality gauge
            Constraint::Min(0),    // Location footer
        ])
        .split(area);

    render_current_section(frame, chunks[0], snapshot);
    render_daily_strip(frame, chunks[1], &snapshot.daily);
    render_temperature_curve(frame, chunks[2], snapshot);
    render_air_quality_section(frame, chunks[3], &snapshot.air);
    render_location_footer(frame, chunks[4], app, snapshot);
}

/// Renders the current weather conditions section
fn render_current_section(frame: &mut Frame, area: Rect, snapshot: &CitySnapshot) {
    let current = &snapshot.current;
    let mut lines = vec![Line::from(Span::styled(
        format!("{}, {}", current.city, current.country),
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    ))];

    let icon = icon_glyph(&current.icon);
    lines.push(Line::from(vec![
        Span::raw(format!("{}  ", icon)),
        Span::styled(
            format!("{:.1}\u{00B0}C", current.temperature),
            Style::default()
                .fg(colors::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" (ressenti {:.1}\u{00B0}C)", current.feels_like),
            Style::default().fg(colors::SECONDARY),
        ),
    ]));

    lines.push(Line::from(Span::styled(
        current.description.clone(),
        Style::default().fg(colors::PRIMARY),
    )));

    lines.push(Line::from(vec![
        Span::styled("Humidité : ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            format!("{}%", current.humidity),
            Style::default().fg(colors::PRIMARY),
        ),
    ]));

    lines.push(Line::from(vec![
        Span::styled("Vent : ", Style::default().fg(colors::SECONDARY)),
        Span::styled(
            format!("{:.1} km/h", current.wind_speed_kmh()),
            Style::default().fg(colors::PRIMARY),
        ),
    ]));

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, area);
}

/// Renders the five-day strip, one column per day
fn render_daily_strip(frame: &mut Frame, area: Rect, daily: &[DailySummary]) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(colors::SECONDARY))
        .title(Span::styled(
            " Prévisions ",
            Style::default().fg(colors::HEADER),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if daily.is_empty() || inner.width == 0 {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            "Aucune prévision disponible",
            Style::default().fg(colors::UNKNOWN),
        )));
        frame.render_widget(paragraph, inner);
        return;
    }

    let count = daily.len().min(6) as u32;
    let constraints: Vec<Constraint> =
        (0..count).map(|_| Constraint::Ratio(1, count)).collect();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(inner);

    for (day, column) in daily.iter().zip(columns.iter()) {
        let lines = vec![
            Line::from(Span::styled(
                day.date.format("%a %d").to_string(),
                Style::default().fg(colors::SECONDARY),
            )),
            Line::from(Span::raw(icon_glyph(&day.icon).to_string())),
            Line::from(vec![
                Span::styled(
                    format!("{:.0}\u{00B0}", day.temp_max),
                    Style::default().fg(colors::PRIMARY),
                ),
                Span::styled(
                    format!("/{:.0}\u{00B0}", day.temp_min),
                    Style::default().fg(colors::SECONDARY),
                ),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), *column);
    }
}

/// Renders the temperature curve over the 3-hourly samples
fn render_temperature_curve(frame: &mut Frame, area: Rect, snapshot: &CitySnapshot) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(colors::SECONDARY))
        .title(Span::styled(
            " Température ",
            Style::default().fg(colors::HEADER),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let temps: Vec<f64> = snapshot.samples.iter().map(|s| s.temperature).collect();
    if temps.is_empty() || inner.height == 0 {
        return;
    }

    let curve_area = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width,
        height: 1,
    };
    let sparkline =
        TemperatureSparkline::new(&temps).style(Style::default().fg(colors::CURVE));
    frame.render_widget(sparkline, curve_area);

    if inner.height > 1 {
        let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
        let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let legend_area = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: 1,
        };
        let legend = Paragraph::new(Line::from(Span::styled(
            format!("min {:.1}\u{00B0}C  max {:.1}\u{00B0}C", min, max),
            Style::default().fg(colors::SECONDARY),
        )));
        frame.render_widget(legend, legend_area);
    }
}

/// Renders the air quality gauge, or the unavailable notice
fn render_air_quality_section(frame: &mut Frame, area: Rect, air: &AirQuality) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(colors::SECONDARY))
        .title(Span::styled(
            " Qualité de l'air ",
            Style::default().fg(colors::HEADER),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match air {
        AirQuality::Reading(reading) => {
            let level = AqiLevel::from_aqi(reading.aqi);
            let color = level_color(level);

            let gauge_area = Rect {
                x: inner.x,
                y: inner.y,
                width: inner.width,
                height: 1,
            };
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(color))
                .ratio(gauge_ratio(reading.aqi))
                .label(Span::styled(
                    format!("AQI {} ({})", reading.aqi, level.label()),
                    Style::default()
                        .fg(colors::PRIMARY)
                        .add_modifier(Modifier::BOLD),
                ));
            frame.render_widget(gauge, gauge_area);

            if inner.height > 1 {
                let detail_area = Rect {
                    x: inner.x,
                    y: inner.y + 1,
                    width: inner.width,
                    height: 1,
                };
                let detail = Paragraph::new(Line::from(vec![
                    Span::styled(
                        "Polluant principal : ",
                        Style::default().fg(colors::SECONDARY),
                    ),
                    Span::styled(
                        reading.main_pollutant.clone(),
                        Style::default().fg(colors::PRIMARY),
                    ),
                ]));
                frame.render_widget(detail, detail_area);
            }
        }
        AirQuality::Unavailable => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "Données de qualité de l'air non disponibles pour cette localisation.",
                Style::default().fg(colors::UNKNOWN),
            )));
            frame.render_widget(paragraph, inner);
        }
    }
}

/// Renders the location footer with coordinates and last refresh time
fn render_location_footer(frame: &mut Frame, area: Rect, app: &App, snapshot: &CitySnapshot) {
    if area.height == 0 {
        return;
    }

    let coords = snapshot.current.coords;
    let mut spans = vec![Span::styled(
        format!("lat {:.4}  lon {:.4}", coords.latitude, coords.longitude),
        Style::default().fg(colors::SECONDARY),
    )];

    if let Some(refreshed) = app.last_refresh {
        spans.push(Span::styled(
            format!("  mis à jour {}", refreshed.format("%H:%M:%S")),
            Style::default().fg(colors::SECONDARY),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans));
    frame.render_widget(paragraph, area);
}

/// Renders the key bindings help line
fn render_help_line(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Entrée: rechercher  Échap: quitter  Ctrl+C: quitter",
        Style::default().fg(colors::SECONDARY),
    )));
    frame.render_widget(paragraph, area);
}

/// Gauge fill ratio for an AQI value
///
/// Values above the ceiling render as a full gauge; the numeric label
/// still shows the unclamped AQI.
fn gauge_ratio(aqi: u32) -> f64 {
    f64::from(aqi.min(GAUGE_AQI_CEILING)) / f64::from(GAUGE_AQI_CEILING)
}

/// Returns the gauge color for an air quality band
fn level_color(level: AqiLevel) -> Color {
    match level {
        AqiLevel::Good => colors::GOOD,
        AqiLevel::Moderate => colors::MODERATE,
        AqiLevel::UnhealthySensitive => colors::SENSITIVE,
        AqiLevel::Unhealthy => colors::UNHEALTHY,
        AqiLevel::VeryUnhealthy => colors::VERY_UNHEALTHY,
        AqiLevel::Hazardous => colors::HAZARDOUS,
    }
}

/// Returns a glyph for an OpenWeatherMap icon code
///
/// Codes end with "d" or "n" for day and night variants; the leading
/// digits identify the condition.
fn icon_glyph(code: &str) -> &'static str {
    match code.get(..2) {
        Some("01") => "\u{2600}",  // ☀
        Some("02") => "\u{26C5}",  // ⛅
        Some("03") | Some("04") => "\u{2601}", // ☁
        Some("09") | Some("10") => "\u{1F327}", // 🌧
        Some("11") => "\u{26C8}",  // ⛈
        Some("13") => "\u{2744}",  // ❄
        Some("50") => "\u{1F32B}", // 🌫
        _ => "\u{2022}",           // •
    }
}
