//! Ratatui-based terminal UI.
//!
//! A sidebar menu selects one of five views. The two Kuznets views load a
//! dataset on entry, let the user cycle countries without refetching and
//! toggle between the chart and the raw GDP/indicator tables.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};
use tracing::{info, warn};

use crate::app::pipeline::{IndicatorDataset, country_chart, load_dataset};
use crate::chart::{ChartSpec, HoverInfo, plot_greenhouse};
use crate::config::Settings;
use crate::data::{DbnomicsClient, SeriesProvider};
use crate::domain::{Indicator, Pairing};
use crate::error::AppError;
use crate::fit::PolynomialFit;
use crate::io::{ChartFile, file_stem, write_chart_json, write_merged_dir};
use crate::report::format_indicator_table;

mod plotters_chart;

use plotters_chart::{KzPlottersChart, trace_color};

/// Rows shown per table in the dataset tab.
const TABLE_ROWS: usize = 500;

const EXPLANATION: &str = "\
Simon Kuznets (1901-1985) was an American economist awarded the 1971 Nobel Prize in Economics \
for his empirical work on long-term economic growth.

The environmental Kuznets curve, proposed by Grossman and Krueger on the basis of that work, \
states that past a certain stage of development pollution falls as income per capita rises.

Early growth increases pollution through infrastructure, production, consumption and trade. \
Wealthier economies are expected to pay more attention to the environment, so growth beyond \
some point would become beneficial for it.

There is no consensus on this relationship. Empirical data often show the opposite: more growth, \
more pollution. Growth alone does not limit its environmental impact; dedicated policies are needed.

Each chart plots an indicator against GDP per capita for one country and overlays a cubic trend.";

/// Start the TUI.
pub fn run(settings: Settings) -> Result<(), AppError> {
    let client = DbnomicsClient::new(&settings)?;
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::ui(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client, settings);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::ui(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::ui(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Explanations,
    Depletion,
    Greenhouse,
    GreenhouseAll,
    Sources,
}

impl MenuItem {
    const ALL: [MenuItem; 5] = [
        MenuItem::Explanations,
        MenuItem::Depletion,
        MenuItem::Greenhouse,
        MenuItem::GreenhouseAll,
        MenuItem::Sources,
    ];

    fn title(self) -> &'static str {
        match self {
            MenuItem::Explanations => "Explanations",
            MenuItem::Depletion => "Natural Resource Depletion",
            MenuItem::Greenhouse => "Greenhouse Gas Emission",
            MenuItem::GreenhouseAll => "Greenhouse Gas Emission for all countries",
            MenuItem::Sources => "Sources",
        }
    }

    /// Dataset needed by the view, if any.
    fn pairing(self) -> Option<Pairing> {
        match self {
            MenuItem::Depletion => Some(Pairing::Depletion),
            MenuItem::Greenhouse | MenuItem::GreenhouseAll => Some(Pairing::Greenhouse),
            MenuItem::Explanations | MenuItem::Sources => None,
        }
    }

    /// Views with a country selector and a dataset tab.
    fn is_per_country(self) -> bool {
        matches!(self, MenuItem::Depletion | MenuItem::Greenhouse)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Chart,
    Dataset,
}

/// Chart currently shown in the content panel.
#[derive(Debug, Clone)]
struct RenderedChart {
    spec: ChartSpec,
    fit: Option<PolynomialFit>,
    /// Hover-bearing points, in trace order, for the inspect cursor.
    points: Vec<(f64, f64, HoverInfo)>,
}

impl RenderedChart {
    fn new(spec: ChartSpec, fit: Option<PolynomialFit>) -> Self {
        let points = spec
            .traces
            .iter()
            .flat_map(|t| t.points().zip(t.hover.iter()).map(|((x, y), h)| (x, y, h.clone())))
            .collect();
        Self { spec, fit, points }
    }
}

struct App<P> {
    provider: P,
    settings: Settings,
    menu: MenuItem,
    tab: Tab,
    country_idx: usize,
    dataset: Option<IndicatorDataset>,
    /// Chart for the current view/country; `Err` when it could not be built.
    chart: Option<Result<RenderedChart, AppError>>,
    load_error: Option<AppError>,
    pending_load: bool,
    cursor: Option<usize>,
    scroll: u16,
    status: String,
}

impl<P: SeriesProvider> App<P> {
    fn new(provider: P, settings: Settings) -> Self {
        Self {
            provider,
            settings,
            menu: MenuItem::Explanations,
            tab: Tab::Chart,
            country_idx: 0,
            dataset: None,
            chart: None,
            load_error: None,
            pending_load: false,
            cursor: None,
            scroll: 0,
            status: "Select a view.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::ui(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // Fetching blocks; draw the "Loading" status first.
            if self.pending_load {
                self.load();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100)).map_err(|e| AppError::ui(format!("Event poll error: {e}")))? {
                continue;
            }

            match event::read().map_err(|e| AppError::ui(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.select_menu(self.menu.prev()),
            KeyCode::Down => self.select_menu(self.menu.next()),
            KeyCode::Left => self.change_country(-1),
            KeyCode::Right => self.change_country(1),
            KeyCode::Char('t') | KeyCode::Tab => {
                if self.menu.is_per_country() {
                    self.tab = match self.tab {
                        Tab::Chart => Tab::Dataset,
                        Tab::Dataset => Tab::Chart,
                    };
                    self.scroll = 0;
                }
            }
            KeyCode::Char('r') => {
                if self.menu.pairing().is_some() {
                    self.pending_load = true;
                    self.status = "Reloading from DBnomics...".to_string();
                }
            }
            KeyCode::Char('e') => {
                self.status = match self.export() {
                    Ok(msg) => msg,
                    Err(err) => format!("Export failed: {err}"),
                };
            }
            KeyCode::Char(']') => self.move_cursor(1),
            KeyCode::Char('[') => self.move_cursor(-1),
            KeyCode::PageDown | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(10),
            KeyCode::PageUp | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(10),
            _ => {}
        }
        false
    }

    fn select_menu(&mut self, item: MenuItem) {
        self.menu = item;
        self.tab = Tab::Chart;
        self.scroll = 0;
        self.cursor = None;
        self.load_error = None;
        self.chart = None;

        if item.pairing().is_none() {
            self.status = item.title().to_string();
            return;
        }
        // Each view entry triggers a fresh fetch, like a page load.
        self.dataset = None;
        self.country_idx = 0;
        self.pending_load = true;
        self.status = "Loading from DBnomics...".to_string();
    }

    fn load(&mut self) {
        self.pending_load = false;
        let Some(pairing) = self.menu.pairing() else {
            return;
        };

        match load_dataset(&self.provider, pairing, &self.settings.countries) {
            Ok(dataset) => {
                info!(
                    pairing = ?pairing,
                    countries = dataset.merged.len(),
                    "dataset loaded"
                );
                self.status = format!(
                    "Loaded {} GDP rows and {} {} rows.",
                    dataset.gdp.len(),
                    dataset.indicator.len(),
                    pairing.indicator().column_name()
                );
                self.load_error = None;
                self.country_idx = self.country_idx.min(dataset.merged.len().saturating_sub(1));
                self.dataset = Some(dataset);
                self.rebuild_chart();
            }
            Err(err) => {
                warn!(error = %err, "dataset load failed");
                self.status = format!("{}: {err}", err.kind().label());
                self.dataset = None;
                self.chart = None;
                self.load_error = Some(err);
            }
        }
    }

    fn current_country(&self) -> Option<&str> {
        let dataset = self.dataset.as_ref()?;
        dataset.countries().get(self.country_idx).copied()
    }

    fn rebuild_chart(&mut self) {
        self.cursor = None;
        let Some(dataset) = &self.dataset else {
            self.chart = None;
            return;
        };

        let built = match self.menu {
            MenuItem::Depletion | MenuItem::Greenhouse => match self.current_country() {
                Some(country) => {
                    country_chart(dataset, country).map(|k| RenderedChart::new(k.spec, Some(k.fit)))
                }
                None => Err(AppError::data("No countries available.")),
            },
            MenuItem::GreenhouseAll => plot_greenhouse(&dataset.merged).map(|spec| RenderedChart::new(spec, None)),
            MenuItem::Explanations | MenuItem::Sources => return,
        };
        if let Err(err) = &built {
            warn!(error = %err, "chart build failed");
        }
        self.chart = Some(built);
    }

    fn change_country(&mut self, delta: i64) {
        if !self.menu.is_per_country() {
            return;
        }
        let Some(n) = self.dataset.as_ref().map(|d| d.merged.len()) else {
            return;
        };
        if n == 0 {
            return;
        }
        let idx = (self.country_idx as i64 + delta).rem_euclid(n as i64);
        self.country_idx = idx as usize;
        self.scroll = 0;
        self.rebuild_chart();
        if let Some(country) = self.current_country() {
            self.status = format!("country: {country}");
        }
    }

    fn move_cursor(&mut self, delta: i64) {
        let Some(Ok(chart)) = &self.chart else {
            return;
        };
        let n = chart.points.len() as i64;
        if n == 0 {
            return;
        }
        let next = match self.cursor {
            None if delta >= 0 => 0,
            None => n - 1,
            Some(i) => (i as i64 + delta).rem_euclid(n),
        };
        self.cursor = Some(next as usize);
    }

    /// Write the merged tables as CSV and the visible chart as JSON.
    fn export(&self) -> Result<String, AppError> {
        let Some(dataset) = &self.dataset else {
            return Err(AppError::data("Nothing loaded to export."));
        };
        let dir = &self.settings.export_dir;
        let csvs = write_merged_dir(dir, &dataset.merged)?;

        let mut msg = format!("Wrote {} CSV file(s)", csvs.len());
        if let Some(Ok(chart)) = &self.chart {
            let stem = match (self.menu, self.current_country()) {
                (MenuItem::GreenhouseAll, _) | (_, None) => "greenhouse_all".to_string(),
                (m, Some(country)) => format!("{}_{}", file_stem(m.title()), file_stem(country)),
            };
            let path = dir.join(format!("{stem}.json"));
            write_chart_json(&path, &ChartFile::new(chart.spec.clone(), chart.fit.clone()))?;
            msg.push_str(&format!(" and {}", path.display()));
        }
        info!(dir = %dir.display(), "exported view");
        Ok(msg)
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                "Kuznets Environmental Curve",
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | DBnomics / World Bank WDI", Style::default().fg(Color::Gray)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(30), Constraint::Min(0)])
            .split(area);

        self.draw_menu(frame, chunks[0]);

        let block = Block::default().title(self.menu.title()).borders(Borders::ALL);
        let inner = block.inner(chunks[1]);
        frame.render_widget(block, chunks[1]);
        frame.render_widget(Clear, inner);

        match self.menu {
            MenuItem::Explanations => self.draw_explanations(frame, inner),
            MenuItem::Sources => self.draw_sources(frame, inner),
            MenuItem::Depletion | MenuItem::Greenhouse | MenuItem::GreenhouseAll => self.draw_data_view(frame, inner),
        }
    }

    fn draw_menu(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = MenuItem::ALL.iter().map(|m| ListItem::new(m.title())).collect();
        let list = List::new(items)
            .block(Block::default().title("Menu").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.menu.index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_explanations(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines = vec![
            Line::from(Span::styled(
                "What is the Kuznets Environmental Curve?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
        ];
        lines.extend(EXPLANATION.lines().map(Line::raw));
        let p = Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(p, area);
    }

    fn draw_sources(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let link = Style::default().fg(Color::Cyan);
        let mut lines = vec![Line::from(Span::styled("Data", bold))];
        for indicator in Indicator::ALL {
            lines.push(Line::raw(format!("- {}", indicator.display_name())));
            lines.push(Line::from(Span::styled(format!("  {}", indicator.source_url()), link)));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("Code", bold)));
        lines.push(Line::from(Span::styled(
            "  https://github.com/dbnomics/kuznets-environmental-curve-dashboard",
            link,
        )));
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("DBnomics", bold)));
        lines.push(Line::from(Span::styled("  https://db.nomics.world", link)));

        frame.render_widget(Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false }), area);
    }

    fn draw_data_view(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if self.pending_load {
            let msg = Paragraph::new("Loading from DBnomics...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, area);
            return;
        }
        if let Some(err) = &self.load_error {
            draw_error(frame, area, err);
            return;
        }

        let area = if self.menu.is_per_country() {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
                .split(area);
            self.draw_selector(frame, chunks[0], chunks[1]);
            chunks[2]
        } else {
            area
        };

        match self.tab {
            Tab::Dataset if self.menu.is_per_country() => self.draw_dataset(frame, area),
            _ => self.draw_chart(frame, area),
        }
    }

    fn draw_selector(&self, frame: &mut ratatui::Frame<'_>, country_row: Rect, tab_row: Rect) {
        let country = self.current_country().unwrap_or("-");
        let total = self.dataset.as_ref().map(|d| d.merged.len()).unwrap_or(0);
        let line = Line::from(vec![
            Span::styled("Country: ", Style::default().fg(Color::Gray)),
            Span::styled(format!("◀ {country} ▶"), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  ({}/{total})", (self.country_idx + 1).min(total)),
                Style::default().fg(Color::Gray),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), country_row);

        let selected = match self.tab {
            Tab::Chart => 0,
            Tab::Dataset => 1,
        };
        let tabs = Tabs::new(vec!["Chart", "Dataset"])
            .select(selected)
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, tab_row);
    }

    fn draw_dataset(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (table, rect, title) in [
            (&dataset.gdp, chunks[0], "Dataset GDP".to_string()),
            (
                &dataset.indicator,
                chunks[1],
                format!("Dataset {}", dataset.pairing.indicator().display_name()),
            ),
        ] {
            let p = Paragraph::new(format_indicator_table(table, TABLE_ROWS))
                .block(Block::default().title(title).borders(Borders::ALL))
                .scroll((self.scroll, 0));
            frame.render_widget(p, rect);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chart = match &self.chart {
            None => {
                let msg = Paragraph::new("Waiting for data...").style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, area);
                return;
            }
            Some(Err(err)) => {
                draw_error(frame, area, err);
                return;
            }
            Some(Ok(chart)) => chart,
        };

        let Some((x_bounds, y_bounds)) = chart.spec.bounds() else {
            draw_error(frame, area, &AppError::data("Chart has no finite points."));
            return;
        };

        let legend_height = if chart.spec.traces.len() > 4 { 2 } else { 1 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(legend_height),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(chart.spec.title.as_str())
            .alignment(Alignment::Center)
            .style(Style::default().add_modifier(Modifier::BOLD));
        frame.render_widget(title, chunks[0]);

        let cursor = self.cursor.and_then(|i| chart.points.get(i));
        let (chart_rect, insets) = chart_layout(chunks[1]);
        let widget = KzPlottersChart {
            spec: &chart.spec,
            x_bounds,
            y_bounds,
            cursor: cursor.map(|(x, y, _)| (*x, *y)),
        };
        frame.render_widget(widget, chart_rect);
        if let Some(insets) = insets {
            draw_axis_ticks(frame, chunks[1], chart_rect, insets, x_bounds, y_bounds, &chart.spec);
        }

        let legend: Vec<Span> = chart
            .spec
            .traces
            .iter()
            .flat_map(|t| {
                [
                    Span::styled("■ ", Style::default().fg(trace_color(&t.style.color))),
                    Span::raw(format!("{}  ", t.name)),
                ]
            })
            .collect();
        frame.render_widget(Paragraph::new(Line::from(legend)).wrap(Wrap { trim: true }), chunks[2]);

        let inspect = match cursor {
            Some((_, _, hover)) => hover.lines().join(" | "),
            None => "[ / ] inspect points".to_string(),
        };
        frame.render_widget(
            Paragraph::new(inspect).style(Style::default().fg(Color::Gray)),
            chunks[3],
        );
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ menu  ←/→ country  t tab  [/] inspect  r reload  e export  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn draw_error(frame: &mut ratatui::Frame<'_>, area: Rect, err: &AppError) {
    let p = Paragraph::new(format!("{}: {err}", err.kind().label()))
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false });
    frame.render_widget(p, area);
}

fn fmt_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e4 {
        format!("{:.0}k", v / 1e3)
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 9,
        right: 2,
        top: 1,
        bottom: 2,
    };

    if inner.width <= insets.left + insets.right + 10 || inner.height <= insets.top + insets.bottom + 5 {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

fn draw_axis_ticks(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    spec: &ChartSpec,
) {
    let ticks = 5usize;
    let style = Style::default().fg(Color::Gray);

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let x_val = x_bounds[0] + u * (x_bounds[1] - x_bounds[0]);
        let x = chart.x + ((chart.width - 1) as f64 * u).round() as u16;
        let label = match spec.x_axis.kind {
            crate::chart::AxisKind::Year => format!("{:.0}", x_val.floor()),
            crate::chart::AxisKind::Linear => fmt_tick(x_val),
        };
        let label_len = label.len() as u16;
        let start = x.saturating_sub(label_len / 2);
        let y = chart.y + chart.height;
        if y >= inner.y + inner.height - 1 {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    for i in 0..ticks {
        let u = i as f64 / (ticks as f64 - 1.0);
        let y_val = y_bounds[0] + u * (y_bounds[1] - y_bounds[0]);
        let y = chart.y + (chart.height - 1) - ((chart.height - 1) as f64 * u).round() as u16;
        let label = fmt_tick(y_val);
        let label_len = label.len() as u16;
        let x = inner.x + insets.left.saturating_sub(1);
        let start = x.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(label).style(style),
            Rect {
                x: start,
                y,
                width: label_len,
                height: 1,
            },
        );
    }

    let x_label = Paragraph::new(spec.x_axis.label.as_str())
        .alignment(Alignment::Center)
        .style(style);
    let x_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height + 1,
        width: chart.width,
        height: 1,
    };
    if x_rect.y < inner.y + inner.height {
        frame.render_widget(x_label, x_rect);
    }

    let y_label = Paragraph::new(spec.y_axis.label.as_str()).style(style.add_modifier(Modifier::BOLD));
    let y_rect = Rect {
        x: inner.x,
        y: inner.y,
        width: inner.width,
        height: 1,
    };
    frame.render_widget(y_label, y_rect);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testing::StubProvider;
    use crate::error::ErrorKind;

    fn years(base: f64, step: f64) -> Vec<(String, Option<f64>)> {
        (0..6).map(|i| (format!("{}", 1995 + i), Some(base + step * i as f64))).collect()
    }

    fn as_refs(v: &[(String, Option<f64>)]) -> Vec<(&str, Option<f64>)> {
        v.iter().map(|(p, x)| (p.as_str(), *x)).collect()
    }

    fn app() -> App<StubProvider> {
        let usa_gdp = years(40000.0, 900.0);
        let chn_gdp = years(1000.0, 300.0);
        let usa_dep = years(0.5, 0.05);
        let usa_ghg = years(6.0e6, 1.0e5);
        let chn_ghg = years(4.0e6, 5.0e5);

        let stub = StubProvider::default()
            .with_series(Indicator::GdpPerCapita, "USA", "United States", &as_refs(&usa_gdp))
            .with_series(Indicator::GdpPerCapita, "CHN", "China", &as_refs(&chn_gdp))
            .with_series(Indicator::Depletion, "USA", "United States", &as_refs(&usa_dep))
            .with_series(Indicator::Depletion, "CHN", "China", &[("1995", None)])
            .with_series(Indicator::Greenhouse, "USA", "United States", &as_refs(&usa_ghg))
            .with_series(Indicator::Greenhouse, "CHN", "China", &as_refs(&chn_ghg));

        let settings = Settings {
            countries: vec!["USA".to_string(), "CHN".to_string()],
            ..Settings::default()
        };
        App::new(stub, settings)
    }

    #[test]
    fn menu_wraps_around() {
        assert_eq!(MenuItem::Explanations.prev(), MenuItem::Sources);
        assert_eq!(MenuItem::Sources.next(), MenuItem::Explanations);
        assert_eq!(MenuItem::Depletion.next(), MenuItem::Greenhouse);
        assert_eq!(MenuItem::GreenhouseAll.pairing(), Some(Pairing::Greenhouse));
        assert_eq!(MenuItem::Sources.pairing(), None);
    }

    #[test]
    fn static_views_do_not_fetch() {
        let mut app = app();
        app.select_menu(MenuItem::Sources);
        assert!(!app.pending_load);
        assert_eq!(app.provider.calls.get(), 0);
    }

    #[test]
    fn entering_a_data_view_loads_and_charts_first_country() {
        let mut app = app();
        app.handle_key(KeyCode::Down);
        assert_eq!(app.menu, MenuItem::Depletion);
        assert!(app.pending_load);

        app.load();
        assert!(app.load_error.is_none());
        assert_eq!(app.current_country(), Some("United States"));
        let chart = app.chart.as_ref().unwrap().as_ref().unwrap();
        assert!(chart.fit.is_some());
        assert_eq!(chart.points.len(), 6);
    }

    #[test]
    fn switching_country_reuses_the_dataset() {
        let mut app = app();
        app.select_menu(MenuItem::Depletion);
        app.load();
        let calls = app.provider.calls.get();

        app.handle_key(KeyCode::Right);
        assert_eq!(app.current_country(), Some("China"));
        assert_eq!(app.provider.calls.get(), calls);
        // China has no depletion values: the fit error is shown in place of the chart.
        let err = app.chart.as_ref().unwrap().as_ref().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fit);

        app.handle_key(KeyCode::Right);
        assert_eq!(app.current_country(), Some("United States"));
    }

    #[test]
    fn aggregate_view_has_no_fit() {
        let mut app = app();
        app.select_menu(MenuItem::GreenhouseAll);
        app.load();
        let chart = app.chart.as_ref().unwrap().as_ref().unwrap();
        assert!(chart.fit.is_none());
        assert_eq!(chart.spec.traces.len(), 2);
        // Dataset tab is only offered on per-country views.
        app.handle_key(KeyCode::Char('t'));
        assert_eq!(app.tab, Tab::Chart);
    }

    #[test]
    fn fetch_error_is_kept_for_display() {
        let settings = Settings::default();
        let mut app = App::new(StubProvider::failing(AppError::fetch("HTTP 503")), settings);
        app.select_menu(MenuItem::Greenhouse);
        app.load();
        assert!(app.dataset.is_none());
        assert_eq!(app.load_error.as_ref().map(|e| e.kind()), Some(ErrorKind::Fetch));
        assert!(app.status.contains("HTTP 503"));
    }

    #[test]
    fn inspect_cursor_wraps() {
        let mut app = app();
        app.select_menu(MenuItem::Greenhouse);
        app.load();
        app.handle_key(KeyCode::Char('['));
        assert_eq!(app.cursor, Some(5));
        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.cursor, Some(0));
    }

    #[test]
    fn export_writes_csv_and_chart() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.settings.export_dir = dir.path().to_path_buf();
        app.select_menu(MenuItem::Greenhouse);
        app.load();

        let msg = app.export().unwrap();
        assert!(msg.starts_with("Wrote 2 CSV file(s)"));
        let chart_path = dir
            .path()
            .join("greenhouse_gas_emission_united_states.json");
        assert!(chart_path.exists());
    }

    #[test]
    fn export_without_data_fails() {
        let app = app();
        assert_eq!(app.export().unwrap_err().kind(), ErrorKind::Data);
    }

    #[test]
    fn tick_labels_are_compact() {
        assert_eq!(fmt_tick(1_300_000.0), "1.3M");
        assert_eq!(fmt_tick(45_000.0), "45k");
        assert_eq!(fmt_tick(0.5), "0.50");
    }
}
