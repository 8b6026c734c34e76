use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::{
    Component, EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, StatusBar,
    StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::halfblock::SpriteWidget;
use crate::state::{AppState, Banner, OverlayTab, SearchOutcome, SEARCH_MIN_CHARS};
use crate::view::{
    grid_view, overlay_view, page_button, CardView, EvoTabView, GridView, MainTabView,
    OverlayView, StatBarView, TabBody,
};

const BG_BASE: Color = Color::Rgb(12, 18, 28);
const BG_PANEL: Color = Color::Rgb(20, 32, 46);
const BG_CARD: Color = Color::Rgb(26, 40, 58);
const BG_HIGHLIGHT: Color = Color::Rgb(28, 62, 80);
const BG_ERROR: Color = Color::Rgb(120, 32, 40);
const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

pub const CARD_WIDTH: u16 = 20;
pub const CARD_HEIGHT: u16 = 10;
const OVERLAY_WIDTH: u16 = 72;
const OVERLAY_HEIGHT: u16 = 24;
const OVERLAY_IMAGE_WIDTH: u16 = 26;
const OVERLAY_HEADER_ROWS: u16 = 10;
const STAT_LABEL_WIDTH: usize = 7;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokeComponentId {
    Search,
    Grid,
    Overlay,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokeContext {
    Search,
    Grid,
    Overlay,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        self.modal().or(Some(PokeComponentId::Grid))
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.overlay_open() {
            Some(PokeComponentId::Overlay)
        } else if self.search.editing {
            Some(PokeComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Search => PokeContext::Search,
            PokeComponentId::Grid => PokeContext::Grid,
            PokeComponentId::Overlay => PokeContext::Overlay,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Grid
    }
}

/// Where each routed component landed on the last draw.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenAreas {
    pub search: Rect,
    pub grid: Rect,
    pub overlay: Option<Rect>,
}

pub struct PokeUi {
    overlay: Modal,
    status_bar: StatusBar,
    card_areas: Vec<(Rect, u32)>,
    grid_columns: u16,
}

impl Default for PokeUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PokeUi {
    pub fn new() -> Self {
        Self {
            overlay: Modal::new(),
            status_bar: StatusBar::new(),
            card_areas: Vec::new(),
            grid_columns: 1,
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokeComponentId>,
    ) {
        let areas = self.draw(frame, area, state);
        event_ctx.set_component_area(PokeComponentId::Search, areas.search);
        event_ctx.set_component_area(PokeComponentId::Grid, areas.grid);
        match areas.overlay {
            Some(rect) => event_ctx.set_component_area(PokeComponentId::Overlay, rect),
            None => {
                event_ctx
                    .component_areas
                    .remove(&PokeComponentId::Overlay);
            }
        }
    }

    /// Draws the whole screen and remembers card positions for mouse hits.
    pub fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) -> ScreenAreas {
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let banner_rows = if state.banner.is_some() { 1 } else { 0 };
        let [header, banner, grid, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(banner_rows),
            Constraint::Min(4),
            Constraint::Length(3),
        ])
        .areas(area);

        render_header(frame, header, state);
        if let Some(message) = state.banner.as_ref() {
            render_banner(frame, banner, message);
        }
        self.grid_columns = render_grid(frame, grid, state, &mut self.card_areas);
        render_footer(frame, footer, state, &mut self.status_bar);

        let overlay = overlay_view(state)
            .map(|view| render_overlay(frame, area, state, &view, &mut self.overlay));

        ScreenAreas {
            search: header,
            grid,
            overlay,
        }
    }

    pub fn card_at(&self, column: u16, row: u16) -> Option<u32> {
        self.card_areas
            .iter()
            .find(|(rect, _)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(_, id)| *id)
    }

    pub fn grid_columns(&self) -> u16 {
        self.grid_columns
    }

    pub fn handle_grid_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let columns = i16::try_from(self.grid_columns.max(1)).unwrap_or(1);
        let actions = match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Left | KeyCode::Char('h') => vec![Action::GridMove(-1)],
                KeyCode::Right | KeyCode::Char('l') => vec![Action::GridMove(1)],
                KeyCode::Up | KeyCode::Char('k') => vec![Action::GridMove(-columns)],
                KeyCode::Down | KeyCode::Char('j') => vec![Action::GridMove(columns)],
                KeyCode::Enter => vec![Action::GridOpen],
                KeyCode::Char('/') => vec![Action::SearchFocus],
                KeyCode::Char('n') | KeyCode::Char(' ') => vec![Action::PageButton],
                KeyCode::Esc if state.search.is_active() || !state.search.query.is_empty() => {
                    vec![Action::SearchClear]
                }
                _ => vec![],
            },
            EventKind::Scroll { delta, .. } => {
                vec![Action::GridMove((*delta as i16).saturating_mul(columns))]
            }
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => self
                .card_at(mouse.column, mouse.row)
                .map(Action::OverlayOpen)
                .into_iter()
                .collect(),
            _ => vec![],
        };
        handler_response(actions)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }

    pub fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_overlay_event(event, state)
    }
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc => vec![Action::SearchClear],
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => vec![Action::SearchBlur],
            KeyCode::Backspace => vec![Action::SearchBackspace],
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                vec![Action::SearchClear]
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                vec![Action::SearchInput(ch)]
            }
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_overlay_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            KeyCode::Esc | KeyCode::Backspace => vec![Action::OverlayClose],
            KeyCode::Left | KeyCode::Char('h') => vec![Action::OverlayStep(-1)],
            KeyCode::Right | KeyCode::Char('l') => vec![Action::OverlayStep(1)],
            KeyCode::Tab => vec![Action::OverlayTabNext],
            KeyCode::Char('1') | KeyCode::Char('m') => vec![Action::OverlayTab(OverlayTab::Main)],
            KeyCode::Char('2') | KeyCode::Char('s') => {
                vec![Action::OverlayTab(OverlayTab::Stats)]
            }
            KeyCode::Char('3') | KeyCode::Char('e') => vec![Action::OverlayTab(OverlayTab::Evo)],
            _ => vec![],
        },
        EventKind::Scroll { delta, .. } if *delta != 0 => {
            vec![Action::OverlayStep(if *delta > 0 { 1 } else { -1 })]
        }
        _ => vec![],
    };
    handler_response(actions)
}

/// Keys that work everywhere except while typing a query.
pub fn handle_global_event(event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
    match event {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(*width, *height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                HandlerResponse::action(Action::Quit)
            }
            KeyCode::Char('q') if !state.search.editing => HandlerResponse::action(Action::Quit),
            KeyCode::Char('x') if !state.search.editing && state.banner.is_some() => {
                HandlerResponse::action(Action::BannerDismiss)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let query_style = if state.search.editing {
        Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_MAIN)
    };
    let query = if state.search.editing {
        format!("{}_", state.search.query)
    } else if state.search.query.is_empty() {
        "press / to search".to_string()
    } else {
        state.search.query.clone()
    };

    let mut spans = vec![
        Span::styled("Search: ", Style::default().fg(TEXT_DIM)),
        Span::styled(query, query_style),
    ];
    if let Some(status) = search_status(state) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status, Style::default().fg(ACCENT_GOLD)));
    }

    let border = if state.search.editing {
        Style::default().fg(ACCENT_TEAL)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            "POKEGRID",
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        ))
        .border_style(border)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn search_status(state: &AppState) -> Option<String> {
    let typed = state.search.normalized_query().chars().count();
    if typed > 0 && typed < SEARCH_MIN_CHARS {
        return Some(format!("type {SEARCH_MIN_CHARS}+ letters"));
    }
    let status = match state.search.outcome? {
        SearchOutcome::Pending(_) => format!("{} searching", spinner(state.tick)),
        SearchOutcome::Found(_) => "1 match".to_string(),
        SearchOutcome::NotFound => "no match".to_string(),
        SearchOutcome::Failed => "search failed".to_string(),
    };
    Some(status)
}

fn render_banner(frame: &mut Frame, area: Rect, banner: &Banner) {
    let line = Line::from(vec![
        Span::styled(" ! ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(banner.message.clone()),
        Span::styled("  [x] dismiss", Style::default().fg(TEXT_DIM)),
    ]);
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(BG_ERROR).fg(TEXT_MAIN)),
        area,
    );
}

/// Returns the number of card columns that fit.
fn render_grid(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    card_areas: &mut Vec<(Rect, u32)>,
) -> u16 {
    card_areas.clear();
    let title = if state.search.is_active() {
        "SEARCH RESULT"
    } else {
        "POKEMON"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(TEXT_DIM))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = (inner.width / CARD_WIDTH).max(1);
    let cards = match grid_view(state) {
        GridView::Cards(cards) => cards,
        other => {
            render_grid_placeholder(frame, inner, &other, state.tick);
            return columns;
        }
    };

    let per_row = usize::from(columns);
    let rows_visible = usize::from((inner.height / CARD_HEIGHT).max(1));
    let cursor_row = state.grid_cursor / per_row;
    let first_row = (cursor_row + 1).saturating_sub(rows_visible);

    for (index, card) in cards.iter().enumerate().skip(first_row * per_row) {
        let row = index / per_row - first_row;
        if row >= rows_visible {
            break;
        }
        let col = (index % per_row) as u16;
        let rect = Rect::new(
            inner.x + col * CARD_WIDTH,
            inner.y + row as u16 * CARD_HEIGHT,
            CARD_WIDTH,
            CARD_HEIGHT,
        )
        .intersection(inner);
        if rect.is_empty() {
            continue;
        }
        render_card(frame, rect, card, state, index == state.grid_cursor);
        card_areas.push((rect, card.id));
    }
    columns
}

fn render_grid_placeholder(frame: &mut Frame, area: Rect, view: &GridView, tick: u64) {
    let (text, color) = match view {
        GridView::Loading => (format!("{} Loading...", spinner(tick)), TEXT_DIM),
        GridView::Searching => (format!("{} Searching...", spinner(tick)), TEXT_DIM),
        GridView::NotFound => ("Pokemon not found".to_string(), ACCENT_GOLD),
        GridView::Unavailable => ("Search failed. Esc to go back.".to_string(), ACCENT_GOLD),
        GridView::Empty | GridView::Cards(_) => ("Nothing to show.".to_string(), TEXT_DIM),
    };
    render_centered(frame, area, Span::styled(text, Style::default().fg(color)));
}

fn render_card(frame: &mut Frame, area: Rect, card: &CardView, state: &AppState, selected: bool) {
    let (border, bg) = if selected {
        (
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            BG_HIGHLIGHT,
        )
    } else {
        (Style::default().fg(TEXT_DIM), BG_CARD)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(
            card.label.clone(),
            Style::default().fg(ACCENT_GOLD),
        ))
        .style(Style::default().bg(bg).fg(TEXT_MAIN));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [image, name, types] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);
    render_sprite(frame, image, state, card.id);
    frame.render_widget(
        Paragraph::new(Span::styled(
            card.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        name,
    );
    frame.render_widget(
        Paragraph::new(type_badges(&card.types)).alignment(Alignment::Center),
        types,
    );
}

fn render_sprite(frame: &mut Frame, area: Rect, state: &AppState, id: u32) {
    if area.is_empty() {
        return;
    }
    if let Some(sprite) = state.sprites.get(&id) {
        frame.render_widget(SpriteWidget::new(sprite), area);
        return;
    }
    let text = if state.sprite_pending.contains(&id) {
        "..."
    } else {
        "[no image]"
    };
    render_centered(frame, area, Span::styled(text, Style::default().fg(TEXT_DIM)));
}

fn render_centered(frame: &mut Frame, area: Rect, span: Span<'_>) {
    if area.is_empty() {
        return;
    }
    let row = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
    frame.render_widget(Paragraph::new(span).alignment(Alignment::Center), row);
}

fn type_badges(types: &[String]) -> Line<'static> {
    let mut spans = Vec::with_capacity(types.len() * 2);
    for (index, name) in types.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            name.to_ascii_uppercase(),
            Style::default()
                .fg(Color::Black)
                .bg(type_color(name))
                .add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(168, 168, 120),
        "fire" => Color::Rgb(240, 128, 48),
        "water" => Color::Rgb(104, 144, 240),
        "electric" => Color::Rgb(248, 208, 48),
        "grass" => Color::Rgb(120, 200, 80),
        "ice" => Color::Rgb(152, 216, 216),
        "fighting" => Color::Rgb(192, 48, 40),
        "poison" => Color::Rgb(160, 64, 160),
        "ground" => Color::Rgb(224, 192, 104),
        "flying" => Color::Rgb(168, 144, 240),
        "psychic" => Color::Rgb(248, 88, 136),
        "bug" => Color::Rgb(168, 184, 32),
        "rock" => Color::Rgb(184, 160, 56),
        "ghost" => Color::Rgb(112, 88, 152),
        "dragon" => Color::Rgb(112, 56, 248),
        "dark" => Color::Rgb(112, 88, 72),
        "steel" => Color::Rgb(184, 184, 208),
        "fairy" => Color::Rgb(238, 153, 172),
        _ => TEXT_DIM,
    }
}

fn render_overlay(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    view: &OverlayView,
    modal: &mut Modal,
) -> Rect {
    let modal_area = centered_rect(
        OVERLAY_WIDTH.min(area.width),
        OVERLAY_HEIGHT.min(area.height),
        area,
    );
    let mut render_content = |frame: &mut Frame, content: Rect| {
        render_overlay_content(frame, content, state, view);
    };
    modal.render(
        frame,
        area,
        ModalProps {
            is_open: true,
            is_focused: true,
            area: modal_area,
            style: ModalStyle {
                base: BaseStyle {
                    bg: Some(BG_PANEL),
                    padding: Padding::default(),
                    border: None,
                    fg: Some(TEXT_MAIN),
                },
                ..Default::default()
            },
            behavior: ModalBehavior::default(),
            on_close: || Action::OverlayClose,
            render_content: &mut render_content,
        },
    );
    modal_area
}

fn render_overlay_content(frame: &mut Frame, area: Rect, state: &AppState, view: &OverlayView) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT_TEAL))
        .title(Span::styled(
            format!(" {} ", view.title),
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [header, tabs, body] = Layout::vertical([
        Constraint::Length(OVERLAY_HEADER_ROWS),
        Constraint::Length(2),
        Constraint::Min(1),
    ])
    .areas(inner);
    let [image, info] = Layout::horizontal([
        Constraint::Length(OVERLAY_IMAGE_WIDTH),
        Constraint::Min(10),
    ])
    .areas(header);

    render_sprite(frame, image, state, view.id);
    let info_text = Text::from(vec![
        Line::from(Span::styled(
            view.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        type_badges(&view.types),
        Line::default(),
        Line::from(Span::styled(
            "<-/-> prev/next  Tab switch  Esc close",
            Style::default().fg(TEXT_DIM),
        )),
    ]);
    frame.render_widget(Paragraph::new(info_text).wrap(Wrap { trim: true }), info);

    let titles: Vec<&str> = OverlayTab::ALL.iter().map(|tab| tab.label()).collect();
    frame.render_widget(
        Tabs::new(titles)
            .select(view.tab.index())
            .style(Style::default().fg(TEXT_DIM))
            .highlight_style(
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            ),
        tabs,
    );

    match &view.body {
        TabBody::Loading => {
            let text = format!("{} Loading...", spinner(state.tick));
            frame.render_widget(Paragraph::new(text).style(Style::default().fg(TEXT_DIM)), body);
        }
        TabBody::Main(main) => {
            frame.render_widget(
                Paragraph::new(main_text(main)).wrap(Wrap { trim: true }),
                body,
            );
        }
        TabBody::Stats(bars) => {
            frame.render_widget(Paragraph::new(stat_lines(bars, body.width)), body);
        }
        TabBody::Evo(evo) => render_evolution(frame, body, state, evo),
    }
}

fn main_text(main: &MainTabView) -> Text<'static> {
    let label = Style::default().fg(TEXT_DIM);
    Text::from(vec![
        Line::from(vec![
            Span::styled("Height:    ", label),
            Span::raw(main.height.clone()),
        ]),
        Line::from(vec![
            Span::styled("Weight:    ", label),
            Span::raw(main.weight.clone()),
        ]),
        Line::from(vec![
            Span::styled("Abilities: ", label),
            Span::raw(main.abilities.clone()),
        ]),
    ])
}

fn stat_lines(bars: &[StatBarView], width: u16) -> Vec<Line<'static>> {
    let bar_width = usize::from(width).saturating_sub(STAT_LABEL_WIDTH + 5);
    bars.iter()
        .map(|bar| {
            let filled = bar_width * usize::from(bar.percent) / 100;
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", bar.label, width = STAT_LABEL_WIDTH),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::styled(
                    format!("{:>3} ", bar.value),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled("█".repeat(filled), Style::default().fg(ACCENT_TEAL)),
                Span::styled(
                    "░".repeat(bar_width - filled),
                    Style::default().fg(TEXT_DIM),
                ),
            ])
        })
        .collect()
}

fn render_evolution(frame: &mut Frame, area: Rect, state: &AppState, evo: &EvoTabView) {
    let stages = match evo {
        EvoTabView::Loading => {
            let text = format!("{} Loading evolution chain...", spinner(state.tick));
            frame.render_widget(Paragraph::new(text).style(Style::default().fg(TEXT_DIM)), area);
            return;
        }
        EvoTabView::Unavailable => {
            frame.render_widget(
                Paragraph::new("Evolution chain unavailable.").style(Style::default().fg(TEXT_DIM)),
                area,
            );
            return;
        }
        EvoTabView::Stages(stages) => stages,
    };
    if stages.is_empty() {
        return;
    }

    let count = stages.len() as u32;
    let columns = Layout::horizontal(stages.iter().map(|_| Constraint::Ratio(1, count))).split(area);
    for (index, (stage, column)) in stages.iter().zip(columns.iter()).enumerate() {
        let [image, name] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(*column);
        render_sprite(frame, image, state, stage.id);
        let label = if index == 0 {
            stage.name.clone()
        } else {
            format!("-> {}", stage.name)
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                label,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            name,
        );
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let button = page_button(state);
    let button_text = format!("[n] {}", button.label);
    let button_style = if button.enabled {
        Style::default()
            .fg(ACCENT_GOLD)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    };
    let status = footer_status(state);
    let button_items = [StatusBarItem::span(Span::styled(
        button_text.as_str(),
        button_style,
    ))];
    let status_items = [StatusBarItem::span(Span::styled(
        status.as_str(),
        Style::default().fg(ACCENT_GOLD),
    ))];
    let hints = status_hints(state);

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::items(&button_items).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn footer_status(state: &AppState) -> String {
    let spin = spinner(state.tick);
    if state.roster_loading {
        format!("{spin} Loading roster...")
    } else if state.pending_pages > 0 {
        format!("{spin} Loading page...")
    } else if !state.detail_loading.is_empty() {
        format!("{spin} Loading pokemon...")
    } else if !state.evolution_loading.is_empty() {
        format!("{spin} Loading evolutions...")
    } else {
        format!("{}/{} shown", state.visible_ids.len(), state.roster.len())
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.overlay_open() {
        return vec![
            StatusBarHint::new("<-/->", "Prev/Next"),
            StatusBarHint::new("1-3", "Tab"),
            StatusBarHint::new("Esc", "Close"),
        ];
    }
    if state.search.editing {
        return vec![
            StatusBarHint::new("Enter", "Done"),
            StatusBarHint::new("Esc", "Clear"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
    }
    let mut hints = vec![
        StatusBarHint::new("hjkl", "Move"),
        StatusBarHint::new("Enter", "Open"),
        StatusBarHint::new("/", "Search"),
    ];
    if state.banner.is_some() {
        hints.push(StatusBarHint::new("x", "Dismiss"));
    }
    hints.push(StatusBarHint::new("q", "Quit"));
    hints
}

fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick % SPINNER.len() as u64) as usize]
}
