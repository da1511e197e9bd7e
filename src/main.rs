use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use lineup_board::board::{self, Board};
use lineup_board::config::{AppConfig, Backend as StoreBackend};
use lineup_board::drag::{DragSession, Point, ScreenRect};
use lineup_board::export;
use lineup_board::persist;
use lineup_board::position::{Zone, zone_label};
use lineup_board::roster::{self, NewPlayer, PlayerId, PlayerRecord, Role, Roster};
use lineup_board::session;
use lineup_board::store;
use lineup_board::worker;

const TOKEN_MAX_WIDTH: usize = 16;

const GRASS_DARK: Color = Color::Rgb(26, 77, 46);
const GRASS_LIGHT: Color = Color::Rgb(20, 64, 38);
const CHALK: Color = Color::Rgb(200, 210, 204);
const KEEPER: Color = Color::Rgb(250, 204, 21);
const OUTFIELD: Color = Color::Rgb(220, 38, 38);

#[derive(Debug, Clone, Default)]
struct PlayerForm {
    last_name: String,
    first_name: String,
    number: String,
    goalkeeper: bool,
    focus: usize,
}

impl PlayerForm {
    const FIELDS: usize = 4;

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % Self::FIELDS,
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + Self::FIELDS - 1) % Self::FIELDS
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if self.focus == 3 => {
                self.goalkeeper = !self.goalkeeper
            }
            KeyCode::Backspace => {
                if let Some(field) = self.field_mut() {
                    field.pop();
                }
            }
            KeyCode::Char(c) => {
                let numeric = self.focus == 2;
                if let Some(field) = self.field_mut() {
                    if !numeric || c.is_ascii_digit() {
                        field.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            0 => Some(&mut self.last_name),
            1 => Some(&mut self.first_name),
            2 => Some(&mut self.number),
            _ => None,
        }
    }

    fn to_new_player(&self, category: &str) -> NewPlayer {
        let role = if self.goalkeeper {
            Role::Goalkeeper
        } else {
            Role::FieldPlayer
        };
        NewPlayer::new(
            &self.last_name,
            &self.first_name,
            Some(self.number.as_str()),
            role,
            category,
        )
    }
}

#[derive(Debug, Clone, Default)]
struct LoginForm {
    email: String,
    password: String,
    focus: usize,
}

impl LoginForm {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.focus = 1 - self.focus
            }
            KeyCode::Backspace => {
                self.field_mut().pop();
            }
            KeyCode::Char(c) => self.field_mut().push(c),
            _ => {}
        }
    }

    fn field_mut(&mut self) -> &mut String {
        if self.focus == 0 {
            &mut self.email
        } else {
            &mut self.password
        }
    }
}

struct App {
    roster: Roster,
    config: AppConfig,
    board: Board,
    should_quit: bool,
    help_overlay: bool,
    form: Option<PlayerForm>,
    login: Option<LoginForm>,
    drag: Option<DragSession>,
    pitch_area: Option<Rect>,
}

impl App {
    fn new(roster: Roster, config: AppConfig) -> Self {
        Self {
            roster,
            config,
            board: Board::default(),
            should_quit: false,
            help_overlay: false,
            form: None,
            login: None,
            drag: None,
            pitch_area: None,
        }
    }

    fn container(&self) -> Option<ScreenRect> {
        self.pitch_area.map(screen_rect)
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.roster.pending_delete.is_some() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.roster.resolve_delete(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.roster.resolve_delete(false)
                }
                _ => {}
            }
            return;
        }
        if let Some(form) = self.form.as_mut() {
            match key.code {
                KeyCode::Esc => self.form = None,
                KeyCode::Enter => {
                    let profile = form.to_new_player(&self.roster.category);
                    if self.roster.create(profile) {
                        self.form = None;
                    } else {
                        self.roster.push_log("[INFO] Last name required");
                    }
                }
                _ => form.on_key(key),
            }
            return;
        }
        if let Some(login) = self.login.as_mut() {
            match key.code {
                KeyCode::Esc => self.login = None,
                KeyCode::Enter => {
                    let (email, password) = (login.email.clone(), login.password.clone());
                    self.login = None;
                    self.roster.push_log("[INFO] Signing in...");
                    self.roster.sign_in(&email, &password);
                }
                _ => login.on_key(key),
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_overlay = !self.help_overlay,
            KeyCode::Esc => self.help_overlay = false,
            KeyCode::Char('c') => self.switch_category(true),
            KeyCode::Char('C') => self.switch_category(false),
            KeyCode::Char('j') | KeyCode::Down => self.roster.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.roster.select_prev(),
            KeyCode::Char('R') => {
                self.roster.push_log("[INFO] Reloading roster");
                self.roster.reload();
            }
            KeyCode::Char('e') => self.export(),
            KeyCode::Char('a') => {
                if self.roster.is_admin {
                    self.roster.sign_out();
                } else {
                    self.login = Some(LoginForm::default());
                }
            }
            _ if self.roster.is_admin => self.on_admin_key(key),
            _ => {}
        }
    }

    fn on_admin_key(&mut self, key: KeyEvent) {
        if let KeyCode::Char('n') = key.code {
            self.form = Some(PlayerForm::default());
            return;
        }
        let Some(id) = self.roster.selected_id() else {
            return;
        };
        match key.code {
            KeyCode::Char('f') => self.roster.set_zone(id, Zone::OnField),
            KeyCode::Char('b') => self.roster.set_zone(id, Zone::Bench),
            KeyCode::Char('i') => self.roster.set_zone(id, Zone::Injured),
            KeyCode::Char('s') => self.roster.set_zone(id, Zone::Suspended),
            KeyCode::Char('r') => self.roster.remove_from_board(id),
            KeyCode::Char('x') => self.roster.request_delete(id),
            KeyCode::Char('H') => self.nudge(id, -1.0, 0.0),
            KeyCode::Char('L') => self.nudge(id, 1.0, 0.0),
            KeyCode::Char('K') => self.nudge(id, 0.0, -1.0),
            KeyCode::Char('J') => self.nudge(id, 0.0, 1.0),
            _ => {}
        }
        if self.roster.selected_id() != Some(id) {
            self.roster.select_id(id);
        }
    }

    /// Keyboard move by one cell, settled the same way as a mouse drag.
    fn nudge(&mut self, id: PlayerId, dx: f64, dy: f64) {
        let Some(container) = self.container() else {
            return;
        };
        let Some(player) = self.roster.get(id) else {
            return;
        };
        if player.zone(&self.roster.scheme) != Zone::OnField {
            return;
        }
        let rect = self.board.token_rect(player, token_size(player), &container);
        let mut session = DragSession::start(id, Point::new(rect.x, rect.y), rect);
        session.drag_to(Point::new(rect.x + dx, rect.y + dy), &container);
        self.settle(session);
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        let pointer = Point::new(mouse.column as f64, mouse.row as f64);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(container) = self.container() else {
                    return;
                };
                let tokens = board::pitch_tokens(&self.roster.players, |p| {
                    p.zone(&self.roster.scheme)
                });
                let hit = self
                    .board
                    .hit_test(&tokens, &container, pointer, token_size)
                    .map(|(p, rect)| (p.id, rect));
                if let Some((id, rect)) = hit {
                    self.roster.select_id(id);
                    if self.roster.is_admin {
                        self.drag = Some(DragSession::start(id, pointer, rect));
                    }
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let container = self.container();
                if let (Some(session), Some(container)) = (self.drag.as_mut(), container) {
                    session.drag_to(pointer, &container);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(session) = self.drag.take() {
                    if session.has_moved() {
                        self.settle(session);
                    }
                }
            }
            _ => {}
        }
    }

    fn settle(&mut self, session: DragSession) {
        if let Some((id, pos)) = self.board.finish_drag(session, self.container()) {
            self.roster.move_to(id, pos.x, pos.y);
        }
    }

    fn switch_category(&mut self, forward: bool) {
        self.roster.cycle_category(forward);
        if let Some(cache) = persist::load_cache() {
            persist::restore_roster(&mut self.roster, &cache);
        }
    }

    fn export(&mut self) {
        match export::export_lineup(
            &self.config.export_dir,
            &self.roster.category,
            &self.roster.players,
            &self.roster.scheme,
        ) {
            Ok(report) => self.roster.push_log(format!(
                "[INFO] Exported {} ({} on field, {} listed)",
                report.png.display(),
                report.on_field,
                report.listed
            )),
            Err(err) => self.roster.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }
}

fn screen_rect(area: Rect) -> ScreenRect {
    ScreenRect::new(
        area.x as f64,
        area.y as f64,
        area.width as f64,
        area.height as f64,
    )
}

fn token_text(p: &PlayerRecord) -> String {
    let text = if p.number_label().is_empty() {
        format!(" {} ", p.token_label())
    } else {
        format!(" {} {} ", p.number_label(), p.token_label())
    };
    text.chars().take(TOKEN_MAX_WIDTH).collect()
}

fn token_size(p: &PlayerRecord) -> (f64, f64) {
    (token_text(p).chars().count() as f64, 1.0)
}

fn role_style(role: Role) -> Style {
    match role {
        Role::Goalkeeper => Style::default().fg(Color::Black).bg(KEEPER),
        Role::FieldPlayer => Style::default().fg(Color::White).bg(OUTFIELD),
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    let cache = persist::load_cache().unwrap_or_default();
    let category = cache
        .last_category
        .clone()
        .filter(|c| config.categories.contains(c))
        .unwrap_or_else(|| config.default_category.clone());

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let mut startup_error = None;
    let cmd_tx = match store::open_store(&config) {
        Ok(store) => {
            worker::spawn_store_worker(store, config.clone(), tx, cmd_rx);
            Some(cmd_tx)
        }
        Err(err) => {
            startup_error = Some(format!("[WARN] Store unavailable: {err:#}"));
            None
        }
    };

    let mut roster = Roster::new(config.categories.clone(), &category, cmd_tx);
    persist::restore_roster(&mut roster, &cache);
    let now = session::now_secs();
    match (&config.backend, session::restore(cache.session.clone(), now)) {
        (StoreBackend::Supabase(_), Some(saved)) => roster.resume_session(saved),
        _ => roster.is_admin = session::is_privileged(&config, None, now),
    }
    if let Some(msg) = startup_error {
        roster.push_log(msg);
    }
    roster.push_log(format!("[INFO] Backend: {}", config.backend_label()));
    roster.list(&category);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(roster, config);
    let res = run_app(&mut terminal, &mut app, rx);
    persist::save_from_roster(&app.roster);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<roster::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        let mut changed = false;
        while let Ok(delta) = rx.try_recv() {
            roster::apply_delta(&mut app.roster, delta);
            changed = true;
        }
        if changed {
            persist::save_from_roster(&app.roster);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.on_key(key),
                Event::Mouse(mouse) => app.on_mouse(mouse),
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(26),
            Constraint::Min(30),
            Constraint::Length(28),
        ])
        .split(chunks[1]);

    let reserve = Paragraph::new(zone_list_text(&app.roster, Zone::Unplaced)).block(
        Block::default()
            .title(format!(
                "Reserve ({})",
                app.roster.in_zone(Zone::Unplaced).len()
            ))
            .borders(Borders::ALL),
    );
    frame.render_widget(reserve, columns[0]);

    render_pitch(frame, columns[1], app);
    render_side_zones(frame, columns[2], &app.roster);

    let console = Paragraph::new(console_text(&app.roster))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    let area = frame.size();
    if let Some(form) = &app.form {
        render_player_form(frame, area, form, &app.roster.category);
    } else if let Some(login) = &app.login {
        render_login_form(frame, area, login);
    } else if let Some(id) = app.roster.pending_delete {
        render_delete_confirm(frame, area, app.roster.get(id));
    } else if app.help_overlay {
        render_help_overlay(frame, area);
    }
}

fn header_text(app: &App) -> String {
    let role = if app.roster.is_admin { "COACH" } else { "VIEWER" };
    let loading = if app.roster.loading { " | Loading..." } else { "" };
    let line1 = format!(
        "  .-.  LINEUP BOARD | {} | {} | {}{}",
        app.roster.category,
        role,
        app.config.backend_label(),
        loading
    );
    let counts = app.roster.zone_counts();
    let mut zones = app.roster.scheme.zones().to_vec();
    zones.push(Zone::Unplaced);
    let line2 = zones
        .iter()
        .map(|z| format!("{} {}", zone_label(*z), counts.get(z).copied().unwrap_or(0)))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("{line1}\n (   ) {line2}")
}

fn footer_text(app: &App) -> String {
    if app.roster.is_admin {
        "c/C Category | j/k Select | f Field | b Bench | i Injured | s Susp. | r Remove | x Delete | n New | HJKL Nudge | e Export | a Sign out | ? Help | q Quit".to_string()
    } else {
        "c/C Category | j/k Select | R Reload | e Export | a Sign in | ? Help | q Quit".to_string()
    }
}

/// Pitch sized to the 3:4 board, assuming cells twice as tall as wide.
fn pitch_rect(area: Rect, board: &Board) -> Rect {
    let max_h = area.height;
    let want_w = (max_h as f64 * 2.0 * board.width / board.height).round() as u16;
    let width = want_w.min(area.width);
    let height = if width < want_w {
        (width as f64 * board.height / (board.width * 2.0)).round() as u16
    } else {
        max_h
    };
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: height.min(area.height),
    }
}

fn render_pitch(frame: &mut Frame, area: Rect, app: &mut App) {
    let outer = pitch_rect(area, &app.board);
    let block = Block::default()
        .title(format!(
            "Pitch ({})",
            app.roster.in_zone(Zone::OnField).len()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(outer);
    frame.render_widget(block, outer);

    if inner.width < 4 || inner.height < 4 {
        app.pitch_area = None;
        return;
    }
    app.pitch_area = Some(inner);
    let container = screen_rect(inner);

    let tokens = board::pitch_tokens(&app.roster.players, |p| p.zone(&app.roster.scheme));
    let dragging = app.drag.as_ref().map(|d| d.player);
    let mut placed: Vec<(&PlayerRecord, ScreenRect)> = tokens
        .into_iter()
        .filter(|p| Some(p.id) != dragging)
        .map(|p| (p, app.board.token_rect(p, token_size(p), &container)))
        .collect();
    if let Some(session) = &app.drag {
        if let Some(p) = app.roster.get(session.player) {
            placed.push((p, session.token_rect()));
        }
    }

    let view = PitchView {
        board: &app.board,
        tokens: placed,
        selected: app.roster.selected_id(),
    };
    frame.render_widget(view, inner);
}

struct PitchView<'a> {
    board: &'a Board,
    tokens: Vec<(&'a PlayerRecord, ScreenRect)>,
    selected: Option<PlayerId>,
}

impl Widget for PitchView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            let band = row as u32 * 10 / area.height as u32;
            let color = if band % 2 == 0 { GRASS_DARK } else { GRASS_LIGHT };
            buf.set_style(
                Rect {
                    x: area.x,
                    y: area.y + row,
                    width: area.width,
                    height: 1,
                },
                Style::default().bg(color),
            );
        }

        let chalk = Style::default().fg(CHALK);
        let container = screen_rect(area);
        let mid_row = area.y + area.height / 2;
        buf.set_string(area.x, mid_row, "─".repeat(area.width as usize), chalk);

        // Center circle, sampled along its outline.
        let center = container.center();
        let r = self.board.to_screen(Point::new(48.0, 48.0), &container);
        for step in 0..48 {
            let angle = step as f64 / 48.0 * std::f64::consts::TAU;
            let x = (center.x + r.x * angle.cos()).floor();
            let y = (center.y + r.y * angle.sin()).floor();
            if container.contains(Point::new(x, y)) {
                buf.set_string(x as u16, y as u16, "·", chalk);
            }
        }

        // Penalty boxes.
        let boxed = self.board.to_screen(Point::new(160.0, 80.0), &container);
        let box_w = (boxed.x.round() as u16).clamp(2, area.width);
        let box_h = (boxed.y.round() as u16).clamp(1, area.height / 2);
        let left = area.x + (area.width - box_w) / 2;
        let right = left + box_w - 1;
        let inner_w = box_w.saturating_sub(2) as usize;
        for i in 0..box_h.saturating_sub(1) {
            buf.set_string(left, area.y + i, "│", chalk);
            buf.set_string(right, area.y + i, "│", chalk);
            let y = area.bottom() - 1 - i;
            buf.set_string(left, y, "│", chalk);
            buf.set_string(right, y, "│", chalk);
        }
        let top_edge = area.y + box_h - 1;
        buf.set_string(left, top_edge, format!("└{}┘", "─".repeat(inner_w)), chalk);
        let bottom_edge = area.bottom() - box_h;
        buf.set_string(left, bottom_edge, format!("┌{}┐", "─".repeat(inner_w)), chalk);

        for (p, rect) in &self.tokens {
            let text = token_text(p);
            let width = text.chars().count() as u16;
            let max_x = area.right().saturating_sub(width).max(area.x);
            let x = (rect.x.round().max(0.0) as u16).clamp(area.x, max_x);
            let y = (rect.y.round().max(0.0) as u16).clamp(area.y, area.bottom() - 1);
            let mut style = role_style(p.role).add_modifier(Modifier::BOLD);
            if Some(p.id) == self.selected {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
            }
            buf.set_stringn(x, y, text, (area.right() - x) as usize, style);
        }
    }
}

fn render_side_zones(frame: &mut Frame, area: Rect, roster: &Roster) {
    let zones: Vec<Zone> = roster
        .scheme
        .zones()
        .iter()
        .copied()
        .filter(|z| *z != Zone::OnField)
        .collect();
    if zones.is_empty() {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, zones.len() as u32); zones.len()];
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    for (zone, chunk) in zones.iter().zip(chunks.iter()) {
        let panel = Paragraph::new(zone_list_text(roster, *zone)).block(
            Block::default()
                .title(format!("{} ({})", zone_label(*zone), roster.in_zone(*zone).len()))
                .borders(Borders::ALL),
        );
        frame.render_widget(panel, *chunk);
    }
}

fn zone_list_text(roster: &Roster, zone: Zone) -> String {
    let players = roster.in_zone(zone);
    if players.is_empty() {
        return match zone {
            Zone::Bench => "Empty bench".to_string(),
            Zone::Unplaced => "Nobody in reserve".to_string(),
            _ => "-".to_string(),
        };
    }
    let selected = roster.selected_id();
    players
        .iter()
        .map(|p| {
            let prefix = if Some(p.id) == selected { "> " } else { "  " };
            let keeper = if p.role == Role::Goalkeeper { " (GK)" } else { "" };
            format!("{prefix}{:>2} {}{keeper}", p.number_label(), p.list_label())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn console_text(roster: &Roster) -> String {
    if roster.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = roster.logs.len().saturating_sub(3);
    roster
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_player_form(frame: &mut Frame, area: Rect, form: &PlayerForm, category: &str) {
    let popup_area = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup_area);
    let marker = |idx: usize| if form.focus == idx { ">" } else { " " };
    let role = if form.goalkeeper { "Goalkeeper" } else { "Player" };
    let text = [
        format!("Category: {category}"),
        String::new(),
        format!("{} Last name : {}", marker(0), form.last_name),
        format!("{} First name: {}", marker(1), form.first_name),
        format!("{} Number    : {}", marker(2), form.number),
        format!("{} Role      : < {role} >", marker(3)),
        String::new(),
        "Tab next | Enter add | Esc cancel".to_string(),
    ]
    .join("\n");
    let popup = Paragraph::new(text)
        .block(Block::default().title("New player").borders(Borders::ALL));
    frame.render_widget(popup, popup_area);
}

fn render_login_form(frame: &mut Frame, area: Rect, login: &LoginForm) {
    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);
    let marker = |idx: usize| if login.focus == idx { ">" } else { " " };
    let text = [
        format!("{} Email   : {}", marker(0), login.email),
        format!(
            "{} Password: {}",
            marker(1),
            "*".repeat(login.password.chars().count())
        ),
        String::new(),
        "Tab next | Enter sign in | Esc cancel".to_string(),
    ]
    .join("\n");
    let popup = Paragraph::new(text)
        .block(Block::default().title("Coach access").borders(Borders::ALL));
    frame.render_widget(popup, popup_area);
}

fn render_delete_confirm(frame: &mut Frame, area: Rect, player: Option<&PlayerRecord>) {
    let popup_area = centered_rect(40, 20, area);
    frame.render_widget(Clear, popup_area);
    let name = player
        .map(|p| format!("{} {}", p.first_name, p.last_name))
        .unwrap_or_default();
    let text = format!("Delete {name} permanently?\n\ny Yes | n No");
    let popup = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().title("Delete").borders(Borders::ALL));
    frame.render_widget(popup, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Lineup Board - Help",
        "",
        "Everyone:",
        "  c / C        Next / previous category",
        "  j/k or ↑/↓   Move selection",
        "  R            Reload from the store",
        "  e            Export PNG + XLSX",
        "  a            Sign in / sign out",
        "  ?            Toggle help",
        "  q            Quit",
        "",
        "Coach:",
        "  f b i s      Field / bench / injured / suspended",
        "  r            Back to the reserve",
        "  x            Delete (asks first)",
        "  n            New player",
        "  H J K L      Nudge a pitch token",
        "  mouse drag   Move a pitch token",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
