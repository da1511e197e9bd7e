use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use rust_xlsxwriter::{Format, Workbook, Worksheet};

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::position::{Zone, ZoneScheme, zone_label};
use crate::roster::{PlayerRecord, Role};

/// Output pixels per logical pixel.
pub const PIXEL_RATIO: u32 = 2;

const PAD: f64 = 20.0;
const BORDER: f64 = 4.0;
const LINE: f64 = 2.0;
const TOKEN_RADIUS: f64 = 24.0;
const STRIP_GAP: f64 = 16.0;
const CHIP_HEIGHT: f64 = 24.0;
const CHIP_GAP: f64 = 6.0;

const NUMBER_FONT: f64 = 18.0;
const LABEL_FONT: f64 = 11.0;
const TITLE_FONT: f64 = 12.0;

const PANEL: RGBColor = RGBColor(23, 23, 23);
const GRASS_DARK: RGBColor = RGBColor(26, 77, 46);
const GRASS_LIGHT: RGBColor = RGBColor(20, 64, 38);
const CHALK: RGBColor = RGBColor(215, 225, 218);
const MUTED: RGBColor = RGBColor(115, 115, 115);
const KEEPER: RGBColor = RGBColor(250, 204, 21);
const OUTFIELD: RGBColor = RGBColor(220, 38, 38);

#[derive(Debug, Clone)]
pub struct ExportReport {
    pub png: PathBuf,
    pub sheet: PathBuf,
    pub on_field: usize,
    pub listed: usize,
}

/// Writes `compo-<category>.png` and `compo-<category>.xlsx` into `dir`.
pub fn export_lineup(
    dir: &Path,
    category: &str,
    players: &[PlayerRecord],
    scheme: &ZoneScheme,
) -> Result<ExportReport> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export dir {}", dir.display()))?;
    let stem = export_stem(category);
    let png = dir.join(format!("{stem}.png"));
    let sheet = dir.join(format!("{stem}.xlsx"));

    let img = render_board_png(players, scheme, PIXEL_RATIO)?;
    img.save_with_format(&png, ImageFormat::Png)
        .with_context(|| format!("failed writing image to {}", png.display()))?;
    let listed = export_sheet(&sheet, category, players, scheme)?;

    Ok(ExportReport {
        png,
        sheet,
        on_field: players
            .iter()
            .filter(|p| p.zone(scheme) == Zone::OnField)
            .count(),
        listed,
    })
}

pub fn export_stem(category: &str) -> String {
    let cleaned: String = category
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '-' } else { c })
        .collect();
    format!("compo-{cleaned}")
}

/// Lineup sheet: one row per placed player, pitch first. Returns the row count.
pub fn export_sheet(
    path: &Path,
    category: &str,
    players: &[PlayerRecord],
    scheme: &ZoneScheme,
) -> Result<usize> {
    let mut rows = vec![vec![
        "Zone".to_string(),
        "N°".to_string(),
        "Nom".to_string(),
        "Prénom".to_string(),
        "Poste".to_string(),
        "x".to_string(),
        "y".to_string(),
    ]];
    for zone in scheme.zones() {
        for p in players.iter().filter(|p| p.zone(scheme) == *zone) {
            rows.push(vec![
                zone_label(*zone).to_string(),
                p.number_label().to_string(),
                p.last_name.clone(),
                p.first_name.clone(),
                p.role.code().to_string(),
                format!("{:.0}", p.x),
                format!("{:.0}", p.y),
            ]);
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Lineup")?;
        sheet
            .write_string_with_format(0, 0, category, &Format::new().set_bold())
            .context("write title")?;
        write_rows(sheet, &rows, 2)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(rows.len() - 1)
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>], first_row: u32) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(first_row + row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

/// Rasterize the board: pitch with on-field tokens, then one strip per
/// secondary zone. Layout is in logical pixels, scaled by `ratio`. Text goes
/// through the system sans-serif font, so rendering fails without one.
pub fn render_board_png(
    players: &[PlayerRecord],
    scheme: &ZoneScheme,
    ratio: u32,
) -> Result<RgbImage> {
    let ratio = ratio.max(1);
    let mut strips = Vec::new();
    for zone in scheme.zones().iter().filter(|z| **z != Zone::OnField) {
        let members: Vec<&PlayerRecord> = players
            .iter()
            .filter(|p| p.zone(scheme) == *zone)
            .collect();
        let (chips, height) = layout_chips(&members, BOARD_WIDTH)?;
        strips.push((*zone, members, chips, height));
    }

    let width = PAD * 2.0 + BOARD_WIDTH;
    let height = PAD * 2.0
        + BOARD_HEIGHT
        + strips.iter().map(|s| STRIP_GAP + s.3).sum::<f64>();
    let w = (width * ratio as f64).ceil() as u32;
    let h = (height * ratio as f64).ceil() as u32;

    let mut buf = vec![0u8; (w * h * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        root.fill(&BLACK).map_err(draw_err)?;
        let painter = Painter {
            area: &root,
            ratio: ratio as f64,
        };
        let (ox, oy) = (PAD, PAD);
        draw_pitch(&painter, ox, oy)?;

        for p in players.iter().filter(|p| p.zone(scheme) == Zone::OnField) {
            let cx = (ox + BOARD_WIDTH / 2.0 + p.x)
                .clamp(ox + TOKEN_RADIUS, ox + BOARD_WIDTH - TOKEN_RADIUS);
            let cy = (oy + BOARD_HEIGHT / 2.0 + p.y)
                .clamp(oy + TOKEN_RADIUS, oy + BOARD_HEIGHT - TOKEN_RADIUS);
            draw_token(&painter, cx, cy, p)?;
        }

        let mut y = oy + BOARD_HEIGHT;
        for (zone, members, chips, strip_height) in &strips {
            y += STRIP_GAP;
            painter.rect(ox, y, BOARD_WIDTH, *strip_height, PANEL)?;
            let title = zone_label(*zone).to_uppercase();
            painter.text(&title, ox + 12.0, y + 8.0, TITLE_FONT, MUTED, top_left())?;
            if members.is_empty() {
                painter.text("Empty", ox + 12.0, y + 32.0, LABEL_FONT, MUTED, top_left())?;
            }
            for (p, (cx, cy, cw)) in members.iter().zip(chips) {
                draw_chip(&painter, ox + cx, y + cy, *cw, p)?;
            }
            y += strip_height;
        }
        root.present().map_err(draw_err)?;
    }

    RgbImage::from_raw(w, h, buf).ok_or_else(|| anyhow!("png buffer does not match {w}x{h}"))
}

fn draw_err<E: std::fmt::Debug>(err: E) -> anyhow::Error {
    anyhow!("png render failed: {err:?}")
}

fn top_left() -> Pos {
    Pos::new(HPos::Left, VPos::Top)
}

fn centered() -> Pos {
    Pos::new(HPos::Center, VPos::Center)
}

/// Width of `text` in logical pixels at font size `size`.
pub fn label_width(text: &str, size: f64) -> Result<f64> {
    if text.is_empty() {
        return Ok(0.0);
    }
    let (w, _) = (FontFamily::SansSerif, size)
        .into_font()
        .box_size(text)
        .map_err(draw_err)?;
    Ok(w as f64)
}

/// Draws in logical pixels on a drawing area scaled by `ratio`.
struct Painter<'a, 'b> {
    area: &'a DrawingArea<BitMapBackend<'b>, Shift>,
    ratio: f64,
}

impl Painter<'_, '_> {
    fn px(&self, v: f64) -> i32 {
        (v * self.ratio).round() as i32
    }

    fn line_width(&self) -> u32 {
        (LINE * self.ratio).round().max(1.0) as u32
    }

    fn rect(&self, x: f64, y: f64, w: f64, h: f64, color: RGBColor) -> Result<()> {
        let corners = [
            (self.px(x), self.px(y)),
            (self.px(x + w) - 1, self.px(y + h) - 1),
        ];
        self.area
            .draw(&Rectangle::new(corners, color.filled()))
            .map_err(draw_err)
    }

    fn disc(&self, cx: f64, cy: f64, r: f64, color: RGBColor) -> Result<()> {
        self.area
            .draw(&Circle::new(
                (self.px(cx), self.px(cy)),
                self.px(r),
                color.filled(),
            ))
            .map_err(draw_err)
    }

    /// Outline of the arc from angle `from` to `to`, radians, clockwise on screen.
    fn arc(&self, cx: f64, cy: f64, r: f64, from: f64, to: f64, color: RGBColor) -> Result<()> {
        const STEPS: usize = 48;
        let points: Vec<(i32, i32)> = (0..=STEPS)
            .map(|i| {
                let t = from + (to - from) * i as f64 / STEPS as f64;
                (self.px(cx + r * t.cos()), self.px(cy + r * t.sin()))
            })
            .collect();
        self.area
            .draw(&PathElement::new(points, color.stroke_width(self.line_width())))
            .map_err(draw_err)
    }

    fn text(&self, s: &str, x: f64, y: f64, size: f64, color: RGBColor, pos: Pos) -> Result<()> {
        if s.is_empty() {
            return Ok(());
        }
        let style = (FontFamily::SansSerif, size * self.ratio)
            .into_font()
            .color(&color)
            .pos(pos);
        self.area
            .draw(&Text::new(s.to_string(), (self.px(x), self.px(y)), style))
            .map_err(draw_err)
    }
}

fn draw_pitch(painter: &Painter, ox: f64, oy: f64) -> Result<()> {
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    painter.rect(
        ox - BORDER,
        oy - BORDER,
        BOARD_WIDTH + BORDER * 2.0,
        BOARD_HEIGHT + BORDER * 2.0,
        WHITE,
    )?;
    let band = BOARD_HEIGHT / 10.0;
    for i in 0..10 {
        let color = if i % 2 == 0 { GRASS_DARK } else { GRASS_LIGHT };
        painter.rect(ox, oy + band * i as f64, BOARD_WIDTH, band, color)?;
    }

    let mid_x = ox + BOARD_WIDTH / 2.0;
    let mid_y = oy + BOARD_HEIGHT / 2.0;
    let bottom = oy + BOARD_HEIGHT;
    let right = ox + BOARD_WIDTH;

    painter.rect(ox, mid_y - LINE / 2.0, BOARD_WIDTH, LINE, CHALK)?;
    painter.arc(mid_x, mid_y, 48.0, 0.0, TAU, CHALK)?;
    painter.disc(mid_x, mid_y, 4.0, CHALK)?;

    // Penalty boxes and arcs.
    let (box_w, box_h) = (160.0, 80.0);
    let box_x = mid_x - box_w / 2.0;
    painter.rect(box_x, oy, LINE, box_h, CHALK)?;
    painter.rect(box_x + box_w - LINE, oy, LINE, box_h, CHALK)?;
    painter.rect(box_x, oy + box_h - LINE, box_w, LINE, CHALK)?;
    painter.arc(mid_x, oy + box_h, 40.0, 0.0, PI, CHALK)?;
    painter.rect(box_x, bottom - box_h, LINE, box_h, CHALK)?;
    painter.rect(box_x + box_w - LINE, bottom - box_h, LINE, box_h, CHALK)?;
    painter.rect(box_x, bottom - box_h, box_w, LINE, CHALK)?;
    painter.arc(mid_x, bottom - box_h, 40.0, PI, TAU, CHALK)?;

    // Corner arcs.
    painter.arc(ox, oy, 24.0, 0.0, FRAC_PI_2, CHALK)?;
    painter.arc(right, oy, 24.0, FRAC_PI_2, PI, CHALK)?;
    painter.arc(right, bottom, 24.0, PI, PI + FRAC_PI_2, CHALK)?;
    painter.arc(ox, bottom, 24.0, PI + FRAC_PI_2, TAU, CHALK)?;
    Ok(())
}

fn role_colors(role: Role) -> (RGBColor, RGBColor) {
    match role {
        Role::Goalkeeper => (KEEPER, BLACK),
        Role::FieldPlayer => (OUTFIELD, WHITE),
    }
}

fn draw_token(painter: &Painter, cx: f64, cy: f64, p: &PlayerRecord) -> Result<()> {
    let (fill, ink) = role_colors(p.role);
    painter.disc(cx, cy, TOKEN_RADIUS, WHITE)?;
    painter.disc(cx, cy, TOKEN_RADIUS - LINE, fill)?;
    painter.text(p.number_label(), cx, cy, NUMBER_FONT, ink, centered())?;

    let name = p.token_label().to_uppercase();
    let lw = label_width(&name, LABEL_FONT)?;
    let ly = cy + TOKEN_RADIUS + 4.0;
    painter.rect(cx - lw / 2.0 - 4.0, ly, lw + 8.0, 15.0, BLACK)?;
    painter.text(&name, cx, ly + 7.5, LABEL_FONT, WHITE, centered())
}

fn chip_width(p: &PlayerRecord) -> Result<f64> {
    let number = label_width(p.number_label(), LABEL_FONT)?;
    let name = label_width(&p.list_label().to_uppercase(), LABEL_FONT)?;
    let gap = if number > 0.0 { 6.0 } else { 0.0 };
    Ok(8.0 + number + gap + name + 8.0)
}

/// Chip offsets `(x, y, width)` inside a strip, wrapping at `width`, and the
/// strip height.
fn layout_chips(members: &[&PlayerRecord], width: f64) -> Result<(Vec<(f64, f64, f64)>, f64)> {
    const TOP: f64 = 28.0;
    const LEFT: f64 = 12.0;
    let mut out = Vec::with_capacity(members.len());
    let (mut x, mut y) = (LEFT, TOP);
    for p in members {
        let w = chip_width(p)?.min(width - LEFT * 2.0);
        if x > LEFT && x + w > width - LEFT {
            x = LEFT;
            y += CHIP_HEIGHT + CHIP_GAP;
        }
        out.push((x, y, w));
        x += w + CHIP_GAP;
    }
    Ok((out, y + CHIP_HEIGHT + 10.0))
}

fn draw_chip(painter: &Painter, x: f64, y: f64, w: f64, p: &PlayerRecord) -> Result<()> {
    let (fill, ink) = role_colors(p.role);
    painter.rect(x, y, w, CHIP_HEIGHT, fill)?;
    let left_mid = Pos::new(HPos::Left, VPos::Center);
    let mid = y + CHIP_HEIGHT / 2.0;
    let number = p.number_label();
    painter.text(number, x + 8.0, mid, LABEL_FONT, ink, left_mid)?;
    let number_w = label_width(number, LABEL_FONT)?;
    let name_x = x + 8.0 + number_w + if number_w > 0.0 { 6.0 } else { 0.0 };
    painter.text(&p.list_label().to_uppercase(), name_x, mid, LABEL_FONT, ink, left_mid)
}
