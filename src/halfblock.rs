//! Draws a [`SpriteData`] with half-block characters: each cell shows two
//! stacked pixels, the upper one as foreground of `▀`.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::sprite::SpriteData;

const UPPER_HALF: char = '▀';
const LOWER_HALF: char = '▄';

pub struct SpriteWidget<'a> {
    sprite: &'a SpriteData,
}

impl<'a> SpriteWidget<'a> {
    pub fn new(sprite: &'a SpriteData) -> Self {
        Self { sprite }
    }
}

impl Widget for SpriteWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let sprite = self.sprite;
        let (cols, rows) = sprite.fit(area.width, area.height);
        if cols == 0 || rows == 0 {
            return;
        }
        let left = area.x + (area.width - cols) / 2;
        let top = area.y + (area.height - rows) / 2;
        let pixel_rows = u32::from(rows) * 2;

        for row in 0..rows {
            for col in 0..cols {
                let x = sample(col.into(), cols.into(), sprite.width);
                let upper = sample(u32::from(row) * 2, pixel_rows, sprite.height);
                let lower = sample(u32::from(row) * 2 + 1, pixel_rows, sprite.height);
                let Some(cell) = buf.cell_mut((left + col, top + row)) else {
                    continue;
                };
                match (sprite.visible_rgb(x, upper), sprite.visible_rgb(x, lower)) {
                    (Some(up), Some(down)) => {
                        cell.set_char(UPPER_HALF).set_fg(rgb(up)).set_bg(rgb(down));
                    }
                    (Some(up), None) => {
                        cell.set_char(UPPER_HALF).set_fg(rgb(up));
                    }
                    (None, Some(down)) => {
                        cell.set_char(LOWER_HALF).set_fg(rgb(down));
                    }
                    (None, None) => {}
                }
            }
        }
    }
}

/// Maps cell coordinate `pos` of `span` onto a pixel index below `size`.
fn sample(pos: u32, span: u32, size: u32) -> u32 {
    (pos * size / span.max(1)).min(size.saturating_sub(1))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}
