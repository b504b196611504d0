//! Year grid: one row per month, one glyph per day.

use chrono::Datelike;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::tooltip::CellKey;
use crate::calendar::{Classification, YearView};

/// Width of the month label column, including its trailing space.
pub const LABEL_WIDTH: u16 = 4;
/// Each day takes a glyph plus one column of gap.
pub const CELL_WIDTH: u16 = 2;
const CELL_GLYPH: &str = "■";

const LABEL: Color = Color::Gray;
const LABEL_CURRENT: Color = Color::Cyan;

pub fn classification_style(class: Classification) -> Style {
    match class {
        Classification::Today => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        Classification::Sunday => Style::default().fg(Color::LightMagenta),
        Classification::Past => Style::default().fg(Color::DarkGray),
        Classification::Future => Style::default().fg(Color::Cyan),
    }
}

// ─── Layout ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub key: CellKey,
    pub area: Rect,
    pub classification: Classification,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthRow {
    pub month: u32,
    pub name: &'static str,
    pub area: Rect,
}

/// Where every month label and day cell landed in the last drawn frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridLayout {
    pub months: Vec<MonthRow>,
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    /// Lay `view` out inside `area`. Months and days that do not fit are
    /// left out entirely.
    pub fn compute(view: &YearView, area: Rect) -> Self {
        let mut layout = Self::default();
        if area.width <= LABEL_WIDTH || area.height == 0 {
            return layout;
        }

        // Spread the months out when there is room for a blank row between them.
        let row_step: u16 = if area.height >= 24 { 2 } else { 1 };

        for (i, block) in view.months.iter().enumerate() {
            let y = area.y + i as u16 * row_step;
            if y >= area.bottom() {
                break;
            }
            layout.months.push(MonthRow {
                month: block.month,
                name: block.name(),
                area: Rect::new(area.x, y, LABEL_WIDTH, 1),
            });

            for (d, cell) in block.cells.iter().enumerate() {
                let x = area.x + LABEL_WIDTH + d as u16 * CELL_WIDTH;
                if x >= area.right() {
                    break;
                }
                let width = CELL_WIDTH.min(area.right() - x);
                layout.cells.push(GridCell {
                    key: CellKey {
                        month: block.month,
                        day: cell.date.day(),
                    },
                    area: Rect::new(x, y, width, 1),
                    classification: cell.classification,
                    label: cell.label.clone(),
                });
            }
        }
        layout
    }

    /// The cell under a terminal position.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<&GridCell> {
        let pos = Position::new(column, row);
        self.cells.iter().find(|c| c.area.contains(pos))
    }

    /// Total width needed to show every day of the longest month.
    pub fn full_width() -> u16 {
        LABEL_WIDTH + 31 * CELL_WIDTH
    }
}

// ─── Widget ─────────────────────────────────────────────────────────────────

pub struct YearGrid<'a> {
    layout: &'a GridLayout,
    current_month: Option<u32>,
}

impl<'a> YearGrid<'a> {
    pub fn new(layout: &'a GridLayout) -> Self {
        Self {
            layout,
            current_month: None,
        }
    }

    pub fn current_month(mut self, month: u32) -> Self {
        self.current_month = Some(month);
        self
    }
}

impl Widget for YearGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in &self.layout.months {
            if !area.intersects(row.area) {
                continue;
            }
            let style = if Some(row.month) == self.current_month {
                Style::default().fg(LABEL_CURRENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(LABEL)
            };
            buf.set_string(row.area.x, row.area.y, row.name, style);
        }

        for cell in &self.layout.cells {
            if !area.contains(cell.area.as_position()) {
                continue;
            }
            buf.set_string(
                cell.area.x,
                cell.area.y,
                CELL_GLYPH,
                classification_style(cell.classification),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::year_view;
    use chrono::NaiveDate;

    fn view_2025() -> YearView {
        year_view(2025, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    #[test]
    fn full_width_fits_every_day() {
        let view = view_2025();
        let layout = GridLayout::compute(&view, Rect::new(0, 0, GridLayout::full_width(), 12));
        assert_eq!(layout.months.len(), 12);
        assert_eq!(layout.cells.len(), 365);
    }

    #[test]
    fn hit_test_finds_dates() {
        let view = view_2025();
        let area = Rect::new(2, 5, GridLayout::full_width(), 12);
        let layout = GridLayout::compute(&view, area);

        // March is the third row, day 10 is the tenth cell.
        let x = 2 + LABEL_WIDTH + 9 * CELL_WIDTH;
        let cell = layout.cell_at(x, 7).unwrap();
        assert_eq!(cell.key, CellKey { month: 3, day: 10 });
        assert_eq!(cell.classification, Classification::Today);
        assert_eq!(cell.label, "Mon, Mar 10, 2025");

        // The gap column belongs to the same cell.
        assert_eq!(layout.cell_at(x + 1, 7).unwrap().key.day, 10);
        // Month label column is not a cell.
        assert!(layout.cell_at(3, 7).is_none());
        // February has no 30th.
        let feb_30 = 2 + LABEL_WIDTH + 29 * CELL_WIDTH;
        assert!(layout.cell_at(feb_30, 6).is_none());
    }

    #[test]
    fn narrow_or_short_areas_drop_what_does_not_fit() {
        let view = view_2025();
        let layout = GridLayout::compute(&view, Rect::new(0, 0, LABEL_WIDTH + 10 * CELL_WIDTH, 3));
        assert_eq!(layout.months.len(), 3);
        assert_eq!(layout.cells.len(), 30);

        let empty = GridLayout::compute(&view, Rect::new(0, 0, LABEL_WIDTH, 12));
        assert!(empty.cells.is_empty());
    }

    #[test]
    fn tall_areas_space_the_months() {
        let view = view_2025();
        let layout = GridLayout::compute(&view, Rect::new(0, 0, GridLayout::full_width(), 24));
        assert_eq!(layout.months[1].area.y, 2);
        assert_eq!(layout.months[11].area.y, 22);
    }

    #[test]
    fn renders_labels_and_styled_glyphs() {
        let view = view_2025();
        let area = Rect::new(0, 0, GridLayout::full_width(), 12);
        let layout = GridLayout::compute(&view, area);
        let mut buf = Buffer::empty(area);

        YearGrid::new(&layout).current_month(3).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "J");
        assert_eq!(buf[(0, 2)].fg, LABEL_CURRENT);

        let today = &buf[(LABEL_WIDTH + 9 * CELL_WIDTH, 2)];
        assert_eq!(today.symbol(), CELL_GLYPH);
        assert_eq!(today.fg, Color::Red);

        let past = &buf[(LABEL_WIDTH, 0)];
        assert_eq!(past.fg, Color::DarkGray);
    }
}
