//! # Chart Rendering
//!
//! Terminal rendering of a finished chart: the twelve cells drawn around
//! the border of a 4x4 grid with the header facts in the interior, the
//! same layout a graphical rasterizer would use. This is the development
//! display boundary; it consumes the immutable snapshot only and never
//! reaches back into the engine.

use crate::chart::{Cell, Chart};

/// Character width of one rendered cell.
const CELL_WIDTH: usize = 26;

/// Text rows inside one rendered cell.
const CELL_HEIGHT: usize = 12;

/// Truncate to `width` characters and pad with spaces.
fn fit(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    let padding = width - truncated.chars().count();
    format!("{}{}", truncated, " ".repeat(padding))
}

/// Center `text` in `width` characters.
fn center(text: &str, width: usize) -> String {
    let truncated: String = text.chars().take(width).collect();
    let len = truncated.chars().count();
    let left = (width - len) / 2;
    format!(
        "{}{}{}",
        " ".repeat(left),
        truncated,
        " ".repeat(width - len - left)
    )
}

/// Split `left` and `right` across one row.
fn split_row(left: &str, right: &str, width: usize) -> String {
    let half = width / 2;
    format!("{}{}", fit(left, half), {
        let truncated: String = right.chars().take(width - half).collect();
        let len = truncated.chars().count();
        format!("{}{}", " ".repeat(width - half - len), truncated)
    })
}

/// The text rows of a single cell.
fn cell_rows(cell: &Cell, overlays: &str) -> Vec<String> {
    let inner = CELL_WIDTH - 2;
    let mut rows = Vec::with_capacity(CELL_HEIGHT);

    rows.push(split_row(&cell.zodiac, &cell.dai_han.to_string(), inner));
    rows.push(center(&cell.name, inner));

    let principals = cell
        .chinh_tinh
        .iter()
        .map(|s| s.label())
        .collect::<Vec<_>>()
        .join(" ");
    rows.push(center(&principals, inner));

    // Left and right auxiliary columns, paired per row.
    let aux_rows = CELL_HEIGHT - 6;
    for i in 0..aux_rows {
        let left = cell
            .phu_tinh_trai
            .get(i)
            .map(|s| s.label())
            .unwrap_or_default();
        let right = cell
            .phu_tinh_phai
            .get(i)
            .map(|s| s.label())
            .unwrap_or_default();
        rows.push(split_row(&left, &right, inner));
    }

    let bottom = cell
        .phu_tinh_duoi
        .as_ref()
        .map(|s| s.label())
        .unwrap_or_default();
    rows.push(center(&bottom, inner));
    rows.push(center(overlays, inner));
    rows.push(split_row(&cell.tieu_han, &cell.nguyet_han, inner));

    rows
}

/// Header facts as interior text rows.
fn header_rows(chart: &Chart) -> Vec<String> {
    let h = &chart.header;
    let lunar = h.lunar_date;
    vec![
        "LÁ SỐ TỬ VI".to_string(),
        String::new(),
        format!("Họ tên: {}", h.display_name),
        format!("Năm: {} ({})", h.input_date.year, h.year_label),
        format!(
            "Tháng: {:02} ({:02}) {}",
            h.input_date.month, lunar.month, h.month_label
        ),
        format!(
            "Ngày: {:02} ({:02}) {}",
            h.input_date.day, lunar.day, h.day_label
        ),
        format!(
            "Giờ: {:02}:{:02} {}",
            h.input_date.hour, h.input_date.minute, h.hour_label
        ),
        format!("Năm xem: {} ({}) - {} tuổi", h.querent_year, h.querent_label, h.age),
        String::new(),
        format!("Âm Dương: {}", h.am_duong),
        format!("Mệnh: {}", h.menh_nature),
        format!("Cục: {}", h.cuc),
        format!("Chủ Mệnh: {}", h.chu_menh),
        format!("Chủ Thân: {}", h.chu_than),
        h.tinh_ly.to_string(),
        h.cuc_menh.to_string(),
        h.noi_cu_than.to_string(),
    ]
}

/// Render the chart as terminal lines.
pub fn render_lines(chart: &Chart) -> Vec<String> {
    // Cells by canvas coordinate.
    let mut grid: [[Option<&Cell>; 4]; 4] = [[None; 4]; 4];
    for cell in &chart.cells {
        let (row, col) = cell.coor;
        grid[row as usize][col as usize] = Some(cell);
    }

    let header = header_rows(chart);
    // Two cell columns minus the shared divider.
    let interior_width = 2 * CELL_WIDTH - 1;

    let horizontal = "-".repeat(CELL_WIDTH - 1);
    let border: String = format!("+{}+{}+{}+{}+", horizontal, horizontal, horizontal, horizontal);

    let mut lines = Vec::new();
    lines.push(border.clone());
    for grid_row in 0..4 {
        for text_row in 0..CELL_HEIGHT {
            let mut line = String::from("|");
            let mut col = 0;
            while col < 4 {
                let interior = (1..=2).contains(&grid_row) && (1..=2).contains(&col);
                if interior {
                    // The four interior boxes form one header area.
                    let index = (grid_row - 1) * CELL_HEIGHT + text_row;
                    let text = header.get(index).map(String::as_str).unwrap_or("");
                    line.push_str(&center(text, interior_width));
                    line.push('|');
                    col += 2;
                    continue;
                }

                let content = match grid[grid_row][col] {
                    Some(cell) => {
                        let overlays = overlays_for(chart, cell.id);
                        cell_rows(cell, &overlays)
                            .get(text_row)
                            .cloned()
                            .unwrap_or_default()
                    }
                    None => String::new(),
                };
                line.push(' ');
                line.push_str(&fit(&content, CELL_WIDTH - 2));
                line.push('|');
                col += 1;
            }
            lines.push(line);
        }
        if grid_row < 3 {
            lines.push(border.clone());
        }
    }
    lines.push(border);
    lines
}

/// The overlay tags shown inside a cell.
fn overlays_for(chart: &Chart, cell_id: u8) -> String {
    match (chart.tuan_cell == cell_id, chart.triet_cell == cell_id) {
        (true, true) => "[Tuần - Triệt]".to_string(),
        (true, false) => "[Tuần]".to_string(),
        (false, true) => "[Triệt]".to_string(),
        (false, false) => String::new(),
    }
}

/// Print the chart to stdout.
pub fn draw_ascii(chart: &Chart) {
    for line in render_lines(chart) {
        println!("{}", line);
    }
}
