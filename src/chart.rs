//! # Chart Assembler
//!
//! Builds the immutable chart snapshot: twelve cells around the ring, the
//! Tuần and Triệt overlay positions, and the header facts. This is the
//! single entry point of the crate ([`build_chart`]); everything else is a
//! layer it drives.
//!
//! ## Assembly order
//!
//! 1. Hour rollover: a birth at 23:xx is astrologically the next civil day
//!    at 00:00; the wall-clock hour and minute survive only in the header.
//! 2. Calendar work: lunar date, sexagenary pillars, yin-yang, cục.
//! 3. Ring furniture: palace names, cell zodiac labels, decadal bands,
//!    annual and monthly markers.
//! 4. Stars: every registry rule evaluated once through the memoizing
//!    engine, routed into its category list, then each list sorted by the
//!    declared order.
//!
//! The snapshot is plain data (`Serialize`) and never mutated after it is
//! returned; renderers only read it.

use crate::catalog::{ChartContext, StarEngine};
use crate::date::{Date, SolarDate};
use crate::elements::Color;
use crate::error::{ChartError, DateField};
use crate::localizer::localize;
use crate::palace::{
    AmDuong, Cuc, Gender, Palace, am_duong, chu_menh, chu_than, cuc_menh_relation, cuc_of,
    menh_cell, menh_nature, noi_cu_than, palace_cell, than_cell, tinh_ly_am_duong, wrap12,
};
use crate::lunisolar;
use crate::sexagenary::{Branch, Stem, day_label, hour_label, month_label, year_label};
use crate::stars::{PlacedStar, REGISTRY, StarCategory, StarId};
use chrono::Datelike;
use serde::Serialize;

/// Frozen canvas coordinates of the twelve cells around the border of the
/// 4x4 grid; row 0 is the top, column 0 the left, and the interior four
/// boxes are reserved for the header.
pub const CELL_COORDS: [(u8, u8); 12] = [
    (3, 2),
    (3, 1),
    (3, 0),
    (2, 0),
    (1, 0),
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (1, 3),
    (2, 3),
    (3, 3),
];

/// Corner accent color of a cell, fixed per cell ordinal.
pub fn corner_color(cell_id: u8) -> Result<Color, ChartError> {
    match cell_id {
        2 | 5 | 8 | 11 => Ok(Color::Yellow),
        1 | 12 => Ok(Color::Black),
        3 | 4 => Ok(Color::Green),
        6 | 7 => Ok(Color::Red),
        9 | 10 => Ok(Color::Grey),
        _ => Err(ChartError::InvalidPosition),
    }
}

/// One cell of the ring.
#[derive(Clone, Debug, Serialize)]
pub struct Cell {
    /// Ordinal 1..=12; the cell sits on the branch of the same index.
    pub id: u8,
    /// Canvas (row, col) from the frozen map.
    pub coor: (u8, u8),
    /// Palace label, with a " <THÂN>" suffix on the body-palace cell.
    pub name: String,
    pub is_than: bool,
    /// Sexagenary label, stem initial plus localized branch ("B. Tí").
    pub zodiac: String,
    /// Decadal milestone (cục number plus a multiple of ten).
    pub dai_han: u32,
    /// Annual-cycle branch label.
    pub tieu_han: String,
    /// Monthly-cycle label ("Tháng 1".."Tháng 12").
    pub nguyet_han: String,
    pub chinh_tinh: Vec<PlacedStar>,
    pub phu_tinh_trai: Vec<PlacedStar>,
    pub phu_tinh_phai: Vec<PlacedStar>,
    /// The one life-cycle station of this cell.
    pub phu_tinh_duoi: Option<PlacedStar>,
}

/// Header facts shown beside the ring.
#[derive(Clone, Debug, Serialize)]
pub struct ChartHeader {
    pub display_name: String,
    /// The birth instant exactly as entered.
    pub input_date: Date,
    /// The canonical instant all calendar work used (hour rollover
    /// applied).
    pub solar_date: Date,
    pub lunar_date: Date,
    pub year_label: String,
    pub month_label: String,
    pub day_label: String,
    pub hour_label: String,
    pub gender: Gender,
    pub querent_year: i32,
    pub querent_label: String,
    /// Nominal age in the querent year.
    pub age: i32,
    pub am_duong: AmDuong,
    pub menh_nature: &'static str,
    pub cuc: Cuc,
    pub chu_menh: &'static str,
    pub chu_than: &'static str,
    pub tinh_ly: &'static str,
    pub cuc_menh: &'static str,
    pub noi_cu_than: &'static str,
}

/// The finished, immutable chart.
#[derive(Clone, Debug, Serialize)]
pub struct Chart {
    /// Cells in ordinal order, index 0 holding cell 1.
    pub cells: Vec<Cell>,
    /// Cell carrying the Tuần overlay.
    pub tuan_cell: u8,
    /// Cell carrying the Triệt overlay.
    pub triet_cell: u8,
    pub header: ChartHeader,
}

impl Chart {
    /// Cell by ordinal 1..=12.
    pub fn cell(&self, id: u8) -> &Cell {
        &self.cells[(id - 1) as usize]
    }
}

/// Compute a full chart from a civil birth instant.
///
/// `hour` may be 23: the birth then counts as the next civil day at 00:00
/// for every computation while the header keeps the entered time.
#[allow(clippy::too_many_arguments)]
pub fn build_chart(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    gender: Gender,
    querent_year: i32,
    display_name: &str,
) -> Result<Chart, ChartError> {
    let input_date = Date::with_time(year, month, day, hour, minute, second)?;

    // Hour rollover: the Tí double-hour starting at 23:00 belongs to the
    // next civil day.
    let birthdate = if hour >= 23 {
        let next = chrono::NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.succ_opt())
            .ok_or(ChartError::InvalidDate {
                field: DateField::Day,
            })?;
        SolarDate::with_time(next.year(), next.month(), next.day(), 0, 0, second)?
    } else {
        SolarDate::from_date(input_date)
    };

    let ctx = ChartContext::new(&birthdate, querent_year, gender)?;
    let lunar = lunisolar::solar_to_lunar(&birthdate.strip_time())?;
    let designation = am_duong(&birthdate, gender)?;
    let cuc = cuc_of(&birthdate)?;

    let mut cells: Vec<Cell> = (1..=12)
        .map(|id| Cell {
            id,
            coor: CELL_COORDS[(id - 1) as usize],
            name: String::new(),
            is_than: false,
            zodiac: String::new(),
            dai_han: 0,
            tieu_han: String::new(),
            nguyet_han: String::new(),
            chinh_tinh: Vec::new(),
            phu_tinh_trai: Vec::new(),
            phu_tinh_phai: Vec::new(),
            phu_tinh_duoi: None,
        })
        .collect();

    // Evaluate every star once and route it.
    let mut engine = StarEngine::new(&ctx);
    let mut tuan_cell = 0u8;
    let mut triet_cell = 0u8;
    for def in REGISTRY.iter() {
        let placement = engine.position(def.id)?;
        let star = PlacedStar {
            id: def.id,
            state: placement.state,
        };
        let cell = &mut cells[(placement.cell - 1) as usize];
        match def.category {
            StarCategory::ChinhTinh => cell.chinh_tinh.push(star),
            StarCategory::PhuTinhTrai => cell.phu_tinh_trai.push(star),
            StarCategory::PhuTinhPhai => cell.phu_tinh_phai.push(star),
            StarCategory::PhuTinhDuoi => cell.phu_tinh_duoi = Some(star),
            StarCategory::Overlay => match def.id {
                StarId::Tuan => tuan_cell = placement.cell,
                StarId::Triet => triet_cell = placement.cell,
                _ => return Err(ChartError::InvalidStarCategory),
            },
        }
    }

    // Stable sort keeps registry order between equal keys.
    for cell in cells.iter_mut() {
        cell.chinh_tinh
            .sort_by(|a, b| a.id.def().order.total_cmp(&b.id.def().order));
        cell.phu_tinh_trai
            .sort_by(|a, b| a.id.def().order.total_cmp(&b.id.def().order));
        cell.phu_tinh_phai
            .sort_by(|a, b| a.id.def().order.total_cmp(&b.id.def().order));
    }

    // Palace names, forward from Mệnh.
    for palace in Palace::ALL {
        let cell = palace_cell(palace, &birthdate)?;
        cells[(cell - 1) as usize].name = palace.label(gender).to_string();
    }
    let than = than_cell(&birthdate)?;
    {
        let cell = &mut cells[(than - 1) as usize];
        cell.is_than = true;
        cell.name.push_str(" <THÂN>");
    }

    // Cell zodiac labels, seeded by the year stem.
    let can_start = (ctx.year_stem.index() * 2 + 1) % 10;
    for (i, cell) in cells.iter_mut().enumerate() {
        let stem_index = match i {
            0 | 2 => can_start,
            1 | 3 => can_start % 10 + 1,
            _ => (can_start + i as u32 - 3) % 10 + 1,
        };
        let stem = Stem::from_index(stem_index)?;
        let branch = Branch::from_index(i as u32 + 1)?;
        cell.zodiac = zodiac_label(stem, branch);
    }

    // Decadal bands: cục number, stepping by the polarity direction.
    let menh = menh_cell(&birthdate)?;
    let d = designation.direction();
    for i in 0..12u32 {
        let cell = wrap12(menh as i64 - 1 + d * i as i64);
        cells[(cell - 1) as usize].dai_han = cuc.number() + 10 * i;
    }

    // Annual cycle: anchor by the year-branch group, direction by gender.
    let start_cell: i64 = match ctx.year_branch.index() {
        3 | 7 | 11 => 5,
        1 | 5 | 9 => 11,
        2 | 6 | 10 => 8,
        4 | 8 | 12 => 2,
        _ => return Err(ChartError::InvalidBranch),
    };
    let annual_d: i64 = match gender {
        Gender::Nam => 1,
        Gender::Nu => -1,
    };
    let ti_cell = wrap12(start_cell - 1 - annual_d * (ctx.year_branch.index() as i64 - 1));
    for i in 0..12u32 {
        let cell = wrap12(ti_cell as i64 - 1 + annual_d * i as i64);
        cells[(cell - 1) as usize].tieu_han = Branch::from_index(i + 1)?.localized();
    }

    // Monthly cycle: month 1 hangs off the querent year's annual cell.
    let querent_branch_name = ctx.querent_branch.localized();
    let pos = cells
        .iter()
        .position(|c| c.tieu_han == querent_branch_name)
        .ok_or(ChartError::InvalidPosition)?;
    let month_1 = wrap12(
        pos as i64 - (lunar.month() as i64 - 1) + (ctx.hour_branch.index() as i64 - 1),
    );
    for i in 0..12u32 {
        let cell = wrap12(month_1 as i64 - 1 + i as i64);
        cells[(cell - 1) as usize].nguyet_han = format!("Tháng {}", i + 1);
    }

    let querent_anchor = Date::new(querent_year, 6, 1)?;
    let header = ChartHeader {
        display_name: display_name.to_string(),
        input_date,
        solar_date: birthdate.date(),
        lunar_date: lunar.date(),
        year_label: year_label(&lunar.date()),
        month_label: month_label(&lunar.date()),
        day_label: day_label(&birthdate),
        hour_label: hour_label(&birthdate),
        gender,
        querent_year,
        querent_label: year_label(&querent_anchor),
        age: querent_year - lunar.year() + 1,
        am_duong: designation,
        menh_nature: menh_nature(&birthdate)?,
        cuc,
        chu_menh: chu_menh(&birthdate)?,
        chu_than: chu_than(&birthdate)?,
        tinh_ly: tinh_ly_am_duong(&birthdate)?,
        cuc_menh: cuc_menh_relation(&birthdate)?,
        noi_cu_than: noi_cu_than(&birthdate, gender)?,
    };

    Ok(Chart {
        cells,
        tuan_cell,
        triet_cell,
        header,
    })
}

/// "Bính Tí" shortened to "B. Tí".
fn zodiac_label(stem: Stem, branch: Branch) -> String {
    let stem_localized = localize(stem.token());
    let initial = stem_localized.chars().next().unwrap_or('?');
    format!("{}. {}", initial, branch.localized())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(y: i32, m: u32, d: u32, h: u32, min: u32, gender: Gender) -> Chart {
        build_chart(y, m, d, h, min, 0, gender, 2023, "Thử nghiệm").unwrap()
    }

    #[test]
    fn test_palace_names_partition_the_ring() {
        let chart = chart(1991, 7, 3, 5, 50, Gender::Nam);
        let mut menh_count = 0;
        let mut than_count = 0;
        for cell in &chart.cells {
            assert!(!cell.name.is_empty());
            if cell.name.starts_with("MỆNH") {
                menh_count += 1;
            }
            if cell.is_than {
                than_count += 1;
                assert!(cell.name.ends_with(" <THÂN>"));
            }
        }
        assert_eq!(menh_count, 1);
        assert_eq!(than_count, 1);
    }

    #[test]
    fn test_every_star_lands_exactly_once() {
        let chart = chart(1997, 7, 28, 5, 0, Gender::Nu);
        let mut placed = 0;
        for cell in &chart.cells {
            placed += cell.chinh_tinh.len() + cell.phu_tinh_trai.len() + cell.phu_tinh_phai.len();
            if cell.phu_tinh_duoi.is_some() {
                placed += 1;
            }
        }
        // Everything except the two overlays.
        assert_eq!(placed, crate::stars::STAR_COUNT - 2);
        assert!((1..=12).contains(&chart.tuan_cell));
        assert!((1..=12).contains(&chart.triet_cell));
    }

    #[test]
    fn test_decadal_bands_are_cuc_plus_tens() {
        let chart = chart(1994, 11, 2, 16, 0, Gender::Nu);
        let base = chart.header.cuc.number();
        let mut bands: Vec<u32> = chart.cells.iter().map(|c| c.dai_han).collect();
        bands.sort_unstable();
        let expected: Vec<u32> = (0..12).map(|i| base + 10 * i).collect();
        assert_eq!(bands, expected);
    }

    #[test]
    fn test_monthly_labels_are_cyclic() {
        let chart = chart(2002, 8, 16, 10, 30, Gender::Nu);
        let start = chart
            .cells
            .iter()
            .position(|c| c.nguyet_han == "Tháng 1")
            .unwrap();
        for i in 0..12 {
            let cell = (start + i) % 12;
            assert_eq!(chart.cells[cell].nguyet_han, format!("Tháng {}", i + 1));
        }
    }

    #[test]
    fn test_annual_labels_are_a_branch_permutation() {
        let chart = chart(1997, 12, 25, 20, 0, Gender::Nu);
        let mut labels: Vec<&str> = chart.cells.iter().map(|c| c.tieu_han.as_str()).collect();
        labels.sort_unstable();
        let mut expected: Vec<String> = (1..=12)
            .map(|i| Branch::from_index(i).unwrap().localized())
            .collect();
        expected.sort_unstable();
        assert_eq!(labels, expected);
    }

    #[test]
    fn test_sort_orders_within_cells() {
        let chart = chart(1991, 7, 3, 5, 50, Gender::Nam);
        for cell in &chart.cells {
            for list in [&cell.chinh_tinh, &cell.phu_tinh_trai, &cell.phu_tinh_phai] {
                for pair in list.windows(2) {
                    assert!(pair[0].id.def().order <= pair[1].id.def().order);
                }
            }
        }
    }

    #[test]
    fn test_hour_rollover_matches_next_day() {
        let late = build_chart(1994, 11, 2, 23, 30, 0, Gender::Nu, 2023, "x").unwrap();
        let next = build_chart(1994, 11, 3, 0, 0, 0, Gender::Nu, 2023, "x").unwrap();

        assert_eq!(late.header.solar_date, next.header.solar_date);
        assert_eq!(late.header.lunar_date, next.header.lunar_date);
        assert_eq!(late.tuan_cell, next.tuan_cell);
        assert_eq!(late.triet_cell, next.triet_cell);
        for (a, b) in late.cells.iter().zip(next.cells.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.chinh_tinh, b.chinh_tinh);
            assert_eq!(a.dai_han, b.dai_han);
        }
        // Only the displayed instant differs.
        assert_eq!(late.header.input_date.hour, 23);
        assert_eq!(next.header.input_date.hour, 0);
    }

    #[test]
    fn test_end_to_end_headers() {
        let chart = chart(1991, 7, 3, 5, 50, Gender::Nam);
        let header = &chart.header;
        assert_eq!(header.am_duong.label(), "Âm Nam");
        assert_eq!(header.cuc.name(), "Mộc tam cục");
        assert_eq!(header.menh_nature, "Lộ Bàng Thổ");
        assert_eq!(header.chu_menh, "Văn Khúc");
        assert_eq!(header.noi_cu_than, "Thân cư Thiên Di");
        assert_eq!(header.year_label, "Tân Mùi");
        assert_eq!(header.querent_label, "Quý Mão");
        assert_eq!(header.age, 2023 - 1991 + 1);
    }

    #[test]
    fn test_corner_colors() {
        assert_eq!(corner_color(2).unwrap(), Color::Yellow);
        assert_eq!(corner_color(1).unwrap(), Color::Black);
        assert_eq!(corner_color(4).unwrap(), Color::Green);
        assert_eq!(corner_color(6).unwrap(), Color::Red);
        assert_eq!(corner_color(10).unwrap(), Color::Grey);
        assert!(corner_color(13).is_err());
    }
}
