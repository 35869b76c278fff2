//! # Star Positioning Engine
//!
//! One rule per registry entry, evaluated lazily with per-chart
//! memoization. Rules may call into other rules (offset-from-star and the
//! four transformatives do), which forms a fixed dependency DAG; the memo
//! table guarantees each rule runs at most once per chart no matter how
//! many stars reference it.
//!
//! Rule shapes, in rough order of frequency: a 10-entry table on the year
//! stem, a 12-entry table on the year branch, an offset from another star
//! (optionally scaled by the polarity direction), a palace cell used
//! directly, the Tử Vi cục-by-day anchor table, and the Thiên Phủ mirror.
//! Brightness tables are transcribed from the authoritative reference and
//! cover all twelve cells unless the star genuinely has no state in some
//! cells (Thiên Mã).

use crate::date::{Date, SolarDate};
use crate::error::ChartError;
use crate::lunisolar::solar_to_lunar;
use crate::palace::{AmDuong, Cuc, Gender, cuc_of, menh_cell, than_cell, wrap12};
use crate::sexagenary::{Branch, Stem, hour_pillar, year_pillar};
use crate::stars::{Brightness, STAR_COUNT, StarId};

use Brightness::{Binh as B, Dac as D, Ham as H, Mieu as M, Vuong as V};

/// Everything a positioning rule may consult, computed once per chart.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ChartContext {
    pub lunar_month: i64,
    pub lunar_day: i64,
    pub year_stem: Stem,
    pub year_branch: Branch,
    pub hour_branch: Branch,
    pub menh_cell: u8,
    pub than_cell: u8,
    pub cuc: Cuc,
    /// +1 for Dương Nam / Âm Nữ, -1 otherwise.
    pub direction: i64,
    pub querent_stem: Stem,
    pub querent_branch: Branch,
}

impl ChartContext {
    pub fn new(
        birthdate: &SolarDate,
        querent_year: i32,
        gender: Gender,
    ) -> Result<Self, ChartError> {
        let lunar = solar_to_lunar(&birthdate.strip_time())?;
        let (year_stem, year_branch) = year_pillar(&lunar.date());
        let hour_branch = hour_pillar(birthdate).1;
        // The querent-year pillar is anchored mid-year to stay clear of the
        // lunar new year.
        let querent_anchor = Date::new(querent_year, 6, 1)?;
        let (querent_stem, querent_branch) = year_pillar(&querent_anchor);

        Ok(ChartContext {
            lunar_month: lunar.month() as i64,
            lunar_day: lunar.day() as i64,
            year_stem,
            year_branch,
            hour_branch,
            menh_cell: menh_cell(birthdate)?,
            than_cell: than_cell(birthdate)?,
            cuc: cuc_of(birthdate)?,
            direction: AmDuong::from_stem(year_stem, gender).direction(),
            querent_stem,
            querent_branch,
        })
    }

    fn stem0(&self) -> usize {
        self.year_stem.index() as usize - 1
    }

    fn branch0(&self) -> usize {
        self.year_branch.index() as usize - 1
    }

    fn hour0(&self) -> i64 {
        self.hour_branch.index() as i64 - 1
    }

    fn month0(&self) -> i64 {
        self.lunar_month - 1
    }

    fn querent_stem0(&self) -> usize {
        self.querent_stem.index() as usize - 1
    }

    fn querent_branch0(&self) -> i64 {
        self.querent_branch.index() as i64 - 1
    }
}

/// Final cell and brightness of one star.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    pub cell: u8,
    pub state: Option<Brightness>,
}

impl Placement {
    fn plain(cell: u8) -> Placement {
        Placement { cell, state: None }
    }
}

/// Brightness from a total per-star table; a cell outside every group is a
/// corrupted table.
fn graded(
    cell: u8,
    groups: &[(Brightness, &[u8])],
) -> Result<Option<Brightness>, ChartError> {
    for (state, cells) in groups {
        if cells.contains(&cell) {
            return Ok(Some(*state));
        }
    }
    Err(ChartError::InvalidPosition)
}

/// Brightness from a partial table; uncovered cells carry no state.
fn graded_partial(cell: u8, groups: &[(Brightness, &[u8])]) -> Option<Brightness> {
    groups
        .iter()
        .find(|(_, cells)| cells.contains(&cell))
        .map(|(state, _)| *state)
}

/// The Tử Vi anchor: cell and brightness per lunar day, one row per cục.
/// Transcribed verbatim from the reference table.
#[rustfmt::skip]
const TU_VI_THUY_NHI: [(u8, Brightness); 30] = [
    (2, D), (3, M), (3, M), (4, B), (4, B), (5, V), (5, V), (6, M), (6, M), (7, M),
    (7, M), (8, D), (8, D), (9, M), (9, M), (10, B), (10, B), (11, V), (11, V), (12, B),
    (12, B), (1, B), (1, B), (2, D), (2, D), (3, M), (3, M), (4, B), (4, B), (5, V),
];

#[rustfmt::skip]
const TU_VI_MOC_TAM: [(u8, Brightness); 30] = [
    (5, V), (2, D), (3, M), (6, M), (3, M), (4, B), (7, M), (4, B), (5, V), (8, D),
    (5, V), (6, M), (9, M), (6, M), (7, M), (10, B), (7, M), (8, D), (11, V), (8, D),
    (9, M), (12, B), (9, M), (10, B), (1, B), (10, B), (11, V), (2, D), (11, V), (12, B),
];

#[rustfmt::skip]
const TU_VI_KIM_TU: [(u8, Brightness); 30] = [
    (12, B), (5, V), (2, D), (3, M), (1, B), (6, M), (3, M), (4, B), (2, D), (7, M),
    (4, B), (5, V), (3, M), (8, D), (5, V), (6, M), (4, B), (9, M), (6, M), (7, M),
    (5, V), (10, B), (7, M), (8, D), (6, M), (11, V), (8, D), (9, M), (7, M), (12, B),
];

#[rustfmt::skip]
const TU_VI_THO_NGU: [(u8, Brightness); 30] = [
    (7, M), (12, B), (5, V), (2, D), (3, M), (8, D), (1, B), (6, M), (3, M), (4, B),
    (9, M), (2, D), (7, M), (4, B), (5, V), (10, B), (3, M), (8, D), (5, V), (6, M),
    (11, V), (4, B), (9, M), (6, M), (7, M), (12, B), (5, V), (10, B), (7, M), (8, D),
];

#[rustfmt::skip]
const TU_VI_HOA_LUC: [(u8, Brightness); 30] = [
    (10, B), (7, M), (12, B), (5, V), (2, D), (3, M), (11, V), (8, D), (1, B), (6, M),
    (3, M), (4, B), (12, B), (9, M), (2, D), (7, M), (4, B), (5, V), (1, B), (10, B),
    (3, M), (8, D), (5, V), (6, M), (2, D), (11, V), (4, B), (9, M), (6, M), (7, M),
];

/// Reflection of the Tử Vi cell through the axis between cells 5 and 6.
const THIEN_PHU_MIRROR: [u8; 12] = [5, 4, 3, 2, 1, 12, 11, 10, 9, 8, 7, 6];

/// Lazy, memoized evaluator over the registry for one chart.
pub(crate) struct StarEngine<'a> {
    ctx: &'a ChartContext,
    cache: [Option<Placement>; STAR_COUNT],
}

impl<'a> StarEngine<'a> {
    pub fn new(ctx: &'a ChartContext) -> Self {
        StarEngine {
            ctx,
            cache: [None; STAR_COUNT],
        }
    }

    /// Cell and brightness of `id`, computing dependencies as needed.
    pub fn position(&mut self, id: StarId) -> Result<Placement, ChartError> {
        if let Some(hit) = self.cache[id as usize] {
            return Ok(hit);
        }
        let placement = self.compute(id)?;
        self.cache[id as usize] = Some(placement);
        Ok(placement)
    }

    fn cell(&mut self, id: StarId) -> Result<i64, ChartError> {
        Ok(self.position(id)?.cell as i64)
    }

    /// Offset from another star scaled by the polarity direction:
    /// `wrap12(base - 1 + d * steps)`.
    fn directed_from(&mut self, base: StarId, steps: i64) -> Result<u8, ChartError> {
        let cell = self.cell(base)?;
        Ok(wrap12(cell - 1 + self.ctx.direction * steps))
    }

    /// Offset from another star ignoring polarity.
    fn fixed_from(&mut self, base: StarId, steps: i64) -> Result<u8, ChartError> {
        let cell = self.cell(base)?;
        Ok(wrap12(cell - 1 + steps))
    }

    /// The four transformatives borrow the cell of a star selected by the
    /// year stem.
    fn transformative(&mut self, hosts: [StarId; 10]) -> Result<u8, ChartError> {
        let host = hosts[self.ctx.stem0()];
        Ok(self.position(host)?.cell)
    }

    fn compute(&mut self, id: StarId) -> Result<Placement, ChartError> {
        let ctx = *self.ctx;
        match id {
            // ── Principal stars ─────────────────────────────────────────
            StarId::TuVi => {
                let table = match ctx.cuc {
                    Cuc::ThuyNhi => &TU_VI_THUY_NHI,
                    Cuc::MocTam => &TU_VI_MOC_TAM,
                    Cuc::KimTu => &TU_VI_KIM_TU,
                    Cuc::ThoNgu => &TU_VI_THO_NGU,
                    Cuc::HoaLuc => &TU_VI_HOA_LUC,
                };
                let (cell, state) = table[ctx.lunar_day as usize - 1];
                Ok(Placement {
                    cell,
                    state: Some(state),
                })
            }
            StarId::ThienCo => {
                let cell = wrap12(self.cell(StarId::TuVi)? - 2);
                let state = graded(
                    cell,
                    &[
                        (M, &[4, 5, 10, 11]),
                        (V, &[6, 9]),
                        (D, &[1, 2, 7, 8]),
                        (H, &[3, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThaiDuong => {
                let cell = wrap12(self.cell(StarId::ThienCo)? - 3);
                let state = graded(
                    cell,
                    &[
                        (M, &[6, 7]),
                        (V, &[3, 4, 5]),
                        (D, &[2, 8]),
                        (H, &[1, 9, 10, 11, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::VuKhuc => {
                let cell = wrap12(self.cell(StarId::ThaiDuong)? - 2);
                let state = graded(
                    cell,
                    &[
                        (M, &[2, 5, 8, 11]),
                        (V, &[1, 3, 7, 9]),
                        (D, &[4, 10]),
                        (H, &[6, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThienDong => {
                let cell = wrap12(self.cell(StarId::VuKhuc)? - 2);
                let state = graded(
                    cell,
                    &[
                        (M, &[3, 9]),
                        (V, &[1]),
                        (D, &[4, 6, 12]),
                        (H, &[2, 5, 7, 8, 10, 11]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::LiemTrinh => {
                let cell = wrap12(self.cell(StarId::ThienDong)? - 4);
                let state = graded(
                    cell,
                    &[
                        (M, &[5, 11]),
                        (V, &[1, 3, 7, 9]),
                        (D, &[2, 8]),
                        (H, &[4, 6, 10, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThienPhu => {
                let cell = THIEN_PHU_MIRROR[self.cell(StarId::TuVi)? as usize - 1];
                let state = graded(
                    cell,
                    &[
                        (M, &[1, 3, 7, 9]),
                        (V, &[5, 11]),
                        (D, &[6, 8, 12]),
                        (B, &[2, 4, 10]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThaiAm => {
                let cell = wrap12(self.cell(StarId::ThienPhu)?);
                let state = graded(
                    cell,
                    &[
                        (M, &[10, 11, 12]),
                        (V, &[1, 9]),
                        (D, &[2, 8]),
                        (H, &[3, 4, 5, 6, 7]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThamLang => {
                let cell = wrap12(self.cell(StarId::ThaiAm)?);
                let state = graded(
                    cell,
                    &[
                        (M, &[2, 8]),
                        (V, &[5, 11]),
                        (D, &[3, 9]),
                        (H, &[1, 4, 6, 7, 10, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::CuMon => {
                let cell = wrap12(self.cell(StarId::ThamLang)?);
                let state = graded(
                    cell,
                    &[
                        (M, &[4, 10]),
                        (V, &[1, 3, 7]),
                        (D, &[9, 12]),
                        (H, &[2, 5, 6, 8, 11]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThienTuong => {
                let cell = wrap12(self.cell(StarId::CuMon)?);
                let state = graded(
                    cell,
                    &[
                        (M, &[3, 9]),
                        (V, &[1, 5, 7, 11]),
                        (D, &[2, 6, 8, 12]),
                        (H, &[4, 10]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThienLuong => {
                let cell = wrap12(self.cell(StarId::ThienTuong)?);
                let state = graded(
                    cell,
                    &[
                        (M, &[5, 7, 11]),
                        (V, &[1, 3, 4, 9]),
                        (D, &[2, 8]),
                        (H, &[6, 10, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThatSat => {
                let cell = wrap12(self.cell(StarId::ThienLuong)?);
                let state = graded(
                    cell,
                    &[
                        (M, &[1, 3, 7, 9]),
                        (V, &[6, 12]),
                        (D, &[2, 8]),
                        (H, &[4, 5, 10, 11]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::PhaQuan => {
                let cell = wrap12(self.cell(StarId::ThatSat)? + 3);
                let state = graded(
                    cell,
                    &[
                        (M, &[1, 7]),
                        (V, &[2, 8]),
                        (D, &[5, 11]),
                        (H, &[3, 4, 6, 9, 10, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }

            // ── Transformatives ─────────────────────────────────────────
            StarId::HoaLoc => {
                let cell = self.transformative([
                    StarId::LiemTrinh,
                    StarId::ThienCo,
                    StarId::ThienDong,
                    StarId::ThaiAm,
                    StarId::ThamLang,
                    StarId::VuKhuc,
                    StarId::ThaiDuong,
                    StarId::CuMon,
                    StarId::ThienLuong,
                    StarId::PhaQuan,
                ])?;
                let state = graded(
                    cell,
                    &[
                        (V, &[3, 5, 11]),
                        (H, &[1, 7, 10, 12]),
                        (D, &[2, 6, 9]),
                        (B, &[4, 8]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::HoaQuyen => {
                let cell = self.transformative([
                    StarId::PhaQuan,
                    StarId::ThienLuong,
                    StarId::ThienCo,
                    StarId::ThienDong,
                    StarId::ThaiAm,
                    StarId::ThamLang,
                    StarId::VuKhuc,
                    StarId::ThaiDuong,
                    StarId::TuVi,
                    StarId::CuMon,
                ])?;
                let state = graded(
                    cell,
                    &[
                        (V, &[3, 4, 8, 11]),
                        (H, &[1, 9, 10]),
                        (D, &[2]),
                        (B, &[5, 6, 7, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::HoaKhoa => {
                let cell = self.transformative([
                    StarId::VuKhuc,
                    StarId::TuVi,
                    StarId::VanXuong,
                    StarId::ThienCo,
                    StarId::HuuBat,
                    StarId::ThienLuong,
                    StarId::ThaiAm,
                    StarId::VanKhuc,
                    StarId::TaPhu,
                    StarId::ThaiAm,
                ])?;
                let state = graded(
                    cell,
                    &[
                        (V, &[3, 4, 5, 8, 11]),
                        (H, &[10]),
                        (D, &[2, 6, 7, 9]),
                        (B, &[1, 12]),
                    ],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::HoaKy => {
                let cell = self.transformative([
                    StarId::ThaiDuong,
                    StarId::ThaiAm,
                    StarId::LiemTrinh,
                    StarId::CuMon,
                    StarId::ThienCo,
                    StarId::VanKhuc,
                    StarId::ThienDong,
                    StarId::VanXuong,
                    StarId::VuKhuc,
                    StarId::ThamLang,
                ])?;
                let state = graded(
                    cell,
                    &[(D, &[2, 5, 8, 11]), (H, &[1, 3, 4, 6, 7, 9, 10, 12])],
                )?;
                Ok(Placement { cell, state })
            }

            // ── Year-stem tables ────────────────────────────────────────
            StarId::ThienKhoi => {
                const TABLE: [u8; 10] = [2, 1, 12, 12, 2, 1, 7, 7, 4, 4];
                Ok(Placement::plain(TABLE[ctx.stem0()]))
            }
            StarId::ThienViet => {
                const TABLE: [u8; 10] = [8, 9, 10, 10, 8, 9, 3, 3, 6, 6];
                Ok(Placement::plain(TABLE[ctx.stem0()]))
            }
            StarId::ThienPhuc => {
                const TABLE: [u8; 10] = [10, 9, 1, 12, 4, 3, 7, 6, 7, 6];
                Ok(Placement::plain(TABLE[ctx.stem0()]))
            }
            StarId::ThienQuan => {
                const TABLE: [u8; 10] = [8, 5, 6, 3, 4, 10, 12, 10, 11, 7];
                Ok(Placement::plain(TABLE[ctx.stem0()]))
            }
            StarId::ThienTru => {
                const TABLE: [u8; 10] = [6, 7, 1, 6, 7, 9, 3, 7, 10, 11];
                Ok(Placement::plain(TABLE[ctx.stem0()]))
            }
            StarId::LuuHa => {
                const TABLE: [u8; 10] = [10, 11, 8, 9, 6, 7, 4, 5, 12, 3];
                Ok(Placement::plain(TABLE[ctx.stem0()]))
            }
            StarId::LocTon => {
                const TABLE: [u8; 10] = [3, 4, 6, 7, 6, 7, 9, 10, 12, 1];
                let cell = TABLE[ctx.stem0()];
                let state = graded(
                    cell,
                    &[(M, &[1, 3, 4, 7]), (D, &[6, 12]), (B, &[9, 10])],
                )?;
                Ok(Placement { cell, state })
            }

            // ── Year-branch tables ──────────────────────────────────────
            StarId::ThaiTue => Ok(Placement::plain(ctx.year_branch.index() as u8)),
            StarId::ThienMa => {
                const TABLE: [u8; 12] = [3, 12, 9, 6, 3, 12, 9, 6, 3, 12, 9, 6];
                let cell = TABLE[ctx.branch0()];
                let state = graded_partial(cell, &[(D, &[3, 6]), (H, &[9, 12])]);
                Ok(Placement { cell, state })
            }
            StarId::PhaToai => {
                const TABLE: [u8; 12] = [6, 2, 10, 6, 2, 10, 6, 2, 10, 6, 2, 10];
                Ok(Placement::plain(TABLE[ctx.branch0()]))
            }
            StarId::CoThan => {
                const TABLE: [u8; 12] = [3, 3, 6, 6, 6, 9, 9, 9, 12, 12, 12, 3];
                Ok(Placement::plain(TABLE[ctx.branch0()]))
            }
            StarId::QuaTu => {
                const TABLE: [u8; 12] = [11, 11, 2, 2, 2, 5, 5, 5, 8, 8, 8, 11];
                Ok(Placement::plain(TABLE[ctx.branch0()]))
            }
            StarId::DaoHoa => {
                const TABLE: [u8; 12] = [10, 7, 4, 1, 10, 7, 4, 1, 10, 7, 4, 1];
                Ok(Placement::plain(TABLE[ctx.branch0()]))
            }
            StarId::HoaCai => {
                const TABLE: [u8; 12] = [5, 2, 11, 8, 5, 2, 11, 8, 5, 2, 11, 8];
                Ok(Placement::plain(TABLE[ctx.branch0()]))
            }
            StarId::KiepSat => {
                const TABLE: [u8; 12] = [6, 3, 12, 9, 6, 3, 12, 9, 6, 3, 12, 9];
                Ok(Placement::plain(TABLE[ctx.branch0()]))
            }
            StarId::HongLoan => Ok(Placement::plain(wrap12(3 - ctx.branch0() as i64))),
            StarId::ThienHy => Ok(Placement::plain(wrap12(9 - ctx.branch0() as i64))),
            StarId::PhuongCac => Ok(Placement::plain(wrap12(10 - ctx.branch0() as i64))),
            StarId::GiaiThan => Ok(Placement::plain(self.position(StarId::PhuongCac)?.cell)),
            StarId::ThienKhoc => {
                let cell = wrap12(6 - ctx.branch0() as i64);
                let state = graded(
                    cell,
                    &[(D, &[1, 3, 7, 9]), (H, &[2, 4, 5, 6, 8, 10, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }

            // ── The Thái Tuế annual ring ────────────────────────────────
            StarId::ThieuDuong => Ok(Placement::plain(wrap12(self.cell(StarId::ThaiTue)?))),
            StarId::TangMon => {
                let cell = wrap12(self.cell(StarId::ThieuDuong)?);
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 9, 10]), (H, &[1, 2, 5, 6, 7, 8, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThieuAm => Ok(Placement::plain(wrap12(self.cell(StarId::TangMon)?))),
            StarId::QuanPhuf => Ok(Placement::plain(wrap12(self.cell(StarId::ThieuAm)?))),
            StarId::TuPhu => Ok(Placement::plain(wrap12(self.cell(StarId::QuanPhuf)?))),
            StarId::TuePha => Ok(Placement::plain(wrap12(self.cell(StarId::TuPhu)?))),
            StarId::LongDuc => Ok(Placement::plain(wrap12(self.cell(StarId::TuePha)?))),
            StarId::BachHo => {
                let cell = wrap12(self.cell(StarId::LongDuc)?);
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 9, 10]), (H, &[1, 2, 5, 6, 7, 8, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::PhucDuc => Ok(Placement::plain(wrap12(self.cell(StarId::BachHo)?))),
            StarId::DieuKhach => Ok(Placement::plain(wrap12(self.cell(StarId::PhucDuc)?))),
            StarId::TrucPhu => Ok(Placement::plain(wrap12(self.cell(StarId::DieuKhach)?))),
            StarId::ThienKhong => Ok(Placement::plain(self.position(StarId::ThieuDuong)?.cell)),
            StarId::ThienDuc => Ok(Placement::plain(self.position(StarId::PhucDuc)?.cell)),
            StarId::NguyetDuc => Ok(Placement::plain(self.position(StarId::TuPhu)?.cell)),
            StarId::LongTri => Ok(Placement::plain(self.position(StarId::QuanPhuf)?.cell)),
            StarId::ThienHu => {
                let cell = self.position(StarId::TuePha)?.cell;
                let state = graded(
                    cell,
                    &[(D, &[1, 3, 7, 9]), (H, &[2, 4, 5, 6, 8, 10, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }

            // ── The Lộc Tồn ring ────────────────────────────────────────
            StarId::KinhDuong => {
                let cell = wrap12(self.cell(StarId::LocTon)?);
                let state = graded(
                    cell,
                    &[(D, &[2, 5, 8, 11]), (H, &[1, 3, 4, 6, 7, 9, 10, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::DaLa => {
                let cell = wrap12(self.cell(StarId::LocTon)? - 2);
                let state = graded(
                    cell,
                    &[(D, &[2, 5, 8, 11]), (H, &[1, 3, 4, 6, 7, 9, 10, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::BacSy => Ok(Placement::plain(self.position(StarId::LocTon)?.cell)),
            StarId::LucSi => Ok(Placement::plain(self.directed_from(StarId::LocTon, 1)?)),
            StarId::ThanhLong => Ok(Placement::plain(self.directed_from(StarId::LocTon, 2)?)),
            StarId::TieuHao => {
                let cell = self.directed_from(StarId::LocTon, 3)?;
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 9, 10]), (H, &[1, 2, 5, 6, 7, 8, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::TuongQuan => Ok(Placement::plain(self.directed_from(StarId::LocTon, 4)?)),
            StarId::TauThu => Ok(Placement::plain(self.directed_from(StarId::LocTon, 5)?)),
            StarId::PhiLiem => Ok(Placement::plain(self.directed_from(StarId::LocTon, 6)?)),
            StarId::HiThan => Ok(Placement::plain(self.directed_from(StarId::LocTon, 7)?)),
            StarId::BenhPhu => Ok(Placement::plain(self.directed_from(StarId::LocTon, 8)?)),
            StarId::DaiHao => {
                let cell = self.directed_from(StarId::LocTon, 9)?;
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 9, 10]), (H, &[1, 2, 5, 6, 7, 8, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::PhucBinh => Ok(Placement::plain(self.directed_from(StarId::LocTon, 10)?)),
            StarId::QuanPhur => Ok(Placement::plain(self.directed_from(StarId::LocTon, 11)?)),
            StarId::DuongPhu => Ok(Placement::plain(self.fixed_from(StarId::LocTon, 5)?)),
            StarId::QuocAn => Ok(Placement::plain(self.fixed_from(StarId::LocTon, 8)?)),
            StarId::LnVanTinh => Ok(Placement::plain(self.fixed_from(StarId::LocTon, 3)?)),

            // ── Hour-branch rules ───────────────────────────────────────
            StarId::DiaKiep => {
                let cell = wrap12(11 + ctx.hour0());
                let state = graded(
                    cell,
                    &[(D, &[3, 6, 9, 12]), (H, &[1, 2, 4, 5, 7, 8, 10, 11])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::DiaKhong => {
                let cell = wrap12(11 - ctx.hour0());
                let state = graded(
                    cell,
                    &[(D, &[3, 6, 9, 12]), (H, &[1, 2, 4, 5, 7, 8, 10, 11])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::VanXuong => {
                let cell = wrap12(10 - ctx.hour0());
                let state = graded(
                    cell,
                    &[(H, &[1, 3, 7, 9]), (D, &[2, 4, 5, 6, 8, 10, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::VanKhuc => {
                let cell = wrap12(4 + ctx.hour0());
                let state = graded(
                    cell,
                    &[(H, &[1, 3, 7, 9]), (D, &[2, 4, 5, 6, 8, 10, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThaiPhu => Ok(Placement::plain(wrap12(6 + ctx.hour0()))),
            StarId::PhongCao => Ok(Placement::plain(wrap12(2 + ctx.hour0()))),
            StarId::HoaTinh => {
                let base: i64 = match ctx.year_branch.index() {
                    3 | 7 | 11 => 1,
                    1 | 5 | 9 => 2,
                    2 | 6 | 10 => 3,
                    4 | 8 | 12 => 9,
                    _ => return Err(ChartError::InvalidBranch),
                };
                let cell = wrap12(base + ctx.direction * ctx.hour0());
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 5, 6, 7]), (H, &[1, 2, 8, 9, 10, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::LinhTinh => {
                let base: i64 = match ctx.year_branch.index() {
                    3 | 7 | 11 => 3,
                    _ => 10,
                };
                // Linh Tinh runs against the usual direction.
                let cell = wrap12(base - ctx.direction * ctx.hour0());
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 5, 6, 7]), (H, &[1, 2, 8, 9, 10, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }

            // ── Lunar-month rules ───────────────────────────────────────
            StarId::TaPhu => Ok(Placement::plain(wrap12(4 + ctx.month0()))),
            StarId::HuuBat => Ok(Placement::plain(wrap12(10 - ctx.month0()))),
            StarId::DiaGiai => Ok(Placement::plain(wrap12(7 + ctx.month0()))),
            StarId::ThienGiai => Ok(Placement::plain(wrap12(8 + ctx.month0()))),
            StarId::ThienHinh => {
                let cell = wrap12(9 + ctx.month0());
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 9, 10]), (H, &[1, 2, 5, 6, 7, 8, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThienY => {
                let cell = wrap12(1 + ctx.month0());
                let state = graded(
                    cell,
                    &[(D, &[3, 4, 9, 10]), (H, &[1, 2, 5, 6, 7, 8, 11, 12])],
                )?;
                Ok(Placement { cell, state })
            }
            StarId::ThienDieu => {
                // Same cell and brightness as Thiên Y.
                self.position(StarId::ThienY)
            }

            // ── Lunar-day rules ─────────────────────────────────────────
            StarId::TamThai => {
                let cell = wrap12(self.cell(StarId::TaPhu)? - 1 + ctx.lunar_day - 1);
                Ok(Placement::plain(cell))
            }
            StarId::BatToa => {
                let cell = wrap12(self.cell(StarId::HuuBat)? - 1 - (ctx.lunar_day - 1));
                Ok(Placement::plain(cell))
            }
            StarId::AnQuang => {
                let cell = wrap12(self.cell(StarId::VanXuong)? - 1 + ctx.lunar_day - 2);
                Ok(Placement::plain(cell))
            }
            StarId::ThienQuy => {
                let cell = wrap12(self.cell(StarId::VanKhuc)? - 1 - (ctx.lunar_day - 2));
                Ok(Placement::plain(cell))
            }

            // ── Palace-anchored rules ───────────────────────────────────
            StarId::ThienTho => Ok(Placement::plain(wrap12(
                ctx.than_cell as i64 - 1 + ctx.branch0() as i64,
            ))),
            StarId::ThienTai => Ok(Placement::plain(wrap12(
                ctx.menh_cell as i64 - 1 - ctx.branch0() as i64,
            ))),
            // Thiên Thương keeps to the servants palace, Thiên Sứ to the
            // illness palace.
            StarId::ThienThuong => Ok(Placement::plain(wrap12(ctx.menh_cell as i64 - 1 + 5))),
            StarId::ThienSu => Ok(Placement::plain(wrap12(ctx.menh_cell as i64 - 1 + 7))),
            StarId::DauQuan => Ok(Placement::plain(wrap12(
                ctx.branch0() as i64 - ctx.month0() + ctx.hour0(),
            ))),

            // ── Fixed cells ─────────────────────────────────────────────
            StarId::ThienLa => Ok(Placement::plain(5)),
            StarId::DiaVong => Ok(Placement::plain(11)),

            // ── Life-cycle stations ─────────────────────────────────────
            StarId::TruongSinh => {
                let cell = match ctx.cuc {
                    Cuc::ThuyNhi => 9,
                    Cuc::MocTam => 12,
                    Cuc::KimTu => 6,
                    Cuc::ThoNgu => 9,
                    Cuc::HoaLuc => 3,
                };
                Ok(Placement::plain(cell))
            }
            StarId::MocDuc => Ok(Placement::plain(self.directed_from(StarId::TruongSinh, 1)?)),
            StarId::QuanDoi => Ok(Placement::plain(self.directed_from(StarId::MocDuc, 1)?)),
            StarId::LamQuan => Ok(Placement::plain(self.directed_from(StarId::QuanDoi, 1)?)),
            StarId::DeVuong => Ok(Placement::plain(self.directed_from(StarId::LamQuan, 1)?)),
            StarId::Suy => Ok(Placement::plain(self.directed_from(StarId::DeVuong, 1)?)),
            StarId::Benh => Ok(Placement::plain(self.directed_from(StarId::Suy, 1)?)),
            StarId::Tu => Ok(Placement::plain(self.directed_from(StarId::Benh, 1)?)),
            StarId::Mo => Ok(Placement::plain(self.directed_from(StarId::Tu, 1)?)),
            StarId::Tuyet => Ok(Placement::plain(self.directed_from(StarId::Mo, 1)?)),
            StarId::Thai => Ok(Placement::plain(self.directed_from(StarId::Tuyet, 1)?)),
            StarId::Duong => Ok(Placement::plain(self.directed_from(StarId::Thai, 1)?)),

            // ── Overlays ────────────────────────────────────────────────
            StarId::Tuan => {
                // The two-cell retreat after the modular step is preserved
                // verbatim from the reference; every known vector passes
                // with it.
                let marker = wrap12(ctx.year_branch.index() as i64 - ctx.year_stem.index() as i64);
                Ok(Placement::plain(wrap12(marker as i64 - 3)))
            }
            StarId::Triet => {
                const TABLE: [u8; 10] = [9, 7, 5, 3, 1, 9, 7, 5, 3, 1];
                Ok(Placement::plain(TABLE[ctx.stem0()]))
            }

            // ── Querent-year stars ──────────────────────────────────────
            StarId::LuuThaiTue => Ok(Placement::plain(ctx.querent_branch.index() as u8)),
            StarId::LuuThienMa => {
                const TABLE: [u8; 12] = [3, 12, 9, 6, 3, 12, 9, 6, 3, 12, 9, 6];
                Ok(Placement::plain(TABLE[ctx.querent_branch.index() as usize - 1]))
            }
            StarId::LuuTangMon => Ok(Placement::plain(wrap12(2 + ctx.querent_branch0()))),
            StarId::LuuThienHu => Ok(Placement::plain(wrap12(6 + ctx.querent_branch0()))),
            StarId::LuuThienKhoc => Ok(Placement::plain(wrap12(6 - ctx.querent_branch0()))),
            StarId::LuuBachHo => Ok(Placement::plain(wrap12(8 + ctx.querent_branch0()))),
            StarId::LuuLocTon => {
                const TABLE: [u8; 10] = [3, 4, 6, 7, 6, 7, 9, 10, 12, 1];
                Ok(Placement::plain(TABLE[ctx.querent_stem0()]))
            }
            StarId::LuuKinhDuong => Ok(Placement::plain(wrap12(self.cell(StarId::LuuLocTon)?))),
            StarId::LuuDaLa => Ok(Placement::plain(wrap12(self.cell(StarId::LuuLocTon)? - 2))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stars::REGISTRY;

    fn ctx(
        y: i32,
        m: u32,
        d: u32,
        h: u32,
        min: u32,
        gender: Gender,
        querent: i32,
    ) -> ChartContext {
        let birth = SolarDate::with_time(y, m, d, h, min, 0).unwrap();
        ChartContext::new(&birth, querent, gender).unwrap()
    }

    #[test]
    fn test_every_star_places_in_range() {
        let contexts = [
            ctx(1991, 7, 3, 5, 50, Gender::Nam, 2023),
            ctx(1997, 7, 28, 5, 0, Gender::Nu, 2023),
            ctx(1994, 11, 2, 16, 0, Gender::Nu, 2023),
            ctx(1997, 12, 25, 20, 0, Gender::Nu, 2023),
            ctx(2002, 8, 16, 10, 30, Gender::Nu, 2023),
        ];
        for context in &contexts {
            let mut engine = StarEngine::new(context);
            for def in REGISTRY.iter() {
                let placement = engine.position(def.id).unwrap();
                assert!(
                    (1..=12).contains(&placement.cell),
                    "{} out of range",
                    def.name
                );
            }
        }
    }

    #[test]
    fn test_principal_ring_is_consistent() {
        // The six stars hanging off Tử Vi keep their fixed mutual offsets.
        let context = ctx(1991, 7, 3, 5, 50, Gender::Nam, 2023);
        let mut engine = StarEngine::new(&context);
        let tu_vi = engine.position(StarId::TuVi).unwrap().cell as i64;
        let thien_co = engine.position(StarId::ThienCo).unwrap().cell;
        assert_eq!(thien_co, wrap12(tu_vi - 2));
        let thien_phu = engine.position(StarId::ThienPhu).unwrap().cell;
        assert_eq!(thien_phu, THIEN_PHU_MIRROR[tu_vi as usize - 1]);
    }

    #[test]
    fn test_life_cycle_forms_a_ring() {
        let context = ctx(1997, 7, 28, 5, 0, Gender::Nu, 2023);
        let mut engine = StarEngine::new(&context);
        let stations = [
            StarId::TruongSinh,
            StarId::MocDuc,
            StarId::QuanDoi,
            StarId::LamQuan,
            StarId::DeVuong,
            StarId::Suy,
            StarId::Benh,
            StarId::Tu,
            StarId::Mo,
            StarId::Tuyet,
            StarId::Thai,
            StarId::Duong,
        ];
        let mut seen = [false; 12];
        for station in stations {
            let cell = engine.position(station).unwrap().cell;
            assert!(!seen[(cell - 1) as usize], "{} collides", station.name());
            seen[(cell - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_transformative_follows_its_host() {
        // 1991 is a Tân year (stem 8): Hoá Kỵ rides Văn Xương.
        let context = ctx(1991, 7, 3, 5, 50, Gender::Nam, 2023);
        assert_eq!(context.year_stem, Stem::Tan);
        let mut engine = StarEngine::new(&context);
        let host = engine.position(StarId::VanXuong).unwrap().cell;
        let hoa_ky = engine.position(StarId::HoaKy).unwrap().cell;
        assert_eq!(hoa_ky, host);
    }

    #[test]
    fn test_thien_dieu_inherits_thien_y() {
        let context = ctx(2002, 8, 16, 10, 30, Gender::Nu, 2023);
        let mut engine = StarEngine::new(&context);
        let thien_y = engine.position(StarId::ThienY).unwrap();
        let thien_dieu = engine.position(StarId::ThienDieu).unwrap();
        assert_eq!(thien_y, thien_dieu);
    }

    #[test]
    fn test_tuan_triet_examples() {
        // Tân Mùi year: stem 8, branch 8.
        let context = ctx(1991, 7, 3, 5, 50, Gender::Nam, 2023);
        let mut engine = StarEngine::new(&context);
        let tuan = engine.position(StarId::Tuan).unwrap().cell;
        assert_eq!(tuan, wrap12(wrap12(8 - 8) as i64 - 3));
        let triet = engine.position(StarId::Triet).unwrap().cell;
        assert_eq!(triet, 5);
    }
}
