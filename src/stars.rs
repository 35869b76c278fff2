//! # Star Registry
//!
//! The declarative side of the star catalog: an identifier per star, its
//! fixed metadata (display name, polarity, element, routing category,
//! within-category print order, bold flag), and the per-chart placement
//! record. The positioning rules themselves live in the engine module;
//! keeping metadata and rules apart means the registry can be iterated,
//! sorted and serialized without evaluating anything.
//!
//! Brightness is a per-chart output. It is carried on [`PlacedStar`] in
//! the snapshot and never stored on the registry, so charts can be
//! computed concurrently against the same process-wide tables.

use crate::elements::{Color, Element};
use crate::palace::Polarity;
use serde::Serialize;

/// Brightness state of a star in its final cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Brightness {
    Mieu,
    Vuong,
    Dac,
    Binh,
    Ham,
}

impl Brightness {
    /// Compact suffix printed after the star name, e.g. "Tử Vi(M)".
    pub fn suffix(self) -> &'static str {
        match self {
            Brightness::Mieu => "M",
            Brightness::Vuong => "V",
            Brightness::Dac => "Đ",
            Brightness::Binh => "B",
            Brightness::Ham => "H",
        }
    }
}

impl Serialize for Brightness {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.suffix())
    }
}

/// Which list of a cell a star is routed into, or whether it is one of the
/// two chart-level overlays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum StarCategory {
    ChinhTinh,
    PhuTinhTrai,
    PhuTinhPhai,
    PhuTinhDuoi,
    Overlay,
}

/// Every star the engine can place, in catalog order.
///
/// The discriminants are the registry indices: `REGISTRY[id as usize]`
/// is the metadata of `id`, and the engine's memo table is indexed the
/// same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum StarId {
    TuVi, ThienCo, ThaiDuong, VuKhuc, ThienDong, LiemTrinh, ThienPhu,
    ThaiAm, ThamLang, CuMon, ThienTuong, ThienLuong, ThatSat, PhaQuan,
    ThienViet, HoaKhoa, TaPhu, PhiLiem, TrucPhu, PhaToai, HiThan,
    ThienPhuc, DiaKiep, ThaiTue, HoaLoc, QuocAn, ThieuDuong, ThienKhong,
    BenhPhu, DiaGiai, ThienMa, HoaTinh, LinhTinh, CoThan, DaiHao, TangMon,
    ThienQuy, TauThu, DuongPhu, ThienTho, GiaiThan, PhuongCac, DiaKhong,
    QuaTu, DieuKhach, ThienLa, HuuBat, HongLoan, ThienGiai, PhongCao,
    ThienTru, ThieuAm, PhucBinh, VanXuong, ThienKhoi, ThienHy, DaoHoa,
    PhucDuc, ThienDuc, TuongQuan, ThienSu, AnQuang, ThienQuan, HoaCai,
    LongTri, DaLa, HoaKy, ThienHinh, QuanPhur, QuanPhuf, DiaVong,
    HoaQuyen, ThienY, LnVanTinh, ThienTai, ThienDieu, TieuHao, BachHo,
    ThaiPhu, TamThai, BatToa, ThanhLong, LongDuc, ThienThuong, LucSi,
    KinhDuong, TuePha, ThienHu, ThienKhoc, DauQuan, VanKhuc, LocTon,
    BacSy, NguyetDuc, LuuHa, TuPhu, KiepSat, TruongSinh, MocDuc, QuanDoi,
    LamQuan, DeVuong, Suy, Benh, Tu, Mo, Tuyet, Thai, Duong, Tuan, Triet,
    LuuThienMa, LuuTangMon, LuuThienHu, LuuThaiTue, LuuThienKhoc,
    LuuKinhDuong, LuuLocTon, LuuBachHo, LuuDaLa,
}

/// Number of registry entries.
pub const STAR_COUNT: usize = 120;

impl StarId {
    /// Static metadata of this star.
    pub fn def(self) -> &'static StarDef {
        &REGISTRY[self as usize]
    }

    /// Display name with diacritics.
    pub fn name(self) -> &'static str {
        self.def().name
    }
}

impl Serialize for StarId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Fixed metadata of a registry entry.
#[derive(Clone, Copy, Debug)]
pub struct StarDef {
    pub id: StarId,
    pub name: &'static str,
    pub polarity: Option<Polarity>,
    pub element: Option<Element>,
    pub category: StarCategory,
    /// Ascending sort key within the star's cell list.
    pub order: f32,
    pub bold: bool,
}

/// A star as it appears in a finished chart: its identity plus the
/// brightness computed for its final cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PlacedStar {
    pub id: StarId,
    pub state: Option<Brightness>,
}

impl PlacedStar {
    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    /// Render color; stars without an element print black.
    pub fn color(&self) -> Color {
        self.id
            .def()
            .element
            .map(Element::color)
            .unwrap_or(Color::Black)
    }

    pub fn bold(&self) -> bool {
        self.id.def().bold
    }

    /// Display label with the brightness suffix, e.g. "Liêm Trinh(Đ)".
    pub fn label(&self) -> String {
        match self.state {
            Some(state) => format!("{}({})", self.name(), state.suffix()),
            None => self.name().to_string(),
        }
    }
}

const DUONG: Option<Polarity> = Some(Polarity::Duong);
const AM: Option<Polarity> = Some(Polarity::Am);
const NP: Option<Polarity> = None;

const KIM: Option<Element> = Some(Element::Metal);
const MOC: Option<Element> = Some(Element::Wood);
const THUY: Option<Element> = Some(Element::Water);
const HOA: Option<Element> = Some(Element::Fire);
const THO: Option<Element> = Some(Element::Earth);
const NE: Option<Element> = None;

const fn def(
    id: StarId,
    name: &'static str,
    polarity: Option<Polarity>,
    element: Option<Element>,
    category: StarCategory,
    order: f32,
    bold: bool,
) -> StarDef {
    StarDef {
        id,
        name,
        polarity,
        element,
        category,
        order,
        bold,
    }
}

/// The full catalog, in evaluation order. Equal `order` keys keep this
/// order after the per-cell sort (the sort is stable), so the sequence
/// here is part of the rendered layout.
#[rustfmt::skip]
pub static REGISTRY: [StarDef; STAR_COUNT] = {
    use StarCategory::{ChinhTinh as CT, PhuTinhTrai as LEFT, PhuTinhPhai as RIGHT,
                       PhuTinhDuoi as BELOW, Overlay as OVER};
    use StarId as S;
    [
        def(S::TuVi, "Tử Vi", DUONG, THO, CT, 1.0, true),
        def(S::ThienCo, "Thiên Cơ", AM, MOC, CT, 1.0, true),
        def(S::ThaiDuong, "Thái Dương", DUONG, HOA, CT, 1.0, true),
        def(S::VuKhuc, "Vũ Khúc", AM, KIM, CT, 1.0, true),
        def(S::ThienDong, "Thiên Đồng", DUONG, THUY, CT, 1.0, true),
        def(S::LiemTrinh, "Liêm Trinh", AM, HOA, CT, 1.0, true),
        def(S::ThienPhu, "Thiên Phủ", DUONG, THO, CT, 2.0, true),
        def(S::ThaiAm, "Thái Âm", AM, THUY, CT, 2.0, true),
        def(S::ThamLang, "Tham Lang", AM, THUY, CT, 2.0, true),
        def(S::CuMon, "Cự Môn", AM, THUY, CT, 2.0, true),
        def(S::ThienTuong, "Thiên Tướng", DUONG, THUY, CT, 2.0, true),
        def(S::ThienLuong, "Thiên Lương", AM, MOC, CT, 2.0, true),
        def(S::ThatSat, "Thất Sát", DUONG, KIM, CT, 2.0, true),
        def(S::PhaQuan, "Phá Quân", AM, THUY, CT, 2.0, true),
        def(S::ThienViet, "Thiên Việt", NP, HOA, LEFT, 4.5, true),
        def(S::HoaKhoa, "Hoá Khoa", NP, MOC, LEFT, 0.2, true),
        def(S::TaPhu, "Tả Phù", NP, THO, LEFT, 6.0, true),
        def(S::PhiLiem, "Phi Liêm", NP, HOA, RIGHT, 15.1, false),
        def(S::TrucPhu, "Trực Phù", NP, HOA, RIGHT, 25.0, false),
        def(S::PhaToai, "Phá Toái", NP, HOA, RIGHT, 30.0, false),
        def(S::HiThan, "Hỉ Thần", NP, HOA, LEFT, 15.1, false),
        def(S::ThienPhuc, "Thiên Phúc", NP, THO, LEFT, 15.1, false),
        def(S::DiaKiep, "Địa Kiếp", DUONG, HOA, RIGHT, 0.0, true),
        def(S::ThaiTue, "Thái Tuế", NP, HOA, RIGHT, 25.0, false),
        def(S::HoaLoc, "Hoá Lộc", NP, MOC, LEFT, 0.0, true),
        def(S::QuocAn, "Quốc Ấn", NP, THO, LEFT, 15.1, false),
        def(S::ThieuDuong, "Thiếu Dương", NP, HOA, LEFT, 25.0, false),
        def(S::ThienKhong, "Thiên Không", NP, HOA, RIGHT, 2.2, true),
        def(S::BenhPhu, "Bệnh Phù", NP, THO, RIGHT, 15.1, false),
        def(S::DiaGiai, "Địa Giải", NP, THO, LEFT, 10.0, false),
        def(S::ThienMa, "Thiên Mã", NP, HOA, LEFT, 30.0, false),
        def(S::HoaTinh, "Hoả Tinh", DUONG, HOA, RIGHT, -1.0, true),
        def(S::LinhTinh, "Linh Tinh", AM, HOA, RIGHT, -0.9, true),
        def(S::CoThan, "Cô Thần", NP, THO, RIGHT, 8.2, true),
        def(S::DaiHao, "Đại Hao", NP, HOA, RIGHT, 15.1, false),
        def(S::TangMon, "Tang Môn", NP, MOC, RIGHT, 25.0, false),
        def(S::ThienQuy, "Thiên Quý", NP, THO, LEFT, 1.05, false),
        def(S::TauThu, "Tấu Thư", NP, KIM, LEFT, 15.1, false),
        def(S::DuongPhu, "Đường Phù", NP, MOC, LEFT, 15.1, false),
        def(S::ThienTho, "Thiên Thọ", NP, THO, LEFT, 26.0, false),
        def(S::GiaiThan, "Giải Thần", NP, MOC, LEFT, 30.0, false),
        def(S::PhuongCac, "Phượng Các", NP, MOC, LEFT, 30.1, false),
        def(S::DiaKhong, "Địa Không", AM, HOA, RIGHT, -0.1, true),
        def(S::QuaTu, "Quả Tú", NP, THO, RIGHT, 8.2, true),
        def(S::DieuKhach, "Điếu Khách", NP, HOA, RIGHT, 25.0, false),
        def(S::ThienLa, "Thiên La", NP, KIM, RIGHT, 1000.0, false),
        def(S::HuuBat, "Hữu Bật", NP, THUY, LEFT, 6.1, true),
        def(S::HongLoan, "Hồng Loan", NP, THUY, LEFT, 12.1, true),
        def(S::ThienGiai, "Thiên Giải", NP, HOA, LEFT, 10.0, false),
        def(S::PhongCao, "Phong Cáo", NP, THO, LEFT, 11.0, false),
        def(S::ThienTru, "Thiên Trù", NP, THO, LEFT, 15.1, false),
        def(S::ThieuAm, "Thiếu Âm", NP, THUY, LEFT, 25.0, false),
        def(S::PhucBinh, "Phục Binh", NP, HOA, RIGHT, 15.1, false),
        def(S::VanXuong, "Văn Xương", NP, KIM, LEFT, 1.2, true),
        def(S::ThienKhoi, "Thiên Khôi", NP, HOA, LEFT, 4.5, true),
        def(S::ThienHy, "Thiên Hỷ", NP, THUY, LEFT, 11.9, true),
        def(S::DaoHoa, "Đào Hoa", NP, MOC, LEFT, 12.0, true),
        def(S::PhucDuc, "Phúc Đức", NP, THO, LEFT, 25.0, false),
        def(S::ThienDuc, "Thiên Đức", NP, HOA, LEFT, 30.0, false),
        def(S::TuongQuan, "Tướng Quân", NP, MOC, RIGHT, 5.1, false),
        def(S::ThienSu, "Thiên Sứ", NP, THUY, RIGHT, 1000.0, false),
        def(S::AnQuang, "Ân Quang", NP, MOC, LEFT, 1.04, false),
        def(S::ThienQuan, "Thiên Quan", NP, HOA, LEFT, 15.1, false),
        def(S::HoaCai, "Hoa Cái", NP, KIM, LEFT, 12.0, false),
        def(S::LongTri, "Long Trì", NP, THUY, LEFT, 30.0, false),
        def(S::DaLa, "Đà La", AM, KIM, RIGHT, 0.0, true),
        def(S::HoaKy, "Hoá Kỵ", NP, THUY, RIGHT, 0.8, true),
        def(S::ThienHinh, "Thiên Hình", DUONG, HOA, RIGHT, 3.0, true),
        def(S::QuanPhur, "Quan Phủ", NP, HOA, RIGHT, 15.1, false),
        def(S::QuanPhuf, "Quan Phù", NP, HOA, RIGHT, 25.0, false),
        def(S::DiaVong, "Địa Võng", NP, KIM, RIGHT, 1000.0, false),
        def(S::HoaQuyen, "Hoá Quyền", NP, MOC, LEFT, 0.1, true),
        def(S::ThienY, "Thiên Y", NP, THUY, LEFT, -1.0, false),
        def(S::LnVanTinh, "LN Văn Tinh", NP, KIM, LEFT, 15.1, false),
        def(S::ThienTai, "Thiên Tài", NP, THO, LEFT, 30.0, false),
        def(S::ThienDieu, "Thiên Diêu", NP, THUY, RIGHT, -0.9, true),
        def(S::TieuHao, "Tiểu Hao", NP, HOA, RIGHT, 15.1, false),
        def(S::BachHo, "Bạch Hổ", NP, KIM, RIGHT, 25.0, false),
        def(S::ThaiPhu, "Thai Phụ", NP, KIM, LEFT, 0.9, false),
        def(S::TamThai, "Tam Thai", NP, THUY, LEFT, 3.5, false),
        def(S::BatToa, "Bát Toạ", NP, MOC, LEFT, 3.6, false),
        def(S::ThanhLong, "Thanh Long", NP, THUY, LEFT, 15.1, false),
        def(S::LongDuc, "Long Đức", NP, THUY, LEFT, 25.0, false),
        def(S::ThienThuong, "Thiên Thương", NP, THO, RIGHT, 1000.0, false),
        def(S::LucSi, "Lực Sĩ", NP, HOA, LEFT, 15.1, false),
        def(S::KinhDuong, "Kình Dương", DUONG, KIM, RIGHT, 0.0, true),
        def(S::TuePha, "Tuế Phá", NP, HOA, RIGHT, 25.0, false),
        def(S::ThienHu, "Thiên Hư", NP, THUY, RIGHT, 8.0, false),
        def(S::ThienKhoc, "Thiên Khốc", NP, KIM, RIGHT, 8.1, false),
        def(S::DauQuan, "Đẩu Quân", NP, HOA, RIGHT, 31.0, false),
        def(S::VanKhuc, "Văn Khúc", NP, THUY, LEFT, 1.1, true),
        def(S::LocTon, "Lộc Tồn", NP, THO, LEFT, -0.8, true),
        def(S::BacSy, "Bác Sỹ", NP, THUY, LEFT, 15.0, false),
        def(S::NguyetDuc, "Nguyệt Đức", NP, HOA, LEFT, 30.0, false),
        def(S::LuuHa, "Lưu Hà", NP, THUY, RIGHT, 4.5, false),
        def(S::TuPhu, "Tử Phủ", NP, HOA, RIGHT, 25.0, false),
        def(S::KiepSat, "Kiếp Sát", NP, HOA, RIGHT, 30.0, false),
        def(S::TruongSinh, "Trường Sinh", NP, NE, BELOW, 0.0, true),
        def(S::MocDuc, "Mộc Dục", NP, NE, BELOW, 0.0, true),
        def(S::QuanDoi, "Quan Đới", NP, NE, BELOW, 0.0, true),
        def(S::LamQuan, "Lâm Quan", NP, NE, BELOW, 0.0, true),
        def(S::DeVuong, "Đế Vượng", NP, NE, BELOW, 0.0, true),
        def(S::Suy, "Suy", NP, NE, BELOW, 0.0, true),
        def(S::Benh, "Bệnh", NP, NE, BELOW, 0.0, true),
        def(S::Tu, "Tử", NP, NE, BELOW, 0.0, true),
        def(S::Mo, "Mộ", NP, NE, BELOW, 0.0, true),
        def(S::Tuyet, "Tuyệt", NP, NE, BELOW, 0.0, true),
        def(S::Thai, "Thai", NP, NE, BELOW, 0.0, true),
        def(S::Duong, "Dưỡng", NP, NE, BELOW, 0.0, true),
        def(S::Tuan, "Tuần", NP, NE, OVER, 0.0, true),
        def(S::Triet, "Triệt", NP, NE, OVER, 0.0, true),
        def(S::LuuThienMa, "L. Thiên Mã", NP, HOA, LEFT, 2000.0, false),
        def(S::LuuTangMon, "L. Tang Môn", NP, MOC, RIGHT, 2000.0, false),
        def(S::LuuThienHu, "L. Thiên Hư", NP, THUY, RIGHT, 2001.0, false),
        def(S::LuuThaiTue, "L. Thái Tuế", NP, HOA, RIGHT, 2002.0, false),
        def(S::LuuThienKhoc, "L. Thiên Khốc", NP, KIM, RIGHT, 2003.0, false),
        def(S::LuuKinhDuong, "L. Kình Dương", NP, KIM, RIGHT, 2010.0, false),
        def(S::LuuLocTon, "L. Lộc Tồn", NP, THO, LEFT, 2001.0, false),
        def(S::LuuBachHo, "L. Bạch Hổ", NP, KIM, RIGHT, 2004.0, false),
        def(S::LuuDaLa, "L. Đà La", NP, KIM, RIGHT, 2015.0, false),
    ]
};
