//! # End-to-End Chart Tests
//!
//! Full `build_chart` scenarios checked against known readings, plus the
//! structural invariants every chart must satisfy regardless of input.

use std::collections::HashSet;
use tuvi_chart_lib::chart::{Chart, build_chart};
use tuvi_chart_lib::palace::Gender;
use tuvi_chart_lib::stars::{REGISTRY, STAR_COUNT, StarCategory};

struct Scenario {
    birth: (i32, u32, u32, u32, u32),
    gender: Gender,
    am_duong: &'static str,
    cuc: &'static str,
    menh_nature: &'static str,
    chu_menh: &'static str,
    noi_cu_than: &'static str,
}

const SCENARIOS: [Scenario; 5] = [
    Scenario {
        birth: (1991, 7, 3, 5, 50),
        gender: Gender::Nam,
        am_duong: "Âm Nam",
        cuc: "Mộc tam cục",
        menh_nature: "Lộ Bàng Thổ",
        chu_menh: "Văn Khúc",
        noi_cu_than: "Thân cư Thiên Di",
    },
    Scenario {
        birth: (1997, 7, 28, 5, 0),
        gender: Gender::Nu,
        am_duong: "Âm Nữ",
        cuc: "Hoả lục cục",
        menh_nature: "Giản Hạ Thuỷ",
        chu_menh: "Liêm Trinh",
        noi_cu_than: "Thân cư Thiên Di",
    },
    Scenario {
        birth: (1994, 11, 2, 16, 0),
        gender: Gender::Nu,
        am_duong: "Dương Nữ",
        cuc: "Hoả lục cục",
        menh_nature: "Sơn Đầu Hoả",
        chu_menh: "Lộc Tồn",
        noi_cu_than: "Thân cư Quan Lộc",
    },
    Scenario {
        birth: (1997, 12, 25, 20, 0),
        gender: Gender::Nu,
        am_duong: "Âm Nữ",
        cuc: "Kim tứ cục",
        menh_nature: "Giản Hạ Thuỷ",
        chu_menh: "Lộc Tồn",
        noi_cu_than: "Thân cư Tài Bạch",
    },
    Scenario {
        birth: (2002, 8, 16, 10, 30),
        gender: Gender::Nu,
        am_duong: "Dương Nữ",
        cuc: "Kim tứ cục",
        menh_nature: "Dương Liễu Mộc",
        chu_menh: "Văn Khúc",
        noi_cu_than: "Thân cư Phu",
    },
];

fn build(scenario: &Scenario) -> Chart {
    let (y, m, d, h, min) = scenario.birth;
    build_chart(y, m, d, h, min, 0, scenario.gender, 2023, "Kiểm thử").unwrap()
}

#[test]
fn known_charts_reproduce_their_readings() {
    for scenario in &SCENARIOS {
        let chart = build(scenario);
        let header = &chart.header;
        let tag = format!("{:?}", scenario.birth);
        assert_eq!(header.am_duong.label(), scenario.am_duong, "{tag}");
        assert_eq!(header.cuc.name(), scenario.cuc, "{tag}");
        assert_eq!(header.menh_nature, scenario.menh_nature, "{tag}");
        assert_eq!(header.chu_menh, scenario.chu_menh, "{tag}");
        assert_eq!(header.noi_cu_than, scenario.noi_cu_than, "{tag}");
        assert_eq!(header.querent_year, 2023, "{tag}");
    }
}

#[test]
fn palace_names_are_a_permutation() {
    for scenario in &SCENARIOS {
        let chart = build(scenario);
        let mut names: HashSet<String> = HashSet::new();
        for cell in &chart.cells {
            assert!(!cell.name.is_empty());
            // Normalize away the Thân marker before comparing.
            names.insert(cell.name.replace(" <THÂN>", ""));
        }
        assert_eq!(names.len(), 12);
        assert!(names.contains("MỆNH"));
        assert!(names.contains("HUYNH ĐỆ"));
        assert_eq!(chart.cells.iter().filter(|c| c.is_than).count(), 1);
    }
}

#[test]
fn every_registry_star_lands_exactly_once() {
    for scenario in &SCENARIOS {
        let chart = build(scenario);

        let mut seen: HashSet<&str> = HashSet::new();
        for cell in &chart.cells {
            for star in cell
                .chinh_tinh
                .iter()
                .chain(cell.phu_tinh_trai.iter())
                .chain(cell.phu_tinh_phai.iter())
                .chain(cell.phu_tinh_duoi.iter())
            {
                assert!(seen.insert(star.name()), "{} placed twice", star.name());
            }
        }

        let expected: HashSet<&str> = REGISTRY
            .iter()
            .filter(|def| def.category != StarCategory::Overlay)
            .map(|def| def.name)
            .collect();
        assert_eq!(seen, expected);
        assert_eq!(seen.len(), STAR_COUNT - 2);
    }
}

#[test]
fn decadal_bands_step_by_ten_from_the_cuc() {
    for scenario in &SCENARIOS {
        let chart = build(scenario);
        let base = chart.header.cuc.number();
        let mut bands: Vec<u32> = chart.cells.iter().map(|c| c.dai_han).collect();
        bands.sort_unstable();
        assert_eq!(bands, (0..12).map(|i| base + 10 * i).collect::<Vec<_>>());
    }
}

#[test]
fn monthly_labels_run_forward_around_the_ring() {
    for scenario in &SCENARIOS {
        let chart = build(scenario);
        let start = chart
            .cells
            .iter()
            .position(|c| c.nguyet_han == "Tháng 1")
            .expect("month 1 missing");
        for i in 0..12 {
            assert_eq!(
                chart.cells[(start + i) % 12].nguyet_han,
                format!("Tháng {}", i + 1)
            );
        }
    }
}

#[test]
fn each_cell_carries_one_life_cycle_station() {
    for scenario in &SCENARIOS {
        let chart = build(scenario);
        for cell in &chart.cells {
            assert!(
                cell.phu_tinh_duoi.is_some(),
                "cell {} lost its station",
                cell.id
            );
        }
    }
}

#[test]
fn hour_23_equals_next_day_midnight() {
    let late = build_chart(1997, 12, 31, 23, 15, 0, Gender::Nu, 2023, "x").unwrap();
    let next = build_chart(1998, 1, 1, 0, 0, 0, Gender::Nu, 2023, "x").unwrap();

    assert_eq!(late.header.solar_date, next.header.solar_date);
    assert_eq!(late.header.lunar_date, next.header.lunar_date);
    assert_eq!(late.header.cuc, next.header.cuc);
    assert_eq!(late.header.menh_nature, next.header.menh_nature);
    assert_eq!(late.tuan_cell, next.tuan_cell);
    assert_eq!(late.triet_cell, next.triet_cell);
    for (a, b) in late.cells.iter().zip(next.cells.iter()) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.chinh_tinh, b.chinh_tinh);
        assert_eq!(a.phu_tinh_trai, b.phu_tinh_trai);
        assert_eq!(a.phu_tinh_phai, b.phu_tinh_phai);
    }
    // The header keeps the wall-clock instant as entered.
    assert_eq!(late.header.input_date.year, 1997);
    assert_eq!(late.header.input_date.hour, 23);
}

#[test]
fn snapshot_serializes_to_json() {
    let chart = build(&SCENARIOS[0]);
    let json = serde_json::to_string(&chart).unwrap();
    assert!(json.contains("Tử Vi"));
    assert!(json.contains("tuan_cell"));
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["cells"].as_array().unwrap().len(), 12);
}
