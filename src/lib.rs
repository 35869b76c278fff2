//! # Tử Vi Chart Core Library
//!
//! This library computes a Vietnamese astrological birth chart ("lá số
//! tử vi") from a civil birth instant and a querent year. The chart is a
//! ring of twelve cells populated with palaces, period markers and roughly
//! a hundred and twenty stars whose positions derive deterministically from
//! the lunisolar attributes of the birth moment.
//!
//! ## Design Philosophy
//!
//! ### Pure computation
//! - **No I/O in the core**: a chart is a function of its inputs; the
//!   binary, the TOML config and the renderers live at the edges
//! - **Immutable snapshot**: [`chart::build_chart`] returns a [`chart::Chart`]
//!   that is never mutated afterwards, so renderers can only read it
//! - **Chart-local state**: star brightness is part of the snapshot, never
//!   of the process-wide registry, so charts can be computed concurrently
//!
//! ### Layering
//! Every layer only looks downward:
//! 1. [`date`] / [`julian`] — calendar instants and the Julian-day kernel
//! 2. [`astro`] — new-moon and solar-longitude series
//! 3. [`lunisolar`] — civil ↔ Vietnamese lunisolar conversion at +07:00
//! 4. [`sexagenary`] / [`elements`] — stems, branches, five-element algebra
//! 5. [`palace`] — yin-yang, cục, palaces, chart lords
//! 6. [`stars`] + the positioning engine — the declarative star catalog
//! 7. [`chart`] — the assembler producing the snapshot
//!
//! ### Determinism
//! All tables are process-wide immutable statics transcribed from the
//! authoritative reference; the astronomical series coefficients are pinned
//! by public test vectors. The per-cell star lists are sorted by a declared
//! order before the snapshot is exposed, so output is stable.
//!
//! ## Example
//! ```
//! use tuvi_chart_lib::chart::build_chart;
//! use tuvi_chart_lib::palace::Gender;
//!
//! let chart = build_chart(1991, 7, 3, 5, 50, 0, Gender::Nam, 2023, "Ví dụ").unwrap();
//! assert_eq!(chart.header.cuc.name(), "Mộc tam cục");
//! assert_eq!(chart.cells.len(), 12);
//! ```

// Module declarations
pub mod astro;
pub mod chart;
pub mod config;
pub mod date;
pub mod elements;
pub mod error;
pub mod julian;
pub mod localizer;
pub mod lunisolar;
pub mod palace;
pub mod renderer;
pub mod sexagenary;
pub mod stars;

mod catalog;

pub use chart::{Cell, Chart, ChartHeader, build_chart};
pub use date::{Date, LunarDate, SolarDate};
pub use error::ChartError;
pub use palace::Gender;
pub use stars::{Brightness, PlacedStar, StarId};
