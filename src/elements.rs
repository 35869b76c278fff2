//! # Five-Element Algebra
//!
//! The closed five-element enumeration and its two relations: the
//! generation cycle (tương sinh) Water → Wood → Fire → Earth → Metal →
//! Water, and the control cycle (tương khắc) Water → Fire → Metal → Wood →
//! Earth → Water. These two cycles are the only semantic operations on
//! elements anywhere in the chart engine, and they are implemented as
//! `match` lookups so no string comparison happens in hot paths.

use serde::Serialize;

/// One of the five elements (ngũ hành).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Element {
    Metal,
    Wood,
    Water,
    Fire,
    Earth,
}

/// Render color codes shared by all display boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Color {
    Red,
    Black,
    Green,
    Yellow,
    Grey,
}

impl Element {
    /// The element this one generates (sinh cho).
    ///
    /// ```
    /// use tuvi_chart_lib::elements::Element;
    /// assert_eq!(Element::Water.generates(), Element::Wood);
    /// assert_eq!(Element::Metal.generates(), Element::Water);
    /// ```
    pub fn generates(self) -> Element {
        match self {
            Element::Water => Element::Wood,
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
        }
    }

    /// The element that generates this one (được sinh).
    pub fn generated_by(self) -> Element {
        match self {
            Element::Wood => Element::Water,
            Element::Fire => Element::Wood,
            Element::Earth => Element::Fire,
            Element::Metal => Element::Earth,
            Element::Water => Element::Metal,
        }
    }

    /// The element this one controls (khắc chế).
    pub fn controls(self) -> Element {
        match self {
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
            Element::Metal => Element::Wood,
            Element::Wood => Element::Earth,
            Element::Earth => Element::Water,
        }
    }

    /// The element that controls this one (bị khắc).
    pub fn controlled_by(self) -> Element {
        match self {
            Element::Fire => Element::Water,
            Element::Metal => Element::Fire,
            Element::Wood => Element::Metal,
            Element::Earth => Element::Wood,
            Element::Water => Element::Earth,
        }
    }

    /// Whether the two elements stand in a generation relation, in either
    /// direction.
    pub fn is_generating_pair(self, other: Element) -> bool {
        self.generates() == other || other.generates() == self
    }

    /// Whether the two elements stand in a control relation, in either
    /// direction.
    pub fn is_controlling_pair(self, other: Element) -> bool {
        self.controls() == other || other.controls() == self
    }

    /// Vietnamese name of the element.
    pub fn vietnamese(self) -> &'static str {
        match self {
            Element::Metal => "Kim",
            Element::Wood => "Mộc",
            Element::Water => "Thuỷ",
            Element::Fire => "Hoả",
            Element::Earth => "Thổ",
        }
    }

    /// Parse a Vietnamese element name, as found in mệnh-nature and cục
    /// labels.
    pub fn from_vietnamese(name: &str) -> Option<Element> {
        match name {
            "Kim" => Some(Element::Metal),
            "Mộc" => Some(Element::Wood),
            "Thuỷ" => Some(Element::Water),
            "Hoả" => Some(Element::Fire),
            "Thổ" => Some(Element::Earth),
            _ => None,
        }
    }

    /// Render color of stars of this element.
    pub fn color(self) -> Color {
        match self {
            Element::Fire => Color::Red,
            Element::Water => Color::Black,
            Element::Wood => Color::Green,
            Element::Earth => Color::Yellow,
            Element::Metal => Color::Grey,
        }
    }
}

impl Serialize for Element {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.vietnamese())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Element; 5] = [
        Element::Metal,
        Element::Wood,
        Element::Water,
        Element::Fire,
        Element::Earth,
    ];

    #[test]
    fn test_generation_cycle_closes() {
        // Following the generation relation five times returns home.
        for e in ALL {
            let mut current = e;
            for _ in 0..5 {
                current = current.generates();
            }
            assert_eq!(current, e);
        }
    }

    #[test]
    fn test_generation_inverse() {
        for e in ALL {
            assert_eq!(e.generates().generated_by(), e);
            assert_eq!(e.controls().controlled_by(), e);
        }
    }

    #[test]
    fn test_relations() {
        assert!(Element::Water.is_generating_pair(Element::Wood));
        assert!(!Element::Water.is_generating_pair(Element::Fire));
        assert!(Element::Water.is_controlling_pair(Element::Fire));
        assert!(Element::Wood.is_controlling_pair(Element::Earth));
    }

    #[test]
    fn test_vietnamese_roundtrip() {
        for e in ALL {
            assert_eq!(Element::from_vietnamese(e.vietnamese()), Some(e));
        }
        assert_eq!(Element::from_vietnamese("Gió"), None);
    }
}
