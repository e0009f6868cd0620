//! Seat-class quantity model.

use std::fmt;

/// Decoded quantity for one seat class.
///
/// The inventory API reports quantities as short strings: a number, `有`
/// ("available"), `无` ("sold out"), `*` (not on sale for this segment),
/// or empty/`--` when the train does not carry the class at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatCount {
    /// The train does not offer this class (empty or `--`).
    NotOffered,
    /// Offered but sold out (`无`).
    SoldOut,
    /// Not currently on sale for this segment (`*`).
    NotOnSale,
    /// Available without a published count (`有` or another marker).
    Available,
    /// An explicit remaining-seat count.
    Count(u32),
}

impl SeatCount {
    /// Decode a raw quantity string from a wire record.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" | "--" => SeatCount::NotOffered,
            "无" => SeatCount::SoldOut,
            "*" => SeatCount::NotOnSale,
            s => match s.parse::<u32>() {
                Ok(n) => SeatCount::Count(n),
                Err(_) => SeatCount::Available,
            },
        }
    }

    /// Whether a ticket in this class can currently be bought.
    pub fn is_available(&self) -> bool {
        matches!(self, SeatCount::Available | SeatCount::Count(_))
    }
}

impl fmt::Display for SeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatCount::NotOffered => f.write_str("--"),
            SeatCount::SoldOut => f.write_str("none"),
            SeatCount::NotOnSale => f.write_str("*"),
            SeatCount::Available => f.write_str("yes"),
            SeatCount::Count(n) => write!(f, "{n}"),
        }
    }
}

/// The seat classes reported by the inventory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClass {
    Business,
    FirstClass,
    SecondClass,
    PremiumSleeper,
    SoftSleeper,
    EmuSleeper,
    HardSleeper,
    SoftSeat,
    HardSeat,
    Standing,
}

impl SeatClass {
    /// All classes, in display order.
    pub const ALL: [SeatClass; 10] = [
        SeatClass::Business,
        SeatClass::FirstClass,
        SeatClass::SecondClass,
        SeatClass::PremiumSleeper,
        SeatClass::SoftSleeper,
        SeatClass::EmuSleeper,
        SeatClass::HardSleeper,
        SeatClass::SoftSeat,
        SeatClass::HardSeat,
        SeatClass::Standing,
    ];

    /// Short English label for table output.
    pub fn label(&self) -> &'static str {
        match self {
            SeatClass::Business => "business",
            SeatClass::FirstClass => "first",
            SeatClass::SecondClass => "second",
            SeatClass::PremiumSleeper => "prem-sleeper",
            SeatClass::SoftSleeper => "soft-sleeper",
            SeatClass::EmuSleeper => "emu-sleeper",
            SeatClass::HardSleeper => "hard-sleeper",
            SeatClass::SoftSeat => "soft-seat",
            SeatClass::HardSeat => "hard-seat",
            SeatClass::Standing => "standing",
        }
    }
}

/// Per-class quantities for one availability entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatInventory {
    pub business: SeatCount,
    pub first_class: SeatCount,
    pub second_class: SeatCount,
    pub premium_sleeper: SeatCount,
    pub soft_sleeper: SeatCount,
    pub emu_sleeper: SeatCount,
    pub hard_sleeper: SeatCount,
    pub soft_seat: SeatCount,
    pub hard_seat: SeatCount,
    pub standing: SeatCount,
}

impl SeatInventory {
    /// An inventory with every class marked not offered.
    pub fn empty() -> Self {
        Self {
            business: SeatCount::NotOffered,
            first_class: SeatCount::NotOffered,
            second_class: SeatCount::NotOffered,
            premium_sleeper: SeatCount::NotOffered,
            soft_sleeper: SeatCount::NotOffered,
            emu_sleeper: SeatCount::NotOffered,
            hard_sleeper: SeatCount::NotOffered,
            soft_seat: SeatCount::NotOffered,
            hard_seat: SeatCount::NotOffered,
            standing: SeatCount::NotOffered,
        }
    }

    /// Quantity for one class.
    pub fn get(&self, class: SeatClass) -> SeatCount {
        match class {
            SeatClass::Business => self.business,
            SeatClass::FirstClass => self.first_class,
            SeatClass::SecondClass => self.second_class,
            SeatClass::PremiumSleeper => self.premium_sleeper,
            SeatClass::SoftSleeper => self.soft_sleeper,
            SeatClass::EmuSleeper => self.emu_sleeper,
            SeatClass::HardSleeper => self.hard_sleeper,
            SeatClass::SoftSeat => self.soft_seat,
            SeatClass::HardSeat => self.hard_seat,
            SeatClass::Standing => self.standing,
        }
    }

    /// Whether any class can currently be bought.
    pub fn any_available(&self) -> bool {
        SeatClass::ALL.iter().any(|c| self.get(*c).is_available())
    }

    /// Human-readable list of the purchasable classes, e.g.
    /// `second: 12, standing: yes`. Returns `none` when sold out everywhere.
    pub fn summary(&self) -> String {
        let parts: Vec<String> = SeatClass::ALL
            .iter()
            .filter(|c| self.get(**c).is_available())
            .map(|c| format!("{}: {}", c.label(), self.get(*c)))
            .collect();

        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_placeholders() {
        assert_eq!(SeatCount::parse(""), SeatCount::NotOffered);
        assert_eq!(SeatCount::parse("--"), SeatCount::NotOffered);
        assert_eq!(SeatCount::parse("无"), SeatCount::SoldOut);
        assert_eq!(SeatCount::parse("*"), SeatCount::NotOnSale);
        assert_eq!(SeatCount::parse("有"), SeatCount::Available);
    }

    #[test]
    fn parse_numeric() {
        assert_eq!(SeatCount::parse("0"), SeatCount::Count(0));
        assert_eq!(SeatCount::parse("7"), SeatCount::Count(7));
        assert_eq!(SeatCount::parse("99"), SeatCount::Count(99));
    }

    #[test]
    fn unknown_marker_counts_as_available() {
        // The API occasionally introduces new markers; anything non-empty
        // that is not a known negative marker is treated as purchasable.
        assert_eq!(SeatCount::parse("候补"), SeatCount::Available);
    }

    #[test]
    fn availability_predicate() {
        assert!(SeatCount::Available.is_available());
        assert!(SeatCount::Count(3).is_available());
        assert!(!SeatCount::SoldOut.is_available());
        assert!(!SeatCount::NotOffered.is_available());
        assert!(!SeatCount::NotOnSale.is_available());
    }

    #[test]
    fn display_forms() {
        assert_eq!(SeatCount::NotOffered.to_string(), "--");
        assert_eq!(SeatCount::SoldOut.to_string(), "none");
        assert_eq!(SeatCount::NotOnSale.to_string(), "*");
        assert_eq!(SeatCount::Available.to_string(), "yes");
        assert_eq!(SeatCount::Count(12).to_string(), "12");
    }

    #[test]
    fn inventory_any_available() {
        let mut seats = SeatInventory::empty();
        assert!(!seats.any_available());

        seats.hard_seat = SeatCount::SoldOut;
        assert!(!seats.any_available());

        seats.second_class = SeatCount::Count(5);
        assert!(seats.any_available());
    }

    #[test]
    fn inventory_summary() {
        let mut seats = SeatInventory::empty();
        assert_eq!(seats.summary(), "none");

        seats.second_class = SeatCount::Count(12);
        seats.standing = SeatCount::Available;
        assert_eq!(seats.summary(), "second: 12, standing: yes");
    }
}
