//! Navigation instructions and the angle classifiers that produce them.

use std::fmt;
use std::sync::Arc;

use cr_core::normalize_degrees;

// ── Compass ───────────────────────────────────────────────────────────────────

/// Eight-way heading for `Proceed` instructions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Compass {
    East,
    Northeast,
    North,
    Northwest,
    West,
    Southwest,
    South,
    Southeast,
}

impl Compass {
    /// Bucket a bearing (0° = east, counter-clockwise) into 45° sectors
    /// centred on each heading:
    ///
    /// | Sector          | Heading   |
    /// |-----------------|-----------|
    /// | [0, 22.5)       | east      |
    /// | [22.5, 67.5)    | northeast |
    /// | [67.5, 112.5)   | north     |
    /// | [112.5, 157.5)  | northwest |
    /// | [157.5, 202.5)  | west      |
    /// | [202.5, 247.5)  | southwest |
    /// | [247.5, 292.5)  | south     |
    /// | [292.5, 337.5)  | southeast |
    /// | [337.5, 360)    | east      |
    ///
    /// Angles outside `[0, 360)` are wrapped first.
    pub fn from_bearing(deg: f64) -> Self {
        let deg = normalize_degrees(deg);
        match deg {
            d if d < 22.5 => Compass::East,
            d if d < 67.5 => Compass::Northeast,
            d if d < 112.5 => Compass::North,
            d if d < 157.5 => Compass::Northwest,
            d if d < 202.5 => Compass::West,
            d if d < 247.5 => Compass::Southwest,
            d if d < 292.5 => Compass::South,
            d if d < 337.5 => Compass::Southeast,
            _ => Compass::East,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compass::East      => "east",
            Compass::Northeast => "northeast",
            Compass::North     => "north",
            Compass::Northwest => "northwest",
            Compass::West      => "west",
            Compass::Southwest => "southwest",
            Compass::South     => "south",
            Compass::Southeast => "southeast",
        }
    }
}

impl fmt::Display for Compass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── TurnSide ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnSide {
    Left,
    Right,
}

impl TurnSide {
    /// Classify the angle between an outgoing and an incoming link.
    ///
    /// `angle_deg` is `bearing(incoming) − bearing(outgoing)`, wrapped into
    /// `[0, 360)`.  Inside the straight-through band
    /// `[0, ε) ∪ (360 − ε, 360)` there is no turn; `[ε, 180)` is left and
    /// `[180, 360 − ε]` is right.  An angle of exactly 0° is always straight
    /// through, even with `ε = 0`.
    pub fn classify(angle_deg: f64, epsilon_deg: f64) -> Option<Self> {
        let angle = normalize_degrees(angle_deg);
        if angle == 0.0 || angle < epsilon_deg || angle > 360.0 - epsilon_deg {
            None
        } else if angle < 180.0 {
            Some(TurnSide::Left)
        } else {
            Some(TurnSide::Right)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TurnSide::Left  => "left",
            TurnSide::Right => "right",
        }
    }
}

impl fmt::Display for TurnSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Instruction ───────────────────────────────────────────────────────────────

/// One step of a turn-by-turn delivery plan.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Instruction {
    /// Travel along one street.  `miles` aggregates every consecutive link
    /// of that street in the leg.
    Proceed { direction: Compass, street: Arc<str>, miles: f64 },
    /// Change onto `street`.
    Turn { side: TurnSide, street: Arc<str> },
    /// Hand over `item` at the current stop.
    Deliver { item: String },
}

impl Instruction {
    /// Distance covered by this instruction (zero for turns and deliveries).
    pub fn miles(&self) -> f64 {
        match self {
            Instruction::Proceed { miles, .. } => *miles,
            _ => 0.0,
        }
    }

    pub fn is_deliver(&self) -> bool {
        matches!(self, Instruction::Deliver { .. })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Proceed { direction, street, miles } => {
                write!(f, "Proceed {direction} on {street} for {miles:.2} miles")
            }
            Instruction::Turn { side, street } => write!(f, "Turn {side} on {street}"),
            Instruction::Deliver { item } => write!(f, "Deliver {item}"),
        }
    }
}
