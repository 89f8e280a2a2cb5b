use crate::error::SimError;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

pub const ROWS: u8 = 50;
pub const TAKEN_PROBABILITY: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeatLetter {
    A,
    B,
    C,
    D,
}

impl SeatLetter {
    pub const ALL: [SeatLetter; 4] = [SeatLetter::A, SeatLetter::B, SeatLetter::C, SeatLetter::D];

    fn index(self) -> usize {
        self as usize
    }

    fn as_char(self) -> char {
        match self {
            SeatLetter::A => 'A',
            SeatLetter::B => 'B',
            SeatLetter::C => 'C',
            SeatLetter::D => 'D',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatId {
    pub row: u8,
    pub letter: SeatLetter,
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.letter.as_char())
    }
}

impl FromStr for SeatId {
    type Err = SimError;

    /// Parses labels such as `"12B"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unavailable = || SimError::SeatUnavailable(s.to_string());
        let letter_char = s.chars().last().ok_or_else(unavailable)?;
        let letter = match letter_char.to_ascii_uppercase() {
            'A' => SeatLetter::A,
            'B' => SeatLetter::B,
            'C' => SeatLetter::C,
            'D' => SeatLetter::D,
            _ => return Err(unavailable()),
        };
        let row: u8 = s[..s.len() - letter_char.len_utf8()]
            .parse()
            .map_err(|_| unavailable())?;
        if row == 0 || row > ROWS {
            return Err(unavailable());
        }
        Ok(SeatId { row, letter })
    }
}

/// One cell of a rendered row: `A | B C | D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatCell {
    Seat { id: SeatId, taken: bool, selected: bool },
    Aisle,
}

/// Cabin seat map with a single selection.
#[derive(Debug, Clone)]
pub struct SeatMap {
    taken: Vec<[bool; 4]>,
    selected: Option<SeatId>,
}

impl SeatMap {
    /// Marks each seat as taken with probability 0.25.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let taken = (0..ROWS)
            .map(|_| {
                let mut row = [false; 4];
                for seat in row.iter_mut() {
                    *seat = rng.gen_bool(TAKEN_PROBABILITY);
                }
                row
            })
            .collect();
        Self {
            taken,
            selected: None,
        }
    }

    pub fn is_taken(&self, seat: SeatId) -> bool {
        usize::from(seat.row)
            .checked_sub(1)
            .and_then(|i| self.taken.get(i))
            .map(|row| row[seat.letter.index()])
            .unwrap_or(true)
    }

    pub fn available(&self) -> usize {
        self.taken.iter().flatten().filter(|t| !**t).count()
    }

    /// Replaces any earlier selection. Taken seats cannot be selected.
    pub fn select(&mut self, seat: SeatId) -> Result<(), SimError> {
        if self.is_taken(seat) {
            return Err(SimError::SeatUnavailable(seat.to_string()));
        }
        self.selected = Some(seat);
        Ok(())
    }

    pub fn selected(&self) -> Option<SeatId> {
        self.selected
    }

    /// `"Seat 12B Selected"`.
    pub fn selected_label(&self) -> Option<String> {
        self.selected.map(|s| format!("Seat {} Selected", s))
    }

    /// Boarding needs a selected seat.
    pub fn confirm(&self) -> Result<SeatId, SimError> {
        self.selected.ok_or(SimError::NoSeatSelected)
    }

    pub fn row_layout(&self, row: u8) -> Vec<SeatCell> {
        let seat = |letter| {
            let id = SeatId { row, letter };
            SeatCell::Seat {
                id,
                taken: self.is_taken(id),
                selected: self.selected == Some(id),
            }
        };
        vec![
            seat(SeatLetter::A),
            SeatCell::Aisle,
            seat(SeatLetter::B),
            seat(SeatLetter::C),
            SeatCell::Aisle,
            seat(SeatLetter::D),
        ]
    }

    /// First free seat in row order, handy for non-interactive hosts.
    pub fn first_available(&self) -> Option<SeatId> {
        (1..=ROWS)
            .flat_map(|row| SeatLetter::ALL.into_iter().map(move |letter| SeatId { row, letter }))
            .find(|id| !self.is_taken(*id))
    }
}
