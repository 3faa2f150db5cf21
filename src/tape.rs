//! An extendable tape of symbols embedded in a two-way infinite run of blanks.
//!
//! The backing sequence only ever grows by one blank cell at a time, when the head moves past
//! either end. Positions outside the sequence read as blank.

use crate::types::{Direction, Symbol, BLANK_SYMBOL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    blank: Symbol,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Tape {
    pub fn new(cells: Vec<Symbol>) -> Self {
        Self {
            cells,
            blank: BLANK_SYMBOL,
        }
    }

    /// Lays out `input` for a fresh run: one leading blank, the characters of the trimmed
    /// input, then three trailing blanks. The first input character sits at index 1.
    pub fn from_input(input: &str) -> Self {
        let mut cells = vec![BLANK_SYMBOL];
        cells.extend(input.trim().chars());
        cells.extend([BLANK_SYMBOL; 3]);
        Self::new(cells)
    }

    /// Returns the symbol at `head`, or blank if `head` is past the end.
    pub fn read(&self, head: usize) -> Symbol {
        self.cells.get(head).copied().unwrap_or(self.blank)
    }

    /// Replaces the symbol at `head`, padding with blanks first if `head` is past the end.
    pub fn write(&mut self, head: usize, symbol: Symbol) {
        if head >= self.cells.len() {
            self.cells.resize(head + 1, self.blank);
        }
        self.cells[head] = symbol;
    }

    /// Computes the head position after moving in `direction` and grows the tape by at most
    /// one blank so the new position is addressable.
    ///
    /// Moving left from index 0 prepends a blank and returns 0. Moving right onto the end
    /// appends a blank. `Stay` never grows the tape.
    pub fn move_and_grow(&mut self, head: usize, direction: Direction) -> usize {
        match direction {
            Direction::Left => match head.checked_sub(1) {
                Some(head) => head,
                None => {
                    self.cells.insert(0, self.blank);
                    0
                }
            },
            Direction::Right => {
                let head = head + 1;
                if head >= self.cells.len() {
                    self.cells.push(self.blank);
                }
                head
            }
            Direction::Stay => head,
        }
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn blank(&self) -> Symbol {
        self.blank
    }
}

impl std::fmt::Display for Tape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_from_input_layout() {
        let tape = Tape::from_input("  01 ");
        assert_eq!(tape.cells(), &['_', '0', '1', '_', '_', '_']);
        assert_eq!(tape.read(1), '0');
    }

    #[test]
    fn test_from_empty_input() {
        let tape = Tape::from_input("");
        assert_eq!(tape.cells(), &['_'; 4]);
    }

    #[test]
    fn test_read_out_of_extent_is_blank() {
        let tape = Tape::new(vec!['a']);
        assert_eq!(tape.read(0), 'a');
        assert_eq!(tape.read(10), BLANK_SYMBOL);
    }

    #[test]
    fn test_write_past_end_pads_with_blanks() {
        let mut tape = Tape::new(vec!['a']);
        tape.write(3, 'b');
        assert_eq!(tape.cells(), &['a', '_', '_', 'b']);
    }

    #[test]
    fn test_move_left_from_zero_prepends() {
        let mut tape = Tape::new(vec!['a', 'b']);
        let head = tape.move_and_grow(0, Direction::Left);

        assert_eq!(head, 0);
        assert_eq!(tape.read(0), BLANK_SYMBOL);
        assert_eq!(tape.read(1), 'a');
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_move_right_onto_end_appends() {
        let mut tape = Tape::new(vec!['a', 'b']);
        let head = tape.move_and_grow(1, Direction::Right);

        assert_eq!(head, 2);
        assert_eq!(tape.cells(), &['a', 'b', '_']);
    }

    #[test]
    fn test_move_inside_does_not_grow() {
        let mut tape = Tape::new(vec!['a', 'b', 'c']);
        assert_eq!(tape.move_and_grow(1, Direction::Right), 2);
        assert_eq!(tape.move_and_grow(2, Direction::Left), 1);
        assert_eq!(tape.move_and_grow(1, Direction::Stay), 1);
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Tape::from_input("10").to_string(), "_10___");
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Left),
            Just(Direction::Right),
            Just(Direction::Stay)
        ]
    }

    proptest! {
        #[test]
        fn prop_move_grows_by_at_most_one(
            input in "[01]{0,8}",
            moves in prop::collection::vec(direction(), 0..64),
        ) {
            let mut tape = Tape::from_input(&input);
            let mut head = 1;

            for direction in moves {
                let before = tape.cells().to_vec();
                head = tape.move_and_grow(head, direction);
                let grown = tape.len() - before.len();

                prop_assert!(grown <= 1);
                prop_assert!(head < tape.len());
                if direction == Direction::Stay {
                    prop_assert_eq!(grown, 0);
                }
                // Existing cells survive, shifted by one only on a prepend.
                let offset = if tape.cells()[grown..] == before[..] { grown } else { 0 };
                prop_assert_eq!(&tape.cells()[offset..offset + before.len()], &before[..]);
            }
        }

        #[test]
        fn prop_from_input_places_head_on_first_character(input in "[a-z0-9]{1,16}") {
            let tape = Tape::from_input(&input);
            prop_assert_eq!(tape.len(), input.len() + 4);
            prop_assert_eq!(tape.read(0), BLANK_SYMBOL);
            prop_assert_eq!(tape.read(1), input.chars().next().unwrap());
        }
    }
}
