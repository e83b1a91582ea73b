//! Sortable table model shared by the rooms and reservations boxes.
//!
//! A table holds one `Option<(column, direction)>`, so at most one column is
//! ever active. The column index used for comparison is the header's
//! ordinal position among its siblings, and row cells are expected to line
//! up with the headers one-to-one; callers own that coupling.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    pub fn sortable(label: &'static str) -> Self {
        Self {
            label,
            sortable: true,
        }
    }

    pub fn fixed(label: &'static str) -> Self {
        Self {
            label,
            sortable: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SortableTable {
    columns: Vec<Column>,
    sort: Option<(usize, SortDirection)>,
    /// Which column the cursor is on (for keyboard-driven activation).
    pub cursor: usize,
}

impl SortableTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            sort: None,
            cursor: 0,
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    /// Direction marker for one header, if it is the active one.
    pub fn direction_of(&self, column: usize) -> Option<SortDirection> {
        match self.sort {
            Some((c, d)) if c == column => Some(d),
            _ => None,
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.checked_sub(1).unwrap_or(0);
    }

    pub fn cursor_right(&mut self) {
        if self.cursor + 1 < self.columns.len() {
            self.cursor += 1;
        }
    }

    /// Activate the column under the cursor.
    pub fn activate_cursor(&mut self) {
        self.activate(self.cursor);
    }

    /// The header-click contract: toggle the clicked header's direction
    /// (first activation sorts ascending), clearing every sibling.
    pub fn activate(&mut self, column: usize) {
        let Some(col) = self.columns.get(column) else {
            return;
        };
        if !col.sortable {
            return;
        }

        let direction = match self.sort {
            Some((c, d)) if c == column => d.toggled(),
            _ => SortDirection::Ascending,
        };
        self.sort = Some((column, direction));
    }

    /// Full re-sort of `rows` by the active column's cell text.
    ///
    /// `cell(row, index)` must return the text of the cell at the header's
    /// ordinal position. Comparison is plain lexicographic even for
    /// numeric-looking text ("10" sorts before "2"); that mirrors what the
    /// tables always did and callers rely on it.
    pub fn sort_rows<T, F>(&self, rows: &mut [T], cell: F)
    where
        F: Fn(&T, usize) -> String,
    {
        let Some((column, direction)) = self.sort else {
            return;
        };

        rows.sort_by(|a, b| {
            let av = cell(a, column);
            let bv = cell(b, column);
            match direction {
                SortDirection::Ascending => av.cmp(&bv),
                SortDirection::Descending => bv.cmp(&av),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> SortableTable {
        SortableTable::new(vec![
            Column::sortable("Name"),
            Column::sortable("Capacity"),
            Column::fixed("Description"),
        ])
    }

    fn rows() -> Vec<Vec<String>> {
        [
            ["Room B", "2", "large"],
            ["Room A", "10", "small"],
            ["Room C", "5", "medium"],
        ]
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect()
    }

    fn cell(row: &Vec<String>, i: usize) -> String {
        row[i].clone()
    }

    #[test]
    fn first_activation_sorts_ascending() {
        let mut t = table();
        t.activate(0);
        assert_eq!(t.sort(), Some((0, SortDirection::Ascending)));

        let mut r = rows();
        t.sort_rows(&mut r, cell);
        let names: Vec<_> = r.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, vec!["Room A", "Room B", "Room C"]);
    }

    #[test]
    fn second_activation_reverses_the_first() {
        let mut t = table();
        t.activate(0);
        let mut asc = rows();
        t.sort_rows(&mut asc, cell);

        t.activate(0);
        assert_eq!(t.sort(), Some((0, SortDirection::Descending)));
        let mut desc = rows();
        t.sort_rows(&mut desc, cell);

        asc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn switching_columns_clears_the_sibling_marker() {
        let mut t = table();
        t.activate(0);
        t.activate(0); // Name descending
        t.activate(1); // Capacity takes over, ascending

        assert_eq!(t.direction_of(0), None);
        assert_eq!(t.direction_of(1), Some(SortDirection::Ascending));

        // Exactly one header carries a marker.
        let active = (0..t.columns().len())
            .filter(|&i| t.direction_of(i).is_some())
            .count();
        assert_eq!(active, 1);
    }

    #[test]
    fn numeric_text_sorts_lexicographically() {
        let mut t = table();
        t.activate(1);
        let mut r = rows();
        t.sort_rows(&mut r, cell);
        let caps: Vec<_> = r.iter().map(|r| r[1].as_str()).collect();
        // "10" before "2" before "5": text comparison, on purpose.
        assert_eq!(caps, vec!["10", "2", "5"]);
    }

    #[test]
    fn unsortable_and_out_of_range_columns_are_ignored() {
        let mut t = table();
        t.activate(2);
        assert_eq!(t.sort(), None);
        t.activate(99);
        assert_eq!(t.sort(), None);

        // No active sort leaves row order untouched.
        let mut r = rows();
        let before = r.clone();
        t.sort_rows(&mut r, cell);
        assert_eq!(r, before);
    }

    #[test]
    fn cursor_stays_within_bounds() {
        let mut t = table();
        t.cursor_left();
        assert_eq!(t.cursor, 0);
        t.cursor_right();
        t.cursor_right();
        t.cursor_right();
        assert_eq!(t.cursor, 2);
    }
}
