//! Up/down selection over a list, shared by the settings table and the
//! table widget.

/// Trait for types that keep a selected row in a list
///
/// Implementors provide the accessors; movement wraps at both ends.
///
/// # Example
/// ```
/// use veggie_pos::tui::state::Navigable;
///
/// struct Rows {
///     names: Vec<&'static str>,
///     selected: usize,
/// }
///
/// impl Navigable for Rows {
///     fn len(&self) -> usize {
///         self.names.len()
///     }
///
///     fn selected(&self) -> usize {
///         self.selected
///     }
///
///     fn set_selected(&mut self, index: usize) {
///         self.selected = index;
///     }
/// }
///
/// let mut rows = Rows { names: vec!["Carrot", "Tomato"], selected: 1 };
/// rows.next();
/// assert_eq!(rows.selected(), 0);
/// ```
pub trait Navigable {
    fn len(&self) -> usize;

    fn selected(&self) -> usize;

    fn set_selected(&mut self, index: usize);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move selection to the next item, wrapping to start if at end
    fn next(&mut self) {
        if !self.is_empty() {
            let current = self.selected();
            self.set_selected((current + 1) % self.len());
        }
    }

    /// Move selection to the previous item, wrapping to end if at start
    fn previous(&mut self) {
        if !self.is_empty() {
            let current = self.selected();
            if current > 0 {
                self.set_selected(current - 1);
            } else {
                self.set_selected(self.len() - 1);
            }
        }
    }

    /// Pull the selection back inside the list after it shrank
    fn clamp_selection(&mut self) {
        let len = self.len();
        if len == 0 {
            self.set_selected(0);
        } else if self.selected() >= len {
            self.set_selected(len - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rows {
        items: Vec<&'static str>,
        selected: usize,
    }

    impl Navigable for Rows {
        fn len(&self) -> usize {
            self.items.len()
        }

        fn selected(&self) -> usize {
            self.selected
        }

        fn set_selected(&mut self, index: usize) {
            self.selected = index;
        }
    }

    #[test]
    fn test_wraps_both_ways() {
        let mut rows = Rows {
            items: vec!["Carrot", "Corn", "Tomato"],
            selected: 2,
        };
        rows.next();
        assert_eq!(rows.selected(), 0);
        rows.previous();
        assert_eq!(rows.selected(), 2);
    }

    #[test]
    fn test_empty_list() {
        let mut rows = Rows {
            items: vec![],
            selected: 0,
        };
        rows.next();
        rows.previous();
        rows.clamp_selection();
        assert_eq!(rows.selected(), 0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut rows = Rows {
            items: vec!["Carrot", "Corn", "Tomato"],
            selected: 2,
        };
        rows.items.truncate(1);
        rows.clamp_selection();
        assert_eq!(rows.selected(), 0);
    }
}
