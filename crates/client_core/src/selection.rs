//! Degree toggles and the course selection with its two derived renderings.

use std::collections::BTreeSet;

use shared::domain::{CourseName, DegreeId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DegreeSet {
    degrees: BTreeSet<DegreeId>,
}

impl DegreeSet {
    /// Flips membership; returns whether the degree is selected afterwards.
    pub fn toggle(&mut self, degree: DegreeId) -> bool {
        if self.degrees.remove(&degree) {
            false
        } else {
            self.degrees.insert(degree);
            true
        }
    }

    pub fn contains(&self, degree: &DegreeId) -> bool {
        self.degrees.contains(degree)
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    pub fn to_vec(&self) -> Vec<DegreeId> {
        self.degrees.iter().cloned().collect()
    }
}

/// Single source of truth for selected courses. Insertion order drives chip order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedCourses {
    order: Vec<CourseName>,
}

impl SelectedCourses {
    /// Removes the course if selected, otherwise appends it. Returns the new membership.
    pub fn toggle(&mut self, course: &CourseName) -> bool {
        if let Some(pos) = self.order.iter().position(|c| c == course) {
            self.order.remove(pos);
            false
        } else {
            self.order.push(course.clone());
            true
        }
    }

    pub fn contains(&self, course: &CourseName) -> bool {
        self.order.contains(course)
    }

    /// Drops every selection absent from `catalog`. Returns the dropped names.
    pub fn reconcile(&mut self, catalog: &[CourseName]) -> Vec<CourseName> {
        let (kept, dropped): (Vec<_>, Vec<_>) = self
            .order
            .drain(..)
            .partition(|course| catalog.contains(course));
        self.order = kept;
        dropped
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[CourseName] {
        &self.order
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseEntry {
    pub name: CourseName,
    pub selected: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub name: CourseName,
}

/// Case-insensitive substring match used to hide list entries.
pub fn matches_filter(course: &CourseName, filter: &str) -> bool {
    filter.is_empty()
        || course
            .as_str()
            .to_lowercase()
            .contains(&filter.to_lowercase())
}

/// Full redraw of the course list. Filtering hides entries but never touches selection.
pub fn render_course_list(
    catalog: &[CourseName],
    selected: &SelectedCourses,
    filter: &str,
) -> Vec<CourseEntry> {
    catalog
        .iter()
        .map(|name| CourseEntry {
            name: name.clone(),
            selected: selected.contains(name),
            visible: matches_filter(name, filter),
        })
        .collect()
}

pub fn render_chips(selected: &SelectedCourses) -> Vec<Chip> {
    selected
        .as_slice()
        .iter()
        .map(|name| Chip { name: name.clone() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn courses(names: &[&str]) -> Vec<CourseName> {
        names.iter().map(|n| CourseName::from(*n)).collect()
    }

    #[test]
    fn toggling_twice_restores_value_and_order() {
        let mut selected = SelectedCourses::default();
        for name in courses(&["Algorithms", "Networks"]) {
            selected.toggle(&name);
        }
        let before = selected.clone();

        let security = CourseName::from("Security");
        assert!(selected.toggle(&security));
        assert!(!selected.toggle(&security));
        assert_eq!(selected, before);
    }

    #[test]
    fn reselecting_appends_to_the_end() {
        let mut selected = SelectedCourses::default();
        for name in courses(&["Algorithms", "Networks", "Security"]) {
            selected.toggle(&name);
        }
        let networks = CourseName::from("Networks");
        selected.toggle(&networks);
        selected.toggle(&networks);
        assert_eq!(
            selected.as_slice(),
            courses(&["Algorithms", "Security", "Networks"]).as_slice()
        );
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut selected = SelectedCourses::default();
        for name in courses(&["Algorithms", "Networks"]) {
            selected.toggle(&name);
        }
        let catalog = courses(&["Networks", "Security"]);

        let dropped = selected.reconcile(&catalog);
        assert_eq!(dropped, courses(&["Algorithms"]));
        assert_eq!(selected.as_slice(), courses(&["Networks"]).as_slice());

        assert!(selected.reconcile(&catalog).is_empty());
        assert_eq!(selected.as_slice(), courses(&["Networks"]).as_slice());
    }

    #[test]
    fn list_and_chips_derive_from_the_same_selection() {
        let catalog = courses(&["Algorithms", "Networks", "Security"]);
        let mut selected = SelectedCourses::default();
        selected.toggle(&CourseName::from("Security"));
        selected.toggle(&CourseName::from("Algorithms"));

        let list = render_course_list(&catalog, &selected, "");
        let chips = render_chips(&selected);

        let highlighted: Vec<_> = list
            .iter()
            .filter(|entry| entry.selected)
            .map(|entry| entry.name.clone())
            .collect();
        assert_eq!(highlighted, courses(&["Algorithms", "Security"]));
        assert_eq!(
            chips.iter().map(|c| c.name.clone()).collect::<Vec<_>>(),
            courses(&["Security", "Algorithms"])
        );
    }

    #[test]
    fn filter_hides_without_deselecting() {
        let catalog = courses(&["Algorithms", "Networks"]);
        let mut selected = SelectedCourses::default();
        selected.toggle(&CourseName::from("Networks"));

        let list = render_course_list(&catalog, &selected, "ALGO");
        assert!(list[0].visible);
        assert!(!list[1].visible);
        assert!(list[1].selected);
    }

    #[test]
    fn filter_matches_raw_input_including_whitespace() {
        let catalog = courses(&["Algorithms", "Data Structures"]);
        let list = render_course_list(&catalog, &SelectedCourses::default(), " ");
        assert!(!list[0].visible);
        assert!(list[1].visible);

        let list = render_course_list(&catalog, &SelectedCourses::default(), "");
        assert!(list.iter().all(|entry| entry.visible));
    }

    #[test]
    fn degree_toggle_flips_membership() {
        let mut degrees = DegreeSet::default();
        assert!(degrees.toggle(DegreeId::from("CS")));
        assert!(degrees.contains(&DegreeId::from("CS")));
        assert!(!degrees.toggle(DegreeId::from("CS")));
        assert!(degrees.is_empty());
    }
}
