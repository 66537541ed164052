prelude! {}

/// Role records owning a set of courses.
pub trait HasCourses {
    fn courses(&self) -> &BTreeSet<idx::Course>;
    fn courses_mut(&mut self) -> &mut BTreeSet<idx::Course>;
}

/// Entities carrying a back-reference to the registry that owns them.
pub trait Member {
    /// Registry currently owning the entity, if any.
    fn college(&self) -> Option<idx::College>;
    fn belongs_to(&self, college: idx::College) -> bool {
        self.college() == Some(college)
    }
}
