//! Arena indices and the handles given out to callers.

prelude! {}

use std::sync::atomic::{AtomicUsize, Ordering};

safe_index::new! {
    /// Person index, see [`Person`](crate::repr::Person).
    Person,
    /// Maps a [`Person`] to something.
    map: PersonMap,
}

safe_index::new! {
    /// Course index, see [`Course`](crate::repr::Course).
    Course,
    /// Maps a [`Course`] to something.
    map: CourseMap,
}

/// Identifies a registry, unique for the whole process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct College(usize);

impl College {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl Display for College {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "college#{}", self.0)
    }
}

/// An arena index along with the registry it was issued by.
///
/// Handles are only meaningful for the registry that created them, a
/// [`College`](crate::college::College) rejects handles issued by another registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Handle<I> {
    college: College,
    idx: I,
}

pub type PersonRef = Handle<Person>;
pub type CourseRef = Handle<Course>;

impl<I: Copy> Handle<I> {
    pub(crate) fn new(college: College, idx: I) -> Self {
        Self { college, idx }
    }

    /// Registry this handle was issued by.
    pub fn college(&self) -> College {
        self.college
    }
    pub fn idx(&self) -> I {
        self.idx
    }
}

impl<I: Display> Display for Handle<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/#{}", self.college, self.idx)
    }
}
