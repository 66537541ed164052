//! Role tags: what a person is, which role view an operation uses, and search scopes.

prelude! {}

/// What a person is.
///
/// Each kind has its own role container in the registry, see [`Self::container`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Student,
    Teacher,
    /// Both a student and a teacher, with one shared identity.
    PhDStudent,
}

impl Display for Kind {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Student => "student".fmt(fmt),
            Self::Teacher => "teacher".fmt(fmt),
            Self::PhDStudent => "PhD student".fmt(fmt),
        }
    }
}

impl Kind {
    /// All kinds, in container order.
    pub const ALL: [Kind; 3] = [Kind::Student, Kind::Teacher, Kind::PhDStudent];

    /// Index of the role container storing people of this kind.
    pub fn container(self) -> usize {
        match self {
            Self::Student => 0,
            Self::Teacher => 1,
            Self::PhDStudent => 2,
        }
    }

    /// True if people of this kind can act in the role `facet`.
    pub fn has_facet(self, facet: Facet) -> bool {
        match (self, facet) {
            (Self::PhDStudent, _) => true,
            (Self::Student, Facet::Student) | (Self::Teacher, Facet::Teacher) => true,
            (Self::Student, Facet::Teacher) | (Self::Teacher, Facet::Student) => false,
        }
    }
}

/// A role view on a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    Student,
    Teacher,
}

impl Display for Facet {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Student => "student".fmt(fmt),
            Self::Teacher => "teacher".fmt(fmt),
        }
    }
}

/// Search scope over people.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Filter {
    /// Everyone.
    Person,
    /// Students and PhD students.
    Student,
    /// Teachers and PhD students.
    Teacher,
    PhDStudent,
}

impl Filter {
    /// Kinds whose containers the filter scans.
    pub fn kinds(self) -> SmallVec<[Kind; 3]> {
        match self {
            Self::Person => smallvec![Kind::Student, Kind::Teacher, Kind::PhDStudent],
            Self::Student => smallvec![Kind::Student, Kind::PhDStudent],
            Self::Teacher => smallvec![Kind::Teacher, Kind::PhDStudent],
            Self::PhDStudent => smallvec![Kind::PhDStudent],
        }
    }
}

impl From<Kind> for Filter {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Student => Self::Student,
            Kind::Teacher => Self::Teacher,
            Kind::PhDStudent => Self::PhDStudent,
        }
    }
}
impl From<Facet> for Filter {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::Student => Self::Student,
            Facet::Teacher => Self::Teacher,
        }
    }
}
