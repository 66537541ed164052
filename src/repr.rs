prelude! {}

pub mod idx;
pub mod kind;

pub use kind::{Facet, Filter, Kind};

/// Identity of a person.
///
/// Ordered by surname first, then by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PersonKey {
    surname: String,
    name: String,
}

impl PersonKey {
    pub fn new(name: impl Into<String>, surname: impl Into<String>) -> Self {
        Self {
            surname: surname.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn surname(&self) -> &str {
        &self.surname
    }
}

impl Display for PersonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.surname)
    }
}

/// Student role record.
#[derive(Debug, Clone)]
pub struct Student {
    active: bool,
    courses: BTreeSet<idx::Course>,
}
impl HasCourses for Student {
    fn courses(&self) -> &BTreeSet<idx::Course> {
        &self.courses
    }
    fn courses_mut(&mut self) -> &mut BTreeSet<idx::Course> {
        &mut self.courses
    }
}
impl Student {
    pub fn new(active: bool) -> Self {
        Self {
            active,
            courses: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
    /// Unconditional, the registry is in charge of validation.
    pub fn change_activeness(&mut self, active: bool) {
        self.active = active
    }
}

/// Teacher role record, the courses taught.
#[derive(Debug, Clone, Default)]
pub struct Teacher {
    courses: BTreeSet<idx::Course>,
}
impl HasCourses for Teacher {
    fn courses(&self) -> &BTreeSet<idx::Course> {
        &self.courses
    }
    fn courses_mut(&mut self) -> &mut BTreeSet<idx::Course> {
        &mut self.courses
    }
}
impl Teacher {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Role state of a person.
#[derive(Debug, Clone)]
pub enum Role {
    Student(Student),
    Teacher(Teacher),
    PhDStudent { student: Student, teacher: Teacher },
}

impl Role {
    /// `active` is ignored for teachers.
    pub fn new(kind: Kind, active: bool) -> Self {
        match kind {
            Kind::Student => Self::Student(Student::new(active)),
            Kind::Teacher => Self::Teacher(Teacher::new()),
            Kind::PhDStudent => Self::PhDStudent {
                student: Student::new(active),
                teacher: Teacher::new(),
            },
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Self::Student(_) => Kind::Student,
            Self::Teacher(_) => Kind::Teacher,
            Self::PhDStudent { .. } => Kind::PhDStudent,
        }
    }

    pub fn as_student(&self) -> Option<&Student> {
        match self {
            Self::Student(student) | Self::PhDStudent { student, .. } => Some(student),
            Self::Teacher(_) => None,
        }
    }
    pub fn as_student_mut(&mut self) -> Option<&mut Student> {
        match self {
            Self::Student(student) | Self::PhDStudent { student, .. } => Some(student),
            Self::Teacher(_) => None,
        }
    }

    pub fn as_teacher(&self) -> Option<&Teacher> {
        match self {
            Self::Teacher(teacher) | Self::PhDStudent { teacher, .. } => Some(teacher),
            Self::Student(_) => None,
        }
    }
    pub fn as_teacher_mut(&mut self) -> Option<&mut Teacher> {
        match self {
            Self::Teacher(teacher) | Self::PhDStudent { teacher, .. } => Some(teacher),
            Self::Student(_) => None,
        }
    }

    /// Course record of a role view, `None` if the role does not have this view.
    pub fn courses(&self, facet: Facet) -> Option<&BTreeSet<idx::Course>> {
        match facet {
            Facet::Student => self.as_student().map(|role| role.courses()),
            Facet::Teacher => self.as_teacher().map(|role| role.courses()),
        }
    }
    pub fn courses_mut(&mut self, facet: Facet) -> Option<&mut BTreeSet<idx::Course>> {
        match facet {
            Facet::Student => self.as_student_mut().map(|role| role.courses_mut()),
            Facet::Teacher => self.as_teacher_mut().map(|role| role.courses_mut()),
        }
    }
}

/// A member of a registry.
///
/// Equality, ordering and hashing only consider the [identity](PersonKey).
#[derive(Debug, Clone)]
pub struct Person {
    college: idx::College,
    key: PersonKey,
    role: Role,
}

impl Member for Person {
    fn college(&self) -> Option<idx::College> {
        Some(self.college)
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}
impl Eq for Person {}
impl PartialOrd for Person {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Person {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}
impl std::hash::Hash for Person {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state)
    }
}

impl Person {
    pub(crate) fn new(college: idx::College, key: PersonKey, kind: Kind, active: bool) -> Self {
        Self {
            college,
            key,
            role: Role::new(kind, active),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.key.name()
    }
    #[inline]
    pub fn surname(&self) -> &str {
        self.key.surname()
    }
    pub fn key(&self) -> &PersonKey {
        &self.key
    }

    pub fn kind(&self) -> Kind {
        self.role.kind()
    }
    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn as_student(&self) -> Option<&Student> {
        self.role.as_student()
    }
    pub fn as_teacher(&self) -> Option<&Teacher> {
        self.role.as_teacher()
    }
    pub(crate) fn as_student_mut(&mut self) -> Option<&mut Student> {
        self.role.as_student_mut()
    }

    /// True for students and PhD students that are active.
    pub fn is_active_student(&self) -> bool {
        self.as_student().map(Student::is_active).unwrap_or(false)
    }

    pub fn courses(&self, facet: Facet) -> Option<&BTreeSet<idx::Course>> {
        self.role.courses(facet)
    }
    pub(crate) fn courses_mut(&mut self, facet: Facet) -> Option<&mut BTreeSet<idx::Course>> {
        self.role.courses_mut(facet)
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.key.fmt(f)
    }
}

/// A course.
///
/// Equality, ordering and hashing only consider the name.
#[derive(Debug, Clone)]
pub struct Course {
    college: Option<idx::College>,
    name: String,
    active: bool,
    students: BTreeSet<idx::Person>,
    teachers: BTreeSet<idx::Person>,
}

impl Member for Course {
    fn college(&self) -> Option<idx::College> {
        self.college
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
impl Eq for Course {}
impl PartialOrd for Course {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Course {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}
impl std::hash::Hash for Course {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state)
    }
}

impl Course {
    pub(crate) fn new(college: idx::College, name: impl Into<String>, active: bool) -> Self {
        Self {
            college: Some(college),
            name: name.into(),
            active,
            students: BTreeSet::new(),
            teachers: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }
    /// Unconditional, the registry is in charge of validation.
    pub fn change_activeness(&mut self, active: bool) {
        self.active = active
    }

    /// False once the course has been removed from its registry.
    pub fn is_attached(&self) -> bool {
        self.college.is_some()
    }
    /// Deactivates the course and clears its back-reference.
    pub(crate) fn detach(&mut self) {
        self.active = false;
        self.college = None;
    }

    /// Students currently assigned.
    pub fn students(&self) -> &BTreeSet<idx::Person> {
        &self.students
    }
    /// Teachers currently assigned.
    pub fn teachers(&self) -> &BTreeSet<idx::Person> {
        &self.teachers
    }
    pub fn assigned(&self, facet: Facet) -> &BTreeSet<idx::Person> {
        match facet {
            Facet::Student => &self.students,
            Facet::Teacher => &self.teachers,
        }
    }
    pub(crate) fn assigned_mut(&mut self, facet: Facet) -> &mut BTreeSet<idx::Person> {
        match facet {
            Facet::Student => &mut self.students,
            Facet::Teacher => &mut self.teachers,
        }
    }
}

impl Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    prelude! {
        repr::{PersonKey, Role, Student},
    }

    #[test]
    fn person_key_order() {
        let mut keys = vec![
            PersonKey::new("Jan", "Nowak"),
            PersonKey::new("Adam", "Nowak"),
            PersonKey::new("Zofia", "Kowalski"),
        ];
        keys.sort();
        let shown: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(shown, vec!["Zofia Kowalski", "Adam Nowak", "Jan Nowak"]);
        assert_eq!(
            PersonKey::new("Jan", "Nowak"),
            PersonKey::new(String::from("Jan"), "Nowak")
        );
    }

    #[test]
    fn phd_student_views() {
        let mut role = Role::new(Kind::PhDStudent, false);
        assert_eq!(role.kind(), Kind::PhDStudent);
        assert_eq!(role.as_student().map(Student::is_active), Some(false));
        assert!(role.as_teacher().is_some());

        role.as_student_mut()
            .expect("PhD students are students")
            .change_activeness(true);
        assert_eq!(role.as_student().map(Student::is_active), Some(true));

        assert!(role.courses(Facet::Student).is_some());
        assert!(role.courses(Facet::Teacher).is_some());
    }

    #[test]
    fn single_role_views() {
        let student = Role::new(Kind::Student, true);
        assert!(student.as_teacher().is_none());
        assert!(student.courses(Facet::Teacher).is_none());

        let teacher = Role::new(Kind::Teacher, false);
        assert!(teacher.as_student().is_none());
        assert!(teacher.courses(Facet::Teacher).is_some());
    }
}
