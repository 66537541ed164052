//! The registry.
//!
//! A [`College`] owns every person and course it admits. People live in an arena and are indexed
//! by [identity](PersonKey) in one role container per [`Kind`]; an identity is unique across all
//! three containers. Courses live in a separate arena and are indexed by name.
//!
//! Callers never get to hold entities directly, they hold [`PersonRef`]s and [`CourseRef`]s:
//! arena indices tagged with the registry that issued them. Entities only refer to each other
//! through indices too. A person's course record ([`Person::courses`]) is the authoritative
//! enrollment, the sets on [`Course`] are a reverse index.
//!
//! # Removed Courses
//!
//! [`College::remove_course`] detaches a course: it is deactivated, loses its back-reference and
//! disappears from the name index, so the name can be reused. The course stays in the arena, so
//! existing handles can still read it, and people keep it in their course record.

prelude! {
    repr::{Course, Person, PersonKey},
}

/// Membership registry for people and courses.
pub struct College {
    id: idx::College,
    people: idx::PersonMap<Person>,
    /// Role containers, see [`Kind::container`].
    by_kind: [BTreeMap<PersonKey, idx::Person>; 3],
    courses: idx::CourseMap<Course>,
    /// Attached courses only.
    name_to_course: BTreeMap<String, idx::Course>,
}

impl std::ops::Index<PersonRef> for College {
    type Output = Person;
    fn index(&self, person: PersonRef) -> &Self::Output {
        self.get_person(person).unwrap_or_else(|| {
            panic!(
                "[fatal] person handle `{}` does not belong to `{}`",
                person, self.id
            )
        })
    }
}
impl std::ops::Index<CourseRef> for College {
    type Output = Course;
    fn index(&self, course: CourseRef) -> &Self::Output {
        self.get_course(course).unwrap_or_else(|| {
            panic!(
                "[fatal] course handle `{}` does not belong to `{}`",
                course, self.id
            )
        })
    }
}

impl Default for College {
    fn default() -> Self {
        Self::new()
    }
}

impl College {
    /// Constructor.
    pub fn with_capacity(people_capa: usize, course_capa: usize) -> Self {
        Self {
            id: idx::College::fresh(),
            people: idx::PersonMap::with_capacity(people_capa),
            by_kind: [BTreeMap::new(), BTreeMap::new(), BTreeMap::new()],
            courses: idx::CourseMap::with_capacity(course_capa),
            name_to_course: BTreeMap::new(),
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(7, 7)
    }

    /// Identifier of this registry, unique for the process.
    pub fn id(&self) -> idx::College {
        self.id
    }

    /// Retrieves a person, `None` if the handle was issued by another registry.
    pub fn get_person(&self, person: PersonRef) -> Option<&Person> {
        if person.college() == self.id {
            Some(&self.people[person.idx()])
        } else {
            None
        }
    }
    /// Retrieves a course, `None` if the handle was issued by another registry.
    ///
    /// Removed courses are still accessible, see [`Self::owns_course`].
    pub fn get_course(&self, course: CourseRef) -> Option<&Course> {
        if course.college() == self.id {
            Some(&self.courses[course.idx()])
        } else {
            None
        }
    }

    pub fn owns_person(&self, person: PersonRef) -> bool {
        self.get_person(person)
            .map(|p| p.belongs_to(self.id))
            .unwrap_or(false)
    }
    /// True if the course was issued by this registry and has not been removed.
    pub fn owns_course(&self, course: CourseRef) -> bool {
        self.attached_course(course).is_some()
    }

    fn attached_course(&self, course: CourseRef) -> Option<&Course> {
        self.get_course(course).filter(|c| c.belongs_to(self.id))
    }
    fn describe_course(&self, course: CourseRef) -> String {
        self.get_course(course)
            .map(|c| c.name().to_string())
            .unwrap_or_else(|| course.to_string())
    }
    /// Resolves a course that must be attached to this registry.
    fn check_course(&self, course: CourseRef) -> Res<&Course> {
        self.attached_course(course)
            .ok_or_else(|| error!(@unknown("course") self.describe_course(course)))
    }
    /// Resolves a person that must belong to this registry.
    fn check_person(&self, person: PersonRef) -> Res<&Person> {
        self.get_person(person)
            .filter(|p| p.belongs_to(self.id))
            .ok_or_else(|| error!(@unknown("person") person.to_string()))
    }

    /// Course record of `person` in the role `facet`, fails if its kind lacks that role.
    fn check_facet(person: &Person, facet: Facet) -> Res<&BTreeSet<idx::Course>> {
        let kind = person.kind();
        if !kind.has_facet(facet) {
            bail!(@unexpected("person kind") format!("{} is a {}", person, kind))
        }
        person
            .courses(facet)
            .ok_or_else(|| error!("[fatal] {} `{}` has no {} record", kind, person, facet))
    }

    /// Sorts people by identity and turns them into handles.
    fn person_refs(&self, mut people: Vec<idx::Person>) -> Vec<PersonRef> {
        people.sort_by(|lft, rgt| self.people[*lft].key().cmp(self.people[*rgt].key()));
        people.dedup();
        people
            .into_iter()
            .map(|idx| PersonRef::new(self.id, idx))
            .collect()
    }
    /// Sorts courses by name and turns them into handles.
    fn course_refs(&self, mut courses: Vec<idx::Course>) -> Vec<CourseRef> {
        courses.sort_by(|lft, rgt| self.courses[*lft].name().cmp(self.courses[*rgt].name()));
        courses
            .into_iter()
            .map(|idx| CourseRef::new(self.id, idx))
            .collect()
    }

    /// True if no role container knows `key`.
    fn person_name_unique(&self, key: &PersonKey) -> bool {
        Kind::ALL
            .iter()
            .all(|kind| !self.by_kind[kind.container()].contains_key(key))
    }

    /// Admits a person.
    ///
    /// Returns `None` if someone with the same name and surname is already registered, whatever
    /// their kind. `active` is ignored for teachers.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # college_rs::prelude! {}
    /// let mut college = College::new();
    /// let jan = college
    ///     .add_person(Kind::Student, "Jan", "Kowalski", true)
    ///     .expect("failed to add student");
    /// assert_eq!(college[jan].surname(), "Kowalski");
    /// assert!(college[jan].is_active_student());
    ///
    /// // identities are unique across kinds
    /// assert!(college.add_person(Kind::Teacher, "Jan", "Kowalski", true).is_none());
    /// assert_eq!(college.count(Filter::Person), 1);
    /// ```
    pub fn add_person(
        &mut self,
        kind: Kind,
        name: impl Into<String>,
        surname: impl Into<String>,
        active: bool,
    ) -> Option<PersonRef> {
        let key = PersonKey::new(name, surname);
        if !self.person_name_unique(&key) {
            log::debug!("cannot add {} `{}`, identity already registered", kind, key);
            return None;
        }

        let college = self.id;
        let p_idx = self
            .people
            .push(Person::new(college, key.clone(), kind, active));
        let _prev = self.by_kind[kind.container()].insert(key, p_idx);
        debug_assert!(_prev.is_none());

        log::debug!("added {} `{}` #{}", kind, self.people[p_idx], p_idx);
        Some(PersonRef::new(college, p_idx))
    }

    /// Creates a course.
    ///
    /// Returns `None` if a course with the same name is already registered.
    pub fn add_course(&mut self, name: impl Into<String>, active: bool) -> Option<CourseRef> {
        let name = name.into();
        if self.name_to_course.contains_key(&name) {
            log::debug!("cannot add course `{}`, name already registered", name);
            return None;
        }

        let college = self.id;
        let c_idx = self
            .courses
            .push(Course::new(college, name.clone(), active));
        let _prev = self.name_to_course.insert(name, c_idx);
        debug_assert!(_prev.is_none());

        log::debug!("added course `{}` #{}", self.courses[c_idx], c_idx);
        Some(CourseRef::new(college, c_idx))
    }

    /// Searches people by name and surname patterns, see [`pattern`].
    ///
    /// Only the role containers relevant to `filter` are scanned. Results are sorted by identity.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # college_rs::prelude! {}
    /// let mut college = College::new();
    /// college.add_person(Kind::Student, "Jan", "Kowalski", true);
    /// college.add_person(Kind::Teacher, "Anna", "Kowalska", true);
    /// college.add_person(Kind::PhDStudent, "Piotr", "Nowak", false);
    ///
    /// let kowal = college.find(Filter::Person, "*", "Kowalsk?").expect("search failed");
    /// let names: Vec<_> = kowal.iter().map(|p| college[*p].name()).collect();
    /// assert_eq!(names, vec!["Anna", "Jan"]);
    ///
    /// // PhD students are both students and teachers
    /// assert_eq!(college.find(Filter::Student, "*", "*").expect("search failed").len(), 2);
    /// assert_eq!(college.find(Filter::Teacher, "*", "*").expect("search failed").len(), 2);
    /// assert_eq!(college.find(Kind::PhDStudent, "P*", "Nowak").expect("search failed").len(), 1);
    /// ```
    pub fn find(
        &self,
        filter: impl Into<Filter>,
        name_pattern: impl AsRef<str>,
        surname_pattern: impl AsRef<str>,
    ) -> Res<Vec<PersonRef>> {
        let name = Pattern::new(name_pattern)?;
        let surname = Pattern::new(surname_pattern)?;

        let mut matches = Vec::new();
        for kind in filter.into().kinds() {
            let people = &self.by_kind[kind.container()];
            match (name.as_exact(), surname.as_exact()) {
                (Some(name), Some(surname)) => {
                    log::trace!("{kind} container: exact lookup");
                    matches.extend(people.get(&PersonKey::new(name, surname)).cloned())
                }
                (None, Some(surname)) => {
                    log::trace!("{kind} container: surname range scan");
                    let people = people
                        .range(PersonKey::new("", surname)..)
                        .take_while(|(key, _)| key.surname() == surname)
                        .filter(|(key, _)| name.is_match(key.name()))
                        .map(|(_, idx)| *idx);
                    matches.extend(people)
                }
                _ => {
                    log::trace!("{kind} container: full scan");
                    let people = people
                        .iter()
                        .filter(|(key, _)| name.is_match(key.name()) && surname.is_match(key.surname()))
                        .map(|(_, idx)| *idx);
                    matches.extend(people)
                }
            }
        }

        Ok(self.person_refs(matches))
    }

    /// Searches courses by name pattern, see [`pattern`].
    ///
    /// Removed courses are never returned. Results are sorted by name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # college_rs::prelude! {}
    /// let mut college = College::new();
    /// let algebra = college.add_course("Algebra", true).expect("failed to add course");
    /// college.add_course("Algorithms", true);
    /// college.add_course("Calculus", false);
    ///
    /// assert_eq!(college.find_courses("Alg*").expect("search failed").len(), 2);
    /// assert_eq!(college.find_courses("Algebra").expect("search failed"), vec![algebra]);
    ///
    /// assert!(college.remove_course(algebra));
    /// assert_eq!(college.find_courses("Alg*").expect("search failed").len(), 1);
    /// assert!(!college.remove_course(algebra));
    /// ```
    pub fn find_courses(&self, pattern: impl AsRef<str>) -> Res<Vec<CourseRef>> {
        let pattern = Pattern::new(pattern)?;
        let matches: Vec<idx::Course> = if let Some(name) = pattern.as_exact() {
            self.name_to_course.get(name).cloned().into_iter().collect()
        } else {
            self.name_to_course
                .iter()
                .filter(|(name, _)| pattern.is_match(name.as_str()))
                .map(|(_, idx)| *idx)
                .collect()
        };
        Ok(self.course_refs(matches))
    }

    /// People assigned to a course in a given role, sorted by identity.
    ///
    /// Fails if the course does not belong to this registry or has been removed.
    pub fn find_by_course(&self, facet: Facet, course: CourseRef) -> Res<Vec<PersonRef>> {
        let course = self.check_course(course)?;
        Ok(self.person_refs(course.assigned(facet).iter().cloned().collect()))
    }

    /// Changes the activeness of a course.
    ///
    /// Returns `false` if the course does not belong to this registry or has been removed. People
    /// already assigned to the course are not affected.
    pub fn change_course_activeness(&mut self, course: CourseRef, active: bool) -> bool {
        if !self.owns_course(course) {
            log::warn!(
                "cannot change activeness of course `{}`: not in `{}`",
                self.describe_course(course),
                self.id
            );
            return false;
        }
        let course = &mut self.courses[course.idx()];
        course.change_activeness(active);
        log::debug!("course `{}` active: {}", course, active);
        true
    }

    /// Removes a course.
    ///
    /// Returns `false` if the course does not belong to this registry or has already been removed.
    /// The course is deactivated and loses its back-reference, but people assigned to it keep it
    /// in their course record.
    pub fn remove_course(&mut self, course: CourseRef) -> bool {
        if !self.owns_course(course) {
            log::warn!(
                "cannot remove course `{}`: not in `{}`",
                self.describe_course(course),
                self.id
            );
            return false;
        }
        let c_idx = course.idx();
        let course = &mut self.courses[c_idx];
        course.detach();
        let _prev = self.name_to_course.remove(course.name());
        debug_assert_eq!(_prev, Some(c_idx));
        log::debug!("removed course `{}` #{}", course, c_idx);
        true
    }

    /// Changes the activeness of a student or PhD student.
    ///
    /// Returns `false` if the person does not belong to this registry or is not a student.
    /// Deactivating a student does not unassign them from their courses.
    pub fn change_student_activeness(&mut self, student: PersonRef, active: bool) -> bool {
        if !self.owns_person(student) {
            log::warn!(
                "cannot change activeness of person `{}`: not in `{}`",
                student,
                self.id
            );
            return false;
        }
        let person = &mut self.people[student.idx()];
        if let Some(record) = person.as_student_mut() {
            record.change_activeness(active);
            log::debug!("student `{}` active: {}", person, active);
            return true;
        }
        log::warn!(
            "cannot change activeness of {} `{}`: not a student",
            person.kind(),
            person
        );
        false
    }

    /// Assigns a person to a course in a given role.
    ///
    /// Checks, in this order, that
    ///
    /// - the course belongs to this registry and has not been removed (unknown error),
    /// - the course is active (inactive error),
    /// - the person belongs to this registry (unknown error),
    /// - the person can act in the role `facet` (unexpected error),
    /// - if `facet` is [`Facet::Student`], the student is active (inactive error).
    ///
    /// Returns `false` if the person already holds a course with the same name in that role.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # college_rs::prelude! {}
    /// let mut college = College::new();
    /// let phd = college.add_person(Kind::PhDStudent, "Ala", "Nowak", true).unwrap();
    /// let algebra = college.add_course("Algebra", true).unwrap();
    ///
    /// assert!(college.assign_course(Facet::Student, phd, algebra).unwrap());
    /// assert!(!college.assign_course(Facet::Student, phd, algebra).unwrap());
    /// assert!(college.assign_course(Facet::Teacher, phd, algebra).unwrap());
    ///
    /// assert_eq!(college.find_by_course(Facet::Student, algebra).unwrap(), vec![phd]);
    /// assert_eq!(college.find_by_course(Facet::Teacher, algebra).unwrap(), vec![phd]);
    ///
    /// let calculus = college.add_course("Calculus", false).unwrap();
    /// let err = college.assign_course(Facet::Student, phd, calculus).unwrap_err();
    /// assert!(err.is_inactive());
    /// ```
    pub fn assign_course(
        &mut self,
        facet: Facet,
        person: PersonRef,
        course: CourseRef,
    ) -> Res<bool> {
        let (p_idx, c_idx) = (person.idx(), course.idx());
        {
            let course = self.check_course(course)?;
            if !course.is_active() {
                bail!(@inactive("course") course.name())
            }
            let person = self.check_person(person)?;
            let held = Self::check_facet(person, facet)
                .context(|| format!("expected a {} for course `{}`", facet, course))?;
            if facet == Facet::Student && !person.is_active_student() {
                bail!(@inactive("student") person.to_string())
            }

            let name = course.name();
            if held.iter().any(|held| self.courses[*held].name() == name) {
                log::debug!(
                    "{} `{}` already assigned to course `{}`",
                    facet,
                    person,
                    name
                );
                return Ok(false);
            }
        }

        self.people[p_idx]
            .courses_mut(facet)
            .ok_or_else(|| error!("[fatal] {} record vanished during assignment", facet))?
            .insert(c_idx);
        let _is_new = self.courses[c_idx].assigned_mut(facet).insert(p_idx);
        debug_assert!(_is_new);

        log::debug!(
            "assigned {} `{}` to course `{}`",
            facet,
            self.people[p_idx],
            self.courses[c_idx]
        );
        Ok(true)
    }

    /// Course record of a person in a given role, sorted by name.
    ///
    /// The record may contain removed courses. Fails if the person does not belong to this
    /// registry, or cannot act in the role `facet`.
    pub fn courses_of(&self, facet: Facet, person: PersonRef) -> Res<Vec<CourseRef>> {
        let person = self.check_person(person)?;
        let held = Self::check_facet(person, facet).context(|| format!("expected a {}", facet))?;
        Ok(self.course_refs(held.iter().cloned().collect()))
    }

    /// Number of people in the scope of a filter.
    pub fn count(&self, filter: impl Into<Filter>) -> usize {
        filter
            .into()
            .kinds()
            .into_iter()
            .map(|kind| self.by_kind[kind.container()].len())
            .sum()
    }

    /// Everyone in the scope of a filter, sorted by identity.
    pub fn members(&self, filter: impl Into<Filter>) -> Vec<PersonRef> {
        let people = filter
            .into()
            .kinds()
            .into_iter()
            .flat_map(|kind| self.by_kind[kind.container()].values().cloned())
            .collect();
        self.person_refs(people)
    }

    /// Number of courses, removed courses excluded.
    pub fn len_courses(&self) -> usize {
        self.name_to_course.len()
    }

    /// People appear in the order they were added in.
    pub fn people(&self) -> &[Person] {
        &self.people
    }
    /// Courses appear in the order they were added in, removed courses included.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn to_pretty_string(&self) -> String {
        let mut res = String::with_capacity(113);

        macro_rules! post {
            ($pref:expr, line $($interp_str:tt)*) => {{
                if !res.is_empty() {
                    res.push('\n');
                }
                res.push_str($pref);
                res.push_str(&format!($($interp_str)*));
            }};
        }

        let show_courses = |courses: &BTreeSet<idx::Course>| {
            courses
                .iter()
                .cloned()
                .show_iter_cs(|idx| self.courses[idx].name())
        };
        let show_people = |people: &BTreeSet<idx::Person>| {
            people
                .iter()
                .cloned()
                .show_iter_cs(|idx| self.people[idx].to_string())
        };

        post!("", line "- {}", self.id);

        for kind in Kind::ALL {
            let people = &self.by_kind[kind.container()];
            if people.is_empty() {
                continue;
            }
            post!("  ", line "{}s:", kind);
            for p_idx in people.values().cloned() {
                let person = &self.people[p_idx];
                match person.as_student() {
                    Some(student) => {
                        let activeness = if student.is_active() { "active" } else { "inactive" };
                        post!("  ", line "- {} ({}) #{}", person, activeness, p_idx)
                    }
                    None => post!("  ", line "- {} #{}", person, p_idx),
                }
                if let Some(held) = person.courses(Facet::Student).filter(|c| !c.is_empty()) {
                    post!("    ", line "attends: {}", show_courses(held))
                }
                if let Some(held) = person.courses(Facet::Teacher).filter(|c| !c.is_empty()) {
                    post!("    ", line "teaches: {}", show_courses(held))
                }
            }
        }

        if !self.name_to_course.is_empty() {
            post!("  ", line "courses:");
            for c_idx in self.name_to_course.values().cloned() {
                let course = &self.courses[c_idx];
                let activeness = if course.is_active() { "active" } else { "inactive" };
                post!("  ", line "- {} ({}) #{}", course, activeness, c_idx);
                if !course.students().is_empty() {
                    post!("    ", line "students: {}", show_people(course.students()))
                }
                if !course.teachers().is_empty() {
                    post!("    ", line "teachers: {}", show_people(course.teachers()))
                }
            }
        }

        res.shrink_to_fit();
        res
    }
}
