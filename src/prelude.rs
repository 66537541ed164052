/// Imports this crate's prelude.
#[macro_export]
macro_rules! prelude {
    ($($imports:tt)*) => (
        use $crate::prelude::{*, $($imports)*};
    )
}

pub use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display},
};

pub use log;
pub use regex;
pub use smallvec::{smallvec, SmallVec};

#[macro_use]
pub mod res;

pub use crate::{
    bail,
    college::{self, College},
    error,
    pattern::{self, Pattern},
    prelude::res::{Res, WithCtx},
    repr::{
        self,
        idx::{self, CourseRef, PersonRef},
        Facet, Filter, Kind,
    },
    traits::*,
};

pub trait CollPrintExt: Sized {
    type Elm;
    fn show_iter<S>(self, show_elm: impl Fn(Self::Elm) -> S, sep: impl AsRef<str>) -> String
    where
        S: AsRef<str>;

    fn show_iter_cs<S>(self, show_elm: impl Fn(Self::Elm) -> S) -> String
    where
        S: AsRef<str>,
    {
        self.show_iter(show_elm, ", ")
    }
}
impl<T, E> CollPrintExt for T
where
    T: IntoIterator<Item = E>,
{
    type Elm = E;
    fn show_iter<S>(self, show_elm: impl Fn(Self::Elm) -> S, sep: impl AsRef<str>) -> String
    where
        S: AsRef<str>,
    {
        let sep = sep.as_ref();
        let mut s = String::new();
        for elm in self {
            if !s.is_empty() {
                s.push_str(sep);
            }
            s.push_str(show_elm(elm).as_ref())
        }
        s
    }
}
