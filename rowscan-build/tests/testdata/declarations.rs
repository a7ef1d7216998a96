use std::fmt;

const LIMIT: usize = 10;

type Alias = t0;

struct t0 {
    a: i64,
    b: bool,
}

enum Shape {
    Circle,
    Square,
}

struct t1 {
    a: i64,
    b: bool,
}

pub(crate) struct t2 {
    a: String,
    b: u8,
}

impl fmt::Display for t2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.a)
    }
}

struct t3 {
    a: i64,
    b: i64,
    c: i64,
    d: bool,
    e: bool,
    f: bool,
}

struct Pair(i64, i64);

mod nested {
    pub struct Hidden {
        pub a: i64,
    }
}

#[derive(Debug, Clone)]
struct t4 {
    /// documented
    a: i64,
    #[allow(dead_code)]
    b: bool,
}

fn helper() -> usize {
    LIMIT
}
