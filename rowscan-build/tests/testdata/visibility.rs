pub struct Exported {
    pub a: i64,
    pub b: i64,
}

struct unexported {
    a: i64,
    b: i64,
}

pub struct ExAndUn {
    a: i64,
    b: i64,
}

struct unAndEx {
    pub a: i64,
    pub b: i64,
}
