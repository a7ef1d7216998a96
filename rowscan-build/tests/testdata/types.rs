struct boolean {
    a: bool,
}

struct numerics {
    a: u8,
    b: u16,
    c: u32,
    d: u64,
    e: i8,
    f: i16,
    g: i32,
    h: i64,
    i: f32,
    j: f64,
    k: u128,
    l: i128,
    m: char,
    n: usize,
    o: isize,
}

struct str {
    a: String,
}

struct structs {
    a: uuid::Uuid,
}

struct slices {
    a: Vec<bool>,
    b: Vec<chrono::NaiveDateTime>,
    c: Vec<Option<u8>>,
    d: Vec<Option<uuid::Uuid>>,
    e: [u8; 16],
}

struct pointers {
    a: Option<bool>,
    b: Box<chrono::NaiveDateTime>,
    c: Option<Vec<u8>>,
    d: Option<Vec<uuid::Uuid>>,
}

struct marker;
