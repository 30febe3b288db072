/// Asserts that two readers yield equal values and equal nullness at every row.
macro_rules! assert_readers_equal {
    ($expected:expr, $actual:expr) => {{
        let (expected, actual) = (&$expected, &$actual);
        assert_eq!(expected.len(), actual.len());
        for row in 0..expected.len() {
            match (expected.read(row), actual.read(row)) {
                (Some(e), Some(a)) => assert!(e == a, "row {row} differs"),
                (None, None) => (),
                (e, a) => panic!(
                    "row {row}: expected set = {}, actual set = {}",
                    e.is_some(),
                    a.is_some()
                ),
            }
        }
    }};
}

#[cfg(test)]
mod encodings;
#[cfg(test)]
mod fuzz;
#[cfg(test)]
mod generic;
#[cfg(test)]
mod row_reader;
#[cfg(test)]
mod variadic;
