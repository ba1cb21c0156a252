//! `shuffle`: two mutually exclusive modes. By default, shuffle the
//! whole record stream (Fisher-Yates over the buffered input), optionally
//! truncating to `-n` output records via a reservoir-style uniform draw
//! (a partial Fisher-Yates over the first N positions selects any N of
//! the buffered records with equal probability). With `-f`, instead
//! leave record order untouched and shuffle the *values* of the named
//! fields within each record in place. Both modes are reproducible via
//! the universal `-seed` flag. Grounded on `csved_shuffle.cpp`, which
//! uses the same `a_rand.cpp` generator now reimplemented in
//! `crate::rand`.

use crate::commands::support::read_all;
use crate::error::{CsvFixError, CsvFixResult};
use crate::fields::parse_field_list;
use crate::flags::{CommandLine, FlagSpec};
use crate::ioman::IOManager;
use crate::rand::RandGen;

pub const HELP: &str = "shuffle - randomly reorder records, or shuffle field values within each record (-seed, -n, -f)";

fn shuffle_fields_in_place(row: &mut [String], fields: &[usize], rng: &mut RandGen) {
    let mut values: Vec<String> = fields.iter().map(|&i| row.get(i).cloned().unwrap_or_default()).collect();
    let len = values.len();
    for i in (1..len).rev() {
        let j = rng.next_range(0, i + 1);
        values.swap(i, j);
    }
    for (slot, &idx) in fields.iter().enumerate() {
        if idx >= row.len() {
            continue;
        }
        row[idx] = values[slot].clone();
    }
}

pub fn run(argv: &[String]) -> CsvFixResult<()> {
    let specs = [FlagSpec::opt("-n"), FlagSpec::opt("-f")];
    let cmd = CommandLine::parse(argv, &specs)?;
    let fields = if cmd.has_flag("-f") {
        Some(parse_field_list(&cmd.get_value("-f"))?)
    } else {
        None
    };
    let limit: Option<usize> = if cmd.has_flag("-n") {
        Some(
            cmd.get_value("-n")
                .trim()
                .parse()
                .map_err(|_| CsvFixError::dispatch("Invalid -n value"))?,
        )
    } else {
        None
    };

    let mut io = IOManager::new(&cmd)?;
    let mut rng = RandGen::new(io.seed);

    if let Some(fields) = fields {
        let mut row = Vec::new();
        while io.read_csv(&mut row)? {
            shuffle_fields_in_place(&mut row, &fields, &mut rng);
            io.write_row(&row)?;
        }
        return Ok(());
    }

    let mut rows = read_all(&mut io)?;
    let len = rows.len();
    let n = limit.unwrap_or(len).min(len);
    // Partial Fisher-Yates: shuffling only the first n positions still
    // selects any n of the buffered records uniformly, and orders them
    // uniformly too, without touching the untaken tail.
    for i in 0..n {
        let j = rng.next_range(i, len);
        rows.swap(i, j);
    }
    for row in rows.into_iter().take(n) {
        io.write_row(&row)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_shuffle_touches_only_named_fields() {
        let mut row = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let mut rng = RandGen::new(1);
        shuffle_fields_in_place(&mut row, &[0, 2], &mut rng);
        assert_eq!(row[1], "b");
        let mut values: Vec<&str> = vec![row[0].as_str(), row[2].as_str()];
        values.sort();
        assert_eq!(values, vec!["a", "c"]);
    }
}
