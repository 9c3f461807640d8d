// ── Text parsing ──
//
// Pure functions from raw CLP output to typed records. No I/O happens
// here. A parse that cannot find its minimum fields returns `None` (or
// skips the row); deciding whether that is an error is the caller's job.

mod domain;
mod property;
mod records;
mod table;

pub use domain::{
    CONTROLLER_TABLE, parse_controller_entries, parse_identity, parse_log_record, parse_power,
};
pub use property::{leading_number, property};
pub use records::record_numbers;
pub use table::{TableSpec, parse_field, table_rows};
