//! Process exit codes

pub const EXIT_SUCCESS: i32 = 0;
/// Bad arguments, unknown ids, storage or configuration failures
pub const EXIT_ERROR: i32 = 1;
