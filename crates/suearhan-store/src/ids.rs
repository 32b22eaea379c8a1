//! Record id generation.

use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of every generated record id.
pub const RECORD_ID_LEN: usize = 9;

/// Generate an opaque 9-character base-36 record id.
///
/// Ids are produced by whichever writer creates the record; there is no
/// central allocator, so collisions are theoretically possible but treated
/// as negligible probability.
pub fn new_record_id() -> String {
    let mut rng = rand::thread_rng();
    (0..RECORD_ID_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}
