pub mod analyze;
pub mod batch;
pub mod cid;

use kappa::core::io::results::CidRecord;

pub(crate) fn print_records_table(records: &[CidRecord]) {
    println!(
        "{:<28} {:>10} {:>10} {:>12} {:>12} {:>10}",
        "snapshot", "particles", "cid", "cid_shuffled", "cid_norm", "gain"
    );
    for r in records {
        println!(
            "{:<28} {:>10} {:>10.6} {:>12.6} {:>12.6} {:>10.6}",
            r.snapshot, r.n_particles, r.cid, r.cid_shuffled, r.cid_normalized, r.compression_gain
        );
    }
}
