pub mod preprocess;
pub mod report;
pub mod status;
pub mod version;

const MIB: f64 = 1024.0 * 1024.0;

fn kib(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

fn mib(bytes: u64) -> f64 {
    bytes as f64 / MIB
}
