pub fn run() -> anyhow::Result<()> {
    println!("deepinsight {}", env!("CARGO_PKG_VERSION"));
    println!("Session log compaction and insight reporting");
    Ok(())
}
