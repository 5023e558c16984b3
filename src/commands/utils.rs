/// Display version information
pub fn display_version() {
    println!("Trace Digest v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Groups recurring Java stack traces in application logs into ranked reports.");
}
