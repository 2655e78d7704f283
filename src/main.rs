fn main() {
    #[cfg(feature = "cli")]
    oxilzw::cli::run();

    #[cfg(not(feature = "cli"))]
    {
        eprintln!("oxilzw: CLI not enabled. Rebuild with `--features cli`.");
        std::process::exit(1);
    }
}
