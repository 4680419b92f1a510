//! Entry point: parses `argv`, hands the resulting `Mode` to
//! `noolang_drv::run`, and maps any error to exit code 1 (spec.md §6).
//! Grounded on `faxc-drv`'s thin `main` — all real work lives in the
//! library crate so integration tests can drive it without a subprocess.

fn main() {
    let args = std::env::args().skip(1);
    let mode = match noolang_drv::config::parse_args(args) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = noolang_drv::run(mode) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
