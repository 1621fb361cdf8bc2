#![forbid(unsafe_code)]

fn main() {
    if let Err(error) = vlist_inbox::cli::run_from_env() {
        eprintln!("vlist-inbox: {error}");
        std::process::exit(vlist_inbox::cli::exit_code(&error));
    }
}
