fn main() {
    if let Err(err) = endlabel::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
