fn main() {
    if let Err(err) = quarter_gantt::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
