use repotree::ui::output;

fn main() {
    if let Err(err) = repotree::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
