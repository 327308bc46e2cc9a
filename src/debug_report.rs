use short_order::InterpretResultVerbose;
use short_order::world::{ItemInstance, World};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(world: &World, run: &InterpretResultVerbose, verbose: bool, color: bool) {
    let palette = ansi::Palette::new(color);
    let result = &run.result;
    println!("\n{}", palette.bold(palette.paint(format!("> \"{}\"", result.text), ansi::CYAN)));

    if verbose {
        println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
        print_candidates(run, &palette);
    }

    println!("\n{}", palette.paint("━━━ Cart ━━━", ansi::GRAY));
    if !result.understood {
        println!("  {}", palette.paint("not understood, cart unchanged", ansi::YELLOW));
    }
    if result.state.cart.is_empty() {
        println!("  {}", palette.dim("(empty)"));
    }
    for item in &result.state.cart.items {
        print_item(world, item, &palette);
    }

    if verbose {
        let details = &run.details;
        println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
        println!(
            "  Total: {}  │  Tokenize: {}  │  Interpret: {}  │  Edges: {}",
            palette.paint(format!("{:?}", details.total), ansi::GREEN),
            palette.paint(format!("{:?}", details.tokenize), ansi::CYAN),
            palette.dim(format!("{:?}", details.interpret)),
            palette.dim(details.edges.to_string()),
        );
    }
}

fn print_candidates(run: &InterpretResultVerbose, palette: &ansi::Palette) {
    if run.details.candidates.is_empty() {
        println!("{}", palette.dim("  No tokenizations"));
        return;
    }
    for (idx, candidate) in run.details.candidates.iter().enumerate() {
        let marker = if candidate.winner { palette.paint("✓", ansi::GREEN) } else { palette.dim("·") };
        println!(
            "  {} {} {}",
            marker,
            palette.paint(format!("[{}]", idx), ansi::GRAY),
            palette.bold(&candidate.grouped),
        );
        println!(
            "      {} {}  {} {}  {} {}",
            palette.dim("score:"),
            palette.paint(candidate.score.to_string(), ansi::YELLOW),
            palette.dim("missed:"),
            palette.paint(candidate.missed.to_string(), ansi::YELLOW),
            palette.dim("tokens:"),
            palette.paint(candidate.token_count.to_string(), ansi::YELLOW),
        );
        if !candidate.rules.is_empty() {
            println!("      {} {}", palette.dim("rules:"), palette.paint(candidate.rules.join(", "), ansi::BLUE));
        }
    }
}

fn print_item(world: &World, item: &ItemInstance, palette: &ansi::Palette) {
    let uid = palette.paint(format!("#{}", item.uid), ansi::GRAY);
    println!("  {uid} {}", palette.paint(world.describe(item), ansi::GREEN));
}
