use c8lang::{print_tree, Lexer, Parser};
use clap::Parser as _;
use color_print::cprintln;

#[derive(Debug, clap::Parser)]
#[clap(author, version, about)]
struct Args {
    /// Input file
    #[clap(default_value = "main.c8s")]
    input: String,

    /// Print names declared by assignments
    #[clap(short, long)]
    scope: bool,
}

fn main() {
    let args = Args::parse();

    let code = match std::fs::read_to_string(&args.input) {
        Ok(code) => code,
        Err(err) => {
            cprintln!("<red,bold>error</>: Failed to open file: {}: {}", args.input, err);
            std::process::exit(1);
        }
    };

    let result = Lexer::new(&code).parse().and_then(|tokens| {
        let mut parser = Parser::new(tokens);
        parser.parse_program().map(|ast| (ast, parser.into_scopes()))
    });

    let (ast, scopes) = match result {
        Ok(ok) => ok,
        Err(err) => {
            let line_no = err.line() + 1;
            let raw = code.lines().nth(err.line()).unwrap_or("");
            cprintln!("<red,bold>error</>: {}", err);
            cprintln!("     <blue>--></> <underline>{}:{}</>", args.input, line_no);
            cprintln!("      <blue>|</>");
            cprintln!(" <blue>{:>4} |</> {}", line_no, raw);
            cprintln!("      <blue>|</>");
            std::process::exit(err.exit_code());
        }
    };

    print!("{}", print_tree(&ast));

    if args.scope {
        println!("-------------------+-----------------------------------------------------");
        for (name, var) in scopes.into_global() {
            cprintln!("<g>{:<4}</> line {:>4}  depth {}", name, var.line + 1, var.depth);
        }
    }
}
