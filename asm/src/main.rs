use c8asm::{msg, util, Assembler, Error, LineError};
use color_print::cprintln;
use std::io::Write;
use std::path::Path;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    #[clap(default_value = "main.c8s")]
    input: String,

    /// Output file [default: input with `.ch8` extension]
    #[clap(short, long)]
    output: Option<String>,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,

    /// Write label addresses as YAML
    #[clap(long)]
    symbols: Option<String>,

    /// Print errors only
    #[clap(short, long)]
    quiet: bool,
}

fn fail(err: Error) -> ! {
    cprintln!("<red,bold>error</>: {}", err);
    std::process::exit(err.exit_code());
}

fn fail_at(err: LineError, file: &str, lines: &[String]) -> ! {
    err.print_diag(file, lines);
    std::process::exit(err.error.exit_code());
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    let output = args.output.clone().unwrap_or_else(|| {
        Path::new(&args.input)
            .with_extension("ch8")
            .to_string_lossy()
            .into_owned()
    });
    let log = |line: String| {
        if !args.quiet {
            println!("{}", line);
        }
    };

    log("CHIP-8 Assembler".to_string());

    log("1. Read File".to_string());
    log(format!("  < {}", args.input));
    let source = std::fs::read_to_string(&args.input).unwrap_or_else(|err| {
        let err = match err.kind() {
            std::io::ErrorKind::NotFound => Error::FileOpen(args.input.clone(), err),
            _ => Error::FileRead(args.input.clone(), err),
        };
        fail(err)
    });

    let mut asm = Assembler::new(&source);

    log("2. Layout".to_string());
    if let Err(err) = asm.layout() {
        fail_at(err, &args.input, asm.lines());
    }

    log("3. Encode".to_string());
    let image = match asm.resolve() {
        Ok(image) => image,
        Err(err) => fail_at(err, &args.input, asm.lines()),
    };
    if !args.quiet {
        msg::dump(asm.diags(), &args.input, asm.lines());
    }

    if args.dump {
        util::print_dump(&args.input, asm.lines(), &image, asm.labels());
    }

    // Symbols are serialized up front and written only once the image is out
    let symbols = args.symbols.as_ref().map(|path| {
        let yaml = util::symbols_yaml(asm.labels()).unwrap_or_else(|err| fail(err));
        (path, yaml)
    });

    log(format!("  > {} ({} bytes)", output, image.len()));
    let mut file = std::fs::File::create(&output)
        .unwrap_or_else(|err| fail(Error::FileCreate(output.clone(), err)));
    file.write_all(&image.to_bytes())
        .unwrap_or_else(|err| fail(Error::FileWrite(output.clone(), err)));

    if let Some((path, yaml)) = symbols {
        std::fs::write(path, yaml).unwrap_or_else(|err| fail(Error::FileWrite(path.clone(), err)));
        log(format!("  > {}", path));
    }
}
