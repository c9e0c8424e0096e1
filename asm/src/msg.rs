use color_print::cprintln;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Error(String),
    Warn(String),
    Note(String),
}

impl Msg {
    /// Print in the rustc-like layout; `info` is (file, 1-based line, raw line).
    pub fn print(&self, info: (&str, usize, &str)) {
        let (file, line, raw) = info;
        match self {
            Msg::Error(msg) => cprintln!("<red,bold>error</>: {}", msg),
            Msg::Warn(msg) => cprintln!("<yellow,bold>warn</>: {}", msg),
            Msg::Note(msg) => cprintln!("<green,bold>note</>: {}", msg),
        }
        cprintln!("     <blue>--></> <underline>{}:{}</>", file, line);
        cprintln!("      <blue>|</>");
        cprintln!(" <blue>{:>4} |</> {}", line, raw);
        cprintln!("      <blue>|</>");
    }
}

/// A message attached to a source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub line_idx: usize,
    pub msg: Msg,
}

pub fn dump(diags: &[Diag], file: &str, lines: &[String]) {
    for diag in diags {
        let raw = lines.get(diag.line_idx).map(|s| s.as_str()).unwrap_or("");
        diag.msg.print((file, diag.line_idx + 1, raw));
    }
}
