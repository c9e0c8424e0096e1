use crate::error::Error;
use crate::image::{Data, Image, Unit};
use crate::label::Labels;
use c8arch::inst::Inst;
use color_print::cformat;
use indexmap::IndexMap;
use serde::Serialize;

/// Print the listing: address, bytes, line number, decoded instruction and source.
pub fn print_dump(file: &str, lines: &[String], image: &Image, labels: &Labels) {
    println!(
        "{}+------[{}]{}",
        "-".repeat(19),
        file,
        "-".repeat(45usize.saturating_sub(file.len()))
    );

    let mut units = image.units().iter().peekable();
    for (idx, raw) in lines.iter().enumerate() {
        let line_num = idx + 1;
        let source = highlight(raw, labels);

        let mut first = true;
        while let Some(unit) = units.next_if(|unit| unit.line_idx == idx) {
            let text = if first { source.as_str() } else { "" };
            println!("{} | {:>4}: {}", unit_cformat(unit), line_num, text);
            first = false;
        }
        if first {
            println!("{:19}| {:>4}: {}", "", line_num, source);
        }
    }
    println!("-------------------+-----------------------------------------------------");
}

fn unit_cformat(unit: &Unit) -> String {
    match unit.data {
        Data::Word(word) => {
            let inst = match Inst::from_bin(word) {
                Some(inst) => inst.cformat(),
                None => cformat!("<r,s>??</>"),
            };
            format!(
                "[{:04X}] {:02X} {:02X}     {}",
                unit.addr,
                word >> 8,
                word & 0xFF,
                inst
            )
        }
        Data::Byte(byte) => format!("[{:04X}] {:02X}       ", unit.addr, byte),
    }
}

fn highlight(raw: &str, labels: &Labels) -> String {
    let code = raw.trim_start();
    match code.split_whitespace().next().and_then(|word| word.strip_suffix(':')) {
        Some(name) if labels.get(name).is_some() => {
            let rest = &code[name.len() + 1..];
            cformat!("<g>{}:</>{}", name, rest)
        }
        _ => raw.to_string(),
    }
}

#[derive(Debug, Serialize)]
struct Symbol {
    addr: String,
    line: usize,
}

/// Label table as YAML, in definition order.
pub fn symbols_yaml(labels: &Labels) -> Result<String, Error> {
    let map: IndexMap<&str, Symbol> = labels
        .iter()
        .map(|(name, label)| {
            let addr = match label.addr {
                Some(addr) => format!("0x{addr:03X}"),
                None => "unbound".to_string(),
            };
            let symbol = Symbol {
                addr,
                line: label.line + 1,
            };
            (name.as_str(), symbol)
        })
        .collect();
    serde_yaml::to_string(&map).map_err(Error::Symbols)
}
