//! Reading a stream of expressions and scanning their contents.
//!
//! Run with: cargo run --example stream

use serde_sexpr::{sexpr, write, Dynamic, Expression, Reader};
use std::error::Error;
use std::io::{self, Write};

const PROGRAM: &str = r#"
(set width 640)
(set height 480)
(set title "demo\nwindow")
(set icon #baGVsbG8gd29ybGQ=)
(set ratio 1.333)
(set fullscreen #f)
"#;

fn main() -> Result<(), Box<dyn Error>> {
    for expr in Reader::new(PROGRAM.as_bytes()) {
        let expr = expr?;
        let args = expr.tail().unwrap_or_default();
        let (name, value) = match args {
            [name, value] => (name.scan::<String>()?, value),
            _ => continue,
        };
        match value.scan::<Dynamic>()? {
            Dynamic::Integer(n) => println!("{name}: integer {n}"),
            Dynamic::Float(f) => println!("{name}: float {f}"),
            Dynamic::Bool(b) => println!("{name}: bool {b}"),
            Dynamic::Text(s) => println!("{name}: text {s:?}"),
            Dynamic::Bytes(bytes) => println!("{name}: {} bytes", bytes.len()),
        }
    }

    // Build a reply with the macro and write it straight to stdout
    let reply: Expression = sexpr!((ok {6} "settings applied"));
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write(&mut out, &reply)?;
    writeln!(out)?;

    Ok(())
}
