//! CSV export of an instruction list.
//!
//! # Columns
//!
//! ```csv
//! step,kind,direction,street,miles,item
//! 0,proceed,east,Main St,0.6909341477605417,
//! 1,deliver,,,,books
//! 2,turn,left,Main St,,
//! ```
//!
//! `miles` is written at full `f64` precision, unlike the two-decimal console
//! text.  Fields that do not apply to a row's kind are left empty.  The
//! header is written even for an empty instruction list.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::instruction::Instruction;
use crate::PlanResult;

const HEADER: [&str; 6] = ["step", "kind", "direction", "street", "miles", "item"];

#[derive(Serialize)]
struct InstructionRow<'a> {
    step:      usize,
    kind:      &'static str,
    direction: &'a str,
    street:    &'a str,
    miles:     Option<f64>,
    item:      &'a str,
}

impl<'a> InstructionRow<'a> {
    fn new(step: usize, instruction: &'a Instruction) -> Self {
        let empty = Self { step, kind: "", direction: "", street: "", miles: None, item: "" };
        match instruction {
            Instruction::Proceed { direction, street, miles } => Self {
                kind:      "proceed",
                direction: direction.as_str(),
                street,
                miles:     Some(*miles),
                ..empty
            },
            Instruction::Turn { side, street } => Self {
                kind:      "turn",
                direction: side.as_str(),
                street,
                ..empty
            },
            Instruction::Deliver { item } => Self { kind: "deliver", item, ..empty },
        }
    }
}

/// Write `instructions` as CSV (with header) to any writer.
pub fn write_instructions_csv<W: Write>(writer: W, instructions: &[Instruction]) -> PlanResult<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(HEADER)?;
    for (step, instruction) in instructions.iter().enumerate() {
        csv_writer.serialize(InstructionRow::new(step, instruction))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write `instructions` to a CSV file at `path`, replacing it if present.
pub fn write_instructions_csv_file(path: &Path, instructions: &[Instruction]) -> PlanResult<()> {
    let file = std::fs::File::create(path)?;
    write_instructions_csv(file, instructions)
}
