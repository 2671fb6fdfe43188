//! `soliton-gen field-types`: the catalogue accepted by `--fields`.

use soliton_gen_core::domain::field_types;

use crate::{error::CliResult, output::OutputManager};

pub fn execute(output: &OutputManager) -> CliResult<()> {
    let types = field_types();
    output.emit(&types, |out| {
        out.header("Field types")?;
        for info in &types {
            out.print(&format!("  {:<12} {}", info.kind, info.description))?;
        }
        out.print("")?;
        out.detail("Syntax: name:type[,name:type...]; enums as status:enum(draft|published)")?;
        Ok(())
    })
}
