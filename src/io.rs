use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::particles::Particles;

/// Append one frame to an xyz trajectory; `clear` truncates the file first.
pub fn append_xyz_trajectory(path: &Path, particles: &Particles, clear: bool) -> Result<()> {
    let file = if clear {
        File::create(path)?
    } else {
        OpenOptions::new().create(true).append(true).open(path)?
    };
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{}", particles.len())?;
    writeln!(writer)?;
    for position in &particles.positions {
        writeln!(writer, "0 {} {} 0", position[0], position[1])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the companion VMD script for viewing the trajectory.
pub fn vmd_script(path: &Path, box_size: &[f64; 2]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "light 0 on")?;
    writeln!(writer, "display projection orthographic")?;
    writeln!(writer, "mol modstyle 0 0 VDW 1 30")?;
    writeln!(writer, "set sel [atomselect top all]")?;
    writeln!(writer, "$sel set radius 0.5")?;
    writeln!(writer, "axes location off")?;
    writeln!(writer, "pbc set {{{} {} 1.0}} -all", box_size[0], box_size[1])?;
    writeln!(writer, "pbc box")?;
    writer.flush()?;
    Ok(())
}
