use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Error;
use crate::system::System;

/// Buffered trajectory writer, one fixed-width frame per call.
///
/// The file is truncated when the writer is created, so every run starts a
/// fresh trajectory; frames then concatenate with no frame-count header.
/// Each particle record carries its index twice, the residue name, the
/// species name, position to three decimals and velocity to four, followed
/// by the box record and a blank separator line.
pub struct TrajectoryWriter {
    file: BufWriter<File>,
}

impl TrajectoryWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<TrajectoryWriter, Error> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(TrajectoryWriter {
            file: BufWriter::new(file),
        })
    }

    // dump simulation state as one frame
    pub fn write_frame(&mut self, sys: &System, l: f32) -> Result<(), Error> {
        writeln!(self.file, "NaCl")?;
        writeln!(self.file, "{}", sys.len())?;
        for i in 0..sys.len() {
            writeln!(
                self.file,
                "{:5}{:<5}{:>5}{:5}{:8.3}{:8.3}{:8.3}{:8.4}{:8.4}{:8.4}",
                i,
                "NaCl",
                sys.name[i],
                i,
                sys.r[i][0],
                sys.r[i][1],
                sys.r[i][2],
                sys.v[i][0],
                sys.v[i][1],
                sys.v[i][2],
            )?;
        }
        writeln!(self.file, "{:8.3} {:8.3} {:8.3}\n", l, l, l)?;
        // keep the file a valid multi-frame trajectory even mid-run
        self.file.flush()?;
        Ok(())
    }
}
