//! Trajectory trace collection and plain-text output.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use nalgebra::Vector3;

/// Append-sample capability handed to the simulation driver.
///
/// The driver takes `Option<&mut dyn TraceSink>`; passing `None` keeps
/// tracing entirely off the integration path.
pub trait TraceSink {
    fn record(&mut self, time: f64, position: Vector3<f64>);
}

/// One recorded trajectory sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSample {
    pub time: f64,
    pub position: Vector3<f64>,
}

/// Append-only in-memory trajectory trace. File output happens after the
/// run, keeping I/O out of the integration loop.
#[derive(Debug, Default, Clone)]
pub struct Trace {
    samples: Vec<TraceSample>,
}

impl Trace {
    pub fn new() -> Self {
        Trace {
            samples: Vec::new(),
        }
    }

    pub fn samples(&self) -> &[TraceSample] {
        &self.samples
    }
}

impl TraceSink for Trace {
    fn record(&mut self, time: f64, position: Vector3<f64>) {
        self.samples.push(TraceSample { time, position });
    }
}

/// Write a trace in the plain-text `.dat` layout: a header line with the
/// turret and target coordinates, then one `t x y z` line per sample.
/// Column position is the format's only contract; there are no labels.
pub fn write_trace<W: Write>(
    writer: &mut W,
    turret: Vector3<f64>,
    target: Vector3<f64>,
    trace: &Trace,
) -> io::Result<()> {
    writeln!(
        writer,
        "{} {} {} {} {} {}",
        turret.x, turret.y, turret.z, target.x, target.y, target.z
    )?;
    for s in trace.samples() {
        writeln!(
            writer,
            "{} {} {} {}",
            s.time, s.position.x, s.position.y, s.position.z
        )?;
    }
    Ok(())
}

/// Write a trace to the file at `path` (buffered).
pub fn write_trace_file(
    path: &str,
    turret: Vector3<f64>,
    target: Vector3<f64>,
    trace: &Trace,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_trace(&mut file, turret, target, trace)?;
    file.flush()
}
